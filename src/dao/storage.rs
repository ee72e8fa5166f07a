use std::error::Error;
use thiserror::Error;

/// Result alias for save store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a save store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not serve the request at all.
    #[error("save store `{backend}` unavailable: {message}")]
    Unavailable {
        /// Short name of the failing backend, e.g. `memory`.
        backend: &'static str,
        /// What went wrong.
        message: String,
        /// Underlying cause, when there is one.
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Report `backend` as unavailable without an underlying cause.
    pub fn unavailable(backend: &'static str, message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            backend,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the error that made the backend unavailable.
    pub fn with_source(self, cause: impl Error + Send + Sync + 'static) -> Self {
        match self {
            StorageError::Unavailable {
                backend, message, ..
            } => StorageError::Unavailable {
                backend,
                message,
                source: Some(Box::new(cause)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_names_backend_and_keeps_cause() {
        let err = StorageError::unavailable("memory", "shutting down")
            .with_source(std::io::Error::other("socket closed"));

        assert_eq!(
            err.to_string(),
            "save store `memory` unavailable: shutting down"
        );
        assert_eq!(err.source().map(|cause| cause.to_string()).as_deref(), Some("socket closed"));
    }
}
