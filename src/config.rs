//! Application-level configuration loading: CORS origins, status messages and the
//! placeholder opponent profile sent with match notifications.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use validator::{Validate, ValidationError};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DUEL_RELAY_CONFIG_PATH";
const DEFAULT_WAITING_MESSAGE: &str = "Waiting for an opponent...";
/// Environment variable selecting the listen port.
const PORT_ENV: &str = "PORT";
/// Listen port used when [`PORT_ENV`] is unset or unusable.
pub const DEFAULT_PORT: u16 = 3456;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    cors_origins: Vec<String>,
    waiting_message: String,
    opponent: OpponentDefaults,
}

/// Placeholder profile used when an opponent has no usable save data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct OpponentDefaults {
    /// Name prefix for the player who entered the queue first.
    #[validate(length(min = 1, max = 32))]
    pub first_prefix: String,
    /// Name prefix for the player who completed the pair.
    #[validate(length(min = 1, max = 32))]
    pub second_prefix: String,
    /// Level shown when the opponent's save has none.
    #[validate(range(min = 1))]
    pub level: u32,
    /// Hit points shown when the opponent's save has none.
    #[validate(range(min = 1))]
    pub hp: u32,
}

impl Default for OpponentDefaults {
    fn default() -> Self {
        Self {
            first_prefix: "Hero".into(),
            second_prefix: "Rival".into(),
            level: 10,
            hp: 150,
        }
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        origins = app_config.cors_origins.len(),
                        "loaded relay configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "invalid config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse and validate a configuration document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let raw = serde_json::from_str::<RawConfig>(contents)?;
        raw.validate()?;
        Ok(raw.into())
    }

    /// Origins allowed by CORS. Empty means any origin is accepted.
    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    /// Status text sent to a player left alone in the waiting queue.
    pub fn waiting_message(&self) -> &str {
        &self.waiting_message
    }

    /// Placeholder opponent profile.
    pub fn opponent(&self) -> &OpponentDefaults {
        &self.opponent
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            waiting_message: DEFAULT_WAITING_MESSAGE.into(),
            opponent: OpponentDefaults::default(),
        }
    }
}

/// Reasons a configuration document is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its allowed range.
    #[error("config validation failed: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Debug, Deserialize, Validate)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    #[validate(custom(function = "validate_origins"))]
    cors_origins: Vec<String>,
    #[serde(default = "default_waiting_message")]
    #[validate(length(min = 1))]
    waiting_message: String,
    #[serde(default)]
    #[validate(nested)]
    opponent: OpponentDefaults,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            cors_origins: value.cors_origins,
            waiting_message: value.waiting_message,
            opponent: value.opponent,
        }
    }
}

fn default_waiting_message() -> String {
    DEFAULT_WAITING_MESSAGE.into()
}

/// Every CORS origin must be an absolute `http` or `https` origin without a path.
fn validate_origins(origins: &[String]) -> Result<(), ValidationError> {
    for origin in origins {
        let rest = origin
            .strip_prefix("https://")
            .or_else(|| origin.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() && !host.contains('/') => {}
            _ => {
                let mut err = ValidationError::new("cors_origin");
                err.message = Some(format!("`{origin}` is not an http(s) origin").into());
                return Err(err);
            }
        }
    }
    Ok(())
}

/// Listen port taken from the `PORT` environment variable.
pub fn listen_port() -> u16 {
    parse_port(env::var(PORT_ENV).ok().as_deref())
}

/// Parse a raw port value, falling back to [`DEFAULT_PORT`] with a warning when it is unusable.
pub fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw else {
        return DEFAULT_PORT;
    };
    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(err) => {
            warn!(port = %raw, error = %err, default = DEFAULT_PORT, "ignoring unusable PORT");
            DEFAULT_PORT
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert!(config.cors_origins().is_empty());
        assert_eq!(config.waiting_message(), DEFAULT_WAITING_MESSAGE);
        assert_eq!(config.opponent(), &OpponentDefaults::default());
    }

    #[test]
    fn partial_opponent_section_keeps_other_defaults() {
        let config = AppConfig::from_json_str(
            r#"{
                "cors_origins": ["https://game.example.com"],
                "opponent": { "level": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.cors_origins(), ["https://game.example.com".to_string()]);
        assert_eq!(config.opponent().level, 3);
        assert_eq!(config.opponent().hp, 150);
        assert_eq!(config.opponent().first_prefix, "Hero");
    }

    #[test]
    fn rejects_origin_with_path_or_scheme_missing() {
        assert!(AppConfig::from_json_str(r#"{"cors_origins": ["game.example.com"]}"#).is_err());
        assert!(
            AppConfig::from_json_str(r#"{"cors_origins": ["https://game.example.com/app"]}"#)
                .is_err()
        );
        assert!(AppConfig::from_json_str(r#"{"cors_origins": ["http://"]}"#).is_err());
    }

    #[test]
    fn rejects_zero_hp_and_empty_message() {
        assert!(matches!(
            AppConfig::from_json_str(r#"{"opponent": {"hp": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_json_str(r#"{"waiting_message": ""}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn port_falls_back_to_default_when_unset_or_unusable() {
        assert_eq!(parse_port(None), DEFAULT_PORT);
        assert_eq!(parse_port(Some("8080")), 8080);
        assert_eq!(parse_port(Some("eighty")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("70000")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("")), DEFAULT_PORT);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
