use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Body of `POST /api/save/{userId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveRequest {
    /// Opaque player state. A missing field is treated as `null`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub player: Value,
}

/// Plain acknowledgement returned after a save.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveResponse {
    /// Always `Save successful`.
    pub message: String,
}

impl SaveResponse {
    /// Acknowledgement for a stored save.
    pub fn saved() -> Self {
        Self {
            message: "Save successful".into(),
        }
    }
}

/// Body of a successful `GET /api/load/{userId}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoadResponse {
    /// The blob exactly as last saved.
    #[schema(value_type = Object)]
    pub player: Value,
}
