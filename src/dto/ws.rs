use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
/// Events accepted from duel WebSocket clients, framed as `{"event": ..., "data": ...}`.
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Bind this connection to a player id so events can be addressed to it.
    RegisterUser(String),
    /// Join the duel queue as the bound player.
    SearchForDuel,
    /// In-duel action. Accepted and logged; there is no combat logic behind it.
    DuelAction(Value),
}

impl ClientEvent {
    /// Parse one text frame.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterUser(_) => "registerUser",
            Self::SearchForDuel => "searchForDuel",
            Self::DuelAction(_) => "duelAction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
/// Events pushed to duel WebSocket clients.
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A duel opponent was found.
    MatchFound(MatchFound),
    /// Queue status update, e.g. still waiting.
    DuelStatus(DuelStatus),
    /// Plain error message, e.g. searching before registering.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Sent to each side of a freshly paired duel.
pub struct MatchFound {
    /// Room token shared by both sides.
    pub room: String,
    /// The other player.
    pub opponent: OpponentSummary,
    /// `true` for the side that waited longer and acts first.
    pub is_first_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
/// Human-readable queue status.
pub struct DuelStatus {
    /// Status text.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
/// What a player gets to know about the opponent they were paired with.
pub struct OpponentSummary {
    /// Player id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Character level.
    pub level: u32,
    /// Hit points.
    pub hp: u32,
}
