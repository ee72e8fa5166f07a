use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Players currently sitting in the duel queue.
    pub waiting_players: usize,
    /// Player ids with at least one bound connection.
    pub connected_users: usize,
    /// Players with a stored save blob; `None` when the store did not answer.
    pub saved_players: Option<usize>,
    /// RFC 3339 timestamp of process start.
    pub started_at: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(
        waiting_players: usize,
        connected_users: usize,
        saved_players: usize,
        started_at: String,
    ) -> Self {
        Self {
            status: "ok".to_string(),
            waiting_players,
            connected_users,
            saved_players: Some(saved_players),
            started_at,
        }
    }

    /// Create a health response indicating the save store did not answer.
    pub fn degraded(waiting_players: usize, connected_users: usize, started_at: String) -> Self {
        Self {
            status: "degraded".to_string(),
            waiting_players,
            connected_users,
            saved_players: None,
            started_at,
        }
    }
}
