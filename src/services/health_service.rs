use tracing::warn;

use crate::{
    dto::{format_system_time, health::HealthResponse},
    state::SharedState,
};

/// Report liveness along with queue, connection and save counts.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let waiting = state.matcher().lock().await.len();
    let connected = state.connected_users();
    let started_at = format_system_time(state.started_at());
    let saves = state.saves();

    if let Err(err) = saves.health_check().await {
        warn!(error = %err, "save store health check failed");
        return HealthResponse::degraded(waiting, connected, started_at);
    }

    match saves.count().await {
        Ok(saved) => HealthResponse::ok(waiting, connected, saved, started_at),
        Err(err) => {
            warn!(error = %err, "failed to count stored saves");
            HealthResponse::degraded(waiting, connected, started_at)
        }
    }
}
