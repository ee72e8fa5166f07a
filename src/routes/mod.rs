use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Health check route.
pub mod health;
/// Save upload and download routes.
pub mod save;
/// Duel WebSocket upgrade.
pub mod websocket;

/// Compose all route trees and wire in the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(save::router())
        .merge(websocket::router())
        .merge(docs::router())
        .with_state(state)
}
