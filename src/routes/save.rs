use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::save::{LoadResponse, SaveRequest, SaveResponse},
    error::AppError,
    services::save_service,
    state::SharedState,
};

/// Routes for uploading and downloading player saves.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/save/{user_id}", post(save_player))
        .route("/api/load/{user_id}", get(load_player))
}

/// Overwrite the save blob stored for a player.
#[utoipa::path(
    post,
    path = "/api/save/{user_id}",
    tag = "saves",
    params(("user_id" = String, Path, description = "Player identifier")),
    request_body = SaveRequest,
    responses(
        (status = 200, description = "Save stored", body = SaveResponse),
        (status = 503, description = "Save store unavailable")
    )
)]
pub async fn save_player(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    save_service::save_player(&state, user_id, payload.player).await?;
    Ok(Json(SaveResponse::saved()))
}

/// Return the save blob last stored for a player.
#[utoipa::path(
    get,
    path = "/api/load/{user_id}",
    tag = "saves",
    params(("user_id" = String, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Save found", body = LoadResponse),
        (status = 404, description = "No save data found"),
        (status = 503, description = "Save store unavailable")
    )
)]
pub async fn load_player(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<LoadResponse>, AppError> {
    let player = save_service::load_player(&state, user_id).await?;
    Ok(Json(LoadResponse { player }))
}
