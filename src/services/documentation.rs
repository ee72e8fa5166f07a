use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the duel relay.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::save::save_player,
        crate::routes::save::load_player,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::save::SaveRequest,
            crate::dto::save::SaveResponse,
            crate::dto::save::LoadResponse,
            crate::dto::ws::ClientEvent,
            crate::dto::ws::ServerEvent,
            crate::dto::ws::MatchFound,
            crate::dto::ws::DuelStatus,
            crate::dto::ws::OpponentSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "saves", description = "Player save upload and download"),
        (name = "duels", description = "WebSocket duel matchmaking"),
    )
)]
pub struct ApiDoc;
