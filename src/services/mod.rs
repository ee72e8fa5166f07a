/// OpenAPI documentation generation.
pub mod documentation;
/// Duel matchmaking event dispatch.
pub mod duel_service;
/// Health check service.
pub mod health_service;
/// Player save upload and download.
pub mod save_service;
/// WebSocket connection lifecycle.
pub mod websocket_service;
