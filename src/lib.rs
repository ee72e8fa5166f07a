//! Library crate for duel-relay, exposing modules for binaries and integration tests.

pub mod config;
/// Save storage backends.
pub mod dao;
/// Wire types for the HTTP and WebSocket APIs.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum route trees.
pub mod routes;
/// Request and event handling.
pub mod services;
/// Shared application state and the duel queue.
pub mod state;
