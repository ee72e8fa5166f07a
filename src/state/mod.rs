pub mod matcher;

use std::{sync::Arc, time::SystemTime};

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::save_store::{InMemorySaveStore, SaveStore},
    dto::ws::ServerEvent,
    services::duel_service::send_event,
};

pub use self::matcher::{DuelMatcher, DuelPairing, EnqueueOutcome};

/// Reference-counted handle to [`AppState`].
pub type SharedState = Arc<AppState>;

#[derive(Clone)]
/// Handle used to push messages to one live WebSocket.
pub struct ClientConnection {
    /// Connection identifier.
    pub id: Uuid,
    /// Outbound frames for the connection's writer task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Central application state owned by the server instance and handed to every handler.
pub struct AppState {
    config: Arc<AppConfig>,
    saves: Arc<dyn SaveStore>,
    matcher: Mutex<DuelMatcher>,
    connections: DashMap<String, Vec<ClientConnection>>,
    started_at: SystemTime,
}

impl AppState {
    /// Construct a new [`AppState`] backed by the in-memory save store.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_save_store(config, Arc::new(InMemorySaveStore::new()))
    }

    /// Construct a new [`AppState`] around an explicit save store.
    pub fn with_save_store(config: AppConfig, saves: Arc<dyn SaveStore>) -> SharedState {
        Arc::new(Self {
            config: Arc::new(config),
            saves,
            matcher: Mutex::new(DuelMatcher::new()),
            connections: DashMap::new(),
            started_at: SystemTime::now(),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Save blob storage shared by the HTTP routes and the match notifications.
    pub fn saves(&self) -> Arc<dyn SaveStore> {
        self.saves.clone()
    }

    /// Duel queue. Every matchmaking event runs to completion while holding this lock.
    pub fn matcher(&self) -> &Mutex<DuelMatcher> {
        &self.matcher
    }

    /// When the state was created.
    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Attach a connection to `user_id` so events addressed to that player reach it.
    pub fn bind_connection(&self, user_id: &str, connection: ClientConnection) {
        let mut entry = self.connections.entry(user_id.to_string()).or_default();
        if !entry.iter().any(|existing| existing.id == connection.id) {
            entry.push(connection);
        }
    }

    /// Detach a connection from `user_id`. Returns `true` when the player has no
    /// connection left afterwards.
    pub fn unbind_connection(&self, user_id: &str, connection_id: Uuid) -> bool {
        let emptied = match self.connections.get_mut(user_id) {
            Some(mut entry) => {
                entry.retain(|connection| connection.id != connection_id);
                entry.is_empty()
            }
            None => return true,
        };

        if emptied {
            self.connections
                .remove_if(user_id, |_, connections| connections.is_empty());
        }
        emptied
    }

    /// Number of player ids with at least one bound connection.
    pub fn connected_users(&self) -> usize {
        self.connections.len()
    }

    /// Deliver `event` to every connection bound to `user_id`, returning how many
    /// connections accepted it.
    pub fn emit_to_user(&self, user_id: &str, event: &ServerEvent) -> usize {
        let Some(entry) = self.connections.get(user_id) else {
            warn!(user_id = %user_id, "no connection bound to player; event dropped");
            return 0;
        };
        let targets = entry.value().clone();
        drop(entry);

        targets
            .iter()
            .filter(|connection| match send_event(&connection.tx, event) {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        user_id = %user_id,
                        connection_id = %connection.id,
                        error = %err,
                        "failed to deliver event"
                    );
                    false
                }
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ws::DuelStatus;

    fn connection() -> (ClientConnection, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ClientConnection {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    fn status(message: &str) -> ServerEvent {
        ServerEvent::DuelStatus(DuelStatus {
            message: message.into(),
        })
    }

    #[test]
    fn emit_reaches_every_connection_of_a_player() {
        let state = AppState::new(AppConfig::default());
        let (first, mut first_rx) = connection();
        let (second, mut second_rx) = connection();
        state.bind_connection("A", first);
        state.bind_connection("A", second);

        assert_eq!(state.emit_to_user("A", &status("hi")), 2);
        assert!(first_rx.try_recv().is_ok());
        assert!(second_rx.try_recv().is_ok());
        assert_eq!(state.connected_users(), 1);
    }

    #[test]
    fn emit_to_unbound_player_is_dropped() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(state.emit_to_user("ghost", &status("hi")), 0);
    }

    #[test]
    fn binding_the_same_connection_twice_keeps_one_entry() {
        let state = AppState::new(AppConfig::default());
        let (conn, mut rx) = connection();
        state.bind_connection("A", conn.clone());
        state.bind_connection("A", conn);

        assert_eq!(state.emit_to_user("A", &status("once")), 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unbinding_last_connection_forgets_the_player() {
        let state = AppState::new(AppConfig::default());
        let (first, _first_rx) = connection();
        let (second, _second_rx) = connection();
        let (first_id, second_id) = (first.id, second.id);
        state.bind_connection("A", first);
        state.bind_connection("A", second);

        assert!(!state.unbind_connection("A", first_id));
        assert_eq!(state.connected_users(), 1);
        assert!(state.unbind_connection("A", second_id));
        assert_eq!(state.connected_users(), 0);
    }

    #[test]
    fn closed_connection_is_not_counted() {
        let state = AppState::new(AppConfig::default());
        let (conn, rx) = connection();
        state.bind_connection("A", conn);
        drop(rx);

        assert_eq!(state.emit_to_user("A", &status("lost")), 0);
    }
}
