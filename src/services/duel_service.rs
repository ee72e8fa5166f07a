use axum::extract::ws::Message;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{ClientEvent, DuelStatus, MatchFound, OpponentSummary, ServerEvent},
    state::{ClientConnection, DuelPairing, EnqueueOutcome, SharedState},
};

const NOT_REGISTERED: &str = "User not registered";

/// Internal error type for event channel handling.
#[derive(Debug, Error)]
pub enum DuelError {
    /// Writer channel closed - connection should be terminated immediately.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Per-connection state: the socket identity and the player it is bound to, if any.
pub struct Session {
    id: Uuid,
    user_id: Option<String>,
    tx: mpsc::UnboundedSender<Message>,
}

impl Session {
    /// Fresh, unregistered session writing to `tx`.
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            tx,
        }
    }

    /// Connection identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Player id bound through `registerUser`.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn connection(&self) -> ClientConnection {
        ClientConnection {
            id: self.id,
            tx: self.tx.clone(),
        }
    }
}

/// Route one inbound event to its handler. Each event is handled to completion
/// before the caller reads the next frame.
pub async fn dispatch(
    state: &SharedState,
    session: &mut Session,
    event: ClientEvent,
) -> Result<(), DuelError> {
    match event {
        ClientEvent::RegisterUser(user_id) => {
            register_user(state, session, user_id).await;
            Ok(())
        }
        ClientEvent::SearchForDuel => search_for_duel(state, session).await,
        ClientEvent::DuelAction(data) => {
            duel_action(session, &data);
            Ok(())
        }
    }
}

/// Bind the connection to `user_id`, moving it off any previously bound id.
///
/// An empty id leaves the connection unregistered.
pub async fn register_user(state: &SharedState, session: &mut Session, user_id: String) {
    if session.user_id.as_deref() == Some(user_id.as_str()) {
        debug!(connection_id = %session.id, user_id = %user_id, "connection already registered");
        return;
    }

    release_binding(state, session).await;

    if user_id.is_empty() {
        warn!(connection_id = %session.id, "ignoring registration with empty user id");
        return;
    }

    state.bind_connection(&user_id, session.connection());
    info!(connection_id = %session.id, user_id = %user_id, "connection registered");
    session.user_id = Some(user_id);
}

/// Drop the session's current binding. When that was the player's last
/// connection, the player also leaves the duel queue.
async fn release_binding(state: &SharedState, session: &mut Session) {
    let Some(previous) = session.user_id.take() else {
        return;
    };
    if state.unbind_connection(&previous, session.id)
        && state.matcher().lock().await.remove(&previous)
    {
        info!(user_id = %previous, "player left the duel queue after rebinding");
    }
}

/// Put the bound player in the duel queue and notify whoever the outcome concerns.
pub async fn search_for_duel(state: &SharedState, session: &Session) -> Result<(), DuelError> {
    let Some(user_id) = session.user_id.as_deref() else {
        warn!(connection_id = %session.id, "duel search from unregistered connection");
        return send_event(&session.tx, &ServerEvent::Error(NOT_REGISTERED.into()));
    };

    let mut matcher = state.matcher().lock().await;
    match matcher.enqueue(user_id) {
        EnqueueOutcome::AlreadyQueued => {
            debug!(user_id = %user_id, "player already in duel queue");
        }
        EnqueueOutcome::Waiting => {
            info!(user_id = %user_id, queue = ?matcher.waiting(), "player added to duel queue");
            let status = ServerEvent::DuelStatus(DuelStatus {
                message: state.config().waiting_message().to_string(),
            });
            state.emit_to_user(user_id, &status);
        }
        EnqueueOutcome::Matched(pairing) => {
            notify_match(state, &pairing).await;
            info!(
                room = %pairing.room,
                first = %pairing.first,
                second = %pairing.second,
                "duel matched"
            );
        }
    }
    Ok(())
}

/// Accept an in-duel action. There is no combat logic; the action is only logged.
pub fn duel_action(session: &Session, data: &Value) {
    info!(
        connection_id = %session.id,
        user_id = ?session.user_id,
        actor = ?data.get("userId"),
        action = ?data.get("action"),
        "duel action received"
    );
}

/// Tear down the connection's binding and drop its player from the duel queue.
pub async fn disconnect(state: &SharedState, session: &Session) {
    info!(connection_id = %session.id, "client disconnected");
    let Some(user_id) = session.user_id.as_deref() else {
        return;
    };

    state.unbind_connection(user_id, session.id);
    if state.matcher().lock().await.remove(user_id) {
        info!(user_id = %user_id, "player removed from duel queue");
    }
}

/// Serialize an event and push it onto the provided WebSocket sender.
///
/// Serialization failures are logged and swallowed; a closed writer channel is
/// reported as [`DuelError::ConnectionClosed`].
pub fn send_event(tx: &mpsc::UnboundedSender<Message>, event: &ServerEvent) -> Result<(), DuelError> {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize event `{event:?}`");
            return Ok(());
        }
    };

    tx.send(Message::Text(payload.into()))
        .map_err(|_| DuelError::ConnectionClosed)
}

async fn notify_match(state: &SharedState, pairing: &DuelPairing) {
    let first = opponent_summary(state, &pairing.first, Seat::First).await;
    let second = opponent_summary(state, &pairing.second, Seat::Second).await;

    state.emit_to_user(
        &pairing.first,
        &ServerEvent::MatchFound(MatchFound {
            room: pairing.room.clone(),
            opponent: second,
            is_first_player: true,
        }),
    );
    state.emit_to_user(
        &pairing.second,
        &ServerEvent::MatchFound(MatchFound {
            room: pairing.room.clone(),
            opponent: first,
            is_first_player: false,
        }),
    );
}

#[derive(Clone, Copy)]
enum Seat {
    First,
    Second,
}

/// Describe `player_id` to its opponent: placeholder profile, overridden by the
/// `name`, `level` and `hp` fields of the player's save blob when present.
async fn opponent_summary(state: &SharedState, player_id: &str, seat: Seat) -> OpponentSummary {
    let config = state.config();
    let defaults = config.opponent();
    let prefix = match seat {
        Seat::First => &defaults.first_prefix,
        Seat::Second => &defaults.second_prefix,
    };
    let tag = player_id.chars().last().map(String::from).unwrap_or_default();

    let mut summary = OpponentSummary {
        id: player_id.to_string(),
        name: format!("{prefix} {tag}"),
        level: defaults.level,
        hp: defaults.hp,
    };

    match state.saves().get(player_id.to_string()).await {
        Ok(Some(Value::Object(fields))) => {
            if let Some(name) = fields.get("name").and_then(Value::as_str) {
                summary.name = name.to_string();
            }
            if let Some(level) = fields.get("level").and_then(as_u32) {
                summary.level = level;
            }
            if let Some(hp) = fields.get("hp").and_then(as_u32) {
                summary.hp = hp;
            }
        }
        Ok(_) => {}
        Err(err) => {
            warn!(user_id = %player_id, error = %err, "save lookup failed; using placeholder profile")
        }
    }
    summary
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|raw| u32::try_from(raw).ok())
}
