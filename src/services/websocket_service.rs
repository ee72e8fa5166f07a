use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    dto::ws::ClientEvent,
    services::duel_service::{self, DuelError, Session},
    state::SharedState,
};

/// Handle the full lifecycle for an individual duel WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let mut session = Session::new(outbound_tx.clone());
    info!(connection_id = %session.id(), "client connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match ClientEvent::from_json_str(&text) {
                Ok(event) => {
                    let name = event.name();
                    if let Err(err) = duel_service::dispatch(&state, &mut session, event).await {
                        warn!(
                            connection_id = %session.id(),
                            event = name,
                            error = %err,
                            "error while handling event"
                        );
                        if matches!(err, DuelError::ConnectionClosed) {
                            break;
                        }
                    }
                }
                Err(err) => {
                    warn!(connection_id = %session.id(), error = %err, payload = %text.as_str(), "ignoring unparsable event");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(connection_id = %session.id(), error = %err, "websocket error");
                break;
            }
        }
    }

    duel_service::disconnect(&state, &session).await;
    drop(session);
    finalize(writer_task, outbound_tx).await;
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
