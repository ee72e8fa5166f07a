use std::time::Duration;

use duel_relay::{config::AppConfig, routes, state::AppState};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpListener, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("expected listener to bind");
    let addr = listener.local_addr().expect("expected local address");
    let app = routes::router(AppState::new(AppConfig::default()));
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .expect("server should run");
    });
    format!("ws://{addr}/ws")
}

async fn connect(url: &str) -> Socket {
    let (socket, _) = connect_async(url).await.expect("expected websocket handshake");
    socket
}

async fn send(socket: &mut Socket, event: Value) {
    socket
        .send(Message::text(event.to_string()))
        .await
        .expect("expected frame to send");
}

async fn next_event(socket: &mut Socket) -> Value {
    loop {
        let frame = timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket closed")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("expected json event");
        }
    }
}

#[tokio::test]
async fn two_players_searching_are_paired_over_websocket() {
    let url = spawn_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    send(&mut a, json!({ "event": "registerUser", "data": "player-A" })).await;
    send(&mut a, json!({ "event": "searchForDuel" })).await;
    let waiting = next_event(&mut a).await;
    assert_eq!(waiting["event"], "duelStatus");

    send(&mut b, json!({ "event": "registerUser", "data": "player-B" })).await;
    send(&mut b, json!({ "event": "searchForDuel" })).await;

    let for_a = next_event(&mut a).await;
    let for_b = next_event(&mut b).await;
    assert_eq!(for_a["event"], "matchFound");
    assert_eq!(for_b["event"], "matchFound");
    assert_eq!(for_a["data"]["room"], for_b["data"]["room"]);
    assert_eq!(for_a["data"]["isFirstPlayer"], true);
    assert_eq!(for_b["data"]["isFirstPlayer"], false);
    assert_eq!(for_a["data"]["opponent"]["id"], "player-B");
    assert_eq!(for_b["data"]["opponent"]["id"], "player-A");
}

#[tokio::test]
async fn search_before_register_returns_error_event() {
    let url = spawn_server().await;
    let mut socket = connect(&url).await;

    send(&mut socket, json!({ "event": "duelAction", "data": { "action": "poke" } })).await;
    send(&mut socket, json!({ "event": "searchForDuel" })).await;

    assert_eq!(
        next_event(&mut socket).await,
        json!({ "event": "error", "data": "User not registered" })
    );
}
