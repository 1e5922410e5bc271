// tests/websocket.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::Query;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use spacedash_client::api_client::StaticToken;
use spacedash_client::ws::{
    AuthParam, CloseInfo, ConnectionState, ReconnectPolicy, WsClient, WsConfig,
};
use spacedash_shared::WsError;

/// Serve `app` on a random port. Returns `host:port`.
async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr.to_string()
}

async fn echo(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|mut socket: WebSocket| async move {
        while let Some(Ok(msg)) = socket.recv().await {
            match msg {
                Message::Text(text) => {
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    })
}

/// Replies with the query string it was opened with, as JSON.
async fn whoami(Query(params): Query<HashMap<String, String>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |mut socket: WebSocket| async move {
        let json = serde_json::to_string(&params).unwrap_or_default();
        let _ = socket.send(Message::Text(json.into())).await;
        while let Some(Ok(msg)) = socket.recv().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    })
}

/// Closes cleanly right after the handshake.
async fn goodbye(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|mut socket: WebSocket| async move {
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: 1000,
                reason: "done".into(),
            })))
            .await;
        while let Some(Ok(_)) = socket.recv().await {}
    })
}

fn test_app() -> Router {
    Router::new()
        .route("/echo", get(echo))
        .route("/whoami", get(whoami))
        .route("/goodbye", get(goodbye))
}

fn fast_retry() -> ReconnectPolicy {
    ReconnectPolicy {
        max_attempts: 3,
        initial_delay_ms: 10,
        backoff_multiplier: 2.0,
    }
}

fn client(config: WsConfig) -> WsClient {
    WsClient::new(config, Arc::new(StaticToken(Some("t0k en".to_string()))))
}

fn record_states(ws: &WsClient) -> Arc<Mutex<Vec<ConnectionState>>> {
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    ws.handlers()
        .on_state_change(move |state| sink.lock().unwrap().push(state));
    states
}

fn record_messages(ws: &WsClient) -> Arc<Mutex<Vec<String>>> {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    ws.handlers()
        .on_message(move |text| sink.lock().unwrap().push(text));
    messages
}

async fn wait_until(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("Timed out waiting for {what}");
}

#[tokio::test]
async fn send_before_connect_fails() {
    let ws = client(WsConfig::new("test", "ws://127.0.0.1:9/echo", AuthParam::Token));

    assert!(!ws.is_connected());
    assert!(matches!(ws.send_text("hello"), Err(WsError::NotConnected)));
}

#[tokio::test]
async fn echo_round_trip_and_idempotent_disconnect() {
    // Arrange
    let addr = spawn_app(test_app()).await;
    let ws = client(
        WsConfig::new("echo", format!("ws://{addr}/echo"), AuthParam::Token)
            .with_reconnect(fast_retry()),
    );
    let messages = record_messages(&ws);
    let states = record_states(&ws);

    // Act
    ws.connect().await.expect("connect");
    ws.send_text("ping").expect("send");
    wait_until("echo", || messages.lock().unwrap().contains(&"ping".to_string())).await;

    // Assert
    assert!(ws.is_connected());
    assert_eq!(
        states.lock().unwrap()[..2],
        [ConnectionState::Connecting, ConnectionState::Connected]
    );

    ws.disconnect();
    ws.disconnect();
    assert!(!ws.is_connected());
    assert_eq!(ws.state(), ConnectionState::Disconnected);
    assert!(matches!(ws.send_text("late"), Err(WsError::NotConnected)));

    // A local close never reconnects
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!states
        .lock()
        .unwrap()
        .iter()
        .any(|s| matches!(s, ConnectionState::Reconnecting { .. })));
}

#[tokio::test]
async fn token_rides_on_the_configured_query_parameter() {
    let addr = spawn_app(test_app()).await;

    let plain = client(WsConfig::new("plain", format!("ws://{addr}/whoami"), AuthParam::Token));
    let plain_messages = record_messages(&plain);
    plain.connect().await.expect("connect");
    wait_until("plain params", || !plain_messages.lock().unwrap().is_empty()).await;
    let params: HashMap<String, String> =
        serde_json::from_str(&plain_messages.lock().unwrap()[0]).unwrap();
    assert_eq!(params.get("token").map(String::as_str), Some("t0k en"));
    plain.disconnect();

    let bearer = client(WsConfig::new(
        "bearer",
        format!("ws://{addr}/whoami?v=1"),
        AuthParam::AuthorizationBearer,
    ));
    let bearer_messages = record_messages(&bearer);
    bearer.connect().await.expect("connect");
    wait_until("bearer params", || !bearer_messages.lock().unwrap().is_empty()).await;
    let params: HashMap<String, String> =
        serde_json::from_str(&bearer_messages.lock().unwrap()[0]).unwrap();
    assert_eq!(params.get("Authorization").map(String::as_str), Some("Bearer t0k en"));
    assert_eq!(params.get("v").map(String::as_str), Some("1"));
    bearer.disconnect();
}

#[tokio::test]
async fn clean_server_close_does_not_reconnect() {
    // Arrange
    let addr = spawn_app(test_app()).await;
    let ws = client(
        WsConfig::new("goodbye", format!("ws://{addr}/goodbye"), AuthParam::Token)
            .with_reconnect(fast_retry()),
    );
    let states = record_states(&ws);
    let closes = Arc::new(Mutex::new(Vec::<CloseInfo>::new()));
    let sink = closes.clone();
    ws.handlers()
        .on_close(move |info| sink.lock().unwrap().push(info));

    // Act
    ws.connect().await.expect("connect");
    wait_until("close", || !closes.lock().unwrap().is_empty()).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Assert
    let close = closes.lock().unwrap()[0].clone();
    assert!(close.was_clean);
    assert_eq!(close.code, 1000);
    assert_eq!(close.reason, "done");
    assert_eq!(ws.state(), ConnectionState::Disconnected);
    assert!(!states
        .lock()
        .unwrap()
        .iter()
        .any(|s| matches!(s, ConnectionState::Reconnecting { .. })));
}

#[tokio::test]
async fn dropped_connection_retries_three_times_then_fails() {
    // Arrange: accept one socket, drop it without a close frame, stop listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let socket = tokio_tungstenite::accept_async(stream).await.unwrap();
        drop(listener);
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(socket);
    });

    let ws = client(
        WsConfig::new(
            "course-creator",
            format!("ws://{addr}/"),
            AuthParam::AuthorizationBearer,
        )
        .with_reconnect(fast_retry()),
    );
    let states = record_states(&ws);

    // Act
    ws.connect().await.expect("first connect");
    wait_until("failure", || {
        matches!(ws.state(), ConnectionState::Failed { .. })
    })
    .await;

    // Assert
    let attempts: Vec<u32> = states
        .lock()
        .unwrap()
        .iter()
        .filter_map(|s| match s {
            ConnectionState::Reconnecting { attempt } => Some(*attempt),
            _ => None,
        })
        .collect();
    assert_eq!(attempts, vec![1, 2, 3]);
    assert!(!ws.is_connected());
}

#[tokio::test]
async fn manual_connect_during_backoff_stops_the_retry_loop() {
    // Arrange: the first socket is dropped without a close frame, later ones echo
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let Ok(mut socket) = tokio_tungstenite::accept_async(stream).await else {
                    return;
                };
                if n == 0 {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    drop(socket);
                    return;
                }
                while let Some(Ok(msg)) = socket.next().await {
                    if msg.is_text() && socket.send(msg).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    let ws = client(
        WsConfig::new("assistant", format!("ws://{addr}/"), AuthParam::Token).with_reconnect(
            ReconnectPolicy {
                max_attempts: 3,
                initial_delay_ms: 300,
                backoff_multiplier: 2.0,
            },
        ),
    );
    let messages = record_messages(&ws);
    ws.connect().await.expect("first connect");
    wait_until("backoff", || {
        ws.state() == ConnectionState::Reconnecting { attempt: 1 }
    })
    .await;

    // Act: reconnect by hand while the first retry is still sleeping (600ms)
    ws.connect().await.expect("manual connect");
    tokio::time::sleep(Duration::from_millis(900)).await;
    ws.send_text("ping").expect("send");
    wait_until("echo", || !messages.lock().unwrap().is_empty()).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Assert
    assert_eq!(accepted.load(Ordering::SeqCst), 2);
    assert_eq!(*messages.lock().unwrap(), vec!["ping".to_string()]);
    assert!(ws.is_connected());
    ws.disconnect();
}

#[tokio::test]
async fn stalled_handshake_times_out() {
    // The listener never accepts, so the TCP connect succeeds but no upgrade follows.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    let ws = client(
        WsConfig::new("stalled", format!("ws://{addr}/"), AuthParam::Token)
            .with_connect_timeout(Duration::from_millis(200)),
    );

    let result = ws.connect().await;

    assert!(matches!(result, Err(WsError::Timeout(200))));
    assert_eq!(ws.state(), ConnectionState::Disconnected);
    drop(listener);
}
