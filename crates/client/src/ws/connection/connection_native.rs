//! Native/Desktop WebSocket implementation using tokio-tungstenite.

use std::sync::{Arc, Mutex, MutexGuard};

use futures_channel::mpsc::{unbounded, UnboundedSender};
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, SinkExt, Stream, StreamExt};
use serde::Serialize;
use spacedash_shared::WsError;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{connect_async, tungstenite, tungstenite::Message};

use super::{CloseInfo, ConnectionState, Handlers, ReconnectPolicy, WsConfig};
use crate::api_client::TokenSource;

struct Link {
    state: ConnectionState,
    sender: Option<UnboundedSender<Message>>,
    /// Bumped on every successful open so a stale reader cannot touch a newer socket.
    generation: u64,
    /// Set by `disconnect`; suppresses reconnection.
    closing: bool,
}

struct Shared {
    config: WsConfig,
    tokens: Arc<dyn TokenSource>,
    handlers: Handlers,
    link: Mutex<Link>,
}

/// A WebSocket client for one service endpoint (Native implementation)
#[derive(Clone)]
pub struct WsClient {
    shared: Arc<Shared>,
}

impl WsClient {
    pub fn new(config: WsConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                tokens,
                handlers: Handlers::default(),
                link: Mutex::new(Link {
                    state: ConnectionState::Disconnected,
                    sender: None,
                    generation: 0,
                    closing: false,
                }),
            }),
        }
    }

    pub fn config(&self) -> &WsConfig {
        &self.shared.config
    }

    pub fn handlers(&self) -> &Handlers {
        &self.shared.handlers
    }

    fn link(&self) -> MutexGuard<'_, Link> {
        self.shared.link.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> ConnectionState {
        self.link().state.clone()
    }

    pub fn is_connected(&self) -> bool {
        let link = self.link();
        link.sender.is_some() && link.state.is_connected()
    }

    fn set_state(&self, state: ConnectionState) {
        {
            let mut link = self.link();
            if link.state == state {
                return;
            }
            link.state = state.clone();
        }
        self.shared.handlers.emit_state(&state);
    }

    fn is_closing(&self) -> bool {
        self.link().closing
    }

    /// Open the socket. Resolves once it is open; a no-op when already connected.
    pub async fn connect(&self) -> Result<(), WsError> {
        if self.is_connected() {
            return Ok(());
        }
        self.link().closing = false;
        self.set_state(ConnectionState::Connecting);
        self.open().await
    }

    async fn open(&self) -> Result<(), WsError> {
        let result = self.try_open().await;
        if let Err(e) = &result {
            crate::log_error!("WebSocket {} failed to open: {}", self.shared.config.name, e);
            self.shared.handlers.emit_error(&e.to_string());
            if !matches!(self.state(), ConnectionState::Reconnecting { .. }) {
                self.set_state(ConnectionState::Disconnected);
            }
        }
        result
    }

    async fn try_open(&self) -> Result<(), WsError> {
        let config = &self.shared.config;
        let token = self
            .shared
            .tokens
            .access_token()
            .await
            .ok_or_else(|| WsError::Auth("no access token".to_string()))?;
        let url = config.url_with_token(&token)?;

        let (stream, _response) =
            match tokio::time::timeout(config.connect_timeout, connect_async(url.as_str())).await {
                Err(_) => return Err(WsError::Timeout(config.connect_timeout.as_millis() as u64)),
                Ok(Err(e)) => return Err(WsError::Connect(e.to_string())),
                Ok(Ok(pair)) => pair,
            };

        let (mut write, read) = stream.split();
        let (tx, mut rx) = unbounded::<Message>();
        let generation = {
            let mut link = self.link();
            if link.closing {
                None
            } else {
                link.generation += 1;
                link.sender = Some(tx);
                Some(link.generation)
            }
        };
        let Some(generation) = generation else {
            // disconnect() raced the handshake
            let _ = write.close().await;
            return Err(WsError::NotConnected);
        };

        crate::log_info!("WebSocket {} connected", config.name);
        self.set_state(ConnectionState::Connected);
        self.shared.handlers.emit_open();

        let name = config.name;
        tokio::spawn(async move {
            while let Some(msg) = rx.next().await {
                let is_close = matches!(msg, Message::Close(_));
                if let Err(e) = write.send(msg).await {
                    crate::log_error!("WebSocket {} send failed: {}", name, e);
                    break;
                }
                if is_close {
                    break;
                }
            }
        });

        let client = self.clone();
        tokio::spawn(async move {
            let info = read_frames(read, &client.shared.handlers, name).await;
            client.handle_close(generation, info).await;
        });

        Ok(())
    }

    /// Boxed to break the open -> reader -> reconnect -> open type cycle.
    fn handle_close(&self, generation: u64, info: CloseInfo) -> BoxFuture<'static, ()> {
        let client = self.clone();
        async move {
            let closing = {
                let mut link = client.link();
                if link.generation != generation {
                    return;
                }
                link.sender = None;
                link.closing
            };

            crate::log_info!(
                "WebSocket {} closed (code {}, clean: {})",
                client.shared.config.name,
                info.code,
                info.was_clean
            );
            client.set_state(ConnectionState::Disconnected);
            client.shared.handlers.emit_close(&info);

            if info.was_clean || closing {
                return;
            }
            if let Some(policy) = client.shared.config.reconnect.clone() {
                client.reconnect(policy).await;
            }
        }
        .boxed()
    }

    async fn reconnect(&self, policy: ReconnectPolicy) {
        let name = self.shared.config.name;
        for attempt in 1..=policy.max_attempts {
            if self.is_closing() || self.is_connected() {
                return;
            }
            self.set_state(ConnectionState::Reconnecting { attempt });
            let delay = policy.delay_for_attempt(attempt);
            crate::log_info!(
                "Reconnecting {} in {}ms (attempt {}/{})",
                name,
                delay.as_millis(),
                attempt,
                policy.max_attempts
            );
            tokio::time::sleep(delay).await;
            // A manual connect() may have won the race during the backoff.
            if self.is_closing() || self.is_connected() {
                return;
            }
            if self.open().await.is_ok() {
                return;
            }
        }
        self.set_state(ConnectionState::Failed {
            reason: format!("Max reconnect attempts ({}) exceeded", policy.max_attempts),
        });
    }

    /// Send a text frame. Fails with `NotConnected` unless the socket is open.
    pub fn send_text(&self, text: impl Into<String>) -> Result<(), WsError> {
        let link = self.link();
        let sender = match &link.sender {
            Some(sender) if link.state.is_connected() => sender,
            _ => {
                crate::log_error!("WebSocket {} is not connected", self.shared.config.name);
                return Err(WsError::NotConnected);
            }
        };
        let text: String = text.into();
        sender
            .unbounded_send(Message::Text(text.into()))
            .map_err(|e| WsError::Send(e.to_string()))
    }

    pub fn send_json<T: Serialize>(&self, value: &T) -> Result<(), WsError> {
        let json = serde_json::to_string(value).map_err(|e| WsError::Serialize(e.to_string()))?;
        self.send_text(json)
    }

    /// Close with code 1000 and stop reconnecting. Safe to call repeatedly.
    pub fn disconnect(&self) {
        let sender = {
            let mut link = self.link();
            link.closing = true;
            link.sender.take()
        };
        if let Some(sender) = sender {
            crate::log_info!("Closing WebSocket {}", self.shared.config.name);
            let _ = sender.unbounded_send(Message::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            })));
        }
        self.set_state(ConnectionState::Disconnected);
    }
}

async fn read_frames<S>(mut read: S, handlers: &Handlers, name: &str) -> CloseInfo
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                crate::log_debug!("WebSocket {} received: {}", name, text.as_str());
                handlers.emit_message(text.as_str());
            }
            Ok(Message::Close(frame)) => {
                return match frame {
                    Some(frame) => CloseInfo {
                        code: u16::from(frame.code),
                        reason: frame.reason.as_str().to_string(),
                        was_clean: true,
                    },
                    None => CloseInfo {
                        code: 1005,
                        reason: String::new(),
                        was_clean: true,
                    },
                };
            }
            Ok(_) => {
                // Binary, ping and pong frames; pongs are answered by tungstenite
            }
            Err(e) => {
                crate::log_error!("WebSocket {} read error: {}", name, e);
                handlers.emit_error(&e.to_string());
                return CloseInfo::abnormal(e.to_string());
            }
        }
    }
    CloseInfo::abnormal("connection dropped")
}
