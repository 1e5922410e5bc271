//! WASM/Web-specific WebSocket implementation using web_sys::WebSocket.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use spacedash_shared::WsError;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::{CloseInfo, ConnectionState, Handlers, ReconnectPolicy, WsConfig};
use crate::api_client::TokenSource;

/// Polling step while waiting for the socket to open.
const OPEN_POLL_MS: u32 = 10;

/// JS callbacks for one socket; kept alive until the socket is replaced.
struct Callbacks {
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _error: Closure<dyn FnMut(Event)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
}

struct Link {
    state: ConnectionState,
    socket: Option<WebSocket>,
    callbacks: Option<Callbacks>,
    generation: u64,
    closing: bool,
}

struct Shared {
    config: WsConfig,
    tokens: Arc<dyn TokenSource>,
    handlers: Handlers,
    link: RefCell<Link>,
}

/// A WebSocket client for one service endpoint (WASM implementation)
#[derive(Clone)]
pub struct WsClient {
    shared: Rc<Shared>,
}

impl WsClient {
    pub fn new(config: WsConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            shared: Rc::new(Shared {
                config,
                tokens,
                handlers: Handlers::default(),
                link: RefCell::new(Link {
                    state: ConnectionState::Disconnected,
                    socket: None,
                    callbacks: None,
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

    pub fn state(&self) -> ConnectionState {
        self.shared.link.borrow().state.clone()
    }

    pub fn is_connected(&self) -> bool {
        let link = self.shared.link.borrow();
        link.state.is_connected()
            && link
                .socket
                .as_ref()
                .is_some_and(|ws| ws.ready_state() == WebSocket::OPEN)
    }

    fn set_state(&self, state: ConnectionState) {
        {
            let mut link = self.shared.link.borrow_mut();
            if link.state == state {
                return;
            }
            link.state = state.clone();
        }
        self.shared.handlers.emit_state(&state);
    }

    fn is_closing(&self) -> bool {
        self.shared.link.borrow().closing
    }

    /// Open the socket. Resolves once it is open; a no-op when already connected.
    pub async fn connect(&self) -> Result<(), WsError> {
        if self.is_connected() {
            return Ok(());
        }
        self.shared.link.borrow_mut().closing = false;
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

        let ws = WebSocket::new(&url)
            .map_err(|e| WsError::Connect(format!("Failed to create WebSocket: {:?}", e)))?;

        let generation = {
            let mut link = self.shared.link.borrow_mut();
            link.generation += 1;
            link.generation
        };
        let opened = Rc::new(Cell::new(false));
        let failure = Rc::new(RefCell::new(None::<String>));
        let callbacks = self.attach(&ws, generation, opened.clone(), failure.clone());
        self.replace_socket(Some(ws.clone()), Some(callbacks));

        let timeout_ms = config.connect_timeout.as_millis() as u64;
        let mut waited_ms = 0u64;
        while !opened.get() {
            let failed = failure.borrow_mut().take();
            if let Some(reason) = failed {
                self.replace_socket(None, None);
                return Err(WsError::Connect(reason));
            }
            if self.is_closing() {
                let _ = ws.close();
                return Err(WsError::NotConnected);
            }
            if waited_ms >= timeout_ms {
                let _ = ws.close();
                self.replace_socket(None, None);
                return Err(WsError::Timeout(timeout_ms));
            }
            TimeoutFuture::new(OPEN_POLL_MS).await;
            waited_ms += OPEN_POLL_MS as u64;
        }

        crate::log_info!("WebSocket {} connected", config.name);
        self.set_state(ConnectionState::Connected);
        self.shared.handlers.emit_open();
        Ok(())
    }

    fn attach(
        &self,
        ws: &WebSocket,
        generation: u64,
        opened: Rc<Cell<bool>>,
        failure: Rc<RefCell<Option<String>>>,
    ) -> Callbacks {
        let name = self.shared.config.name;

        let opened_for_open = opened.clone();
        let onopen = Closure::wrap(Box::new(move |_: Event| {
            opened_for_open.set(true);
        }) as Box<dyn FnMut(Event)>);
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

        let handlers = self.shared.handlers.clone();
        let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
            if let Some(text) = e.data().as_string() {
                crate::log_debug!("WebSocket {} received: {}", name, text);
                handlers.emit_message(&text);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let handlers = self.shared.handlers.clone();
        let opened_for_error = opened.clone();
        let failure_for_error = failure.clone();
        let onerror = Closure::wrap(Box::new(move |_: Event| {
            crate::log_error!("WebSocket {} error", name);
            if opened_for_error.get() {
                handlers.emit_error("WebSocket error");
            } else {
                *failure_for_error.borrow_mut() = Some("WebSocket error".to_string());
            }
        }) as Box<dyn FnMut(Event)>);
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let weak: Weak<Shared> = Rc::downgrade(&self.shared);
        let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
            let info = CloseInfo {
                code: e.code(),
                reason: e.reason(),
                was_clean: e.was_clean(),
            };
            if !opened.get() {
                failure
                    .borrow_mut()
                    .get_or_insert_with(|| format!("closed with code {}", info.code));
                return;
            }
            if let Some(shared) = weak.upgrade() {
                let client = WsClient { shared };
                spawn_local(client.handle_close(generation, info));
            }
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        Callbacks {
            _open: onopen,
            _message: onmessage,
            _error: onerror,
            _close: onclose,
        }
    }

    /// Swap the current socket, detaching the old one's callbacks first.
    fn replace_socket(&self, socket: Option<WebSocket>, callbacks: Option<Callbacks>) {
        let mut link = self.shared.link.borrow_mut();
        if let Some(old) = link.socket.take() {
            old.set_onopen(None);
            old.set_onmessage(None);
            old.set_onerror(None);
            old.set_onclose(None);
        }
        link.socket = socket;
        link.callbacks = callbacks;
    }

    /// Boxed to break the open -> onclose -> reconnect -> open type cycle.
    fn handle_close(&self, generation: u64, info: CloseInfo) -> LocalBoxFuture<'static, ()> {
        let client = self.clone();
        async move {
            let closing = {
                let mut link = client.shared.link.borrow_mut();
                if link.generation != generation {
                    return;
                }
                link.socket = None;
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
        .boxed_local()
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
            TimeoutFuture::new(delay.as_millis() as u32).await;
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
        if !self.is_connected() {
            crate::log_error!("WebSocket {} is not connected", self.shared.config.name);
            return Err(WsError::NotConnected);
        }
        let link = self.shared.link.borrow();
        let ws = link.socket.as_ref().ok_or(WsError::NotConnected)?;
        ws.send_with_str(&text.into())
            .map_err(|e| WsError::Send(format!("{:?}", e)))
    }

    pub fn send_json<T: Serialize>(&self, value: &T) -> Result<(), WsError> {
        let json = serde_json::to_string(value).map_err(|e| WsError::Serialize(e.to_string()))?;
        self.send_text(json)
    }

    /// Close with code 1000 and stop reconnecting. Safe to call repeatedly.
    pub fn disconnect(&self) {
        // The socket stays in place until its close event arrives.
        let socket = {
            let mut link = self.shared.link.borrow_mut();
            link.closing = true;
            link.socket.clone()
        };
        if let Some(ws) = socket {
            if matches!(ws.ready_state(), WebSocket::OPEN | WebSocket::CONNECTING) {
                crate::log_info!("Closing WebSocket {}", self.shared.config.name);
                let _ = ws.close_with_code_and_reason(1000, "");
            }
        }
        self.set_state(ConnectionState::Disconnected);
    }
}
