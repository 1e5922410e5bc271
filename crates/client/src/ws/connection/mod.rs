//! WebSocket client with state tracking, handler registries and auto-reconnect.
//!
//! This module provides the shared types and conditionally includes
//! the platform-specific implementation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use spacedash_shared::WsError;

/// Connection state for a WebSocket
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    Failed { reason: String },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting | ConnectionState::Reconnecting { .. }
        )
    }
}

/// Configuration for auto-reconnect behavior
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Attempts after an unclean close before giving up
    pub max_attempts: u32,
    /// Initial delay in milliseconds
    pub initial_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before attempt `attempt` (1-based): 2s, 4s, 8s with the defaults.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(delay as u64)
    }
}

/// How the access token rides on the connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthParam {
    /// `?token=<token>`
    Token,
    /// `?Authorization=Bearer%20<token>`
    AuthorizationBearer,
}

/// Everything that differs between the service endpoints.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Used in log lines.
    pub name: &'static str,
    pub url: String,
    pub auth_param: AuthParam,
    pub connect_timeout: Duration,
    /// `None` disables reconnection.
    pub reconnect: Option<ReconnectPolicy>,
}

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

impl WsConfig {
    pub fn new(name: &'static str, url: impl Into<String>, auth_param: AuthParam) -> Self {
        Self {
            name,
            url: url.into(),
            auth_param,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reconnect: None,
        }
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = Some(policy);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// The endpoint URL with the token appended as a query parameter.
    pub fn url_with_token(&self, token: &str) -> Result<String, WsError> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| WsError::Connect(format!("invalid url {}: {e}", self.url)))?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(WsError::Connect(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let param = match self.auth_param {
            AuthParam::Token => format!("token={}", urlencoding::encode(token)),
            AuthParam::AuthorizationBearer => format!(
                "Authorization={}",
                urlencoding::encode(&format!("Bearer {token}"))
            ),
        };
        let separator = if parsed.query().is_some() { '&' } else { '?' };
        Ok(format!("{}{separator}{param}", self.url))
    }
}

/// Details of a close, as seen by close handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: u16,
    pub reason: String,
    /// A close handshake completed. Only unclean closes reconnect.
    pub was_clean: bool,
}

impl CloseInfo {
    pub fn normal() -> Self {
        Self {
            code: 1000,
            reason: String::new(),
            was_clean: true,
        }
    }

    /// The connection dropped without a close frame.
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self {
            code: 1006,
            reason: reason.into(),
            was_clean: false,
        }
    }
}

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

#[derive(Default)]
struct HandlerLists {
    open: Vec<Callback<()>>,
    message: Vec<Callback<String>>,
    error: Vec<Callback<String>>,
    close: Vec<Callback<CloseInfo>>,
    state: Vec<Callback<ConnectionState>>,
}

/// Registered callbacks. Every handler of a kind is invoked, in registration order.
#[derive(Clone, Default)]
pub struct Handlers {
    inner: Arc<Mutex<HandlerLists>>,
}

impl Handlers {
    fn with<R>(&self, f: impl FnOnce(&mut HandlerLists) -> R) -> R {
        let mut lists = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut lists)
    }

    pub fn on_open(&self, f: impl Fn() + Send + Sync + 'static) {
        self.with(|h| h.open.push(Arc::new(move |()| f())));
    }

    /// Raw text frames.
    pub fn on_message(&self, f: impl Fn(String) + Send + Sync + 'static) {
        self.with(|h| h.message.push(Arc::new(f)));
    }

    pub fn on_error(&self, f: impl Fn(String) + Send + Sync + 'static) {
        self.with(|h| h.error.push(Arc::new(f)));
    }

    pub fn on_close(&self, f: impl Fn(CloseInfo) + Send + Sync + 'static) {
        self.with(|h| h.close.push(Arc::new(f)));
    }

    pub fn on_state_change(&self, f: impl Fn(ConnectionState) + Send + Sync + 'static) {
        self.with(|h| h.state.push(Arc::new(f)));
    }

    pub fn clear(&self) {
        self.with(|h| *h = HandlerLists::default());
    }

    // Handlers run outside the lock so they may register more handlers.

    pub(crate) fn emit_open(&self) {
        for f in self.with(|h| h.open.clone()) {
            f(());
        }
    }

    pub(crate) fn emit_message(&self, text: &str) {
        for f in self.with(|h| h.message.clone()) {
            f(text.to_string());
        }
    }

    pub(crate) fn emit_error(&self, error: &str) {
        for f in self.with(|h| h.error.clone()) {
            f(error.to_string());
        }
    }

    pub(crate) fn emit_close(&self, info: &CloseInfo) {
        for f in self.with(|h| h.close.clone()) {
            f(info.clone());
        }
    }

    pub(crate) fn emit_state(&self, state: &ConnectionState) {
        for f in self.with(|h| h.state.clone()) {
            f(state.clone());
        }
    }
}

// Include platform-specific implementation
#[cfg(target_arch = "wasm32")]
mod connection_wasm;
#[cfg(target_arch = "wasm32")]
pub use connection_wasm::WsClient;

#[cfg(not(target_arch = "wasm32"))]
mod connection_native;
#[cfg(not(target_arch = "wasm32"))]
pub use connection_native::WsClient;
