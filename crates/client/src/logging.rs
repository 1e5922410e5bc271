//! Platform logging.
//!
//! The `log_*!` macros format once and hand the string to the backend:
//! - Web: `web_sys::console`
//! - Desktop: `tracing`, with `init()` installing an env-filtered subscriber

/// Install the desktop subscriber. `RUST_LOG` wins over `default_filter`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second init (tests, hot reload) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The browser console needs no setup.
#[cfg(target_arch = "wasm32")]
pub fn init(_default_filter: &str) {}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub fn emit(level: Level, msg: &str) {
    use web_sys::console;

    let msg = wasm_bindgen::JsValue::from_str(msg);
    match level {
        Level::Debug => console::debug_1(&msg),
        Level::Info => console::info_1(&msg),
        Level::Warn => console::warn_1(&msg),
        Level::Error => console::error_1(&msg),
    }
}

#[doc(hidden)]
#[cfg(not(target_arch = "wasm32"))]
pub fn emit(level: Level, msg: &str) {
    match level {
        Level::Debug => tracing::debug!(target: "spacedash_client", "{}", msg),
        Level::Info => tracing::info!(target: "spacedash_client", "{}", msg),
        Level::Warn => tracing::warn!(target: "spacedash_client", "{}", msg),
        Level::Error => tracing::error!(target: "spacedash_client", "{}", msg),
    }
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Debug, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Error, &format!($($arg)*))
    };
}
