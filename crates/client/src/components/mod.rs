//! Shared components.

pub mod toast_host;
pub mod ui;

pub use toast_host::ToastHost;
pub use ui::*;
