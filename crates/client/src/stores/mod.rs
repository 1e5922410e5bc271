//! Global stores for application state.

pub mod profile;
pub mod toasts;

pub use profile::{clear_current_user, is_system_admin, set_current_user, CURRENT_USER};
pub use toasts::{dismiss_toast, push_toast, Toast, ToastNotifier, TOASTS};
