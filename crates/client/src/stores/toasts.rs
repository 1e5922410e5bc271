//! Toast notifications.

use std::sync::atomic::{AtomicU64, Ordering};

use dioxus::prelude::*;

use crate::resource::{Notifier, ToastKind};

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Toasts currently on screen, oldest first.
pub static TOASTS: GlobalSignal<Vec<Toast>> = Signal::global(Vec::new);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub fn push_toast(kind: ToastKind, message: impl Into<String>) -> u64 {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    TOASTS.write().push(Toast {
        id,
        kind,
        message: message.into(),
    });
    id
}

pub fn dismiss_toast(id: u64) {
    TOASTS.write().retain(|t| t.id != id);
}

/// Routes [`Notifier`] calls into [`TOASTS`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn notify(&self, kind: ToastKind, message: String) {
        push_toast(kind, message);
    }
}
