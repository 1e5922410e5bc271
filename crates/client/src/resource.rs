//! Loading/error/toast bookkeeping shared by every data hook.
//!
//! The rules are the same for each resource: a fetch replaces the list (an
//! absent field is an empty list), a failure keeps the previous list and raises
//! one error toast, a mutation raises exactly one toast and, when asked,
//! triggers exactly one refetch after success. Nothing is applied optimistically.

use std::future::Future;

use spacedash_shared::ApiError;

/// Kind of toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: ToastKind, message: String);

    fn success(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(ToastKind::Success, message.into());
    }

    fn error(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(ToastKind::Error, message.into());
    }
}

/// State behind a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a fetch result. `what` completes "Failed to ...".
    pub fn finish(&mut self, result: Result<Vec<T>, ApiError>, what: &str, notifier: &dyn Notifier) {
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                crate::log_error!("Failed to {}: {}", what, e);
                let message = format!("Failed to {what}");
                notifier.notify(ToastKind::Error, format!("{message}: {}", e.user_message()));
                self.error = Some(message);
            }
        }
        self.loading = false;
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.items.is_empty()
    }
}

/// Report a mutation result with exactly one toast. Returns the value on success.
pub fn settle_mutation<R>(
    result: Result<R, ApiError>,
    success: &str,
    what: &str,
    notifier: &dyn Notifier,
) -> Option<R> {
    match result {
        Ok(value) => {
            notifier.notify(ToastKind::Success, success.to_string());
            Some(value)
        }
        Err(e) => {
            crate::log_error!("Failed to {}: {}", what, e);
            notifier.notify(
                ToastKind::Error,
                format!("Failed to {what}: {}", e.user_message()),
            );
            None
        }
    }
}

/// Whether a mutation resynchronizes the list afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refetch {
    Yes,
    /// The caller refreshes explicitly (e.g. before navigating away).
    No,
}

/// Run a mutation, toast once, and call `on_refetch` exactly once after a
/// success when asked. A failed mutation never refetches.
pub async fn run_mutation<R, F>(
    mutation: F,
    success: &str,
    what: &str,
    refetch: Refetch,
    notifier: &dyn Notifier,
    on_refetch: impl FnOnce(),
) -> Option<R>
where
    F: Future<Output = Result<R, ApiError>>,
{
    let outcome = settle_mutation(mutation.await, success, what, notifier);
    if outcome.is_some() && refetch == Refetch::Yes {
        on_refetch();
    }
    outcome
}
