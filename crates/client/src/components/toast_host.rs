//! Renders [`TOASTS`](crate::stores::TOASTS) and expires them.

use dioxus::prelude::*;

use crate::resource::ToastKind;
use crate::stores::{dismiss_toast, TOASTS};

const TOAST_MS: u64 = 4000;

async fn sleep_ms(ms: u64) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms as u32).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[component]
pub fn ToastHost() -> Element {
    let toasts = TOASTS.read().clone();

    rsx! {
        div { class: "toast-host",
            for toast in toasts {
                ToastItem {
                    key: "{toast.id}",
                    id: toast.id,
                    kind: toast.kind,
                    message: toast.message.clone(),
                }
            }
        }
    }
}

#[component]
fn ToastItem(id: u64, kind: ToastKind, message: String) -> Element {
    use_hook(move || {
        spawn(async move {
            sleep_ms(TOAST_MS).await;
            dismiss_toast(id);
        });
    });

    let class = match kind {
        ToastKind::Success => "toast toast-success",
        ToastKind::Error => "toast toast-error",
    };

    rsx! {
        div { class, role: "status",
            span { "{message}" }
            button { class: "toast-close", onclick: move |_| dismiss_toast(id), "×" }
        }
    }
}
