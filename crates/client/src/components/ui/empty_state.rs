use dioxus::prelude::*;

/// Placeholder shown instead of an empty table or list.
#[component]
pub fn EmptyState(title: String, message: String, children: Element) -> Element {
    rsx! {
        div { class: "empty-state",
            h3 { class: "empty-state-title", "{title}" }
            p { class: "empty-state-message", "{message}" }
            {children}
        }
    }
}

#[component]
pub fn Loading(label: String) -> Element {
    rsx! {
        div { class: "loading", "{label}" }
    }
}

#[component]
pub fn ErrorBanner(message: String, on_retry: EventHandler<()>) -> Element {
    rsx! {
        div { class: "error-banner",
            span { "{message}" }
            button { class: "btn btn-secondary", onclick: move |_| on_retry.call(()), "Retry" }
        }
    }
}
