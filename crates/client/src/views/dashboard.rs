//! Dashboard: the user's spaces and a trending-articles panel.

use dioxus::prelude::*;
use spacedash_shared::{Space, SpaceRequest};

use crate::auth_session::AuthContext;
use crate::components::{Button, ButtonVariant, EmptyState, ErrorBanner, Loading};
use crate::hooks::{use_spaces, use_trending_articles, ListHandle};
use crate::presentation::{space_pattern, SPACE_PATTERNS};
use crate::resource::Refetch;
use crate::stores::is_system_admin;
use crate::Route;

#[component]
pub fn Dashboard() -> Element {
    let spaces = use_spaces();
    let state = spaces.read();
    let mut show_create = use_signal(|| false);

    rsx! {
        div { class: "dashboard",
            section { class: "dashboard-main",
                header { class: "section-header",
                    h1 { "Spaces" }
                    if is_system_admin() {
                        Button { onclick: move |_| show_create.set(true), "New space" }
                    }
                }

                if show_create() {
                    CreateSpaceForm { spaces, on_close: move |_| show_create.set(false) }
                }

                if state.loading && state.items.is_empty() {
                    Loading { label: "Loading spaces..." }
                } else if let Some(error) = state.error.clone() {
                    ErrorBanner { message: error, on_retry: move |_| spaces.refresh() }
                } else if state.items.is_empty() {
                    EmptyState {
                        title: "No spaces yet",
                        message: "Spaces you belong to will appear here.",
                    }
                } else {
                    div { class: "space-grid",
                        for space in state.items.iter() {
                            SpaceCard { key: "{space.id}", space: space.clone(), spaces }
                        }
                    }
                }
            }
            aside { class: "dashboard-side", TrendingArticles {} }
        }
    }
}

#[component]
fn SpaceCard(space: Space, spaces: ListHandle<Space>) -> Element {
    let auth = use_context::<AuthContext>();
    let pattern = space_pattern(&space.id, SPACE_PATTERNS).unwrap_or_default();
    let space_id = space.id.clone();

    let on_delete = move |evt: MouseEvent| {
        evt.stop_propagation();
        let api = auth.api();
        let space_id = space_id.clone();
        spaces.mutate(
            async move { api.delete_space(&space_id).await },
            "Space deleted",
            "delete space",
            Refetch::Yes,
        );
    };

    rsx! {
        div { class: "space-card",
            div { class: "space-card-banner {pattern}" }
            Link { to: Route::SpaceView { space_id: space.id.clone() },
                h3 { "{space.name}" }
                p { "{space.description}" }
            }
            if is_system_admin() {
                Button { variant: ButtonVariant::Danger, onclick: on_delete, "Delete" }
            }
        }
    }
}

#[component]
fn CreateSpaceForm(spaces: ListHandle<Space>, on_close: EventHandler<()>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut name = use_signal(String::new);
    let mut description = use_signal(String::new);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let name = name().trim().to_string();
        if name.is_empty() {
            return;
        }
        let api = auth.api();
        let req = SpaceRequest {
            name,
            description: description(),
            admin_username: None,
        };
        spaces.mutate(
            async move { api.create_space(&req).await },
            "Space created",
            "create space",
            Refetch::Yes,
        );
        on_close.call(());
    };

    rsx! {
        form { class: "inline-form", onsubmit: on_submit,
            input {
                value: "{name}",
                placeholder: "Space name",
                oninput: move |e| name.set(e.value()),
            }
            input {
                value: "{description}",
                placeholder: "Description",
                oninput: move |e| description.set(e.value()),
            }
            Button { r#type: "submit", "Create" }
            Button {
                variant: ButtonVariant::Secondary,
                onclick: move |_| on_close.call(()),
                "Cancel"
            }
        }
    }
}

#[component]
fn TrendingArticles() -> Element {
    let articles = use_trending_articles();
    let state = articles.read();

    rsx! {
        h2 { "Trending" }
        if state.loading {
            Loading { label: "Loading articles..." }
        } else if state.items.is_empty() {
            p { class: "muted", "Nothing trending right now." }
        } else {
            ul { class: "article-list",
                for article in state.items.iter() {
                    li { key: "{article.id}",
                        a { href: "{article.url}", target: "_blank", rel: "noopener", "{article.title}" }
                        span { class: "muted", " by {article.user.name}" }
                    }
                }
            }
        }
    }
}
