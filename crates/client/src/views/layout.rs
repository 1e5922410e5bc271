//! Navigation shell for signed-in pages.

use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::components::ToastHost;
use crate::stores::{is_system_admin, CURRENT_USER};
use crate::Route;

/// Layout with the top navigation. Sends signed-out visitors to the sign-in page.
#[component]
pub fn AppLayout() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let authenticated = auth.is_authenticated();
    let signed_in = auth.authenticated;

    use_effect(move || {
        if !signed_in() {
            nav.replace(Route::SignIn {});
        }
    });

    let display_name = CURRENT_USER
        .read()
        .as_ref()
        .map(|user| user.display_name())
        .unwrap_or_default();

    let on_sign_out = move |_| {
        let mut auth = auth.clone();
        spawn(async move {
            auth.sign_out().await;
            nav.replace(Route::SignIn {});
        });
    };

    if !authenticated {
        return rsx! {
            ToastHost {}
        };
    }

    rsx! {
        div { class: "app-shell",
            nav { class: "top-nav",
                Link { class: "brand", to: Route::Dashboard {}, "spacedash" }
                Link { to: Route::Dashboard {}, "Spaces" }
                Link { to: Route::AssistantView {}, "Assistant" }
                if is_system_admin() {
                    Link { to: Route::UsersView {}, "Users" }
                }
                div { class: "nav-spacer" }
                span { class: "nav-user", "{display_name}" }
                button { class: "btn btn-secondary", onclick: on_sign_out, "Sign out" }
            }
            main { class: "content", Outlet::<Route> {} }
            ToastHost {}
        }
    }
}
