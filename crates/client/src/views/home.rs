use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::Route;

/// Redirects to the dashboard or the sign-in page
#[component]
pub fn Home() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        if auth.is_authenticated() {
            nav.replace(Route::Dashboard {});
        } else {
            nav.replace(Route::SignIn {});
        }
    });

    rsx! {
        div { class: "redirect", "Redirecting..." }
    }
}
