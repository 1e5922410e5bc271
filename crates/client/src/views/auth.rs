//! Sign-in and sign-up pages.

use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::components::Button;
use crate::identity::SignUpRequest;
use crate::Route;

#[component]
pub fn SignIn() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let mut auth = auth.clone();
        spawn(async move {
            is_loading.set(true);
            error.set(None);
            match auth.sign_in(&username(), &password()).await {
                Ok(user) => {
                    crate::log_info!("Signed in as {}", user.username);
                    nav.push(Route::Dashboard {});
                }
                Err(e) if e.is_unconfirmed() => {
                    error.set(Some("Confirm your account before signing in.".to_string()));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            is_loading.set(false);
        });
    };

    rsx! {
        div { class: "auth-page",
            form { class: "auth-card", onsubmit: on_submit,
                h1 { "Sign in" }
                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }
                label { r#for: "username", "Username" }
                input {
                    id: "username",
                    value: "{username}",
                    autocomplete: "username",
                    oninput: move |e| username.set(e.value()),
                }
                label { r#for: "password", "Password" }
                input {
                    id: "password",
                    r#type: "password",
                    value: "{password}",
                    autocomplete: "current-password",
                    oninput: move |e| password.set(e.value()),
                }
                Button { r#type: "submit", loading: is_loading(), "Sign in" }
                p { class: "auth-switch",
                    "No account? "
                    Link { to: Route::SignUp {}, "Sign up" }
                }
            }
        }
    }
}

#[component]
pub fn SignUp() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut code = use_signal(String::new);
    let mut awaiting_code = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);

    let auth_for_signup = auth.clone();
    let on_sign_up = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth_for_signup.clone();
        spawn(async move {
            is_loading.set(true);
            error.set(None);
            let req = SignUpRequest {
                username: username(),
                password: password(),
                email: email(),
                first_name: None,
                last_name: None,
            };
            match auth.sign_up(&req).await {
                Ok(outcome) if outcome.user_confirmed => {
                    nav.push(Route::SignIn {});
                }
                Ok(_) => awaiting_code.set(true),
                Err(e) => error.set(Some(e.to_string())),
            }
            is_loading.set(false);
        });
    };

    let on_confirm = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        spawn(async move {
            is_loading.set(true);
            match auth.confirm_sign_up(&username(), code().trim()).await {
                Ok(()) => {
                    nav.push(Route::SignIn {});
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            is_loading.set(false);
        });
    };

    rsx! {
        div { class: "auth-page",
            if awaiting_code() {
                form { class: "auth-card", onsubmit: on_confirm,
                    h1 { "Confirm your account" }
                    p { "We sent a confirmation code to {email}." }
                    if let Some(message) = error() {
                        div { class: "form-error", "{message}" }
                    }
                    input {
                        value: "{code}",
                        placeholder: "Confirmation code",
                        oninput: move |e| code.set(e.value()),
                    }
                    Button { r#type: "submit", loading: is_loading(), "Confirm" }
                }
            } else {
                form { class: "auth-card", onsubmit: on_sign_up,
                    h1 { "Create an account" }
                    if let Some(message) = error() {
                        div { class: "form-error", "{message}" }
                    }
                    input {
                        value: "{username}",
                        placeholder: "Username",
                        oninput: move |e| username.set(e.value()),
                    }
                    input {
                        r#type: "email",
                        value: "{email}",
                        placeholder: "Email",
                        oninput: move |e| email.set(e.value()),
                    }
                    input {
                        r#type: "password",
                        value: "{password}",
                        placeholder: "Password",
                        oninput: move |e| password.set(e.value()),
                    }
                    Button { r#type: "submit", loading: is_loading(), "Sign up" }
                    p { class: "auth-switch",
                        "Already registered? "
                        Link { to: Route::SignIn {}, "Sign in" }
                    }
                }
            }
        }
    }
}
