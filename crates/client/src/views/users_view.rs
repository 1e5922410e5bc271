//! User administration. Only reachable for system admins.

use dioxus::prelude::*;
use spacedash_shared::{CreateUserRequest, Role, UpdateUserRequest, User};

use crate::auth_session::AuthContext;
use crate::components::{Button, ButtonVariant, EmptyState, ErrorBanner, Loading};
use crate::hooks::{use_users, ListHandle};
use crate::resource::Refetch;
use crate::stores::is_system_admin;

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn UsersView() -> Element {
    if !is_system_admin() {
        return rsx! {
            EmptyState {
                title: "Not allowed",
                message: "Only system administrators can manage users.",
            }
        };
    }

    rsx! { UserAdmin {} }
}

#[component]
fn UserAdmin() -> Element {
    let users = use_users();
    let state = users.read();

    rsx! {
        div { class: "users-view",
            h1 { "Users" }
            NewUserForm { users }

            if state.loading && state.items.is_empty() {
                Loading { label: "Loading users..." }
            } else if let Some(error) = state.error.clone() {
                ErrorBanner { message: error, on_retry: move |_| users.refresh() }
            } else if state.items.is_empty() {
                EmptyState { title: "No users", message: "Create the first account above." }
            } else {
                table { class: "user-table",
                    thead {
                        tr {
                            th { "Name" }
                            th { "Username" }
                            th { "Email" }
                            th { "Role" }
                            th {}
                        }
                    }
                    tbody {
                        for user in state.items.iter() {
                            UserRow { key: "{user.username}", user: user.clone(), users }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn UserRow(user: User, users: ListHandle<User>) -> Element {
    let auth = use_context::<AuthContext>();
    let is_admin = user.is_system_admin();

    let on_toggle_role = {
        let auth = auth.clone();
        let username = user.username.clone();
        move |_: MouseEvent| {
            let api = auth.api();
            let username = username.clone();
            let req = UpdateUserRequest {
                first_name: None,
                last_name: None,
                role: Some(if is_admin { Role::Member } else { Role::SystemAdmin }),
            };
            users.mutate(
                async move { api.update_user(&username, &req).await },
                "Role updated",
                "update role",
                Refetch::Yes,
            );
        }
    };

    let on_delete = {
        let username = user.username.clone();
        move |_: MouseEvent| {
            let api = auth.api();
            let username = username.clone();
            users.mutate(
                async move { api.delete_user(&username).await },
                "User deleted",
                "delete user",
                Refetch::Yes,
            );
        }
    };

    rsx! {
        tr {
            td { "{user.display_name()}" }
            td { "{user.username}" }
            td { "{user.email}" }
            td { if is_admin { "System admin" } else { "Member" } }
            td {
                Button {
                    variant: ButtonVariant::Secondary,
                    onclick: on_toggle_role,
                    if is_admin { "Make member" } else { "Make admin" }
                }
                Button { variant: ButtonVariant::Danger, onclick: on_delete, "Delete" }
            }
        }
    }
}

#[component]
fn NewUserForm(users: ListHandle<User>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut admin = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let req = CreateUserRequest {
            username: username().trim().to_string(),
            email: email().trim().to_string(),
            first_name: non_empty(first_name()),
            last_name: non_empty(last_name()),
            role: if admin() { Role::SystemAdmin } else { Role::Member },
        };
        if req.username.is_empty() || req.email.is_empty() {
            return;
        }
        let api = auth.api();
        users.mutate(
            async move { api.create_user(&req).await },
            "User created",
            "create user",
            Refetch::Yes,
        );
        for mut field in [username, email, first_name, last_name] {
            field.set(String::new());
        }
        admin.set(false);
    };

    rsx! {
        form { class: "stacked-form", onsubmit: on_submit,
            h3 { "New user" }
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
                value: "{first_name}",
                placeholder: "First name",
                oninput: move |e| first_name.set(e.value()),
            }
            input {
                value: "{last_name}",
                placeholder: "Last name",
                oninput: move |e| last_name.set(e.value()),
            }
            label { class: "checkbox",
                input {
                    r#type: "checkbox",
                    checked: admin(),
                    onchange: move |e| admin.set(e.checked()),
                }
                " System admin"
            }
            Button { r#type: "submit", "Create user" }
        }
    }
}
