//! The signed-in user's profile.

use dioxus::prelude::*;
use spacedash_shared::User;

pub static CURRENT_USER: GlobalSignal<Option<User>> = Signal::global(|| None);

pub fn set_current_user(user: User) {
    *CURRENT_USER.write() = Some(user);
}

/// Clear on sign-out
pub fn clear_current_user() {
    *CURRENT_USER.write() = None;
}

pub fn is_system_admin() -> bool {
    CURRENT_USER
        .read()
        .as_ref()
        .is_some_and(|user| user.is_system_admin())
}
