//! Application routing configuration.

use dioxus::prelude::*;

use crate::views::{
    AppLayout, AssistantView, CourseView, Dashboard, Home, QuizView, SignIn, SignUp, SpaceView,
    UsersView,
};

// Router configuration
#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    // Landing page redirects to sign-in or the dashboard
    #[route("/")]
    Home {},

    // Auth routes
    #[route("/sign-in")]
    SignIn {},
    #[route("/sign-up")]
    SignUp {},

    // Signed-in pages share the navigation layout
    #[layout(AppLayout)]
        #[route("/dashboard")]
        Dashboard {},
        #[route("/assistant")]
        AssistantView {},
        #[route("/users")]
        UsersView {},
        #[nest("/spaces/:space_id")]
            #[route("/")]
            SpaceView { space_id: String },
            #[route("/courses/:course_id")]
            CourseView { space_id: String, course_id: String },
            #[route("/tests/:set_id")]
            QuizView { space_id: String, set_id: String },
}
