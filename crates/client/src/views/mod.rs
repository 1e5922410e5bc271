//! View components for the application.

pub mod assistant_view;
pub mod auth;
pub mod course_view;
pub mod dashboard;
pub mod home;
pub mod layout;
pub mod quiz_view;
pub mod space_view;
pub mod users_view;

pub use assistant_view::{AssistantPanel, AssistantView, CourseCreatorPanel, QaPanel};
pub use auth::{SignIn, SignUp};
pub use course_view::CourseView;
pub use dashboard::Dashboard;
pub use home::Home;
pub use layout::AppLayout;
pub use quiz_view::QuizView;
pub use space_view::SpaceView;
pub use users_view::UsersView;
