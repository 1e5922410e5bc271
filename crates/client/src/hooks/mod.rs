//! Data hooks for views.

mod resources;
mod use_list;

pub use resources::{
    use_courses, use_files, use_lessons, use_question_sets, use_space_members, use_sections,
    use_spaces, use_trending_articles, use_users,
};
pub use use_list::{use_list, ListHandle};
