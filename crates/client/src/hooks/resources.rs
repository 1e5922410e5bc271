//! One hook per REST resource.
//!
//! Ids are passed as signals so a route change re-runs the fetch.

use dioxus::prelude::*;
use spacedash_shared::{Article, Course, Lesson, QuestionSet, Section, Space, SpaceFile, User};

use super::use_list::{use_list, ListHandle};
use crate::api::CourseQuery;
use crate::auth_session::AuthContext;
use crate::resource::ListState;
use crate::stores::ToastNotifier;

pub fn use_spaces() -> ListHandle<Space> {
    let auth = use_context::<AuthContext>();
    use_list("load spaces", move || {
        let api = auth.api();
        async move { api.list_spaces().await }
    })
}

pub fn use_space_members(space_id: Signal<String>) -> ListHandle<User> {
    let auth = use_context::<AuthContext>();
    use_list("load members", move || {
        let api = auth.api();
        let space_id = space_id();
        async move { api.list_space_members(&space_id).await }
    })
}

pub fn use_files(space_id: Signal<String>) -> ListHandle<SpaceFile> {
    let auth = use_context::<AuthContext>();
    use_list("load files", move || {
        let api = auth.api();
        let space_id = space_id();
        async move { api.list_files(&space_id).await }
    })
}

/// Courses for one page of `query`; the page count lands in the returned signal.
pub fn use_courses(
    space_id: Signal<String>,
    query: Signal<CourseQuery>,
) -> (ListHandle<Course>, Signal<u32>) {
    let auth = use_context::<AuthContext>();
    let total_pages = use_signal(|| 1u32);
    let list = use_list("load courses", move || {
        let api = auth.api();
        let space_id = space_id();
        let query = query();
        let mut total_pages = total_pages;
        async move {
            let page = api.list_courses(&space_id, &query).await?;
            total_pages.set(page.total_pages.max(1));
            Ok(page.courses)
        }
    });
    (list, total_pages)
}

pub fn use_sections(space_id: Signal<String>, course_id: Signal<String>) -> ListHandle<Section> {
    let auth = use_context::<AuthContext>();
    use_list("load sections", move || {
        let api = auth.api();
        let (space_id, course_id) = (space_id(), course_id());
        async move { api.list_sections(&space_id, &course_id).await }
    })
}

pub fn use_lessons(
    space_id: Signal<String>,
    course_id: Signal<String>,
    section_id: Signal<String>,
) -> ListHandle<Lesson> {
    let auth = use_context::<AuthContext>();
    use_list("load lessons", move || {
        let api = auth.api();
        let (space_id, course_id, section_id) = (space_id(), course_id(), section_id());
        async move { api.list_lessons(&space_id, &course_id, &section_id).await }
    })
}

pub fn use_question_sets(space_id: Signal<String>) -> ListHandle<QuestionSet> {
    let auth = use_context::<AuthContext>();
    use_list("load tests", move || {
        let api = auth.api();
        let space_id = space_id();
        async move { api.list_question_sets(&space_id).await }
    })
}

pub fn use_users() -> ListHandle<User> {
    let auth = use_context::<AuthContext>();
    use_list("load users", move || {
        let api = auth.api();
        async move { api.list_users().await }
    })
}

/// The dashboard feed. Served from cache while fresh.
pub fn use_trending_articles() -> Signal<ListState<Article>> {
    let auth = use_context::<AuthContext>();
    let state = use_signal(ListState::<Article>::default);
    use_resource(move || {
        let feed = auth.articles();
        let mut state = state;
        async move {
            let result = feed.trending().await;
            state.write().finish(result, "load articles", &ToastNotifier);
        }
    });
    state
}
