//! A course with its sections and lessons.

use dioxus::prelude::*;
use spacedash_shared::{CourseRequest, Lesson, LessonRequest, Section, SectionRequest};

use crate::auth_session::AuthContext;
use crate::components::{Button, ButtonVariant, EmptyState, ErrorBanner, Loading};
use crate::hooks::{use_lessons, use_sections, ListHandle};
use crate::resource::{settle_mutation, Refetch};
use crate::stores::ToastNotifier;
use crate::Route;

#[component]
pub fn CourseView(space_id: Signal<String>, course_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let sections = use_sections(space_id, course_id);
    let state = sections.read();
    let mut editing = use_signal(|| false);

    let mut course = use_resource({
        let auth = auth.clone();
        move || {
            let api = auth.api();
            let (space_id, course_id) = (space_id(), course_id());
            async move { api.get_course(&space_id, &course_id).await }
        }
    });

    let header = match &*course.read() {
        None => rsx! { Loading { label: "Loading course..." } },
        Some(Err(e)) => rsx! {
            ErrorBanner { message: e.user_message(), on_retry: move |_| course.restart() }
        },
        Some(Ok(c)) if editing() => rsx! {
            EditCourseForm {
                space_id,
                course_id,
                initial: CourseRequest {
                    title: c.title.clone(),
                    description: c.description.clone(),
                    tags: c.tags.clone(),
                },
                on_done: move |saved: bool| {
                    editing.set(false);
                    if saved {
                        course.restart();
                    }
                },
            }
        },
        Some(Ok(c)) => rsx! {
            header { class: "course-header",
                h1 { "{c.title}" }
                p { "{c.description}" }
                div { class: "tags",
                    for tag in c.tags.iter() {
                        span { key: "{tag}", class: "tag", "{tag}" }
                    }
                }
                Button {
                    variant: ButtonVariant::Secondary,
                    onclick: move |_| editing.set(true),
                    "Edit"
                }
            }
        },
    };

    rsx! {
        div { class: "course-view",
            Link { to: Route::SpaceView { space_id: space_id() }, "← Back to space" }
            {header}

            if state.loading && state.items.is_empty() {
                Loading { label: "Loading sections..." }
            } else if let Some(error) = state.error.clone() {
                ErrorBanner { message: error, on_retry: move |_| sections.refresh() }
            } else if state.items.is_empty() {
                EmptyState { title: "No sections", message: "Add the first section below." }
            } else {
                for section in state.items.iter() {
                    SectionBlock {
                        key: "{section.id}",
                        space_id,
                        course_id,
                        section: section.clone(),
                        sections,
                    }
                }
            }

            NewSectionForm { space_id, course_id, sections }
        }
    }
}

#[component]
fn EditCourseForm(
    space_id: Signal<String>,
    course_id: Signal<String>,
    initial: CourseRequest,
    on_done: EventHandler<bool>,
) -> Element {
    let auth = use_context::<AuthContext>();
    let mut title = use_signal(|| initial.title.clone());
    let mut description = use_signal(|| initial.description.clone());
    let mut tags = use_signal(|| initial.tags.join(", "));
    let mut is_saving = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = auth.api();
        let req = CourseRequest {
            title: title().trim().to_string(),
            description: description(),
            tags: tags()
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        };
        spawn(async move {
            is_saving.set(true);
            let result = api.update_course(&space_id(), &course_id(), &req).await;
            let saved =
                settle_mutation(result, "Course saved", "save course", &ToastNotifier).is_some();
            is_saving.set(false);
            on_done.call(saved);
        });
    };

    rsx! {
        form { class: "stacked-form", onsubmit: on_submit,
            input { value: "{title}", oninput: move |e| title.set(e.value()) }
            textarea { value: "{description}", oninput: move |e| description.set(e.value()) }
            input { value: "{tags}", oninput: move |e| tags.set(e.value()) }
            Button { r#type: "submit", loading: is_saving(), "Save" }
            Button {
                variant: ButtonVariant::Secondary,
                onclick: move |_| on_done.call(false),
                "Cancel"
            }
        }
    }
}

#[component]
fn SectionBlock(
    space_id: Signal<String>,
    course_id: Signal<String>,
    section: Section,
    sections: ListHandle<Section>,
) -> Element {
    let auth = use_context::<AuthContext>();
    let section_id = use_signal(|| section.id.clone());
    let lessons = use_lessons(space_id, course_id, section_id);
    let state = lessons.read();
    let mut expanded = use_signal(|| false);
    let mut open_lesson = use_signal(|| None::<String>);

    let on_delete = {
        let auth = auth.clone();
        move |_: MouseEvent| {
            let api = auth.api();
            let (space_id, course_id, section_id) = (space_id(), course_id(), section_id());
            sections.mutate(
                async move { api.delete_section(&space_id, &course_id, &section_id).await },
                "Section deleted",
                "delete section",
                Refetch::Yes,
            );
        }
    };

    rsx! {
        section { class: "course-section",
            header {
                button { class: "link", onclick: move |_| expanded.set(!expanded()),
                    if expanded() { "▾ " } else { "▸ " }
                    "{section.title}"
                }
                span { class: "muted", " {section.lessons.len()} lessons" }
                Button { variant: ButtonVariant::Danger, onclick: on_delete, "Delete" }
            }
            if !section.description.is_empty() {
                p { "{section.description}" }
            }

            if expanded() {
                if state.loading && state.items.is_empty() {
                    Loading { label: "Loading lessons..." }
                } else {
                    ol { class: "lesson-list",
                        for lesson in state.items.iter() {
                            li { key: "{lesson.id}",
                                button {
                                    class: "link",
                                    onclick: {
                                        let id = lesson.id.clone();
                                        move |_| {
                                            let next = (open_lesson() != Some(id.clone())).then(|| id.clone());
                                            open_lesson.set(next);
                                        }
                                    },
                                    "{lesson.title}"
                                }
                                Button {
                                    variant: ButtonVariant::Danger,
                                    onclick: {
                                        let auth = auth.clone();
                                        let lesson_id = lesson.id.clone();
                                        move |_| {
                                            let api = auth.api();
                                            let (space_id, course_id, section_id) =
                                                (space_id(), course_id(), section_id());
                                            let lesson_id = lesson_id.clone();
                                            lessons.mutate(
                                                async move {
                                                    api.delete_lesson(&space_id, &course_id, &section_id, &lesson_id)
                                                        .await
                                                },
                                                "Lesson deleted",
                                                "delete lesson",
                                                Refetch::Yes,
                                            );
                                        }
                                    },
                                    "Delete"
                                }
                                if open_lesson() == Some(lesson.id.clone()) {
                                    div { class: "lesson-content", dangerous_inner_html: "{lesson.content}" }
                                }
                            }
                        }
                    }
                }
                NewLessonForm { space_id, course_id, section_id, lessons }
            }
        }
    }
}

#[component]
fn NewSectionForm(
    space_id: Signal<String>,
    course_id: Signal<String>,
    sections: ListHandle<Section>,
) -> Element {
    let auth = use_context::<AuthContext>();
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let req = SectionRequest {
            title: title().trim().to_string(),
            description: description(),
        };
        if req.title.is_empty() {
            return;
        }
        let api = auth.api();
        let (space_id, course_id) = (space_id(), course_id());
        sections.mutate(
            async move { api.create_section(&space_id, &course_id, &req).await },
            "Section added",
            "add section",
            Refetch::Yes,
        );
        title.set(String::new());
        description.set(String::new());
    };

    rsx! {
        form { class: "stacked-form", onsubmit: on_submit,
            h3 { "New section" }
            input {
                value: "{title}",
                placeholder: "Title",
                oninput: move |e| title.set(e.value()),
            }
            textarea {
                value: "{description}",
                placeholder: "Description",
                oninput: move |e| description.set(e.value()),
            }
            Button { r#type: "submit", "Add section" }
        }
    }
}

#[component]
fn NewLessonForm(
    space_id: Signal<String>,
    course_id: Signal<String>,
    section_id: Signal<String>,
    lessons: ListHandle<Lesson>,
) -> Element {
    let auth = use_context::<AuthContext>();
    let mut title = use_signal(String::new);
    let mut content = use_signal(String::new);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let req = LessonRequest {
            title: title().trim().to_string(),
            content: content(),
        };
        if req.title.is_empty() {
            return;
        }
        let api = auth.api();
        let (space_id, course_id, section_id) = (space_id(), course_id(), section_id());
        lessons.mutate(
            async move {
                api.create_lesson(&space_id, &course_id, &section_id, &req)
                    .await
            },
            "Lesson added",
            "add lesson",
            Refetch::Yes,
        );
        title.set(String::new());
        content.set(String::new());
    };

    rsx! {
        form { class: "stacked-form", onsubmit: on_submit,
            input {
                value: "{title}",
                placeholder: "Lesson title",
                oninput: move |e| title.set(e.value()),
            }
            textarea {
                value: "{content}",
                placeholder: "Lesson content (HTML)",
                oninput: move |e| content.set(e.value()),
            }
            Button { r#type: "submit", "Add lesson" }
        }
    }
}
