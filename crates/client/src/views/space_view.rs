//! One space: its files, courses, generated tests and members.

use dioxus::prelude::*;
use spacedash_shared::{
    ApiError, Artifact, CourseRequest, FileDetail, GenerateQuestionsRequest, SpaceFile,
};

use crate::api::CourseQuery;
use crate::api_client::ApiClient;
use crate::auth_session::AuthContext;
use crate::components::{Button, ButtonVariant, EmptyState, ErrorBanner, Loading};
use crate::hooks::{use_courses, use_files, use_question_sets, use_space_members};
use crate::presentation::{status_badge, FileKind};
use crate::resource::Refetch;
use crate::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Files,
    Courses,
    Tests,
    Members,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Files, Tab::Courses, Tab::Tests, Tab::Members];

    fn label(self) -> &'static str {
        match self {
            Tab::Files => "Files",
            Tab::Courses => "Courses",
            Tab::Tests => "Tests",
            Tab::Members => "Members",
        }
    }
}

#[component]
pub fn SpaceView(space_id: Signal<String>) -> Element {
    let mut tab = use_signal(|| Tab::Files);

    rsx! {
        div { class: "space-view",
            nav { class: "tabs",
                for t in Tab::ALL {
                    button {
                        key: "{t.label()}",
                        class: if tab() == t { "tab active" } else { "tab" },
                        onclick: move |_| tab.set(t),
                        "{t.label()}"
                    }
                }
            }
            match tab() {
                Tab::Files => rsx! { FilesTab { space_id } },
                Tab::Courses => rsx! { CoursesTab { space_id } },
                Tab::Tests => rsx! { TestsTab { space_id } },
                Tab::Members => rsx! { MembersTab { space_id } },
            }
        }
    }
}

// --- Files ---

#[component]
fn FilesTab(space_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let files = use_files(space_id);
    let state = files.read();
    let mut selected = use_signal(|| None::<String>);

    if state.loading && state.items.is_empty() {
        return rsx! { Loading { label: "Loading files..." } };
    }
    if let Some(error) = state.error.clone() {
        return rsx! { ErrorBanner { message: error, on_retry: move |_| files.refresh() } };
    }
    if state.items.is_empty() {
        return rsx! {
            EmptyState {
                title: "No files yet",
                message: "Files uploaded to this space will show up here.",
            }
        };
    }

    rsx! {
        table { class: "file-table",
            thead {
                tr {
                    th { "Name" }
                    th { "Type" }
                    th { "Status" }
                    th {}
                }
            }
            tbody {
                for file in state.items.iter() {
                    FileRow {
                        key: "{file.id}",
                        file: file.clone(),
                        on_open: move |id| selected.set(Some(id)),
                        on_delete: {
                            let auth = auth.clone();
                            move |file_id: String| {
                                let api = auth.api();
                                let space_id = space_id();
                                files.mutate(
                                    async move { api.delete_file(&space_id, &file_id).await },
                                    "File deleted",
                                    "delete file",
                                    Refetch::Yes,
                                );
                            }
                        },
                    }
                }
            }
        }
        if let Some(file_id) = selected() {
            FileDetailPanel {
                key: "{file_id}",
                space_id,
                file_id: file_id.clone(),
                on_close: move |_| selected.set(None),
            }
        }
    }
}

#[component]
fn FileRow(file: SpaceFile, on_open: EventHandler<String>, on_delete: EventHandler<String>) -> Element {
    let kind = FileKind::from_type(if file.file_type.is_empty() {
        &file.name
    } else {
        &file.file_type
    });
    let (badge, badge_class) = status_badge(&file.status);
    let open_id = file.id.clone();
    let delete_id = file.id.clone();

    rsx! {
        tr {
            td {
                button { class: "link", onclick: move |_| on_open.call(open_id.clone()),
                    span { class: "file-icon", "{kind.icon()}" }
                    " {file.name}"
                }
            }
            td { "{kind.label()}" }
            td { span { class: badge_class, "{badge}" } }
            td {
                Button {
                    variant: ButtonVariant::Danger,
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    "Delete"
                }
            }
        }
    }
}

/// A file with its artifacts already turned into text.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedFile {
    detail: FileDetail,
    summary: Option<String>,
    action_items: Option<String>,
    transcript: Option<String>,
}

/// A missing or unreadable artifact is shown as absent rather than failing the panel.
async fn resolve(api: &ApiClient, artifact: Option<&Artifact>, what: &str) -> Option<String> {
    let artifact = artifact?;
    match api.resolve_artifact(artifact).await {
        Ok(text) => Some(text),
        Err(e) => {
            crate::log_warn!("Could not load {}: {}", what, e);
            None
        }
    }
}

#[component]
fn FileDetailPanel(space_id: Signal<String>, file_id: String, on_close: EventHandler<()>) -> Element {
    let auth = use_context::<AuthContext>();

    let file = use_resource(move || {
        let api = auth.api();
        let space_id = space_id();
        let file_id = file_id.clone();
        async move {
            let detail = api.get_file(&space_id, &file_id).await?;
            let summary = resolve(&api, detail.summary.as_ref(), "summary").await;
            let action_items = resolve(&api, detail.action_items.as_ref(), "action items").await;
            let transcript = resolve(&api, detail.transcript.as_ref(), "transcript").await;
            Ok::<_, ApiError>(ResolvedFile {
                detail,
                summary,
                action_items,
                transcript,
            })
        }
    });

    let body = match &*file.read() {
        None => rsx! { Loading { label: "Loading file..." } },
        Some(Err(e)) => rsx! { div { class: "form-error", "{e.user_message()}" } },
        Some(Ok(resolved)) => {
            let detail = &resolved.detail;
            let kind = FileKind::from_type(&detail.file.file_type);
            rsx! {
                h2 { "{kind.icon()} {detail.file.name}" }
                if !detail.file.description.is_empty() {
                    p { "{detail.file.description}" }
                }
                if !detail.file.tags.is_empty() {
                    div { class: "tags",
                        for tag in detail.file.tags.iter() {
                            span { key: "{tag}", class: "tag", "{tag}" }
                        }
                    }
                }
                if !detail.url.is_empty() {
                    a { href: "{detail.url}", target: "_blank", rel: "noopener", "Download" }
                }
                ArtifactBlock { title: "Summary", text: resolved.summary.clone() }
                ArtifactBlock { title: "Action items", text: resolved.action_items.clone() }
                if kind.has_transcript() {
                    ArtifactBlock { title: "Transcript", text: resolved.transcript.clone() }
                }
            }
        }
    };

    rsx! {
        aside { class: "file-detail",
            button { class: "close", onclick: move |_| on_close.call(()), "×" }
            {body}
        }
    }
}

#[component]
fn ArtifactBlock(title: String, text: Option<String>) -> Element {
    rsx! {
        section { class: "artifact",
            h3 { "{title}" }
            match text {
                Some(text) => rsx! { pre { "{text}" } },
                None => rsx! { p { class: "muted", "Not available yet." } },
            }
        }
    }
}

// --- Courses ---

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[component]
fn CoursesTab(space_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut query = use_signal(CourseQuery::default);
    let (courses, total_pages) = use_courses(space_id, query);
    let state = courses.read();
    let mut search = use_signal(String::new);
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut tags = use_signal(String::new);

    let page = query.read().page;
    let pages = total_pages();

    let auth_create = auth.clone();
    let on_create = move |evt: FormEvent| {
        evt.prevent_default();
        let title_text = title().trim().to_string();
        if title_text.is_empty() {
            return;
        }
        let api = auth_create.api();
        let space_id = space_id();
        let req = CourseRequest {
            title: title_text,
            description: description(),
            tags: split_tags(&tags()),
        };
        courses.mutate(
            async move { api.create_course(&space_id, &req).await },
            "Course created",
            "create course",
            Refetch::Yes,
        );
        title.set(String::new());
        description.set(String::new());
        tags.set(String::new());
    };

    rsx! {
        form {
            class: "inline-form",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                let mut q = query.write();
                q.search = search();
                q.page = 1;
            },
            input {
                value: "{search}",
                placeholder: "Search courses",
                oninput: move |e| search.set(e.value()),
            }
            Button { r#type: "submit", variant: ButtonVariant::Secondary, "Search" }
        }

        if state.loading && state.items.is_empty() {
            Loading { label: "Loading courses..." }
        } else if let Some(error) = state.error.clone() {
            ErrorBanner { message: error, on_retry: move |_| courses.refresh() }
        } else if state.items.is_empty() {
            EmptyState {
                title: "No courses",
                message: "Create a course below or ask the course creator to draft one.",
            }
        } else {
            ul { class: "course-list",
                for course in state.items.iter() {
                    li { key: "{course.id}",
                        Link {
                            to: Route::CourseView {
                                space_id: space_id(),
                                course_id: course.id.clone(),
                            },
                            "{course.title}"
                        }
                        span { class: "muted", " {course.sections.len()} sections" }
                        Button {
                            variant: ButtonVariant::Danger,
                            onclick: {
                                let auth = auth.clone();
                                let course_id = course.id.clone();
                                move |_| {
                                    let api = auth.api();
                                    let space_id = space_id();
                                    let course_id = course_id.clone();
                                    courses.mutate(
                                        async move { api.delete_course(&space_id, &course_id).await },
                                        "Course deleted",
                                        "delete course",
                                        Refetch::Yes,
                                    );
                                }
                            },
                            "Delete"
                        }
                    }
                }
            }
            div { class: "pager",
                Button {
                    variant: ButtonVariant::Secondary,
                    disabled: page <= 1,
                    onclick: move |_| query.write().page = page.saturating_sub(1).max(1),
                    "Previous"
                }
                span { "Page {page} of {pages}" }
                Button {
                    variant: ButtonVariant::Secondary,
                    disabled: page >= pages,
                    onclick: move |_| query.write().page = page + 1,
                    "Next"
                }
            }
        }

        form { class: "stacked-form", onsubmit: on_create,
            h3 { "New course" }
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
            input {
                value: "{tags}",
                placeholder: "Tags, comma separated",
                oninput: move |e| tags.set(e.value()),
            }
            Button { r#type: "submit", "Create course" }
        }
    }
}

// --- Tests ---

#[component]
fn TestsTab(space_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let sets = use_question_sets(space_id);
    let files = use_files(space_id);
    let state = sets.read();
    let mut chosen = use_signal(Vec::<String>::new);
    let mut count = use_signal(|| "10".to_string());

    let auth_generate = auth.clone();
    let on_generate = move |evt: FormEvent| {
        evt.prevent_default();
        let file_names = chosen();
        if file_names.is_empty() {
            return;
        }
        let api = auth_generate.api();
        let space_id = space_id();
        let req = GenerateQuestionsRequest {
            file_names,
            number_of_questions: count().trim().parse().ok(),
        };
        sets.mutate(
            async move { api.generate_question_set(&space_id, &req).await },
            "Test generated",
            "generate test",
            Refetch::Yes,
        );
        chosen.set(Vec::new());
    };

    rsx! {
        if state.loading && state.items.is_empty() {
            Loading { label: "Loading tests..." }
        } else if let Some(error) = state.error.clone() {
            ErrorBanner { message: error, on_retry: move |_| sets.refresh() }
        } else if state.items.is_empty() {
            EmptyState {
                title: "No tests yet",
                message: "Generate a test from this space's files.",
            }
        } else {
            ul { class: "test-list",
                for set in state.items.iter() {
                    li { key: "{set.id}",
                        Link {
                            to: Route::QuizView {
                                space_id: space_id(),
                                set_id: set.id.clone(),
                            },
                            "{set.questions.len()} questions"
                        }
                        if let Some(created) = set.created_at {
                            span { class: "muted", {format!(" {}", created.format("%Y-%m-%d %H:%M"))} }
                        }
                        Button {
                            variant: ButtonVariant::Danger,
                            onclick: {
                                let auth = auth.clone();
                                let set_id = set.id.clone();
                                move |_| {
                                    let api = auth.api();
                                    let space_id = space_id();
                                    let set_id = set_id.clone();
                                    sets.mutate(
                                        async move { api.delete_question_set(&space_id, &set_id).await },
                                        "Test deleted",
                                        "delete test",
                                        Refetch::Yes,
                                    );
                                }
                            },
                            "Delete"
                        }
                    }
                }
            }
        }

        form { class: "stacked-form", onsubmit: on_generate,
            h3 { "Generate a test" }
            for file in files.items() {
                label { key: "{file.id}", class: "checkbox",
                    input {
                        r#type: "checkbox",
                        checked: chosen.read().contains(&file.name),
                        onchange: {
                            let name = file.name.clone();
                            move |e: FormEvent| {
                                let mut names = chosen.write();
                                names.retain(|n| n != &name);
                                if e.checked() {
                                    names.push(name.clone());
                                }
                            }
                        },
                    }
                    " {file.name}"
                }
            }
            input {
                r#type: "number",
                min: "1",
                value: "{count}",
                oninput: move |e| count.set(e.value()),
            }
            Button { r#type: "submit", disabled: chosen.read().is_empty(), "Generate" }
        }
    }
}

// --- Members ---

#[component]
fn MembersTab(space_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let members = use_space_members(space_id);
    let state = members.read();
    let mut username = use_signal(String::new);

    let auth_add = auth.clone();
    let on_add = move |evt: FormEvent| {
        evt.prevent_default();
        let name = username().trim().to_string();
        if name.is_empty() {
            return;
        }
        let api = auth_add.api();
        let space_id = space_id();
        members.mutate(
            async move { api.add_space_member(&space_id, &name).await },
            "Member added",
            "add member",
            Refetch::Yes,
        );
        username.set(String::new());
    };

    rsx! {
        form { class: "inline-form", onsubmit: on_add,
            input {
                value: "{username}",
                placeholder: "Username",
                oninput: move |e| username.set(e.value()),
            }
            Button { r#type: "submit", "Add member" }
        }

        if state.loading && state.items.is_empty() {
            Loading { label: "Loading members..." }
        } else if let Some(error) = state.error.clone() {
            ErrorBanner { message: error, on_retry: move |_| members.refresh() }
        } else if state.items.is_empty() {
            EmptyState { title: "No members", message: "Add people by username." }
        } else {
            ul { class: "member-list",
                for member in state.items.iter() {
                    li { key: "{member.username}",
                        span { "{member.display_name()}" }
                        span { class: "muted", " {member.email}" }
                        Button {
                            variant: ButtonVariant::Danger,
                            onclick: {
                                let auth = auth.clone();
                                let name = member.username.clone();
                                move |_| {
                                    let api = auth.api();
                                    let space_id = space_id();
                                    let name = name.clone();
                                    members.mutate(
                                        async move { api.remove_space_member(&space_id, &name).await },
                                        "Member removed",
                                        "remove member",
                                        Refetch::Yes,
                                    );
                                }
                            },
                            "Remove"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::split_tags;

    #[test]
    fn tags_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(split_tags(" rust, ,wasm ,"), vec!["rust", "wasm"]);
        assert!(split_tags("").is_empty());
    }
}
