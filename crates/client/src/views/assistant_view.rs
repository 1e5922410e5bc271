//! The AI panels: general chat, the course creator and the Q&A quiz.
//!
//! Each panel owns its socket. Inbound events reach the panel's signals through
//! [`use_event_bridge`], since socket callbacks may fire off the UI thread.

use dioxus::prelude::*;
use spacedash_shared::{AssistantEvent, ChatMessage, QaCommand, QaEvent, QaType, Sender};

use crate::auth_session::AuthContext;
use crate::chat::ChatTranscript;
use crate::components::{Button, ButtonVariant, EmptyState, Loading};
use crate::hooks::{use_files, use_spaces};
use crate::quiz::{QuizPhase, QuizSession};
use crate::resource::ToastKind;
use crate::stores::push_toast;
use crate::ws::{
    assistant_config, course_creator_config, qa_config, use_event_bridge, use_ws_client,
    AssistantClient, ConnectionState, CourseCreatorClient, HasSocket, QaClient,
};

const LOST_REPLY: &str = "The connection closed before a reply arrived.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Chat,
    CourseCreator,
    Quiz,
}

#[component]
pub fn AssistantView() -> Element {
    let spaces = use_spaces();
    let state = spaces.read();
    let mut space_id = use_signal(String::new);
    let mut panel = use_signal(|| Panel::Chat);

    // Default to the first space once the list arrives.
    use_effect(move || {
        let first = spaces.items().first().map(|s| s.id.clone());
        if space_id.peek().is_empty() {
            if let Some(first) = first {
                space_id.set(first);
            }
        }
    });

    if state.loading && state.items.is_empty() {
        return rsx! { Loading { label: "Loading spaces..." } };
    }
    if state.items.is_empty() {
        return rsx! {
            EmptyState {
                title: "No spaces",
                message: "The assistant works on a space's files. Join a space first.",
            }
        };
    }

    let current = space_id();

    rsx! {
        div { class: "assistant-view",
            header { class: "section-header",
                select {
                    value: "{current}",
                    onchange: move |e| space_id.set(e.value()),
                    for space in state.items.iter() {
                        option { key: "{space.id}", value: "{space.id}", "{space.name}" }
                    }
                }
                nav { class: "tabs",
                    for (p, label) in [
                        (Panel::Chat, "Chat"),
                        (Panel::CourseCreator, "Course creator"),
                        (Panel::Quiz, "Q&A"),
                    ] {
                        button {
                            key: "{label}",
                            class: if panel() == p { "tab active" } else { "tab" },
                            onclick: move |_| panel.set(p),
                            "{label}"
                        }
                    }
                }
            }

            if !current.is_empty() {
                match panel() {
                    Panel::Chat => rsx! { AssistantPanel { key: "chat-{current}", space_id } },
                    Panel::CourseCreator => rsx! { CourseCreatorPanel { key: "course-{current}", space_id } },
                    Panel::Quiz => rsx! { QaPanel { key: "qa-{current}", space_id } },
                }
            }
        }
    }
}

/// Connect once on mount, reporting a failure as a toast.
fn use_connect_on_mount<C: HasSocket + Clone + 'static>(client: &C, before: impl FnOnce() + 'static) {
    let client = client.clone();
    use_hook(move || {
        before();
        spawn(async move {
            if let Err(e) = client.socket().connect().await {
                push_toast(ToastKind::Error, format!("Could not connect: {e}"));
            }
        });
    });
}

fn reconnect<C: HasSocket + Clone + 'static>(client: &C) {
    let client = client.clone();
    spawn(async move {
        if let Err(e) = client.socket().connect().await {
            push_toast(ToastKind::Error, format!("Could not connect: {e}"));
        }
    });
}

/// Fail outstanding prompts whenever the socket goes down.
fn use_fail_on_disconnect(state: Signal<ConnectionState>, mut transcript: Signal<ChatTranscript>) {
    use_effect(move || {
        let down = matches!(
            state(),
            ConnectionState::Disconnected | ConnectionState::Failed { .. }
        );
        if down && transcript.peek().is_waiting() {
            transcript.write().fail_pending(LOST_REPLY);
        }
    });
}

#[component]
pub fn AssistantPanel(space_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let files = use_files(space_id);
    let mut transcript = use_signal(ChatTranscript::new);
    let mut file_name = use_signal(String::new);
    let mut input = use_signal(String::new);

    let events = use_event_bridge(move |event: AssistantEvent| {
        transcript.write().receive(event);
    });
    let (client, state) = use_ws_client(|| {
        let client = AssistantClient::new(assistant_config(&auth.config.websockets), auth.session());
        client.on_event(move |event| {
            let _ = events.unbounded_send(event);
        });
        client
    });
    use_connect_on_mount(&client, || {});
    use_fail_on_disconnect(state, transcript);

    let sender = client.clone();
    let on_send = move |evt: FormEvent| {
        evt.prevent_default();
        let text = input().trim().to_string();
        if text.is_empty() {
            return;
        }
        let correlation_id = transcript.write().submit(text.clone());
        let file = Some(file_name()).filter(|f| !f.is_empty());
        if let Err(e) = sender.ask(text, space_id(), file, Some(correlation_id)) {
            transcript.write().fail_pending(&e.to_string());
        }
        input.set(String::new());
    };

    rsx! {
        div { class: "chat-panel",
            ConnectionBar { state: state(), on_reconnect: move |_| reconnect(&client) }
            ChatLog { messages: transcript.read().messages().to_vec() }
            form { class: "chat-input", onsubmit: on_send,
                select {
                    value: "{file_name}",
                    onchange: move |e| file_name.set(e.value()),
                    option { value: "", "All files" }
                    for file in files.items() {
                        option { key: "{file.id}", value: "{file.name}", "{file.name}" }
                    }
                }
                input {
                    value: "{input}",
                    placeholder: "Ask about this space...",
                    oninput: move |e| input.set(e.value()),
                }
                Button { r#type: "submit", disabled: !state().is_connected(), "Send" }
                Button {
                    variant: ButtonVariant::Secondary,
                    onclick: move |_| transcript.write().clear(),
                    "Clear"
                }
            }
        }
    }
}

#[component]
pub fn CourseCreatorPanel(space_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut transcript = use_signal(ChatTranscript::new);
    let mut input = use_signal(String::new);

    let events = use_event_bridge(move |event: AssistantEvent| {
        transcript.write().receive(event);
    });
    let (client, state) = use_ws_client(|| {
        let client =
            CourseCreatorClient::new(course_creator_config(&auth.config.websockets), auth.session());
        client.on_event(move |event| {
            let _ = events.unbounded_send(event);
        });
        client
    });
    use_connect_on_mount(&client, || {});
    use_fail_on_disconnect(state, transcript);

    let sender = client.clone();
    let on_send = move |evt: FormEvent| {
        evt.prevent_default();
        let text = input().trim().to_string();
        if text.is_empty() {
            return;
        }
        let correlation_id = transcript.write().submit(text.clone());
        if let Err(e) = sender.prompt(text, space_id(), Some(correlation_id)) {
            transcript.write().fail_pending(&e.to_string());
        }
        input.set(String::new());
    };

    rsx! {
        div { class: "chat-panel",
            ConnectionBar { state: state(), on_reconnect: move |_| reconnect(&client) }
            ChatLog { messages: transcript.read().messages().to_vec() }
            form { class: "chat-input", onsubmit: on_send,
                textarea {
                    value: "{input}",
                    placeholder: "Describe the course you want, e.g. \"An intro to the Q3 reports\"",
                    oninput: move |e| input.set(e.value()),
                }
                Button { r#type: "submit", disabled: !state().is_connected(), "Create" }
            }
        }
    }
}

fn send_command(client: &QaClient, command: Option<QaCommand>) {
    let Some(command) = command else {
        crate::log_debug!("Ignoring Q&A command outside its phase");
        return;
    };
    if let Err(e) = client.send(&command) {
        push_toast(ToastKind::Error, format!("Could not send: {e}"));
    }
}

#[component]
pub fn QaPanel(space_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut session = use_signal(QuizSession::new);

    let events = use_event_bridge(move |event: QaEvent| {
        if let Err(e) = session.write().apply(event) {
            crate::log_warn!("Ignoring Q&A event: {}", e);
        }
    });
    let (client, state) = use_ws_client(|| {
        let client = QaClient::new(qa_config(&auth.config.websockets), auth.session());
        client.on_event(move |event| {
            let _ = events.unbounded_send(event);
        });
        client
    });
    use_connect_on_mount(&client, move || session.write().start());

    let current = session.read().clone();
    let (correct, answered) = current.tally();

    let body = match current.phase() {
        QuizPhase::Idle => rsx! {
            Button {
                onclick: {
                    let client = client.clone();
                    move |_| {
                        session.write().start();
                        reconnect(&client);
                    }
                },
                "Start"
            }
        },
        QuizPhase::Connecting => rsx! { Loading { label: "Waiting for the quiz service..." } },
        QuizPhase::SelectingType => rsx! {
            p { "What should the questions cover?" }
            Button {
                onclick: {
                    let client = client.clone();
                    move |_| send_command(&client, session.read().select_type(QaType::General))
                },
                "General knowledge"
            }
            Button {
                onclick: {
                    let client = client.clone();
                    move |_| send_command(&client, session.read().select_type(QaType::Space))
                },
                "This space"
            }
        },
        QuizPhase::SelectingSpace => rsx! {
            Button {
                onclick: {
                    let client = client.clone();
                    move |_| send_command(&client, session.read().select_space(space_id()))
                },
                "Use this space"
            }
        },
        QuizPhase::Ready => rsx! {
            Button {
                onclick: {
                    let client = client.clone();
                    move |_| send_command(&client, session.read().next_question())
                },
                "First question"
            }
        },
        QuizPhase::Question(question) => rsx! {
            p { class: "question",
                if let Some(n) = question.number {
                    "{n}. "
                }
                "{question.question}"
            }
            div { class: "options",
                for option in question.options.iter() {
                    Button {
                        key: "{option}",
                        variant: ButtonVariant::Secondary,
                        onclick: {
                            let client = client.clone();
                            let option = option.clone();
                            move |_| send_command(&client, session.read().submit_answer(option.clone()))
                        },
                        "{option}"
                    }
                }
            }
        },
        QuizPhase::Evaluation(evaluation) => {
            let verdict = match (evaluation.correct, &evaluation.correct_answer) {
                (true, _) => "Correct!".to_string(),
                (false, Some(answer)) => format!("Not quite. The answer was {answer}."),
                (false, None) => "Not quite.".to_string(),
            };
            rsx! {
                div { class: if evaluation.correct { "feedback correct" } else { "feedback wrong" },
                    "{verdict}"
                    if !evaluation.explanation.is_empty() {
                        p { "{evaluation.explanation}" }
                    }
                }
                Button {
                    onclick: {
                        let client = client.clone();
                        move |_| send_command(&client, session.read().next_question())
                    },
                    "Next question"
                }
            }
        }
    };

    let on_end = {
        let client = client.clone();
        move |_: MouseEvent| {
            send_command(&client, Some(QaCommand::End));
            client.socket().disconnect();
            session.write().reset();
        }
    };

    rsx! {
        div { class: "qa-panel",
            ConnectionBar { state: state(), on_reconnect: move |_| reconnect(&client) }
            if let Some(error) = current.last_error() {
                div { class: "form-error", "{error}" }
            }
            {body}
            footer { class: "qa-footer",
                span { "Score: {correct} / {answered}" }
                if !matches!(current.phase(), QuizPhase::Idle) {
                    Button { variant: ButtonVariant::Danger, onclick: on_end, "End quiz" }
                }
            }
        }
    }
}

#[component]
fn ConnectionBar(state: ConnectionState, on_reconnect: EventHandler<()>) -> Element {
    let (label, class) = match &state {
        ConnectionState::Connected => ("Connected".to_string(), "status online"),
        ConnectionState::Connecting => ("Connecting...".to_string(), "status pending"),
        ConnectionState::Reconnecting { attempt } => {
            (format!("Reconnecting (attempt {attempt})..."), "status pending")
        }
        ConnectionState::Disconnected => ("Disconnected".to_string(), "status offline"),
        ConnectionState::Failed { reason } => (format!("Connection failed: {reason}"), "status offline"),
    };
    let can_retry = matches!(
        state,
        ConnectionState::Disconnected | ConnectionState::Failed { .. }
    );

    rsx! {
        div { class: "connection-bar",
            span { class, "{label}" }
            if can_retry {
                button { class: "btn btn-secondary", onclick: move |_| on_reconnect.call(()), "Reconnect" }
            }
        }
    }
}

#[component]
fn ChatLog(messages: Vec<ChatMessage>) -> Element {
    if messages.is_empty() {
        return rsx! { p { class: "muted", "No messages yet." } };
    }

    rsx! {
        ul { class: "chat-log",
            for msg in messages.iter() {
                li {
                    key: "{msg.id}",
                    class: match msg.sender {
                        Sender::User => "chat-message from-user",
                        Sender::Ai => "chat-message from-ai",
                    },
                    if msg.loading {
                        span { class: "typing", "…" }
                    } else {
                        "{msg.content}"
                    }
                    span { class: "timestamp", {msg.timestamp.format("%H:%M").to_string()} }
                }
            }
        }
    }
}
