//! Taking a generated test and reviewing the graded result.

use std::collections::HashMap;

use dioxus::prelude::*;
use spacedash_shared::{ApiError, QuestionSet, QuizScore};

use crate::auth_session::AuthContext;
use crate::components::{Button, ErrorBanner, Loading};
use crate::resource::ToastKind;
use crate::stores::push_toast;
use crate::Route;

/// Answers in question order, or `None` while any question is unanswered.
fn collect_answers(set: &QuestionSet, chosen: &HashMap<u32, String>) -> Option<Vec<String>> {
    set.ordered_questions()
        .into_iter()
        .map(|q| chosen.get(&q.sequence_number).cloned())
        .collect()
}

#[component]
pub fn QuizView(space_id: Signal<String>, set_id: Signal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut chosen = use_signal(HashMap::<u32, String>::new);
    let mut score = use_signal(|| None::<QuizScore>);
    let mut is_submitting = use_signal(|| false);

    let mut set = use_resource({
        let auth = auth.clone();
        move || {
            let api = auth.api();
            let (space_id, set_id) = (space_id(), set_id());
            async move {
                let mut set = api.get_question_set(&space_id, &set_id).await?;
                if set.space_id.is_empty() {
                    set.space_id = space_id;
                }
                Ok::<_, ApiError>(set)
            }
        }
    });

    let loaded = match &*set.read() {
        None => return rsx! { Loading { label: "Loading test..." } },
        Some(Err(e)) => {
            return rsx! {
                ErrorBanner { message: e.user_message(), on_retry: move |_| set.restart() }
            }
        }
        Some(Ok(loaded)) => loaded.clone(),
    };

    let answers = collect_answers(&loaded, &chosen.read());
    let graded: HashMap<u32, _> = score
        .read()
        .as_ref()
        .map(|s| {
            s.graded
                .iter()
                .map(|g| (g.sequence_number, g.clone()))
                .collect()
        })
        .unwrap_or_default();

    let on_submit = {
        let loaded = loaded.clone();
        let answers = answers.clone();
        move |_: MouseEvent| {
            let Some(answers) = answers.clone() else {
                return;
            };
            let api = auth.api();
            let set = loaded.clone();
            spawn(async move {
                is_submitting.set(true);
                match api.submit_and_grade(&set, answers).await {
                    Ok(result) => {
                        crate::log_info!(
                            "Graded test {}: {}/{} ({}%)",
                            set.id,
                            result.correct,
                            result.total,
                            result.percent
                        );
                        score.set(Some(result));
                    }
                    Err(e) => {
                        crate::log_error!("Failed to submit test {}: {}", set.id, e);
                        push_toast(ToastKind::Error, format!("Failed to submit answers: {e}"));
                    }
                }
                is_submitting.set(false);
            });
        }
    };

    let finished = score.read().is_some();

    rsx! {
        div { class: "quiz-view",
            Link { to: Route::SpaceView { space_id: space_id() }, "← Back to space" }

            if let Some(result) = score() {
                div { class: "quiz-score",
                    h2 { "{result.percent}%" }
                    p { "{result.correct} of {result.total} correct" }
                }
            }

            ol { class: "quiz-questions",
                for question in loaded.ordered_questions() {
                    li { key: "{question.sequence_number}",
                        p { class: "question", "{question.question}" }
                        for (letter, text) in question.options() {
                            label {
                                key: "{letter}",
                                class: "option",
                                input {
                                    r#type: "radio",
                                    name: "q{question.sequence_number}",
                                    disabled: finished,
                                    checked: chosen.read().get(&question.sequence_number).map(String::as_str) == Some(letter),
                                    onchange: {
                                        let sequence = question.sequence_number;
                                        move |_| {
                                            chosen.write().insert(sequence, letter.to_string());
                                        }
                                    },
                                }
                                " {letter}. {text}"
                            }
                        }
                        if let Some(g) = graded.get(&question.sequence_number) {
                            div { class: if g.correct { "feedback correct" } else { "feedback wrong" },
                                if g.correct {
                                    "Correct."
                                } else {
                                    "Correct answer: {g.expected}."
                                }
                                if !g.explanation.is_empty() {
                                    p { "{g.explanation}" }
                                }
                            }
                        }
                    }
                }
            }

            if !finished {
                Button {
                    disabled: answers.is_none(),
                    loading: is_submitting(),
                    onclick: on_submit,
                    "Submit answers"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacedash_shared::Question;

    fn question(sequence_number: u32) -> Question {
        Question {
            sequence_number,
            question: format!("Question {sequence_number}"),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
        }
    }

    #[test]
    fn answers_follow_sequence_order_and_require_every_question() {
        let set = QuestionSet {
            id: "set-1".to_string(),
            user_id: "u".to_string(),
            space_id: "s".to_string(),
            created_at: None,
            questions: vec![question(2), question(1)],
        };

        let mut chosen = HashMap::new();
        chosen.insert(2, "C".to_string());
        assert_eq!(collect_answers(&set, &chosen), None);

        chosen.insert(1, "A".to_string());
        assert_eq!(
            collect_answers(&set, &chosen),
            Some(vec!["A".to_string(), "C".to_string()])
        );
    }
}
