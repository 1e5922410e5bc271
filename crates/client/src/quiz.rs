//! Q&A quiz flow driven by server events.
//!
//! ```text
//! Idle ─start─► Connecting ─connected─► SelectingType ─selectType(space)─► SelectingSpace
//!                                             │                                │
//!                                   selectType(general)                  selectSpace
//!                                             ▼                                ▼
//!                                           Ready ◄────────────────────────────┘
//!                                             │ question
//!                                             ▼
//!                                  Question ⇄ Evaluation
//! ```
//!
//! There is no client-side timeout: a silent server leaves the phase as is.

use spacedash_shared::{QaCommand, QaEvaluation, QaEvent, QaQuestion, QaStatus, QaType, QuizError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    Idle,
    Connecting,
    SelectingType,
    SelectingSpace,
    Ready,
    Question(QaQuestion),
    Evaluation(QaEvaluation),
}

impl QuizPhase {
    fn name(&self) -> &'static str {
        match self {
            QuizPhase::Idle => "idle",
            QuizPhase::Connecting => "connecting",
            QuizPhase::SelectingType => "selecting type",
            QuizPhase::SelectingSpace => "selecting space",
            QuizPhase::Ready => "ready",
            QuizPhase::Question(_) => "answering a question",
            QuizPhase::Evaluation(_) => "reviewing an evaluation",
        }
    }
}

fn event_name(event: &QaEvent) -> &'static str {
    match event {
        QaEvent::Connected => "connected",
        QaEvent::SelectType { .. } => "selectType",
        QaEvent::SelectSpace { .. } => "selectSpace",
        QaEvent::Question { .. } => "question",
        QaEvent::Evaluation { .. } => "evaluation",
        QaEvent::Error { .. } => "error",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizSession {
    phase: QuizPhase,
    last_error: Option<String>,
    answered: u32,
    correct: u32,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// `(correct, answered)` so far.
    pub fn tally(&self) -> (u32, u32) {
        (self.correct, self.answered)
    }

    pub fn start(&mut self) {
        *self = Self {
            phase: QuizPhase::Connecting,
            ..Self::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn unexpected(&self, event: &QaEvent) -> QuizError {
        QuizError::UnexpectedEvent {
            phase: self.phase.name().to_string(),
            event: event_name(event).to_string(),
        }
    }

    fn failed(&mut self, message: Option<String>, fallback: &str) {
        let message = message.unwrap_or_else(|| fallback.to_string());
        crate::log_warn!("Q&A error: {}", message);
        self.last_error = Some(message);
    }

    /// Apply a server event. Events that do not fit the current phase are
    /// rejected and leave the session untouched.
    pub fn apply(&mut self, event: QaEvent) -> Result<(), QuizError> {
        let next = match (&self.phase, &event) {
            (QuizPhase::Connecting, QaEvent::Connected) => QuizPhase::SelectingType,
            (_, QaEvent::Connected) => return Ok(()),

            (QuizPhase::SelectingType, QaEvent::SelectType { status, kind, message }) => {
                match (status, kind) {
                    (QaStatus::Success, Some(QaType::Space)) => QuizPhase::SelectingSpace,
                    (QaStatus::Success, Some(QaType::General)) => QuizPhase::Ready,
                    (QaStatus::Success, None) => return Err(self.unexpected(&event)),
                    (QaStatus::Error, _) => {
                        self.failed(message.clone(), "Could not select quiz type");
                        return Ok(());
                    }
                }
            }

            (QuizPhase::SelectingSpace, QaEvent::SelectSpace { status, message }) => match status {
                QaStatus::Success => QuizPhase::Ready,
                QaStatus::Error => {
                    self.failed(message.clone(), "Could not select space");
                    return Ok(());
                }
            },

            (QuizPhase::Ready | QuizPhase::Evaluation(_), QaEvent::Question { question }) => {
                QuizPhase::Question(question.clone())
            }

            (QuizPhase::Question(_), QaEvent::Evaluation { evaluation }) => {
                self.answered += 1;
                if evaluation.correct {
                    self.correct += 1;
                }
                QuizPhase::Evaluation(evaluation.clone())
            }

            (_, QaEvent::Error { message }) => {
                self.failed(Some(message.clone()), "");
                return Ok(());
            }

            _ => return Err(self.unexpected(&event)),
        };

        crate::log_debug!("Q&A {} -> {}", self.phase.name(), next.name());
        self.last_error = None;
        self.phase = next;
        Ok(())
    }

    pub fn select_type(&self, kind: QaType) -> Option<QaCommand> {
        matches!(self.phase, QuizPhase::SelectingType).then_some(QaCommand::SelectType { kind })
    }

    pub fn select_space(&self, space_id: impl Into<String>) -> Option<QaCommand> {
        matches!(self.phase, QuizPhase::SelectingSpace).then(|| QaCommand::SelectSpace {
            space_id: space_id.into(),
        })
    }

    pub fn next_question(&self) -> Option<QaCommand> {
        matches!(self.phase, QuizPhase::Ready | QuizPhase::Evaluation(_))
            .then_some(QaCommand::NextQuestion)
    }

    pub fn submit_answer(&self, answer: impl Into<String>) -> Option<QaCommand> {
        matches!(self.phase, QuizPhase::Question(_)).then(|| QaCommand::SubmitAnswer {
            answer: answer.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> QaEvent {
        QaEvent::Question {
            question: QaQuestion {
                question: "2 + 2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
                number: Some(1),
            },
        }
    }

    fn evaluation(correct: bool) -> QaEvent {
        QaEvent::Evaluation {
            evaluation: QaEvaluation {
                correct,
                explanation: "Arithmetic".to_string(),
                correct_answer: Some("4".to_string()),
            },
        }
    }

    fn connected_session() -> QuizSession {
        let mut quiz = QuizSession::new();
        quiz.start();
        quiz.apply(QaEvent::Connected).unwrap();
        quiz
    }

    #[test]
    fn space_quiz_walks_through_every_phase() {
        let mut quiz = connected_session();
        assert_eq!(quiz.phase(), &QuizPhase::SelectingType);

        quiz.apply(QaEvent::SelectType {
            status: QaStatus::Success,
            kind: Some(QaType::Space),
            message: None,
        })
        .unwrap();
        assert_eq!(quiz.phase(), &QuizPhase::SelectingSpace);
        assert!(quiz.select_space("s1").is_some());

        quiz.apply(QaEvent::SelectSpace {
            status: QaStatus::Success,
            message: None,
        })
        .unwrap();
        assert_eq!(quiz.phase(), &QuizPhase::Ready);

        quiz.apply(question()).unwrap();
        assert!(matches!(quiz.phase(), QuizPhase::Question(_)));
        assert_eq!(
            quiz.submit_answer("4"),
            Some(QaCommand::SubmitAnswer {
                answer: "4".to_string()
            })
        );

        quiz.apply(evaluation(true)).unwrap();
        quiz.apply(question()).unwrap();
        quiz.apply(evaluation(false)).unwrap();
        assert_eq!(quiz.tally(), (1, 2));
    }

    #[test]
    fn general_quiz_skips_space_selection() {
        let mut quiz = connected_session();
        quiz.apply(QaEvent::SelectType {
            status: QaStatus::Success,
            kind: Some(QaType::General),
            message: None,
        })
        .unwrap();
        assert_eq!(quiz.phase(), &QuizPhase::Ready);
    }

    #[test]
    fn out_of_phase_events_are_rejected_without_changing_state() {
        let mut quiz = connected_session();
        let before = quiz.clone();

        let err = quiz.apply(evaluation(true)).unwrap_err();
        assert_eq!(
            err,
            QuizError::UnexpectedEvent {
                phase: "selecting type".to_string(),
                event: "evaluation".to_string(),
            }
        );
        assert_eq!(quiz, before);
    }

    #[test]
    fn server_errors_are_recorded_and_phase_kept() {
        let mut quiz = connected_session();
        quiz.apply(QaEvent::SelectType {
            status: QaStatus::Error,
            kind: None,
            message: Some("No spaces available".to_string()),
        })
        .unwrap();
        assert_eq!(quiz.phase(), &QuizPhase::SelectingType);
        assert_eq!(quiz.last_error(), Some("No spaces available"));

        quiz.apply(QaEvent::Error {
            message: "Model unavailable".to_string(),
        })
        .unwrap();
        assert_eq!(quiz.last_error(), Some("Model unavailable"));
    }

    #[test]
    fn commands_are_only_offered_in_their_phase() {
        let quiz = QuizSession::new();
        assert_eq!(quiz.select_type(QaType::General), None);
        assert_eq!(quiz.next_question(), None);

        let quiz = connected_session();
        assert!(quiz.select_type(QaType::General).is_some());
        assert_eq!(quiz.submit_answer("x"), None);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut quiz = connected_session();
        quiz.reset();
        assert_eq!(quiz.phase(), &QuizPhase::Idle);
    }
}
