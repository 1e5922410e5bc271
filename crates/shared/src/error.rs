//! Error types shared by every layer of the client.

use serde_json::Value;
use thiserror::Error;

/// Failure of a REST call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No access token was available; the request was never sent.
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ApiError {
    /// Best human-readable message for a toast.
    ///
    /// JSON error bodies are searched for `message`, `Message`, `detail`, `error`, then
    /// `title`; anything else falls back to the status line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http {
                status,
                status_text,
                body,
            } => try_error_detail(body).unwrap_or_else(|| {
                if status_text.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("{status} {status_text}")
                }
            }),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthenticated | ApiError::Http { status: 401, .. })
    }
}

/// Pull a message out of a JSON error body.
pub fn try_error_detail(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    ["message", "Message", "detail", "error", "title"]
        .iter()
        .find_map(|key| parsed.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No user is signed in")]
    NotSignedIn,
    #[error("{message}")]
    Provider { code: String, message: String },
    /// The provider wants an extra step (new password, MFA) this client does not support.
    #[error("Additional sign-in step required: {0}")]
    ChallengeRequired(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected identity response: {0}")]
    Deserialize(String),
}

impl AuthError {
    /// `true` when the user still has to confirm their account.
    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, AuthError::Provider { code, .. } if code == "UserNotConfirmedException")
    }
}

/// Failure of a WebSocket operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WsError {
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("WebSocket is not connected")]
    NotConnected,
    #[error("Connection timed out after {0}ms")]
    Timeout(u64),
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Send failed: {0}")]
    Send(String),
    #[error("Serialize failed: {0}")]
    Serialize(String),
}

/// Answers and results that cannot be lined up with the question set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradingError {
    #[error("{answers} answers for {questions} questions")]
    Misaligned { questions: usize, answers: usize },
    #[error("No result for question {0}")]
    MissingResult(u32),
}

/// An inbound Q&A event that does not fit the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Unexpected {event} while {phase}")]
    UnexpectedEvent { phase: String, event: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_body_detail() {
        let err = ApiError::Http {
            status: 409,
            status_text: "Conflict".to_string(),
            body: r#"{"Message":"Space name already taken"}"#.to_string(),
        };
        assert_eq!(err.user_message(), "Space name already taken");

        let err = ApiError::Http {
            status: 502,
            status_text: "Bad Gateway".to_string(),
            body: "<html>oops</html>".to_string(),
        };
        assert_eq!(err.user_message(), "502 Bad Gateway");
    }

    #[test]
    fn unconfirmed_accounts_are_recognised() {
        let err = AuthError::Provider {
            code: "UserNotConfirmedException".to_string(),
            message: "User is not confirmed.".to_string(),
        };
        assert!(err.is_unconfirmed());
        assert_eq!(err.to_string(), "User is not confirmed.");
    }
}
