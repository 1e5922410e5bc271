//! WebSocket envelopes for the assistant, course-creator and Q&A endpoints.
//!
//! The gateway multiplexes several logical actions over one connection and does
//! not promise to echo anything back, so `CorrelationId` is optional in both
//! directions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query sent to the general assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssistantRequest {
    pub query: String,
    pub space_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Prompt sent to the course creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoursePromptRequest {
    pub user_prompt: String,
    pub space_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// A decoded inbound payload from the assistant or course-creator endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantEvent {
    /// The server is still working on the last request.
    InProgress,
    Reply {
        content: String,
        correlation_id: Option<String>,
    },
    /// Valid JSON that is neither a reply nor a progress marker.
    Other(Value),
}

impl AssistantEvent {
    /// Decode a raw text frame.
    ///
    /// Progress markers are recognised by value (`status == "in_progress"`), not
    /// by comparing the frame against a literal string. Some deployments send the
    /// payload JSON-encoded a second time; that inner document is unwrapped.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let value = match serde_json::from_str::<Value>(raw)? {
            Value::String(inner) => match serde_json::from_str::<Value>(&inner) {
                Ok(nested @ Value::Object(_)) => nested,
                _ => Value::String(inner),
            },
            other => other,
        };

        let field = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| value.get(*name).and_then(Value::as_str))
                .map(str::to_string)
        };

        if field(&["status", "Status"]).as_deref() == Some("in_progress") {
            return Ok(AssistantEvent::InProgress);
        }

        if let Some(content) = field(&["Content", "content"]) {
            return Ok(AssistantEvent::Reply {
                content,
                correlation_id: field(&["CorrelationId", "correlationId"]),
            });
        }

        Ok(AssistantEvent::Other(value))
    }
}

// --- Q&A ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaType {
    /// Questions about the platform in general.
    General,
    /// Questions drawn from one space's content.
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaStatus {
    Success,
    Error,
}

/// Client → server commands on the Q&A endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum QaCommand {
    SelectType {
        #[serde(rename = "type")]
        kind: QaType,
    },
    SelectSpace {
        #[serde(rename = "spaceId")]
        space_id: String,
    },
    NextQuestion,
    SubmitAnswer {
        answer: String,
    },
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaEvaluation {
    pub correct: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// Server → client events on the Q&A endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum QaEvent {
    Connected,
    SelectType {
        status: QaStatus,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<QaType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    SelectSpace {
        status: QaStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Question {
        question: QaQuestion,
    },
    Evaluation {
        evaluation: QaEvaluation,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_request_omits_empty_optionals() {
        let req = AssistantRequest {
            query: "What changed?".to_string(),
            space_id: "s1".to_string(),
            file_name: None,
            correlation_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"Query": "What changed?", "SpaceId": "s1"}));
    }

    #[test]
    fn in_progress_is_detected_regardless_of_formatting() {
        for raw in [
            r#"{"status": "in_progress"}"#,
            r#"{"status":"in_progress"}"#,
            "{\n  \"requestId\": \"x\",\n  \"status\" : \"in_progress\"\n}",
            r#""{\"status\": \"in_progress\"}""#,
        ] {
            assert_eq!(AssistantEvent::parse(raw).unwrap(), AssistantEvent::InProgress, "{raw}");
        }
    }

    #[test]
    fn replies_carry_content_and_optional_correlation() {
        let event = AssistantEvent::parse(r#"{"Content":"Hello","CorrelationId":"c-1"}"#).unwrap();
        assert_eq!(
            event,
            AssistantEvent::Reply {
                content: "Hello".to_string(),
                correlation_id: Some("c-1".to_string())
            }
        );

        let event = AssistantEvent::parse(r#"{"foo": 1}"#).unwrap();
        assert!(matches!(event, AssistantEvent::Other(_)));

        assert!(AssistantEvent::parse("not json").is_err());
    }

    #[test]
    fn qa_commands_are_tagged_by_action() {
        let json = serde_json::to_value(QaCommand::SelectType { kind: QaType::Space }).unwrap();
        assert_eq!(json, serde_json::json!({"action": "selectType", "type": "space"}));

        let json = serde_json::to_value(QaCommand::NextQuestion).unwrap();
        assert_eq!(json, serde_json::json!({"action": "nextQuestion"}));
    }

    #[test]
    fn qa_events_decode_status_and_type() {
        let event: QaEvent = serde_json::from_str(
            r#"{"action":"selectType","status":"success","type":"general"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            QaEvent::SelectType {
                status: QaStatus::Success,
                kind: Some(QaType::General),
                message: None
            }
        );
    }
}
