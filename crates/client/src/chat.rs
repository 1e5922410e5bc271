//! In-memory chat transcript for the assistant and course-creator panels.
//!
//! Every submitted prompt gets a loading placeholder and a correlation id. A
//! reply that echoes the id fills its own placeholder; a reply without one
//! fills the oldest outstanding placeholder.

use std::collections::VecDeque;

use chrono::Utc;
use spacedash_shared::{AssistantEvent, ChatMessage, Sender};

#[derive(Debug, Clone, PartialEq)]
struct Pending {
    correlation_id: String,
    message_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    pending: VecDeque<Pending>,
}

fn message(content: impl Into<String>, sender: Sender, loading: bool) -> ChatMessage {
    ChatMessage {
        id: uuid::Uuid::new_v4().to_string(),
        content: content.into(),
        sender,
        timestamp: Utc::now(),
        loading,
    }
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether any prompt is still waiting for its reply.
    pub fn is_waiting(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Record a user prompt and its placeholder. Returns the correlation id to
    /// send with the request.
    pub fn submit(&mut self, text: impl Into<String>) -> String {
        let correlation_id = uuid::Uuid::new_v4().to_string();
        self.messages.push(message(text, Sender::User, false));

        let placeholder = message(String::new(), Sender::Ai, true);
        self.pending.push_back(Pending {
            correlation_id: correlation_id.clone(),
            message_id: placeholder.id.clone(),
        });
        self.messages.push(placeholder);
        correlation_id
    }

    /// Apply an inbound event. Returns whether the transcript changed.
    pub fn receive(&mut self, event: AssistantEvent) -> bool {
        match event {
            AssistantEvent::InProgress => false,
            AssistantEvent::Reply {
                content,
                correlation_id,
            } => {
                let slot = match correlation_id {
                    Some(id) => self
                        .pending
                        .iter()
                        .position(|p| p.correlation_id == id)
                        .or_else(|| {
                            crate::log_warn!("Reply for unknown request {}", id);
                            None
                        }),
                    None if self.pending.is_empty() => None,
                    None => Some(0),
                };

                match slot.and_then(|i| self.pending.remove(i)) {
                    Some(pending) => self.fill(&pending.message_id, content),
                    None => self.messages.push(message(content, Sender::Ai, false)),
                }
                true
            }
            AssistantEvent::Other(value) => {
                crate::log_debug!("Ignoring assistant payload: {}", value);
                false
            }
        }
    }

    fn fill(&mut self, message_id: &str, content: String) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == message_id) {
            msg.content = content;
            msg.loading = false;
            msg.timestamp = Utc::now();
        }
    }

    /// Turn every outstanding placeholder into an error message.
    pub fn fail_pending(&mut self, error: &str) {
        while let Some(pending) = self.pending.pop_front() {
            self.fill(&pending.message_id, error.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(content: &str, correlation_id: Option<&str>) -> AssistantEvent {
        AssistantEvent::Reply {
            content: content.to_string(),
            correlation_id: correlation_id.map(str::to_string),
        }
    }

    #[test]
    fn submit_adds_prompt_and_loading_placeholder() {
        let mut chat = ChatTranscript::new();
        let id = chat.submit("Summarize the handbook");

        assert!(!id.is_empty());
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[0].sender, Sender::User);
        assert!(chat.messages()[1].loading);
        assert!(chat.is_waiting());
    }

    #[test]
    fn in_progress_leaves_placeholder_loading() {
        let mut chat = ChatTranscript::new();
        chat.submit("hi");
        assert!(!chat.receive(AssistantEvent::InProgress));
        assert!(chat.messages()[1].loading);
    }

    #[test]
    fn correlated_replies_fill_their_own_placeholder() {
        let mut chat = ChatTranscript::new();
        let first = chat.submit("first");
        let second = chat.submit("second");

        chat.receive(reply("answer two", Some(&second)));
        chat.receive(reply("answer one", Some(&first)));

        let contents: Vec<_> = chat.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "answer one", "second", "answer two"]);
        assert!(!chat.is_waiting());
    }

    #[test]
    fn uncorrelated_replies_fill_oldest_placeholder_first() {
        let mut chat = ChatTranscript::new();
        chat.submit("first");
        chat.submit("second");

        chat.receive(reply("A", None));
        assert_eq!(chat.messages()[1].content, "A");
        assert!(chat.messages()[3].loading);
    }

    #[test]
    fn unsolicited_replies_are_appended() {
        let mut chat = ChatTranscript::new();
        assert!(chat.receive(reply("Welcome back", None)));
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::Ai);
        assert!(!chat.messages()[0].loading);
    }

    #[test]
    fn fail_pending_resolves_every_placeholder() {
        let mut chat = ChatTranscript::new();
        chat.submit("one");
        chat.submit("two");
        chat.fail_pending("Connection lost");

        assert!(!chat.is_waiting());
        assert!(chat
            .messages()
            .iter()
            .filter(|m| m.sender == Sender::Ai)
            .all(|m| !m.loading && m.content == "Connection lost"));
    }
}
