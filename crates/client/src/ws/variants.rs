//! The three service endpoints, each a configured [`WsClient`] with typed
//! send helpers and decoded event handlers.

use std::sync::Arc;

use spacedash_shared::{
    AssistantEvent, AssistantRequest, CoursePromptRequest, QaCommand, QaEvent, WsError,
};

use super::connection::{AuthParam, ReconnectPolicy, WsClient, WsConfig};
use crate::api_client::TokenSource;
use crate::config::WebSocketUrls;

pub fn assistant_config(urls: &WebSocketUrls) -> WsConfig {
    WsConfig::new("assistant", urls.assistant.clone(), AuthParam::Token)
}

/// The only endpoint that reconnects on its own.
pub fn course_creator_config(urls: &WebSocketUrls) -> WsConfig {
    WsConfig::new(
        "course-creator",
        urls.course_creator.clone(),
        AuthParam::AuthorizationBearer,
    )
    .with_reconnect(ReconnectPolicy::default())
}

pub fn qa_config(urls: &WebSocketUrls) -> WsConfig {
    WsConfig::new("qa", urls.qa.clone(), AuthParam::Token)
}

/// Decode an assistant payload, logging and dropping anything malformed.
fn decode_assistant(name: &str, raw: &str) -> Option<AssistantEvent> {
    match AssistantEvent::parse(raw) {
        Ok(event) => Some(event),
        Err(e) => {
            crate::log_warn!("Dropping malformed {} payload: {}", name, e);
            None
        }
    }
}

/// General chat assistant.
#[derive(Clone)]
pub struct AssistantClient {
    ws: WsClient,
}

impl AssistantClient {
    pub fn new(config: WsConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            ws: WsClient::new(config, tokens),
        }
    }

    pub fn ws(&self) -> &WsClient {
        &self.ws
    }

    pub fn ask(
        &self,
        query: impl Into<String>,
        space_id: impl Into<String>,
        file_name: Option<String>,
        correlation_id: Option<String>,
    ) -> Result<(), WsError> {
        self.ws.send_json(&AssistantRequest {
            query: query.into(),
            space_id: space_id.into(),
            file_name,
            correlation_id,
        })
    }

    pub fn on_event(&self, f: impl Fn(AssistantEvent) + Send + Sync + 'static) {
        self.ws.handlers().on_message(move |raw| {
            if let Some(event) = decode_assistant("assistant", &raw) {
                f(event);
            }
        });
    }
}

/// Course creator. Replies use the assistant payload shape.
#[derive(Clone)]
pub struct CourseCreatorClient {
    ws: WsClient,
}

impl CourseCreatorClient {
    pub fn new(config: WsConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            ws: WsClient::new(config, tokens),
        }
    }

    pub fn ws(&self) -> &WsClient {
        &self.ws
    }

    pub fn prompt(
        &self,
        user_prompt: impl Into<String>,
        space_id: impl Into<String>,
        correlation_id: Option<String>,
    ) -> Result<(), WsError> {
        self.ws.send_json(&CoursePromptRequest {
            user_prompt: user_prompt.into(),
            space_id: space_id.into(),
            correlation_id,
        })
    }

    pub fn on_event(&self, f: impl Fn(AssistantEvent) + Send + Sync + 'static) {
        self.ws.handlers().on_message(move |raw| {
            if let Some(event) = decode_assistant("course-creator", &raw) {
                f(event);
            }
        });
    }
}

/// Quiz-style Q&A.
#[derive(Clone)]
pub struct QaClient {
    ws: WsClient,
}

impl QaClient {
    pub fn new(config: WsConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            ws: WsClient::new(config, tokens),
        }
    }

    pub fn ws(&self) -> &WsClient {
        &self.ws
    }

    pub fn send(&self, command: &QaCommand) -> Result<(), WsError> {
        self.ws.send_json(command)
    }

    pub fn on_event(&self, f: impl Fn(QaEvent) + Send + Sync + 'static) {
        self.ws.handlers().on_message(move |raw| {
            match serde_json::from_str::<QaEvent>(&raw) {
                Ok(event) => f(event),
                Err(e) => crate::log_warn!("Dropping malformed qa payload: {}", e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> WebSocketUrls {
        WebSocketUrls {
            assistant: "wss://ws.example.com/assistant".to_string(),
            course_creator: "wss://ws.example.com/courses".to_string(),
            qa: "wss://ws.example.com/qa".to_string(),
        }
    }

    #[test]
    fn only_the_course_creator_reconnects() {
        let urls = urls();
        assert_eq!(assistant_config(&urls).reconnect, None);
        assert_eq!(qa_config(&urls).reconnect, None);
        assert_eq!(
            course_creator_config(&urls).reconnect,
            Some(ReconnectPolicy::default())
        );
    }

    #[test]
    fn variants_differ_in_auth_parameter() {
        let urls = urls();
        assert_eq!(assistant_config(&urls).auth_param, AuthParam::Token);
        assert_eq!(qa_config(&urls).auth_param, AuthParam::Token);
        assert_eq!(
            course_creator_config(&urls).auth_param,
            AuthParam::AuthorizationBearer
        );
        assert_eq!(
            assistant_config(&urls).connect_timeout,
            std::time::Duration::from_secs(10)
        );
    }
}
