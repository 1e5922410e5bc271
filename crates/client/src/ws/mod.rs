//! WebSocket clients for the AI services.
//!
//! One parameterized [`WsClient`] does the work; the assistant, course-creator
//! and Q&A endpoints are configurations of it:
//!
//! ```text
//!   WsConfig { url, auth_param, connect_timeout, reconnect }
//!                         │
//!                         ▼
//!                     WsClient ──► Handlers (open / message / error / close / state)
//!                         │
//!          ┌──────────────┼──────────────┐
//!          ▼              ▼              ▼
//!   AssistantClient  CourseCreator   QaClient
//!   (token=)         (Authorization=  (token=)
//!                     Bearer, retry)
//! ```
//!
//! Components own their clients through [`use_ws_client`] and read replies from
//! their own signals (chat transcript, quiz phase).

mod connection;
mod hooks;
pub mod variants;

pub use connection::{
    AuthParam, CloseInfo, ConnectionState, Handlers, ReconnectPolicy, WsClient, WsConfig,
    DEFAULT_CONNECT_TIMEOUT,
};

pub use hooks::{use_event_bridge, use_ws_client, HasSocket};

pub use variants::{
    assistant_config, course_creator_config, qa_config, AssistantClient, CourseCreatorClient,
    QaClient,
};
