//! Shared types for the spacedash client: wire models, WebSocket envelopes,
//! grading and the error taxonomy.

pub mod error;
pub mod grading;
pub mod models;
pub mod protocol;

pub use error::*;
pub use grading::*;
pub use models::*;
pub use protocol::*;
