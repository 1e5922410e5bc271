//! UI primitives

pub mod button;
pub mod empty_state;

pub use button::*;
pub use empty_state::*;
