//! Conversation orchestration: transcript assembly, bounded tool-calling
//! rounds, and reply persistence

mod broker;
mod engine;
mod error;

pub use broker::ToolBroker;
pub use engine::{ChatEngine, MAX_TOOL_ROUNDS};
pub use error::ChatError;
