//! Ticket classification and agent routing
//!
//! Turns a user message into a support category via a cheap LLM call,
//! then assigns the chat's ticket to the first agent that covers the
//! category.

mod classifier;
mod desk;
mod error;

pub use desk::SupportDesk;
pub use error::SupportError;
