//! Shared domain types for the Concierge chat backend
//!
//! Holds the support-desk entities (agents, tickets, chats) and the
//! `HttpError` trait feature crates implement so the server layer can map
//! domain errors to HTTP responses without depending on axum.

#![allow(clippy::must_use_candidate)]

mod agent;
mod chat;
mod error;
mod ticket;

pub use agent::Agent;
pub use chat::{Chat, StoredMessage};
pub use error::HttpError;
pub use ticket::{Ticket, TicketStatus};
