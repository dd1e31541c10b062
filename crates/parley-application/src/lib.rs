//! Application layer for Parley.
//!
//! Use cases that drive a conversation against the prediction service and
//! browse what has been said before.

pub mod chat_service;
pub mod history_service;
pub mod orchestrator;

pub use chat_service::{ChatService, ChatTurn};
pub use history_service::HistoryService;
pub use orchestrator::{AskOutcome, RequestOrchestrator};
