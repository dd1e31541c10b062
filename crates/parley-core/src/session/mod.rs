//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Message types (`MessageRole`, `Message`)
//! - `thread`: Conversation thread identifiers (`ThreadId`)
//! - `event`: Mutation events published to subscribers (`SessionEvent`)
//! - `state`: The in-memory message log (`SessionState`)

mod event;
mod message;
mod state;
mod thread;

// Re-export public API
pub use event::SessionEvent;
pub use message::{Message, MessageRole};
pub use state::SessionState;
pub use thread::ThreadId;
