//! Domain layer for Parley.
//!
//! Holds the pieces with no I/O of their own: the error taxonomy, the
//! configuration model, the session message log, history records and their
//! day/thread aggregation, and the transport and repository traits the outer
//! layers implement.

pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod transport;

// Re-export common error type
pub use error::ParleyError;
