//! Remote prediction service access for Parley.
//!
//! [`ReqwestTransport`] is the production [`TransportClient`]. The
//! [`replicate`] module speaks the job-based completion protocol on top of
//! any transport: [`JobSubmitter`] creates a job, [`JobPoller`] waits for it.
//!
//! [`TransportClient`]: parley_core::transport::TransportClient

pub mod http_transport;
pub mod presets;
pub mod replicate;

pub use http_transport::ReqwestTransport;
pub use replicate::{JobPoller, JobSubmitter, PollHandle, PollOutcome, concatenate_fragments};
