//! Services module
//!
//! Storage-backed services and the admin forwarder

pub mod attachments;
pub mod forwarder;
pub mod submissions;

pub use attachments::AttachmentStore;
pub use forwarder::{AdminForwarder, ForwardSummary};
pub use submissions::SubmissionStore;
