//! Conversation state management
//!
//! The design-flow state machine and the store that owns per-user sessions.

pub mod session;
pub mod store;

pub use session::{DesignSession, DesignStep, FileSlot, TextOutcome};
pub use store::{SessionStore, SubmittedText};
