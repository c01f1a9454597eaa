//! MortalShop Telegram Bot
//!
//! Order-intake bot for the MORTAL mouthguard shop. This library provides
//! the catalog menu, the per-user design questionnaire state machine,
//! submission persistence with file attachments, and forwarding of
//! completed submissions to the shop administrator.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{MortalShopError, Result};

// Re-export main components for easy access
pub use models::{CapaType, FlowUser, Submission};
pub use services::{AdminForwarder, AttachmentStore, SubmissionStore};
pub use state::{DesignSession, DesignStep, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
