//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for text and media messages
//! - The design questionnaire flow and the static catalog sections

pub mod callbacks;
pub mod catalog;
pub mod commands;
pub mod design;
pub mod messages;

pub use callbacks::handle_callback_query;
pub use commands::{handle_send_to_admin, handle_start};
pub use messages::handle_message;
