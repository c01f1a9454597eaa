//! Message handlers module
//!
//! Routes every inbound non-command message: users with an active design
//! session go to the state machine, everyone else gets menu handling.
//! Uploaded files are routed by the session's current step.

use std::sync::Arc;
use teloxide::{Bot, prelude::*, types::Message};
use tracing::debug;

use crate::config::Settings;
use crate::handlers::{catalog, design};
use crate::models::FlowUser;
use crate::services::{AttachmentStore, SubmissionStore};
use crate::state::SessionStore;
use crate::utils::errors::Result;

/// Handle incoming messages (text and media)
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    store: SessionStore,
    attachments: AttachmentStore,
    submissions: SubmissionStore,
    settings: Arc<Settings>,
) -> Result<()> {
    let Some(user) = FlowUser::from_message(&msg) else {
        return Ok(());
    };

    // The order flow only runs in private chats.
    if !msg.chat.id.is_user() {
        return Ok(());
    }

    debug!(user_id = user.user_id, "Processing message");

    if msg.photo().is_some() || msg.document().is_some() {
        return design::handle_design_file(bot, &msg, store, attachments, settings).await;
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    if store.has_active(user.user_id).await {
        return design::handle_design_text(bot, &msg, text, store, submissions, settings).await;
    }

    catalog::handle_menu_selection(bot, &msg, text, settings).await
}
