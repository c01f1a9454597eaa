//! Send-to-admin command handler
//!
//! Triggers the admin forwarder for the invoking user and reports the
//! outcome back to them.

use teloxide::{Bot, prelude::*, types::Message};
use tracing::{error, info};

use crate::models::FlowUser;
use crate::services::AdminForwarder;
use crate::utils::errors::{MortalShopError, Result};

/// Handle /send_to_admin: relay the saved submission and confirm.
pub async fn handle_send_to_admin(
    bot: Bot,
    msg: Message,
    forwarder: AdminForwarder,
) -> Result<()> {
    let user = FlowUser::from_message(&msg).ok_or_else(|| {
        crate::utils::errors::MortalShopError::InvalidInput("No user in message".to_string())
    })?;
    let chat_id = msg.chat.id;

    match forwarder.forward(user.user_id).await {
        Ok(summary) => {
            info!(user_id = user.user_id, files_sent = summary.files_sent, "Submission forwarded to admin");
            bot.send_message(
                chat_id,
                "✅ Your request has been sent to the administrator!\n\n\
                 We will contact you shortly.",
            )
            .await?;
        }
        Err(e) => {
            match &e {
                MortalShopError::SubmissionNotFound { .. } => {
                    info!(user_id = user.user_id, "Forward requested without a saved submission");
                }
                _ => {
                    error!(user_id = user.user_id, error = %e, "Forwarding failed");
                }
            }
            bot.send_message(chat_id, e.user_message()).await?;
        }
    }

    Ok(())
}
