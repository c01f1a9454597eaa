//! Start command handler
//!
//! Shows the main menu and returns the user to non-flow mode.

use teloxide::{Bot, prelude::*, types::Message};
use tracing::debug;

use crate::handlers::catalog;
use crate::models::FlowUser;
use crate::state::SessionStore;
use crate::utils::errors::Result;

const WELCOME_TEXT: &str = "Hello! 👋 Welcome to MORTAL — standard and custom \
                            mouthguards with your personal design!";

/// Handle /start: drop any in-progress design session and show the menu.
pub async fn handle_start(bot: Bot, msg: Message, store: SessionStore) -> Result<()> {
    let user = FlowUser::from_message(&msg).ok_or_else(|| {
        crate::utils::errors::MortalShopError::InvalidInput("No user in message".to_string())
    })?;

    debug!(user_id = user.user_id, "Processing /start command");

    // /start always resets to menu mode; a half-finished questionnaire is
    // abandoned, the persisted submission (if any) is untouched.
    store.clear(user.user_id).await;

    bot.send_message(msg.chat.id, WELCOME_TEXT)
        .reply_markup(catalog::main_menu_keyboard())
        .await?;

    Ok(())
}
