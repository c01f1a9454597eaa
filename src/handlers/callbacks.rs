//! Callback query handlers module
//!
//! Inline keyboard callbacks. Both design buttons collapse the query into a
//! `FlowUser` and enter the questionnaire through the single flow entry
//! point.

use teloxide::{Bot, prelude::*, types::CallbackQuery};
use tracing::{debug, warn};

use crate::handlers::design;
use crate::models::{CapaType, FlowUser};
use crate::state::SessionStore;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    store: SessionStore,
) -> Result<()> {
    let user = FlowUser::from_callback(&query);

    let Some(data) = query.data.clone() else {
        return Ok(());
    };

    debug!(user_id = user.user_id, callback_data = %data, "Processing callback query");

    // Answer first so the button stops showing its loading state.
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    match data.as_str() {
        "design_single_layer" => {
            design::start_design_flow(bot, user, CapaType::SingleLayer, store).await
        }
        "design_double_layer" => {
            design::start_design_flow(bot, user, CapaType::DoubleLayer, store).await
        }
        _ => {
            warn!(callback_data = %data, "Unknown callback data");
            Ok(())
        }
    }
}
