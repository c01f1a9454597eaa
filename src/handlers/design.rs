//! Design flow handlers
//!
//! Entry point and step handlers for the mouthguard design questionnaire.
//! Both flow entry points (menu button and inline callback) go through
//! `start_design_flow` with a `FlowUser`, so there is exactly one place the
//! flow can begin. The step handlers stay thin: all transition logic lives
//! in the state machine, these functions only send prompts and move files.

use std::path::Path;
use std::sync::Arc;
use teloxide::{
    Bot,
    net::Download,
    prelude::*,
    types::{ChatId, InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove, Message},
};
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::models::{CapaType, FlowUser};
use crate::services::{AttachmentStore, SubmissionStore};
use crate::state::{DesignStep, FileSlot, SessionStore, TextOutcome};
use crate::utils::errors::Result;
use crate::utils::logging;

const FILE_EXPECTED_TEXT: &str = "Please attach the file with the additional elements:";

const AGE_HEIGHT_FORMAT_HINT: &str = "Please use the correct format:\n\
                                      Age, Height\n\
                                      For example: 16, 175";

/// Start (or restart) the design questionnaire for a user.
pub async fn start_design_flow(
    bot: Bot,
    user: FlowUser,
    capa_type: CapaType,
    store: SessionStore,
) -> Result<()> {
    store.start(&user, capa_type).await;
    logging::log_user_action(user.user_id, "design_flow_started", Some(capa_type.label()));

    let intro = format!(
        "Great! You chose the {capa_type} mouthguard. Let's build the mock-up.\n\n{}",
        step_prompt(DesignStep::AwaitingMainColor)
    );
    bot.send_message(user.chat_id, intro)
        .reply_markup(KeyboardRemove::new())
        .await?;

    Ok(())
}

/// Handle a text message from a user with an active design session.
pub async fn handle_design_text(
    bot: Bot,
    msg: &Message,
    text: &str,
    store: SessionStore,
    submissions: SubmissionStore,
    settings: Arc<Settings>,
) -> Result<()> {
    let user = FlowUser::from_message(msg)
        .ok_or_else(|| crate::utils::errors::MortalShopError::InvalidInput("No user in message".to_string()))?;
    let chat_id = msg.chat.id;

    let Some(submitted) = store.submit_text(user.user_id, text).await else {
        // Session ended between routing and handling; nothing to do.
        return Ok(());
    };

    match submitted.outcome {
        TextOutcome::Advanced(step) => send_step_prompt(&bot, chat_id, step, &settings).await,
        TextOutcome::InvalidAgeHeight => {
            bot.send_message(chat_id, AGE_HEIGHT_FORMAT_HINT).await?;
            Ok(())
        }
        TextOutcome::FileExpected => {
            bot.send_message(chat_id, FILE_EXPECTED_TEXT).await?;
            Ok(())
        }
        TextOutcome::Completed => {
            match submissions.save(&submitted.session).await {
                Ok(_) => {
                    info!(user_id = user.user_id, "Design flow completed and persisted");
                    send_step_prompt(&bot, chat_id, DesignStep::Completed, &settings).await
                }
                Err(e) => {
                    // The step must not commit without its record: back to
                    // the font question so the user can retry.
                    error!(user_id = user.user_id, error = %e, "Failed to persist submission");
                    store.reopen_font_step(user.user_id).await;
                    bot.send_message(
                        chat_id,
                        "❌ Could not save your answers. Please send your font choice again.",
                    )
                    .await?;
                    Ok(())
                }
            }
        }
    }
}

/// Handle an uploaded photo or document from a user.
pub async fn handle_design_file(
    bot: Bot,
    msg: &Message,
    store: SessionStore,
    attachments: AttachmentStore,
    settings: Arc<Settings>,
) -> Result<()> {
    let Some(user) = FlowUser::from_message(msg) else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    if !store.has_active(user.user_id).await {
        bot.send_message(chat_id, "❌ Start the design process from the menu first")
            .await?;
        return Ok(());
    }

    let Some(slot) = store.expected_file_slot(user.user_id).await else {
        bot.send_message(
            chat_id,
            "❌ Files can't be accepted right now. Keep answering the questions.",
        )
        .await?;
        return Ok(());
    };

    // Photos always land as jpeg; documents carry their own extension.
    let (meta, extension) = if let Some(largest) = msg.photo().and_then(|photos| photos.last()) {
        let meta = bot.get_file(largest.file.id.clone()).await?;
        (meta, Some("jpg".to_string()))
    } else if let Some(doc) = msg.document() {
        let extension = doc
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_string());
        let meta = bot.get_file(doc.file.id.clone()).await?;
        (meta, extension)
    } else {
        return Ok(());
    };

    let mut payload = Vec::new();
    bot.download_file(&meta.path, &mut payload).await?;

    match attachments
        .store(user.user_id, slot, &payload, extension.as_deref())
        .await
    {
        Ok(path) => {
            let reference = format!("file:{}", path.display());
            let Some(next) = store.record_attachment(user.user_id, slot, reference).await else {
                warn!(user_id = user.user_id, "Session no longer expects this file slot");
                return Ok(());
            };

            let confirmation = match slot {
                FileSlot::MainColor => "✅ Base color file saved!",
                FileSlot::Additional => "✅ Additional file saved!",
            };
            bot.send_message(chat_id, confirmation).await?;
            send_step_prompt(&bot, chat_id, next, &settings).await
        }
        Err(e) => {
            error!(user_id = user.user_id, error = %e, "Failed to store attachment");
            bot.send_message(chat_id, "❌ Failed to save the file. Please try sending it again.")
                .await?;
            Ok(())
        }
    }
}

/// Send the entry prompt for a step, with whatever keyboard it needs.
async fn send_step_prompt(
    bot: &Bot,
    chat_id: ChatId,
    step: DesignStep,
    settings: &Settings,
) -> Result<()> {
    match step {
        DesignStep::AwaitingAdditionalElements => {
            let markup = KeyboardMarkup::new(vec![vec![
                KeyboardButton::new("Yes"),
                KeyboardButton::new("No"),
            ]])
            .resize_keyboard();
            bot.send_message(chat_id, step_prompt(step))
                .reply_markup(markup)
                .await?;
        }
        DesignStep::AwaitingAdditionalFile | DesignStep::AwaitingElementsPosition => {
            bot.send_message(chat_id, step_prompt(step))
                .reply_markup(KeyboardRemove::new())
                .await?;
        }
        DesignStep::AwaitingFont => {
            let chart = Path::new(&settings.catalog.font_chart_path);
            if chart.is_file() {
                bot.send_document(chat_id, InputFile::file(chart))
                    .caption(step_prompt(step))
                    .await?;
            } else {
                warn!(path = %chart.display(), "Font chart asset missing, prompting without it");
                bot.send_message(chat_id, step_prompt(step)).await?;
            }
        }
        DesignStep::Completed => {
            let markup = KeyboardMarkup::new(vec![vec![
                KeyboardButton::new("/send_to_admin"),
                KeyboardButton::new("/start"),
            ]])
            .resize_keyboard();
            bot.send_message(chat_id, step_prompt(step))
                .reply_markup(markup)
                .await?;
        }
        _ => {
            bot.send_message(chat_id, step_prompt(step)).await?;
        }
    }

    Ok(())
}

/// Entry prompt for each questionnaire step.
fn step_prompt(step: DesignStep) -> &'static str {
    match step {
        DesignStep::AwaitingMainColor => {
            "1. Name the base color of the mouthguard or attach a good-quality \
             photo/image for the background (not a screenshot).\n\n\
             Type a color name or send an image:"
        }
        DesignStep::AwaitingTextColor => {
            "2. What color should the inscription be?\n\nName the text color:"
        }
        DesignStep::AwaitingText => {
            "3. Write the text to print.\n\n\
             Type it exactly as it should appear (for example, \"IVANOV\", \
             \"Winner\" or \"champion\"):"
        }
        DesignStep::AwaitingAdditionalElements => {
            "4. Are any additional elements planned (logo, picture, photo)?\n\n\
             If yes, please attach a good-quality file (not a screenshot).\n\
             Choose <Yes> or <No> first"
        }
        DesignStep::AwaitingAdditionalFile => FILE_EXPECTED_TEXT,
        DesignStep::AwaitingElementsPosition => {
            "5. Describe where every element goes on the mouthguard.\n\n\
             Where exactly should the inscription, logo and the other details sit?"
        }
        DesignStep::AwaitingAgeHeight => {
            "6. Please confirm:\n\
             • your age\n\
             • your height\n\n\
             Use the format: Age, Height\n\
             For example: 16, 175"
        }
        DesignStep::AwaitingFont => "7. Choose a font:",
        DesignStep::Completed => {
            "✅ All answers saved to your personal file!\n\n\
             Use the commands:\n\
             /send_to_admin — send the request to the administrator\n\
             /start — back to the main menu"
        }
    }
}
