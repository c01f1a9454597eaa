//! Catalog handlers
//!
//! Static menu sections: prices, the custom/wholesale offers and the merch
//! media groups. Everything here is plain send-glue around asset files and
//! fixed texts; the design flow only touches this module through the two
//! "Develop a design" callback buttons.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use teloxide::{
    Bot,
    prelude::*,
    types::{
        ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia,
        InputMediaPhoto, KeyboardButton, KeyboardMarkup, Message, ParseMode,
    },
};
use tracing::warn;

use crate::config::Settings;
use crate::utils::errors::{MortalShopError, Result};

pub const MENU_POPULAR: &str = "Best-selling standard designs";
pub const MENU_SINGLE_LAYER: &str = "Standard single-layer";
pub const MENU_DOUBLE_LAYER: &str = "Standard double-layer";
pub const MENU_CUSTOM: &str = "Custom-fit mouthguard";
pub const MENU_WHOLESALE: &str = "Wholesale order";
pub const MENU_MERCH: &str = "Merch";

// A media group tops out at ten entries.
const MEDIA_GROUP_LIMIT: usize = 10;

/// Main menu reply keyboard, two buttons per row
pub fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(MENU_POPULAR),
            KeyboardButton::new(MENU_SINGLE_LAYER),
        ],
        vec![
            KeyboardButton::new(MENU_DOUBLE_LAYER),
            KeyboardButton::new(MENU_CUSTOM),
        ],
        vec![
            KeyboardButton::new(MENU_WHOLESALE),
            KeyboardButton::new(MENU_MERCH),
        ],
    ])
    .resize_keyboard()
}

/// Route a menu button press to its catalog section.
/// Free text that matches no button is ignored and the menu stays up.
pub async fn handle_menu_selection(
    bot: Bot,
    msg: &Message,
    text: &str,
    settings: Arc<Settings>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    match text {
        MENU_POPULAR => send_popular_designs(&bot, chat_id, &settings).await,
        MENU_SINGLE_LAYER => send_single_layer(&bot, chat_id, &settings).await,
        MENU_DOUBLE_LAYER => send_double_layer(&bot, chat_id, &settings).await,
        MENU_CUSTOM => send_custom_mouthguard(&bot, chat_id, &settings).await,
        MENU_WHOLESALE => send_wholesale(&bot, chat_id, &settings).await,
        MENU_MERCH => send_merch(&bot, chat_id, &settings).await,
        _ => Ok(()),
    }
}

async fn send_popular_designs(bot: &Bot, chat_id: ChatId, settings: &Settings) -> Result<()> {
    let markup = order_keyboard(&settings.catalog.contact_url)?;
    let caption = "<b>Ready-made design mouthguard: 2,500 ₽</b>\n\n\
                   To order, message the shop manager";

    let lookbook = Path::new(&settings.catalog.lookbook_path);
    if lookbook.is_file() {
        bot.send_document(chat_id, InputFile::file(lookbook))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .reply_markup(markup)
            .await?;
    } else {
        warn!(path = %lookbook.display(), "Lookbook asset missing, sending text only");
        bot.send_message(chat_id, caption)
            .parse_mode(ParseMode::Html)
            .reply_markup(markup)
            .await?;
    }

    Ok(())
}

async fn send_single_layer(bot: &Bot, chat_id: ChatId, settings: &Settings) -> Result<()> {
    let markup = design_offer_keyboard(&settings.catalog.contact_url, "design_single_layer")?;
    let text = "<b>· Single-layer mouthguard — 2,500 ₽</b>\n\
                <b>· Mock-up design — free!</b>\n\n\
                Choose an action:";

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;

    Ok(())
}

async fn send_double_layer(bot: &Bot, chat_id: ChatId, settings: &Settings) -> Result<()> {
    let markup = design_offer_keyboard(&settings.catalog.contact_url, "design_double_layer")?;
    let text = "<b>· Double-layer mouthguard — 3,000 ₽</b>\n\
                <b>· Mock-up design — free!</b>\n\n\
                Choose an action:";

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;

    Ok(())
}

async fn send_custom_mouthguard(bot: &Bot, chat_id: ChatId, settings: &Settings) -> Result<()> {
    let markup = order_keyboard(&settings.catalog.contact_url)?;
    let text = "<b>Custom-fit mouthguard prices:</b>\n\n\
                1. CLEAR CUSTOM MOUTHGUARD — 9,000 ₽\n\
                2. COLORED CUSTOM MOUTHGUARD — 10,000 ₽\n\
                3. CUSTOM MOUTHGUARD WITH TEXT OR LOGO — 11,000 ₽\n\
                4. COLORED CUSTOM MOUTHGUARD WITH PERSONAL DESIGN — 12,000 ₽\n\
                5. CUSTOM HOCKEY MOUTHGUARD — 13,000 ₽\n\n\
                Ordering forwards you to the shop manager";

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;

    Ok(())
}

async fn send_wholesale(bot: &Bot, chat_id: ChatId, settings: &Settings) -> Result<()> {
    let markup = order_keyboard(&settings.catalog.contact_url)?;
    let text = "<b>Wholesale prices, single-layer, turnkey:</b>\n\n\
                10–19 pcs — 1,000 ₽/pc\n\
                20–99 pcs — 900 ₽/pc\n\
                100–499 pcs — 800 ₽/pc\n\
                500+ pcs — 700 ₽/pc\n\n\
                Branded case packaging and sticker design — 3,000 ₽ one-off; \
                without branding we ship the basic case.\n\n\
                Ordering forwards you to the shop manager";

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;

    Ok(())
}

async fn send_merch(bot: &Bot, chat_id: ChatId, settings: &Settings) -> Result<()> {
    send_photo_group(
        bot,
        chat_id,
        Path::new(&settings.catalog.tank_top_dir),
        "<b>«ME vs ME» tank tops</b>\n\nBlue, red and black — 3,000 ₽",
    )
    .await?;

    send_photo_group(
        bot,
        chat_id,
        Path::new(&settings.catalog.tshirt_dir),
        "<b>MORTAL t-shirts</b>\n\n«FRIENDS OR MONEY», «YOUR GRANDMOTHER» and more — from 3,500 ₽",
    )
    .await?;

    let markup = order_keyboard(&settings.catalog.contact_url)?;
    let text = "<b>Merch assortment:</b>\n\n\
                <b>«ME vs ME» tank tops</b>\n\
                • Blue — 3,000 ₽\n\
                • Red — 3,000 ₽\n\
                • Black — 3,000 ₽\n\n\
                <b>T-shirts:</b>\n\
                • «FRIENDS OR MONEY» — 3,500 ₽\n\
                • «YOUR GRANDMOTHER» — 3,500 ₽\n\
                • «CHIKO» — 4,500 ₽\n\
                • «NO BOXING» — 4,500 ₽\n\
                • «BABY» — 4,500 ₽\n\n\
                Ordering forwards you to the shop manager";

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;

    Ok(())
}

/// Send one photo media group assembled from a directory, captioning the
/// first photo. Falls back to individual sends if the group is refused,
/// and to a notice when no photos are available at all.
async fn send_photo_group(bot: &Bot, chat_id: ChatId, dir: &Path, caption: &str) -> Result<()> {
    let mut paths: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Merch photo directory unavailable");
            Vec::new()
        }
    };
    paths.sort();
    paths.truncate(MEDIA_GROUP_LIMIT);

    if paths.is_empty() {
        bot.send_message(chat_id, "Merch photos are temporarily unavailable")
            .await?;
        return Ok(());
    }

    let media: Vec<InputMedia> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let photo = InputMediaPhoto::new(InputFile::file(path));
            let photo = if i == 0 {
                photo.caption(caption).parse_mode(ParseMode::Html)
            } else {
                photo
            };
            InputMedia::Photo(photo)
        })
        .collect();

    if let Err(e) = bot.send_media_group(chat_id, media).await {
        warn!(error = %e, "Media group send failed, falling back to individual photos");
        for path in &paths {
            if let Err(e) = bot.send_photo(chat_id, InputFile::file(path)).await {
                warn!(path = %path.display(), error = %e, "Failed to send merch photo");
            }
        }
    }

    Ok(())
}

fn order_keyboard(contact_url: &str) -> Result<InlineKeyboardMarkup> {
    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url("Order", parse_contact_url(contact_url)?),
    ]]))
}

fn design_offer_keyboard(contact_url: &str, callback_data: &str) -> Result<InlineKeyboardMarkup> {
    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Develop a design", callback_data),
        InlineKeyboardButton::url("Order", parse_contact_url(contact_url)?),
    ]]))
}

fn parse_contact_url(contact_url: &str) -> Result<url::Url> {
    url::Url::parse(contact_url)
        .map_err(|e| MortalShopError::Config(format!("Invalid shop contact URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_url_must_parse() {
        assert!(parse_contact_url("https://t.me/mortal_shop_team").is_ok());
        assert!(parse_contact_url("not a url").is_err());
    }
}
