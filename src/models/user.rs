//! Flow user value object
//!
//! Both flow entry points (menu button press and inline callback) reduce the
//! incoming update to this one struct before handing it to the design flow,
//! so downstream code never touches raw update types.

use teloxide::types::{CallbackQuery, ChatId, Message};

/// Identity of the user driving a design flow
#[derive(Debug, Clone)]
pub struct FlowUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub chat_id: ChatId,
}

impl FlowUser {
    pub fn from_message(msg: &Message) -> Option<Self> {
        let user = msg.from.as_ref()?;
        Some(Self {
            user_id: user.id.0 as i64,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
            chat_id: msg.chat.id,
        })
    }

    pub fn from_callback(query: &CallbackQuery) -> Self {
        let user_id = query.from.id.0 as i64;
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat().id)
            .unwrap_or(ChatId(user_id));

        Self {
            user_id,
            username: query.from.username.clone(),
            first_name: Some(query.from.first_name.clone()),
            chat_id,
        }
    }
}
