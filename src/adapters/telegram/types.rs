//! Telegram Bot API wire types

use serde::{Deserialize, Serialize};

use crate::domain::NotificationMessage;

/// `sendMessage` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(default)]
    pub disable_web_page_preview: bool,
}

impl From<&NotificationMessage> for SendMessageRequest {
    fn from(message: &NotificationMessage) -> Self {
        Self {
            chat_id: message.chat_id.clone(),
            text: message.text.clone(),
            parse_mode: message.parse_mode.as_api_value().map(str::to_string),
            disable_web_page_preview: true,
        }
    }
}

/// Envelope returned by every Bot API method
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}
