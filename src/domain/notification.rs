//! Notification Message
//!
//! Formats a burn event into the text sent to the messaging channel.

use serde::{Deserialize, Serialize};

use super::burn_event::BurnEvent;

/// Label used when no display name could be resolved
pub const UNKNOWN_TOKEN: &str = "Unknown token";

/// Rich-text mode understood by the messaging platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    #[default]
    Html,
    Plain,
}

impl ParseMode {
    /// Value for the `parse_mode` request field (`None` = plain text)
    pub fn as_api_value(&self) -> Option<&'static str> {
        match self {
            ParseMode::Html => Some("HTML"),
            ParseMode::Plain => None,
        }
    }
}

/// A formatted message plus its delivery target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: ParseMode,
}

impl NotificationMessage {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>, parse_mode: ParseMode) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode,
        }
    }

    /// Build the burn alert for an event and its (optional) resolved name
    pub fn burn_alert(
        event: &BurnEvent,
        token_name: Option<&str>,
        chat_id: &str,
        explorer_tx_url: &str,
        parse_mode: ParseMode,
    ) -> Self {
        let name = token_name.unwrap_or(UNKNOWN_TOKEN);
        let tx_url = format!("{}{}", explorer_tx_url, event.signature());
        let amount = event.amount().to_string();

        let text = match parse_mode {
            ParseMode::Html => format!(
                "🔥 <b>LP Burn Detected</b>\n\n\
                 <b>Token:</b> {}\n\
                 <b>Mint:</b> <code>{}</code>\n\
                 <b>Amount:</b> {}\n\
                 <b>Transaction:</b> <a href=\"{}\">{}</a>",
                escape_html(name),
                escape_html(event.mint_address()),
                escape_html(&amount),
                escape_html(&tx_url),
                short_signature(event.signature()),
            ),
            ParseMode::Plain => format!(
                "LP Burn Detected\n\n\
                 Token: {}\n\
                 Mint: {}\n\
                 Amount: {}\n\
                 Transaction: {}",
                name,
                event.mint_address(),
                amount,
                tx_url,
            ),
        };

        Self::new(chat_id, text, parse_mode)
    }
}

/// Escape text for the platform's HTML parse mode
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// First and last 6 characters of a signature for link text
fn short_signature(signature: &str) -> String {
    if signature.len() <= 16 || !signature.is_ascii() {
        return escape_html(signature);
    }
    format!(
        "{}…{}",
        &signature[..6],
        &signature[signature.len() - 6..]
    )
}
