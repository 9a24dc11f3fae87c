//! Telegram Adapter
//!
//! `NotifierPort` implementation backed by the Telegram Bot API.

mod client;
mod types;

pub use client::{TelegramConfig, TelegramNotifier, TELEGRAM_API_URL};
pub use types::{SendMessageRequest, TelegramResponse};
