//! Notifier Port
//!
//! Delivers one formatted message to one destination channel.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::NotificationMessage;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Messaging API rejected message ({status}): {description}")]
    Rejected { status: u16, description: String },

    #[error("Notifier misconfigured: {0}")]
    Config(String),
}

/// Fire-and-forget message delivery.
///
/// One attempt per call; callers log failures and move on.
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}
