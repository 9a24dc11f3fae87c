//! Event Source Port
//!
//! Normalizes an upstream delivery mechanism into a stream of raw
//! transaction records pushed into the pipeline channel.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::RawTransaction;

#[derive(Debug, Error)]
pub enum EventSourceError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("Subscription rejected: {0}")]
    SubscriptionRejected(String),
}

/// An upstream feed of candidate transactions.
///
/// `run` drives the source until the upstream ends or fails. There is no
/// reconnect: the caller decides what to do with the returned error.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &str;

    async fn run(&self, sink: mpsc::Sender<RawTransaction>) -> Result<(), EventSourceError>;
}
