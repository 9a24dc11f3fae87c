//! RPC Stream Monitor
//!
//! Subscription-socket event source. Opens one WebSocket connection, sends a
//! single subscription request, and forwards every notification's result
//! payload as a `RawTransaction`.
//!
//! Lifecycle: open -> subscribed -> receiving. There is no reconnect; when
//! the socket errors or closes, `run` returns and the caller logs it.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::types::{
    normalize_transaction_result, subscribe_request, LogsResult, RpcMessage, SubscriptionKind,
};
use crate::domain::{BurnSentinelSet, RawTransaction};
use crate::ports::{EventSource, EventSourceError};

/// Default commitment level for subscriptions
pub const DEFAULT_COMMITMENT: &str = "confirmed";
/// Maximum frame size in bytes (prevent memory exhaustion)
const MAX_MESSAGE_SIZE: usize = 4 * 1_048_576;
/// Request id of the subscription call
const SUBSCRIBE_REQUEST_ID: u64 = 1;

/// Errors raised while handling a single frame
#[derive(Debug, Error)]
pub enum RpcStreamError {
    #[error("Failed to parse message: {0}")]
    ParseError(String),

    #[error("Invalid message format: {0}")]
    InvalidMessageFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Subscription rejected: {0}")]
    SubscriptionRejected(String),
}

/// Configuration for RpcStreamMonitor
#[derive(Debug, Clone)]
pub struct RpcStreamConfig {
    /// WebSocket URL (may carry an api-key query parameter)
    pub ws_url: String,
    /// Subscription method and filter
    pub kind: SubscriptionKind,
    /// Commitment level: "processed", "confirmed", "finalized"
    pub commitment: String,
    /// Maximum frame size in bytes
    pub max_message_size: usize,
}

impl Default for RpcStreamConfig {
    fn default() -> Self {
        Self {
            ws_url: "wss://atlas-mainnet.helius-rpc.com".to_string(),
            kind: SubscriptionKind::Transactions,
            commitment: DEFAULT_COMMITMENT.to_string(),
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

/// Subscription-socket source feeding the burn pipeline
pub struct RpcStreamMonitor {
    config: RpcStreamConfig,
    sentinels: Arc<BurnSentinelSet>,
}

impl RpcStreamMonitor {
    pub fn new(config: RpcStreamConfig, sentinels: Arc<BurnSentinelSet>) -> Self {
        Self { config, sentinels }
    }

    pub fn config(&self) -> &RpcStreamConfig {
        &self.config
    }

    /// The request sent once the socket is open
    pub fn subscription_request(&self) -> serde_json::Value {
        subscribe_request(
            SUBSCRIBE_REQUEST_ID,
            &self.config.kind,
            &self.sentinels,
            &self.config.commitment,
        )
    }

    /// Turn one text frame into a candidate record.
    ///
    /// Acks and unrelated notifications yield `Ok(None)`.
    pub fn process_message(&self, raw_message: &str) -> Result<Option<RawTransaction>, RpcStreamError> {
        if raw_message.len() > self.config.max_message_size {
            return Err(RpcStreamError::InvalidMessageFormat(format!(
                "Message too large: {} bytes",
                raw_message.len()
            )));
        }

        let trimmed = raw_message.trim();
        if trimmed.is_empty() {
            debug!("Ignoring empty message");
            return Ok(None);
        }

        let message: RpcMessage = serde_json::from_str(trimmed).map_err(|e| {
            RpcStreamError::ParseError(format!(
                "JSON parse error at line {}, column {}: {:?}",
                e.line(),
                e.column(),
                e.classify()
            ))
        })?;

        if let Some(error) = message.error {
            return Err(RpcStreamError::SubscriptionRejected(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }

        let Some(method) = message.method else {
            if let Some(subscription) = message.result {
                info!(%subscription, "Subscription confirmed");
            }
            return Ok(None);
        };

        let params = message
            .params
            .ok_or_else(|| RpcStreamError::MissingField("params".into()))?;

        match method.as_str() {
            "transactionNotification" => {
                let result = normalize_transaction_result(params.result);
                serde_json::from_value::<RawTransaction>(result)
                    .map(Some)
                    .map_err(|e| RpcStreamError::ParseError(e.to_string()))
            }
            "logsNotification" => {
                let logs: LogsResult = serde_json::from_value(params.result)
                    .map_err(|e| RpcStreamError::ParseError(e.to_string()))?;
                let mut tx = RawTransaction::from_logs(
                    logs.value.signature,
                    logs.value.logs.unwrap_or_default(),
                );
                tx.meta.err = logs.value.err.filter(|err| !err.is_null());
                Ok(Some(tx))
            }
            other => {
                debug!(method = other, "Ignoring notification");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl EventSource for RpcStreamMonitor {
    fn name(&self) -> &str {
        self.config.kind.method()
    }

    async fn run(&self, sink: mpsc::Sender<RawTransaction>) -> Result<(), EventSourceError> {
        info!(url = %redact_url(&self.config.ws_url), "Connecting to RPC stream");

        let (ws_stream, _) = connect_async(self.config.ws_url.as_str())
            .await
            .map_err(|e| EventSourceError::ConnectionFailed(e.to_string()))?;
        let (mut write, mut read) = ws_stream.split();

        let request = self.subscription_request();
        write
            .send(Message::Text(request.to_string()))
            .await
            .map_err(|e| EventSourceError::Transport(e.to_string()))?;
        info!(
            method = self.config.kind.method(),
            commitment = %self.config.commitment,
            "Subscription request sent"
        );

        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => match self.process_message(&text) {
                    Ok(Some(tx)) => {
                        if sink.send(tx).await.is_err() {
                            info!("Pipeline channel closed, leaving stream");
                            return Ok(());
                        }
                    }
                    Ok(None) => {}
                    Err(RpcStreamError::SubscriptionRejected(reason)) => {
                        return Err(EventSourceError::SubscriptionRejected(reason));
                    }
                    Err(e) => warn!("Skipping frame: {}", e),
                },
                Ok(Message::Ping(data)) => {
                    write
                        .send(Message::Pong(data))
                        .await
                        .map_err(|e| EventSourceError::Transport(e.to_string()))?;
                }
                Ok(Message::Close(frame)) => {
                    warn!(?frame, "RPC stream closed by server");
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => return Err(EventSourceError::Transport(e.to_string())),
            }
        }

        warn!("RPC stream ended");
        Ok(())
    }
}

/// Hide the api-key query value in logged URLs
pub fn redact_url(url: &str) -> String {
    match url.find("api-key=") {
        Some(at) => {
            let start = at + "api-key=".len();
            let end = url[start..].find('&').map(|i| start + i).unwrap_or(url.len());
            format!("{}***{}", &url[..start], &url[end..])
        }
        None => url.to_string(),
    }
}

/// Builder for RpcStreamMonitor configuration
#[derive(Debug, Default)]
pub struct RpcStreamBuilder {
    config: RpcStreamConfig,
}

impl RpcStreamBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set WebSocket URL
    pub fn ws_url(mut self, url: impl Into<String>) -> Self {
        self.config.ws_url = url.into();
        self
    }

    /// Subscribe to sentinel-touching transactions
    pub fn transactions(mut self) -> Self {
        self.config.kind = SubscriptionKind::Transactions;
        self
    }

    /// Subscribe to logs mentioning a program
    pub fn logs(mut self, program_id: impl Into<String>) -> Self {
        self.config.kind = SubscriptionKind::Logs {
            program_id: program_id.into(),
        };
        self
    }

    /// Set commitment level
    pub fn commitment(mut self, commitment: impl Into<String>) -> Self {
        self.config.commitment = commitment.into();
        self
    }

    /// Set maximum frame size in bytes
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.config.max_message_size = size;
        self
    }

    pub fn build(self, sentinels: Arc<BurnSentinelSet>) -> RpcStreamMonitor {
        RpcStreamMonitor::new(self.config, sentinels)
    }
}
