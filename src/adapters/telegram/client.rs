//! Telegram Notifier
//!
//! Delivers alerts through the Bot API `sendMessage` method. One attempt per
//! message: a non-2xx status or an `ok: false` envelope is a rejection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{SendMessageRequest, TelegramResponse};
use crate::domain::NotificationMessage;
use crate::ports::{NotifierPort, NotifyError};

/// Default Bot API base URL
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Configuration for the TelegramNotifier
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API base URL
    pub api_url: String,
    /// Bot token issued by BotFather
    pub bot_token: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: TELEGRAM_API_URL.to_string(),
            bot_token: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

// Keep the token out of debug output
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Telegram Bot API notifier
pub struct TelegramNotifier {
    config: TelegramConfig,
    http: Client,
}

impl TelegramNotifier {
    /// Create a notifier with the default API URL
    pub fn new(bot_token: impl Into<String>) -> Result<Self, NotifyError> {
        Self::with_config(TelegramConfig {
            bot_token: bot_token.into(),
            ..TelegramConfig::default()
        })
    }

    pub fn with_config(config: TelegramConfig) -> Result<Self, NotifyError> {
        if config.bot_token.trim().is_empty() {
            return Err(NotifyError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }
}

#[async_trait]
impl NotifierPort for TelegramNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        if message.chat_id.trim().is_empty() {
            return Err(NotifyError::Config("chat id is empty".to_string()));
        }

        let request = SendMessageRequest::from(message);
        let response = self
            .http
            .post(self.send_message_url())
            .json(&request)
            // the URL embeds the bot token; keep it out of errors
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;
        let envelope = serde_json::from_str::<TelegramResponse>(&body).ok();

        if !status.is_success() {
            let description = envelope
                .and_then(|e| e.description)
                .unwrap_or(body);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                description,
            });
        }

        match envelope {
            Some(envelope) if envelope.ok => {
                debug!(chat_id = %message.chat_id, "Telegram accepted message");
                Ok(())
            }
            Some(envelope) => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "ok: false".to_string()),
            }),
            None => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: format!("unexpected response body: {}", body),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseMode;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Local Bot API stand-in answering `status` + `reply` and recording bodies
    async fn spawn_bot_api(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let app = Router::new().route(
            "/botTESTTOKEN/sendMessage",
            post(move |Json(body): Json<Value>| {
                let reply = reply.clone();
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    (status, Json(reply))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), received)
    }

    fn notifier(api_url: String) -> TelegramNotifier {
        TelegramNotifier::with_config(TelegramConfig {
            api_url,
            bot_token: "TESTTOKEN".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = TelegramNotifier::new("  ");
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }

    #[test]
    fn test_send_message_url() {
        let notifier = notifier("https://api.telegram.org/".to_string());
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/botTESTTOKEN/sendMessage"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let config = TelegramConfig {
            bot_token: "secret-token".to_string(),
            ..TelegramConfig::default()
        };
        assert!(!format!("{:?}", config).contains("secret-token"));
    }

    #[tokio::test]
    async fn test_notify_success() {
        let (url, received) =
            spawn_bot_api(StatusCode::OK, json!({ "ok": true, "result": {} })).await;
        let message = NotificationMessage::new("-100", "<b>burn</b>", ParseMode::Html);

        notifier(url).notify(&message).await.unwrap();

        let bodies = received.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["chat_id"], "-100");
        assert_eq!(bodies[0]["text"], "<b>burn</b>");
        assert_eq!(bodies[0]["parse_mode"], "HTML");
    }

    #[tokio::test]
    async fn test_notify_http_rejection() {
        let (url, _) = spawn_bot_api(
            StatusCode::BAD_REQUEST,
            json!({ "ok": false, "error_code": 400, "description": "Bad Request: chat not found" }),
        )
        .await;
        let message = NotificationMessage::new("-100", "x", ParseMode::Html);

        match notifier(url).notify(&message).await {
            Err(NotifyError::Rejected { status, description }) => {
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_notify_ok_false_with_200() {
        let (url, _) =
            spawn_bot_api(StatusCode::OK, json!({ "ok": false, "description": "flood" })).await;
        let message = NotificationMessage::new("-100", "x", ParseMode::Plain);

        let result = notifier(url).notify(&message).await;
        assert!(matches!(result, Err(NotifyError::Rejected { status: 200, .. })));
    }

    #[tokio::test]
    async fn test_notify_empty_chat_id() {
        let notifier = notifier("http://127.0.0.1:9".to_string());
        let message = NotificationMessage::new("", "x", ParseMode::Plain);
        assert!(matches!(
            notifier.notify(&message).await,
            Err(NotifyError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_notify_unreachable_is_http_error() {
        let notifier = notifier("http://127.0.0.1:9".to_string());
        let message = NotificationMessage::new("-100", "x", ParseMode::Plain);
        assert!(matches!(
            notifier.notify(&message).await,
            Err(NotifyError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_token() {
        let notifier = TelegramNotifier::with_config(TelegramConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            bot_token: "SECRETBOTTOKEN".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        let message = NotificationMessage::new("-100", "x", ParseMode::Plain);

        let err = notifier.notify(&message).await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
        assert!(!err.to_string().contains("SECRETBOTTOKEN"), "{}", err);
        assert!(!format!("{:?}", err).contains("SECRETBOTTOKEN"));
    }
}
