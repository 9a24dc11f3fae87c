//! Webhook Server
//!
//! HTTP callback event source. The provider POSTs transaction payloads to
//! `path`; each record is forwarded to the pipeline channel as it arrives.
//! `GET /` answers health checks with a static string.

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::RawTransaction;
use crate::ports::{EventSource, EventSourceError};

/// Body returned by the keep-alive route
pub const LIVENESS_TEXT: &str = "LP burn watcher is running";
/// Default callback route
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";

/// Configuration for the webhook server
#[derive(Debug, Clone)]
pub struct WebhookServerConfig {
    pub bind_addr: SocketAddr,
    /// Route receiving provider callbacks
    pub path: String,
}

impl Default for WebhookServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            path: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

/// Providers send either one record or a batch of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Batch(Vec<RawTransaction>),
    Single(Box<RawTransaction>),
}

impl WebhookPayload {
    pub fn into_records(self) -> Vec<RawTransaction> {
        match self {
            WebhookPayload::Batch(records) => records,
            WebhookPayload::Single(record) => vec![*record],
        }
    }
}

#[derive(Clone)]
struct WebhookState {
    sink: mpsc::Sender<RawTransaction>,
}

/// Build the webhook router: `POST path` plus `GET /`
pub fn router(sink: mpsc::Sender<RawTransaction>, path: &str) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route(path, post(receive))
        .with_state(WebhookState { sink })
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn receive(
    State(state): State<WebhookState>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> (StatusCode, String) {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected webhook payload: {}", rejection.body_text());
            return (rejection.status(), rejection.body_text());
        }
    };

    let records = payload.into_records();
    debug!(count = records.len(), "Webhook payload received");

    for record in records {
        if state.sink.send(record).await.is_err() {
            warn!("Pipeline channel closed, refusing webhook payload");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "pipeline unavailable".to_string(),
            );
        }
    }

    (StatusCode::OK, "ok".to_string())
}

/// Webhook event source bound to a local address
pub struct WebhookServer {
    config: WebhookServerConfig,
}

impl WebhookServer {
    pub fn new(config: WebhookServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WebhookServerConfig {
        &self.config
    }
}

#[async_trait]
impl EventSource for WebhookServer {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn run(&self, sink: mpsc::Sender<RawTransaction>) -> Result<(), EventSourceError> {
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| EventSourceError::Bind {
                addr: self.config.bind_addr.to_string(),
                reason: e.to_string(),
            })?;

        info!(
            addr = %self.config.bind_addr,
            path = %self.config.path,
            "Webhook server listening"
        );

        axum::serve(listener, router(sink, &self.config.path))
            .await
            .map_err(|e| EventSourceError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn payload_json(signature: &str) -> String {
        format!(
            r#"{{
                "transaction": {{
                    "signatures": ["{}"],
                    "message": {{ "accountKeys": [], "instructions": [] }}
                }},
                "meta": {{ "logMessages": ["Program log: Burn"], "preBalances": [], "postBalances": [] }}
            }}"#,
            signature
        )
    }

    fn post_json(path: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_liveness_route() {
        let (tx, _rx) = mpsc::channel(1);
        let response = router(tx, DEFAULT_WEBHOOK_PATH)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], LIVENESS_TEXT.as_bytes());
    }

    #[tokio::test]
    async fn test_single_payload_forwarded() {
        let (tx, mut rx) = mpsc::channel(4);
        let response = router(tx, DEFAULT_WEBHOOK_PATH)
            .oneshot(post_json(DEFAULT_WEBHOOK_PATH, payload_json("sigOne")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let record = rx.recv().await.unwrap();
        assert_eq!(record.signature(), Some("sigOne"));
    }

    #[tokio::test]
    async fn test_batch_payload_forwarded_in_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let body = format!("[{}, {}]", payload_json("sigA"), payload_json("sigB"));
        let response = router(tx, "/hook")
            .oneshot(post_json("/hook", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rx.recv().await.unwrap().signature(), Some("sigA"));
        assert_eq!(rx.recv().await.unwrap().signature(), Some("sigB"));
    }

    #[tokio::test]
    async fn test_malformed_payload_rejected() {
        let (tx, mut rx) = mpsc::channel(4);
        let response = router(tx, DEFAULT_WEBHOOK_PATH)
            .oneshot(post_json(DEFAULT_WEBHOOK_PATH, "{not json".to_string()))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        drop(response);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_pipeline_returns_503() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let response = router(tx, DEFAULT_WEBHOOK_PATH)
            .oneshot(post_json(DEFAULT_WEBHOOK_PATH, payload_json("sig")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = WebhookServer::new(WebhookServerConfig {
            bind_addr: taken.local_addr().unwrap(),
            path: DEFAULT_WEBHOOK_PATH.to_string(),
        });
        let (tx, _rx) = mpsc::channel(1);

        let result = server.run(tx).await;
        assert!(matches!(result, Err(EventSourceError::Bind { .. })));
    }
}
