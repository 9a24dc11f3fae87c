//! Webhook Registration
//!
//! One-time provisioning call against the provider's webhook-management API:
//! `POST {api}/webhooks?api-key=...` naming the accounts to watch and the URL
//! to call back.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Default webhook-management API base URL
pub const HELIUS_API_URL: &str = "https://api.helius.xyz/v0";

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider rejected registration ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid registration: {0}")]
    InvalidRequest(String),
}

/// Registration request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRegistrationRequest {
    pub account_addresses: Vec<String>,
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    pub transaction_types: Vec<String>,
    pub webhook_type: String,
}

/// Provider's answer; only the id is needed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredWebhook {
    #[serde(rename = "webhookID")]
    pub webhook_id: String,
}

/// Webhook registration client
#[derive(Debug, Clone)]
pub struct WebhookRegistration {
    api_url: String,
    api_key: String,
    request: WebhookRegistrationRequest,
    http: Client,
}

impl WebhookRegistration {
    pub fn new(
        api_key: impl Into<String>,
        webhook_url: impl Into<String>,
        account_addresses: Vec<String>,
    ) -> Result<Self, RegistrationError> {
        let http = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            api_url: HELIUS_API_URL.to_string(),
            api_key: api_key.into(),
            request: WebhookRegistrationRequest {
                account_addresses,
                webhook_url: webhook_url.into(),
                transaction_types: vec!["ANY".to_string()],
                webhook_type: "raw".to_string(),
            },
            http,
        })
    }

    /// Override the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_transaction_types(mut self, types: Vec<String>) -> Self {
        self.request.transaction_types = types;
        self
    }

    pub fn with_webhook_type(mut self, webhook_type: impl Into<String>) -> Self {
        self.request.webhook_type = webhook_type.into();
        self
    }

    pub fn request(&self) -> &WebhookRegistrationRequest {
        &self.request
    }

    fn validate(&self) -> Result<(), RegistrationError> {
        if self.api_key.trim().is_empty() {
            return Err(RegistrationError::InvalidRequest("api key is empty".into()));
        }
        if !self.request.webhook_url.starts_with("http") {
            return Err(RegistrationError::InvalidRequest(format!(
                "webhook url must be http(s): {}",
                self.request.webhook_url
            )));
        }
        if self.request.account_addresses.is_empty() {
            return Err(RegistrationError::InvalidRequest(
                "no account addresses to watch".into(),
            ));
        }
        Ok(())
    }

    /// Register the webhook and return the provider's id for it
    pub async fn register(&self) -> Result<RegisteredWebhook, RegistrationError> {
        self.validate()?;

        let url = format!("{}/webhooks", self.api_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .query(&[("api-key", self.api_key.as_str())])
            .json(&self.request)
            // api-key rides in the query string
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;
        if !status.is_success() {
            return Err(RegistrationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let registered: RegisteredWebhook = serde_json::from_str(&body)
            .map_err(|e| RegistrationError::ParseError(e.to_string()))?;
        info!(
            webhook_id = %registered.webhook_id,
            url = %self.request.webhook_url,
            "Webhook registered"
        );
        Ok(registered)
    }
}
