//! Webhook Adapter
//!
//! - `server`: HTTP callback event source (axum) with a keep-alive route
//! - `registration`: one-time provider webhook registration
//! - `test_payload`: synthetic burn payload sender

mod registration;
mod server;
mod test_payload;

pub use registration::{
    RegisteredWebhook, RegistrationError, WebhookRegistration, WebhookRegistrationRequest,
    HELIUS_API_URL,
};
pub use server::{
    router, WebhookPayload, WebhookServer, WebhookServerConfig, DEFAULT_WEBHOOK_PATH,
    LIVENESS_TEXT,
};
pub use test_payload::{burn_test_payload, send_test_payload, TEST_SIGNATURE};
