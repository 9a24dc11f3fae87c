//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Token Metadata: name resolution over Solana JSON-RPC
//! - Telegram: Bot API notifier
//! - RPC Stream: subscription-socket event source
//! - Webhook: HTTP callback event source, registration and test payloads
//! - CLI: Command-line interface definitions

pub mod cli;
pub mod rpc_stream;
pub mod telegram;
pub mod token_metadata;
pub mod webhook;

pub use cli::CliApp;
pub use rpc_stream::{RpcStreamBuilder, RpcStreamMonitor};
pub use telegram::TelegramNotifier;
pub use token_metadata::TokenMetadataClient;
pub use webhook::{WebhookRegistration, WebhookServer};
