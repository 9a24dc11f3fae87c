//! CLI Commands
//!
//! Argument definitions for the burnwatch binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SourceMode;

/// Burnwatch - LP token burn watcher for Solana with Telegram alerts
#[derive(Parser, Debug)]
#[command(
    name = "burnwatch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Watch Solana for LP token burns and relay alerts to Telegram",
    long_about = "Burnwatch subscribes to an RPC socket or receives provider webhooks, \
                  recognizes transactions that burn LP tokens into a known sentinel \
                  account, resolves the token name and posts an alert to a Telegram chat."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start watching for burns
    Run(RunCmd),

    /// Register the webhook endpoint with the provider (one-time setup)
    RegisterWebhook(RegisterWebhookCmd),

    /// POST a synthetic burn payload to a webhook endpoint
    SendTest(SendTestCmd),

    /// Resolve the display name of a token mint
    Resolve(ResolveCmd),
}

/// Start the burn pipeline
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/burnwatch.toml")]
    pub config: PathBuf,

    /// Override the configured source (socket, logs, webhook)
    #[arg(short, long, value_name = "MODE")]
    pub source: Option<SourceMode>,
}

/// Register a webhook
#[derive(Parser, Debug)]
pub struct RegisterWebhookCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/burnwatch.toml")]
    pub config: PathBuf,

    /// Public URL the provider should call (overrides webhook.public_url)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

/// Send a test payload
#[derive(Parser, Debug)]
pub struct SendTestCmd {
    /// Webhook endpoint URL
    #[arg(long, value_name = "URL", default_value = "http://127.0.0.1:3000/webhook")]
    pub url: String,

    /// Transaction signature to embed
    #[arg(long, value_name = "SIG")]
    pub signature: Option<String>,

    /// Include a `mint:` log line for this mint
    #[arg(long, value_name = "MINT")]
    pub with_mint: Option<String>,
}

/// Resolve a token name
#[derive(Parser, Debug)]
pub struct ResolveCmd {
    /// Token mint address
    #[arg(value_name = "MINT")]
    pub mint: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/burnwatch.toml")]
    pub config: PathBuf,
}
