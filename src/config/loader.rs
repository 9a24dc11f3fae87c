//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching burnwatch.toml.
//! Secrets and deploy-specific values can be overridden from the environment
//! (a `.env` file is loaded at startup).

use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use solana_sdk::pubkey::Pubkey;

use crate::application::pipeline::MAX_CONCURRENT_EVENTS;
use crate::domain::classifier::{DEFAULT_BURN_MARKER, DEFAULT_MINT_LABEL, DEFAULT_SENTINEL_POSITION};
use crate::domain::sentinels::{
    DEFAULT_BURN_SENTINELS, DEFAULT_EXPLORER_TX_URL, METADATA_PROGRAM_ID, RAYDIUM_AMM_V4,
};
use crate::domain::{
    BurnSentinelSet, ClassifierConfig, ClassifierStrategy, ParseMode, SentinelPosition,
};

/// Main configuration structure matching burnwatch.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub classifier: ClassifierSection,
    #[serde(default)]
    pub metadata: MetadataSection,
    pub telegram: TelegramSection,
    #[serde(default)]
    pub webhook: WebhookSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Which upstream feeds the pipeline; one per process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// `transactionSubscribe` socket filtered by burn sentinels
    #[default]
    Socket,
    /// `logsSubscribe` socket for one program
    Logs,
    /// HTTP callback endpoint
    Webhook,
}

impl SourceMode {
    /// Classifier strategy used when none is configured
    pub fn default_strategy(&self) -> ClassifierStrategy {
        match self {
            SourceMode::Socket => ClassifierStrategy::SentinelAccount,
            SourceMode::Logs | SourceMode::Webhook => ClassifierStrategy::LogPattern,
        }
    }
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "socket" => Ok(SourceMode::Socket),
            "logs" => Ok(SourceMode::Logs),
            "webhook" => Ok(SourceMode::Webhook),
            other => Err(format!(
                "unknown source mode '{}' (expected socket, logs or webhook)",
                other
            )),
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Socket => write!(f, "socket"),
            SourceMode::Logs => write!(f, "logs"),
            SourceMode::Webhook => write!(f, "webhook"),
        }
    }
}

/// Upstream source section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub mode: SourceMode,
    /// Subscription socket endpoint
    pub ws_url: String,
    /// Provider API key, appended to the socket URL as `api-key`
    pub api_key: Option<String>,
    /// Commitment level: "processed", "confirmed", "finalized"
    pub commitment: String,
    /// Program watched in `logs` mode
    pub program_id: String,
    /// Frames larger than this are dropped
    pub max_message_size: usize,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            mode: SourceMode::Socket,
            ws_url: "wss://atlas-mainnet.helius-rpc.com".to_string(),
            api_key: None,
            commitment: "confirmed".to_string(),
            program_id: RAYDIUM_AMM_V4.to_string(),
            max_message_size: 4 * 1_048_576,
        }
    }
}

impl SourceSection {
    /// Get API key with environment variable override
    /// Checks HELIUS_API_KEY env var first, falls back to config value
    pub fn get_api_key(&self) -> Option<String> {
        std::env::var("HELIUS_API_KEY")
            .ok()
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.is_empty())
    }

    /// Socket URL after the SOLANA_WS_URL override, without the api key
    pub fn base_ws_url(&self) -> String {
        pick_ws_url(std::env::var("SOLANA_WS_URL").ok(), &self.ws_url)
    }

    /// Get socket URL with environment variable override, api key attached
    pub fn get_ws_url(&self) -> String {
        let url = self.base_ws_url();
        match self.get_api_key() {
            Some(key) if !url.contains("api-key=") => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{}{}api-key={}", url, separator, key)
            }
            _ => url,
        }
    }
}

/// Burn classifier section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    /// Explicit strategy; defaults per source mode when absent
    pub strategy: Option<ClassifierStrategy>,
    /// Burn sentinel addresses
    pub sentinels: Vec<String>,
    /// Account-key index checked for a sentinel
    pub sentinel_position: usize,
    /// Accept a sentinel anywhere in the account list
    pub match_any_position: bool,
    /// Log substring marking a burn
    pub burn_marker: String,
    /// Log label preceding the mint address
    pub mint_label: String,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            strategy: None,
            sentinels: DEFAULT_BURN_SENTINELS.iter().map(|s| s.to_string()).collect(),
            sentinel_position: DEFAULT_SENTINEL_POSITION,
            match_any_position: false,
            burn_marker: DEFAULT_BURN_MARKER.to_string(),
            mint_label: DEFAULT_MINT_LABEL.to_string(),
        }
    }
}

impl ClassifierSection {
    /// Parse the configured sentinel addresses
    pub fn sentinel_set(&self) -> Result<BurnSentinelSet, ConfigError> {
        BurnSentinelSet::parse(&self.sentinels)
            .map_err(|e| ConfigError::ValidationError(format!("classifier.sentinels: {}", e)))
    }
}

/// Metadata resolver section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetadataSection {
    /// JSON-RPC endpoint for `getAccountInfo`
    pub rpc_url: String,
    pub metadata_program_id: String,
    pub timeout_secs: u64,
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            metadata_program_id: METADATA_PROGRAM_ID.to_string(),
            timeout_secs: 10,
        }
    }
}

impl MetadataSection {
    /// Get RPC URL with environment variable override
    /// Checks SOLANA_RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }
}

/// Telegram notifier section
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSection {
    /// Bot token (prefer TELEGRAM_BOT_TOKEN in .env)
    #[serde(default)]
    pub bot_token: String,
    /// Destination chat (prefer TELEGRAM_CHAT_ID in .env)
    #[serde(default)]
    pub chat_id: String,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub parse_mode: ParseMode,
    /// Prefix the signature is appended to in alert links
    #[serde(default = "default_explorer_tx_url")]
    pub explorer_tx_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_explorer_tx_url() -> String {
    DEFAULT_EXPLORER_TX_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl TelegramSection {
    /// Get bot token with environment variable override
    pub fn get_bot_token(&self) -> Result<String, ConfigError> {
        env_or_config("TELEGRAM_BOT_TOKEN", &self.bot_token)
    }

    /// Get chat id with environment variable override
    pub fn get_chat_id(&self) -> Result<String, ConfigError> {
        env_or_config("TELEGRAM_CHAT_ID", &self.chat_id)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn env_or_config(var: &str, configured: &str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| Some(configured.to_string()).filter(|value| !value.trim().is_empty()))
        .ok_or_else(|| ConfigError::MissingSecret(var.to_string()))
}

/// Webhook server and registration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookSection {
    pub bind_host: String,
    pub port: u16,
    /// Route receiving provider callbacks
    pub path: String,
    /// Public URL registered with the provider
    pub public_url: Option<String>,
    /// Webhook-management API base URL
    pub api_url: String,
    pub transaction_types: Vec<String>,
    pub webhook_type: String,
    /// Accounts to watch; defaults to `source.program_id`
    pub account_addresses: Vec<String>,
}

impl Default for WebhookSection {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            path: "/webhook".to_string(),
            public_url: None,
            api_url: "https://api.helius.xyz/v0".to_string(),
            transaction_types: vec!["ANY".to_string()],
            webhook_type: "raw".to_string(),
            account_addresses: Vec::new(),
        }
    }
}

impl WebhookSection {
    /// Get listen port with environment variable override (hosting platforms set PORT)
    pub fn get_port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(self.port)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_host, self.get_port())
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "webhook.bind_host '{}' is not a valid address: {}",
                    self.bind_host, e
                ))
            })
    }
}

fn pick_ws_url(env_override: Option<String>, configured: &str) -> String {
    env_override.unwrap_or_else(|| configured.to_string())
}

fn check_ws_url(url: &str) -> Result<(), ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ws_url cannot be empty (check SOLANA_WS_URL)".to_string(),
        ));
    }
    Ok(())
}

/// Largest accepted `channel_capacity`
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 20;

/// Pipeline concurrency section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Upper bound on events processed at once
    pub max_concurrent_events: usize,
    /// Buffer between the event source and the pipeline
    pub channel_capacity: usize,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            max_concurrent_events: 32,
            channel_capacity: 1024,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Human,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Missing secret: set {0} in the environment or config")]
    MissingSecret(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Strategy in effect: explicit setting, else the source mode's default
    pub fn effective_strategy(&self) -> ClassifierStrategy {
        self.classifier
            .strategy
            .unwrap_or_else(|| self.source.mode.default_strategy())
    }

    /// Classifier settings for the configured source
    pub fn classifier_config(&self) -> ClassifierConfig {
        let sentinel_position = if self.classifier.match_any_position {
            SentinelPosition::Any
        } else {
            SentinelPosition::At(self.classifier.sentinel_position)
        };

        ClassifierConfig {
            strategy: self.effective_strategy(),
            sentinel_position,
            burn_marker: self.classifier.burn_marker.clone(),
            mint_label: self.classifier.mint_label.clone(),
        }
    }

    /// Switch the source mode (CLI override) and re-check the combination
    pub fn with_source_mode(mut self, mode: SourceMode) -> Result<Self, ConfigError> {
        self.source.mode = mode;
        self.validate()?;
        Ok(self)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate classifier section
        self.classifier.sentinel_set()?;

        if self.classifier.burn_marker.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "burn_marker cannot be empty".to_string(),
            ));
        }

        if self.classifier.mint_label.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "mint_label cannot be empty".to_string(),
            ));
        }

        if self.source.mode == SourceMode::Logs
            && self.effective_strategy() == ClassifierStrategy::SentinelAccount
        {
            return Err(ConfigError::ValidationError(
                "logs mode carries no account keys; use the log_pattern strategy".to_string(),
            ));
        }

        // Validate source section
        match self.source.mode {
            SourceMode::Socket | SourceMode::Logs => {
                check_ws_url(&self.source.base_ws_url())?;
                if self.source.max_message_size == 0 {
                    return Err(ConfigError::ValidationError(
                        "max_message_size must be > 0".to_string(),
                    ));
                }
            }
            SourceMode::Webhook => {
                if !self.webhook.path.starts_with('/') {
                    return Err(ConfigError::ValidationError(format!(
                        "webhook.path must start with '/', got '{}'",
                        self.webhook.path
                    )));
                }
                self.webhook.bind_addr()?;
            }
        }

        if self.source.mode == SourceMode::Logs && Pubkey::from_str(&self.source.program_id).is_err()
        {
            return Err(ConfigError::ValidationError(format!(
                "program_id is not a valid address: {}",
                self.source.program_id
            )));
        }

        // Validate metadata section
        if self.metadata.rpc_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        if Pubkey::from_str(&self.metadata.metadata_program_id).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "metadata_program_id is not a valid address: {}",
                self.metadata.metadata_program_id
            )));
        }

        // Validate telegram section
        if self.telegram.explorer_tx_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "explorer_tx_url cannot be empty".to_string(),
            ));
        }

        // Validate pipeline section
        if !(1..=MAX_CONCURRENT_EVENTS).contains(&self.pipeline.max_concurrent_events) {
            return Err(ConfigError::ValidationError(format!(
                "max_concurrent_events must be between 1 and {}, got {}",
                MAX_CONCURRENT_EVENTS, self.pipeline.max_concurrent_events
            )));
        }

        if !(1..=MAX_CHANNEL_CAPACITY).contains(&self.pipeline.channel_capacity) {
            return Err(ConfigError::ValidationError(format!(
                "channel_capacity must be between 1 and {}, got {}",
                MAX_CHANNEL_CAPACITY, self.pipeline.channel_capacity
            )));
        }

        Ok(())
    }
}
