//! Burnwatch - LP token burn watcher for Solana
//!
//! Watches for liquidity-pool token burns and relays alerts to Telegram.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use burnwatch::adapters::cli::{CliApp, Command, RegisterWebhookCmd, ResolveCmd, RunCmd, SendTestCmd};
use burnwatch::adapters::rpc_stream::{redact_url, RpcStreamBuilder};
use burnwatch::adapters::telegram::{TelegramConfig, TelegramNotifier};
use burnwatch::adapters::token_metadata::{TokenMetadataClient, TokenMetadataConfig};
use burnwatch::adapters::webhook::{
    burn_test_payload, send_test_payload, WebhookRegistration, WebhookServer,
    WebhookServerConfig, TEST_SIGNATURE,
};
use burnwatch::application::{BurnPipeline, PipelineSettings};
use burnwatch::config::{load_config, Config, ConfigError, LogFormat, LoggingSection, SourceMode};
use burnwatch::domain::{BurnClassifier, BurnSentinelSet};
use burnwatch::ports::EventSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in burnwatch.toml)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();

    match app.command {
        Command::Run(cmd) => run_command(cmd, app.verbose, app.debug).await,
        Command::RegisterWebhook(cmd) => register_webhook_command(cmd, app.verbose, app.debug).await,
        Command::SendTest(cmd) => send_test_command(cmd, app.verbose, app.debug).await,
        Command::Resolve(cmd) => resolve_command(cmd, app.verbose, app.debug).await,
    }
}

/// Initialize logging; RUST_LOG wins, then CLI flags, then the config level
fn init_logging(logging: &LoggingSection, verbose: bool, debug: bool) -> Result<()> {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match logging.format {
        LogFormat::Human => fmt().with_env_filter(filter).with_target(false).try_init(),
        LogFormat::Json => fmt().json().with_env_filter(filter).try_init(),
    }
    .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}

/// Load config with `~` expansion in the path
fn load(path: &Path) -> Result<Config> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
    load_config(&expanded).with_context(|| format!("Failed to load configuration from {}", expanded))
}

fn metadata_client(config: &Config) -> Result<TokenMetadataClient> {
    TokenMetadataClient::with_config(TokenMetadataConfig {
        rpc_url: config.metadata.get_rpc_url(),
        timeout: Duration::from_secs(config.metadata.timeout_secs),
        metadata_program_id: config.metadata.metadata_program_id.clone(),
    })
    .context("Failed to create metadata client")
}

fn event_source(config: &Config, sentinels: Arc<BurnSentinelSet>) -> Result<Box<dyn EventSource>> {
    let source: Box<dyn EventSource> = match config.source.mode {
        SourceMode::Socket | SourceMode::Logs => {
            let builder = RpcStreamBuilder::new()
                .ws_url(config.source.get_ws_url())
                .commitment(config.source.commitment.clone())
                .max_message_size(config.source.max_message_size);
            let builder = if config.source.mode == SourceMode::Logs {
                builder.logs(config.source.program_id.clone())
            } else {
                builder.transactions()
            };
            Box::new(builder.build(sentinels))
        }
        SourceMode::Webhook => Box::new(WebhookServer::new(WebhookServerConfig {
            bind_addr: config.webhook.bind_addr()?,
            path: config.webhook.path.clone(),
        })),
    };
    Ok(source)
}

async fn run_command(cmd: RunCmd, verbose: bool, debug: bool) -> Result<()> {
    let mut config = load(&cmd.config)?;
    if let Some(mode) = cmd.source {
        config = config.with_source_mode(mode)?;
    }
    init_logging(&config.logging, verbose, debug)?;

    let sentinels = Arc::new(config.classifier.sentinel_set()?);
    tracing::info!(
        mode = %config.source.mode,
        strategy = ?config.effective_strategy(),
        sentinels = sentinels.len(),
        "Starting burnwatch"
    );
    if config.source.mode != SourceMode::Webhook {
        tracing::info!("Socket: {}", redact_url(&config.source.get_ws_url()));
    }

    let classifier = BurnClassifier::new(Arc::clone(&sentinels), config.classifier_config());
    let notifier = TelegramNotifier::with_config(TelegramConfig {
        api_url: config.telegram.api_url.clone(),
        bot_token: config.telegram.get_bot_token()?,
        timeout: config.telegram.timeout(),
    })
    .context("Failed to create Telegram notifier")?;
    let settings = PipelineSettings {
        chat_id: config.telegram.get_chat_id()?,
        explorer_tx_url: config.telegram.explorer_tx_url.clone(),
        parse_mode: config.telegram.parse_mode,
        max_concurrent_events: config.pipeline.max_concurrent_events,
    };

    let pipeline = Arc::new(BurnPipeline::new(
        classifier,
        Arc::new(metadata_client(&config)?),
        Arc::new(notifier),
        settings,
    ));
    let source = event_source(&config, sentinels)?;

    let (tx, rx) = mpsc::channel(config.pipeline.channel_capacity);
    let pipeline_task = tokio::spawn(Arc::clone(&pipeline).run(rx));

    let result = tokio::select! {
        result = source.run(tx) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    };

    // The sender is gone either way; let in-flight events finish
    pipeline_task.await.context("Pipeline task panicked")?;

    match result {
        Ok(()) => {
            tracing::info!("Event source '{}' stopped", source.name());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Event source '{}' failed: {}", source.name(), e);
            Err(e.into())
        }
    }
}

async fn register_webhook_command(cmd: RegisterWebhookCmd, verbose: bool, debug: bool) -> Result<()> {
    let config = load(&cmd.config)?;
    init_logging(&config.logging, verbose, debug)?;

    let api_key = config
        .source
        .get_api_key()
        .ok_or_else(|| ConfigError::MissingSecret("HELIUS_API_KEY".to_string()))?;
    let Some(url) = cmd.url.or_else(|| config.webhook.public_url.clone()) else {
        bail!("No webhook URL: pass --url or set webhook.public_url");
    };
    let accounts = if config.webhook.account_addresses.is_empty() {
        vec![config.source.program_id.clone()]
    } else {
        config.webhook.account_addresses.clone()
    };

    let registered = WebhookRegistration::new(api_key, url.clone(), accounts)?
        .with_api_url(config.webhook.api_url.clone())
        .with_transaction_types(config.webhook.transaction_types.clone())
        .with_webhook_type(config.webhook.webhook_type.clone())
        .register()
        .await
        .context("Webhook registration failed")?;

    println!("✓ Webhook registered");
    println!("  ID:  {}", registered.webhook_id);
    println!("  URL: {}", url);
    Ok(())
}

async fn send_test_command(cmd: SendTestCmd, verbose: bool, debug: bool) -> Result<()> {
    init_logging(&LoggingSection::default(), verbose, debug)?;

    let signature = cmd.signature.as_deref().unwrap_or(TEST_SIGNATURE);
    let payload = burn_test_payload(signature, cmd.with_mint.as_deref());
    tracing::info!("Sending test payload to {}", cmd.url);

    let (status, body) = send_test_payload(&cmd.url, &payload)
        .await
        .with_context(|| format!("Failed to reach {}", cmd.url))?;

    println!("Response: {} {}", status, body);
    if !(200..300).contains(&status) {
        bail!("Webhook endpoint answered {}", status);
    }
    Ok(())
}

async fn resolve_command(cmd: ResolveCmd, verbose: bool, debug: bool) -> Result<()> {
    let config = load(&cmd.config)?;
    init_logging(&config.logging, verbose, debug)?;

    let client = metadata_client(&config)?;
    let address = client.metadata_address(&cmd.mint)?;
    let metadata = client.get_token_metadata(&cmd.mint).await?;

    println!("Mint:     {}", metadata.mint_address);
    println!("Metadata: {}", address);
    match metadata.display_name {
        Some(name) => println!("Name:     {}", name),
        None => println!("Name:     (none found)"),
    }
    Ok(())
}
