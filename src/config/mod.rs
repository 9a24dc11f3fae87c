//! Configuration Module
//!
//! Loads and validates configuration from TOML files, with environment
//! overrides for secrets.

pub mod loader;

pub use loader::{
    load_config, ClassifierSection, Config, ConfigError, LogFormat, LoggingSection,
    MetadataSection, PipelineSection, SourceMode, SourceSection, TelegramSection, WebhookSection,
};
