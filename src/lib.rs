//! Burnwatch - LP token burn watcher library
//!
//! Recognizes liquidity-pool token burns on Solana and relays alerts to a
//! Telegram chat.
//!
//! # Modules
//!
//! - `domain`: Core logic (BurnClassifier, BurnEvent, NotificationMessage)
//! - `ports`: Trait abstractions (MetadataPort, NotifierPort, EventSource)
//! - `adapters`: External implementations (RPC stream, webhook, Telegram, metadata, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: The burn pipeline

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
