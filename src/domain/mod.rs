//! Domain Layer - Core burn-detection logic
//!
//! Pure types and logic with no external I/O. All network interactions
//! happen through the ports layer.
//!
//! - `raw_transaction`: normalized upstream record
//! - `sentinels`: burn destination accounts and well-known program ids
//! - `classifier`: burn recognition (sentinel-account / log-pattern)
//! - `heuristics`: textual scrapers for token names and mints
//! - `burn_event`: the detected burn
//! - `notification`: alert formatting

pub mod burn_event;
pub mod classifier;
pub mod heuristics;
pub mod notification;
pub mod raw_transaction;
pub mod sentinels;

pub use burn_event::{BurnAmount, BurnEvent, UNKNOWN};
pub use classifier::{
    BurnClassifier, ClassifierConfig, ClassifierStrategy, ClassifyMiss, SentinelPosition,
};
pub use heuristics::{display_name_from_bytes, mint_from_logs, MintScan};
pub use notification::{NotificationMessage, ParseMode, UNKNOWN_TOKEN};
pub use raw_transaction::{AccountKey, RawTransaction, TokenBalance};
pub use sentinels::{BurnSentinelSet, SentinelError};
