//! Burn Classifier
//!
//! Decides whether a raw transaction is an LP token burn and extracts the
//! fields the notifier needs. Pure and deterministic: no I/O, no retries.
//!
//! Two recognition strategies, chosen per deployment:
//! - `SentinelAccount`: an account key at the configured position is a burn
//!   sentinel. Amount and mint come from the first post-transaction token
//!   balance entry.
//! - `LogPattern`: a log line carries the burn marker and a later line
//!   carries a `mint:` field (see `heuristics::mint_from_logs`).

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::burn_event::{BurnAmount, BurnEvent, UNKNOWN};
use super::heuristics::{mint_from_logs, MintScan};
use super::raw_transaction::RawTransaction;
use super::sentinels::BurnSentinelSet;

/// Default log marker for the log-pattern strategy
pub const DEFAULT_BURN_MARKER: &str = "Burn";
/// Default field label preceding the mint in program logs
pub const DEFAULT_MINT_LABEL: &str = "mint:";
/// Default account-key index checked against the sentinel set
pub const DEFAULT_SENTINEL_POSITION: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierStrategy {
    SentinelAccount,
    LogPattern,
}

/// Where in the account-key list a sentinel must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPosition {
    At(usize),
    Any,
}

/// Why a transaction was not classified as a burn
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyMiss {
    #[error("transaction has no signature")]
    NoSignature,

    #[error("no burn sentinel in account keys")]
    NoSentinel,

    #[error("no burn marker in logs")]
    NoBurnMarker,

    #[error("burn marker found but no mint field in logs")]
    MintFieldMissing,
}

impl ClassifyMiss {
    /// A partial match worth a warning, as opposed to an ordinary non-burn
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ClassifyMiss::MintFieldMissing)
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub strategy: ClassifierStrategy,
    pub sentinel_position: SentinelPosition,
    pub burn_marker: String,
    pub mint_label: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: ClassifierStrategy::SentinelAccount,
            sentinel_position: SentinelPosition::At(DEFAULT_SENTINEL_POSITION),
            burn_marker: DEFAULT_BURN_MARKER.to_string(),
            mint_label: DEFAULT_MINT_LABEL.to_string(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_strategy(strategy: ClassifierStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct BurnClassifier {
    sentinels: Arc<BurnSentinelSet>,
    config: ClassifierConfig,
}

impl BurnClassifier {
    pub fn new(sentinels: Arc<BurnSentinelSet>, config: ClassifierConfig) -> Self {
        Self { sentinels, config }
    }

    pub fn strategy(&self) -> ClassifierStrategy {
        self.config.strategy
    }

    pub fn sentinels(&self) -> &BurnSentinelSet {
        &self.sentinels
    }

    /// Classify a transaction, logging partial matches at WARN.
    pub fn classify(&self, tx: &RawTransaction) -> Option<BurnEvent> {
        match self.classify_detailed(tx) {
            Ok(event) => Some(event),
            Err(miss) => {
                let signature = tx.signature().unwrap_or(UNKNOWN);
                if miss.is_ambiguous() {
                    warn!(%signature, "Skipping transaction: {}", miss);
                } else {
                    debug!(%signature, "Not a burn: {}", miss);
                }
                None
            }
        }
    }

    /// Classify a transaction, returning the miss reason instead of logging it.
    pub fn classify_detailed(&self, tx: &RawTransaction) -> Result<BurnEvent, ClassifyMiss> {
        let signature = tx.signature().ok_or(ClassifyMiss::NoSignature)?;

        match self.config.strategy {
            ClassifierStrategy::SentinelAccount => self.classify_by_sentinel(signature, tx),
            ClassifierStrategy::LogPattern => self.classify_by_logs(signature, tx),
        }
    }

    fn classify_by_sentinel(
        &self,
        signature: &str,
        tx: &RawTransaction,
    ) -> Result<BurnEvent, ClassifyMiss> {
        let hit = match self.config.sentinel_position {
            SentinelPosition::At(index) => tx
                .account_key(index)
                .is_some_and(|key| self.sentinels.contains(key)),
            SentinelPosition::Any => tx
                .account_keys()
                .iter()
                .any(|key| self.sentinels.contains(key)),
        };

        if !hit {
            return Err(ClassifyMiss::NoSentinel);
        }

        // Empty balance snapshot is not an error: amount and mint degrade to unknown
        let first = tx.post_token_balances().first();
        let amount = BurnAmount::from_ui_amount(
            first.and_then(|b| b.ui_token_amount.ui_amount_string.as_deref()),
        );
        let mint = first
            .map(|b| b.mint.as_str())
            .filter(|mint| !mint.is_empty())
            .unwrap_or(UNKNOWN);

        Ok(BurnEvent::new(signature, mint, amount, tx.account_keys()))
    }

    fn classify_by_logs(
        &self,
        signature: &str,
        tx: &RawTransaction,
    ) -> Result<BurnEvent, ClassifyMiss> {
        let mint = match mint_from_logs(
            tx.log_messages(),
            &self.config.burn_marker,
            &self.config.mint_label,
        ) {
            MintScan::Found(mint) => mint,
            MintScan::NoMarker => return Err(ClassifyMiss::NoBurnMarker),
            MintScan::MarkerWithoutMint => return Err(ClassifyMiss::MintFieldMissing),
        };

        let amount = BurnAmount::from_ui_amount(
            tx.post_token_balances()
                .iter()
                .find(|b| b.mint == mint)
                .and_then(|b| b.ui_token_amount.ui_amount_string.as_deref()),
        );

        Ok(BurnEvent::new(signature, mint, amount, tx.account_keys()))
    }
}
