//! Burn Event
//!
//! The immutable record produced by the classifier for one detected burn.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Text used wherever a field could not be determined
pub const UNKNOWN: &str = "unknown";

/// Burned amount as reported by the token-balance snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnAmount {
    Known(Decimal),
    Unknown,
}

impl BurnAmount {
    /// Parse a `uiAmountString`; anything missing or non-numeric is `Unknown`
    pub fn from_ui_amount(ui_amount: Option<&str>) -> Self {
        ui_amount
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| Decimal::from_str(s).ok())
            .map(BurnAmount::Known)
            .unwrap_or(BurnAmount::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, BurnAmount::Known(_))
    }
}

impl fmt::Display for BurnAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurnAmount::Known(value) => write!(f, "{}", value),
            BurnAmount::Unknown => f.write_str(UNKNOWN),
        }
    }
}

/// A recognized LP token burn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnEvent {
    signature: String,
    mint_address: String,
    amount: BurnAmount,
    source_accounts: Vec<String>,
    detected_at: DateTime<Utc>,
}

impl BurnEvent {
    pub fn new(
        signature: impl Into<String>,
        mint_address: impl Into<String>,
        amount: BurnAmount,
        source_accounts: Vec<String>,
    ) -> Self {
        Self {
            signature: signature.into(),
            mint_address: mint_address.into(),
            amount,
            source_accounts,
            detected_at: Utc::now(),
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn mint_address(&self) -> &str {
        &self.mint_address
    }

    pub fn amount(&self) -> &BurnAmount {
        &self.amount
    }

    pub fn source_accounts(&self) -> &[String] {
        &self.source_accounts
    }

    /// When the classifier recognized the burn
    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// False when the classifier could not find a mint for the burn
    pub fn has_known_mint(&self) -> bool {
        !self.mint_address.is_empty() && self.mint_address != UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_from_ui_string() {
        assert_eq!(
            BurnAmount::from_ui_amount(Some("1000")),
            BurnAmount::Known(dec!(1000))
        );
        assert_eq!(
            BurnAmount::from_ui_amount(Some("0.000123")),
            BurnAmount::Known(dec!(0.000123))
        );
    }

    #[test]
    fn test_amount_unknown_cases() {
        assert_eq!(BurnAmount::from_ui_amount(None), BurnAmount::Unknown);
        assert_eq!(BurnAmount::from_ui_amount(Some("")), BurnAmount::Unknown);
        assert_eq!(BurnAmount::from_ui_amount(Some("n/a")), BurnAmount::Unknown);
    }

    #[test]
    fn test_amount_display_keeps_source_digits() {
        assert_eq!(BurnAmount::from_ui_amount(Some("1000")).to_string(), "1000");
        assert_eq!(BurnAmount::from_ui_amount(Some("12.50")).to_string(), "12.50");
        assert_eq!(BurnAmount::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_known_mint() {
        let event = BurnEvent::new("sig", UNKNOWN, BurnAmount::Unknown, vec![]);
        assert!(!event.has_known_mint());

        let event = BurnEvent::new("sig", "MintXYZ", BurnAmount::Unknown, vec![]);
        assert!(event.has_known_mint());
        assert_eq!(event.signature(), "sig");
        assert!(event.detected_at() <= Utc::now());
    }
}
