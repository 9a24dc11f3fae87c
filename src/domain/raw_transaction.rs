//! Raw Transaction Record
//!
//! The normalized record every event source hands to the classifier. Accepts
//! the `transactionSubscribe` result shape, the webhook payload shape, and
//! the `logsSubscribe` value (signature + logs only).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One transaction as delivered by an upstream source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Top-level signature (log notifications and some enhanced streams)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transaction: TransactionBody,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: TransactionMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub signatures: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: MessageBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_keys: Vec<AccountKey>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: Vec<Value>,
}

/// Account key as either a bare address or a `jsonParsed` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountKey {
    Address(String),
    Parsed {
        pubkey: String,
        #[serde(default)]
        signer: bool,
        #[serde(default)]
        writable: bool,
    },
}

impl AccountKey {
    pub fn pubkey(&self) -> &str {
        match self {
            AccountKey::Address(address) => address,
            AccountKey::Parsed { pubkey, .. } => pubkey,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub log_messages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pre_balances: Vec<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_balances: Vec<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pre_token_balances: Vec<TokenBalance>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_token_balances: Vec<TokenBalance>,
}

/// Token balance snapshot entry (`preTokenBalances` / `postTokenBalances`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    #[serde(default)]
    pub account_index: u32,
    #[serde(default)]
    pub mint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ui_token_amount: UiTokenAmount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_amount_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl RawTransaction {
    /// Build a record from a `logsSubscribe` notification value
    pub fn from_logs(signature: impl Into<String>, logs: Vec<String>) -> Self {
        Self {
            signature: Some(signature.into()),
            meta: TransactionMeta {
                log_messages: logs,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Transaction signature: top-level field first, then the first signer signature
    pub fn signature(&self) -> Option<&str> {
        self.signature
            .as_deref()
            .or_else(|| self.transaction.signatures.first().map(String::as_str))
            .filter(|sig| !sig.is_empty())
    }

    /// Account keys in message order
    pub fn account_keys(&self) -> Vec<String> {
        self.transaction
            .message
            .account_keys
            .iter()
            .map(|key| key.pubkey().to_string())
            .collect()
    }

    pub fn account_key(&self, index: usize) -> Option<&str> {
        self.transaction
            .message
            .account_keys
            .get(index)
            .map(AccountKey::pubkey)
    }

    pub fn log_messages(&self) -> &[String] {
        &self.meta.log_messages
    }

    pub fn post_token_balances(&self) -> &[TokenBalance] {
        &self.meta.post_token_balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subscription_result() {
        let json = r#"{
            "transaction": {
                "signatures": ["5sigA"],
                "message": {
                    "accountKeys": ["11111111111111111111111111111111", "1nc1nerator11111111111111111111111111111111"]
                }
            },
            "meta": {
                "err": null,
                "postTokenBalances": [
                    {
                        "accountIndex": 1,
                        "mint": "MintAAA",
                        "uiTokenAmount": { "uiAmountString": "1000", "amount": "1000000000", "decimals": 6 }
                    }
                ]
            }
        }"#;

        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.signature(), Some("5sigA"));
        assert_eq!(
            tx.account_key(1),
            Some("1nc1nerator11111111111111111111111111111111")
        );
        let balance = &tx.post_token_balances()[0];
        assert_eq!(balance.mint, "MintAAA");
        assert_eq!(balance.ui_token_amount.ui_amount_string.as_deref(), Some("1000"));
    }

    #[test]
    fn test_parse_webhook_payload_with_nulls() {
        let json = r#"{
            "transaction": {
                "signatures": ["sigW"],
                "message": { "accountKeys": [], "instructions": [{"programIdIndex": 2}] }
            },
            "meta": {
                "logMessages": ["Program log: Instruction: Burn"],
                "preBalances": [10, 20],
                "postBalances": [5, 25],
                "postTokenBalances": null
            }
        }"#;

        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.signature(), Some("sigW"));
        assert_eq!(tx.log_messages().len(), 1);
        assert!(tx.post_token_balances().is_empty());
        assert_eq!(tx.meta.post_balances, vec![5, 25]);
        assert_eq!(tx.transaction.message.instructions.len(), 1);
    }

    #[test]
    fn test_parsed_account_keys() {
        let json = r#"{
            "transaction": {
                "signatures": ["sig"],
                "message": {
                    "accountKeys": [
                        { "pubkey": "Payer111", "signer": true, "writable": true },
                        "Plain222"
                    ]
                }
            }
        }"#;

        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.account_keys(), vec!["Payer111", "Plain222"]);
    }

    #[test]
    fn test_top_level_signature_wins() {
        let mut tx = RawTransaction::from_logs("logSig", vec!["Program log: hi".to_string()]);
        tx.transaction.signatures.push("innerSig".to_string());
        assert_eq!(tx.signature(), Some("logSig"));
    }

    #[test]
    fn test_missing_signature() {
        let tx = RawTransaction::default();
        assert_eq!(tx.signature(), None);

        let tx = RawTransaction {
            signature: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(tx.signature(), None);
    }

    #[test]
    fn test_empty_object_parses() {
        let tx: RawTransaction = serde_json::from_str("{}").unwrap();
        assert!(tx.account_keys().is_empty());
        assert!(tx.log_messages().is_empty());
    }
}
