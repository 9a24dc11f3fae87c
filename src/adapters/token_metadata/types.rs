//! Token Metadata Types
//!
//! Resolved metadata plus the `getAccountInfo` wire types (base64 encoding).

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Seed prefix of Metaplex metadata accounts
pub const METADATA_SEED: &[u8] = b"metadata";

/// Display metadata resolved for a token mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token mint address
    pub mint_address: String,
    /// Human-readable name, if the metadata account exists and yields one
    pub display_name: Option<String>,
}

impl TokenMetadata {
    pub fn new(mint_address: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            mint_address: mint_address.into(),
            display_name,
        }
    }

    /// Metadata for a mint with no metadata account
    pub fn unnamed(mint_address: impl Into<String>) -> Self {
        Self::new(mint_address, None)
    }
}

/// Derive the metadata account for a mint.
///
/// Seeds are `["metadata", program_id, mint]` under the metadata program.
pub fn metadata_pda(mint: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (address, _bump) = Pubkey::find_program_address(
        &[METADATA_SEED, program_id.as_ref(), mint.as_ref()],
        program_id,
    );
    address
}

/// Solana RPC response for getAccountInfo
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default)]
    pub result: Option<AccountInfoResult>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResult {
    pub value: Option<AccountInfoValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoValue {
    /// `[payload, encoding]`
    pub data: Vec<String>,
    #[serde(default)]
    pub executable: bool,
    #[serde(default)]
    pub lamports: u64,
    #[serde(default)]
    pub owner: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentinels::metadata_program_pubkey;
    use std::str::FromStr;

    #[test]
    fn test_metadata_pda_is_deterministic() {
        let mint = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        let program = metadata_program_pubkey();

        let first = metadata_pda(&mint, &program);
        let second = metadata_pda(&mint, &program);
        assert_eq!(first, second);
        assert_ne!(first, mint);
    }

    #[test]
    fn test_metadata_pda_differs_per_mint() {
        let program = metadata_program_pubkey();
        let a = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        let b = Pubkey::from_str("So11111111111111111111111111111111111111112").unwrap();
        assert_ne!(metadata_pda(&a, &program), metadata_pda(&b, &program));
    }

    #[test]
    fn test_metadata_pda_is_off_curve() {
        let program = metadata_program_pubkey();
        let mint = Pubkey::from_str("So11111111111111111111111111111111111111112").unwrap();
        assert!(!metadata_pda(&mint, &program).is_on_curve());
    }

    #[test]
    fn test_parse_account_info_response() {
        let json = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 1 },
                "value": {
                    "data": ["AAAA", "base64"],
                    "executable": false,
                    "lamports": 5616720,
                    "owner": "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s",
                    "rentEpoch": 18446744073709551615,
                    "space": 679
                }
            }
        }"#;

        let response: AccountInfoResponse = serde_json::from_str(json).unwrap();
        let value = response.result.unwrap().value.unwrap();
        assert_eq!(value.data, vec!["AAAA".to_string(), "base64".to_string()]);
        assert_eq!(value.owner, "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
    }

    #[test]
    fn test_parse_rpc_error_response() {
        let json = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid param" }
        }"#;

        let response: AccountInfoResponse = serde_json::from_str(json).unwrap();
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
