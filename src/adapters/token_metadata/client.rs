//! Token Metadata Client
//!
//! Resolves token names from the Metaplex metadata account derived for a mint.
//! Fetches raw account bytes with `getAccountInfo` (base64 encoding) and runs
//! the printable-run heuristic over them.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{metadata_pda, AccountInfoResponse, TokenMetadata};
use crate::domain::heuristics::display_name_from_bytes;
use crate::domain::sentinels::METADATA_PROGRAM_ID;
use crate::ports::MetadataPort;

/// Errors that can occur when fetching token metadata
#[derive(Debug, Error)]
pub enum TokenMetadataError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid mint address: {0}")]
    InvalidMint(String),

    #[error("Invalid metadata program id: {0}")]
    InvalidProgramId(String),

    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    #[error("RPC error: {0}")]
    RpcError(String),
}

/// Configuration for the TokenMetadataClient
#[derive(Debug, Clone)]
pub struct TokenMetadataConfig {
    /// Solana RPC endpoint URL
    pub rpc_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Program owning the metadata accounts
    pub metadata_program_id: String,
}

impl Default for TokenMetadataConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            timeout: Duration::from_secs(10),
            metadata_program_id: METADATA_PROGRAM_ID.to_string(),
        }
    }
}

impl TokenMetadataConfig {
    /// Create config with a custom RPC URL
    pub fn with_rpc_url(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }
}

/// Client for resolving token names from on-chain metadata
#[derive(Debug, Clone)]
pub struct TokenMetadataClient {
    config: TokenMetadataConfig,
    program_id: Pubkey,
    http: Client,
}

impl TokenMetadataClient {
    /// Create a new TokenMetadataClient with default configuration
    pub fn new() -> Result<Self, TokenMetadataError> {
        Self::with_config(TokenMetadataConfig::default())
    }

    /// Create a new TokenMetadataClient with a custom RPC URL
    pub fn with_rpc_url(rpc_url: impl Into<String>) -> Result<Self, TokenMetadataError> {
        Self::with_config(TokenMetadataConfig::with_rpc_url(rpc_url))
    }

    /// Create a new TokenMetadataClient with custom configuration
    pub fn with_config(config: TokenMetadataConfig) -> Result<Self, TokenMetadataError> {
        let program_id = Pubkey::from_str(&config.metadata_program_id)
            .map_err(|_| TokenMetadataError::InvalidProgramId(config.metadata_program_id.clone()))?;
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            program_id,
            http,
        })
    }

    /// Metadata account address for a mint
    pub fn metadata_address(&self, mint: &str) -> Result<Pubkey, TokenMetadataError> {
        let mint = Pubkey::from_str(mint)
            .map_err(|_| TokenMetadataError::InvalidMint(mint.to_string()))?;
        Ok(metadata_pda(&mint, &self.program_id))
    }

    /// Fetch metadata for a mint. A missing metadata account is not an error.
    pub async fn get_token_metadata(&self, mint: &str) -> Result<TokenMetadata, TokenMetadataError> {
        let address = self.metadata_address(mint)?;
        let response = self.get_account_info(&address).await?;

        match Self::parse_account_data(response)? {
            Some(data) => Ok(TokenMetadata::new(mint, display_name_from_bytes(&data))),
            None => {
                debug!(%mint, %address, "No metadata account");
                Ok(TokenMetadata::unnamed(mint))
            }
        }
    }

    /// Internal: one getAccountInfo call, no retries
    async fn get_account_info(&self, address: &Pubkey) -> Result<AccountInfoResponse, TokenMetadataError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [
                address.to_string(),
                {
                    "encoding": "base64"
                }
            ]
        });

        let response = self
            .http
            .post(&self.config.rpc_url)
            .json(&request_body)
            // provider URLs often embed an api key
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenMetadataError::RpcError(format!("HTTP status {}", status)));
        }

        response.json().await.map_err(|e| {
            TokenMetadataError::ParseError(format!("Failed to parse JSON: {}", e.without_url()))
        })
    }

    /// Decode account bytes from the response; `None` when the account doesn't exist
    fn parse_account_data(response: AccountInfoResponse) -> Result<Option<Vec<u8>>, TokenMetadataError> {
        if let Some(error) = response.error {
            return Err(TokenMetadataError::RpcError(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }

        let result = response
            .result
            .ok_or_else(|| TokenMetadataError::RpcError("No result in response".into()))?;

        let Some(value) = result.value else {
            return Ok(None);
        };

        match value.data.as_slice() {
            [payload, encoding] if encoding == "base64" => BASE64
                .decode(payload)
                .map(Some)
                .map_err(|e| TokenMetadataError::InvalidAccountData(e.to_string())),
            other => Err(TokenMetadataError::InvalidAccountData(format!(
                "Expected [data, \"base64\"], got {} element(s)",
                other.len()
            ))),
        }
    }

    /// Get the configured RPC URL
    pub fn rpc_url(&self) -> &str {
        &self.config.rpc_url
    }
}

#[async_trait]
impl MetadataPort for TokenMetadataClient {
    async fn resolve_name(&self, mint_address: &str) -> Option<String> {
        match self.get_token_metadata(mint_address).await {
            Ok(metadata) => metadata.display_name,
            Err(e) => {
                warn!(mint = %mint_address, "Metadata lookup failed: {}", e);
                None
            }
        }
    }
}
