//! Token Metadata Adapter
//!
//! Resolves a human-readable token name for a mint:
//! - Derives the Metaplex metadata account (`["metadata", program, mint]`)
//! - Fetches its raw bytes with `getAccountInfo` (base64 encoding)
//! - Picks a name with the printable-run heuristic
//!
//! Every failure degrades to "no name"; nothing propagates to the pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use burnwatch::adapters::token_metadata::TokenMetadataClient;
//! use burnwatch::ports::MetadataPort;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TokenMetadataClient::with_rpc_url("https://api.mainnet-beta.solana.com")?;
//!     let name = client.resolve_name("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").await;
//!     println!("{}", name.unwrap_or_else(|| "unknown".into()));
//!     Ok(())
//! }
//! ```

mod client;
mod types;

pub use client::{TokenMetadataClient, TokenMetadataConfig, TokenMetadataError};
pub use types::{metadata_pda, TokenMetadata};
