//! Metadata Port
//!
//! Resolves a token mint to a human-readable name.

use async_trait::async_trait;

/// Token name lookup.
///
/// Implementations never fail past this boundary: a missing account, a
/// transport error, or an undecodable layout all resolve to `None`.
#[async_trait]
pub trait MetadataPort: Send + Sync {
    async fn resolve_name(&self, mint_address: &str) -> Option<String>;
}
