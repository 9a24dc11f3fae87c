//! RPC Stream Adapter
//!
//! WebSocket event source for Solana JSON-RPC providers.
//!
//! Two subscription flavours:
//! - `transactionSubscribe` filtered by `accountInclude` = burn sentinels
//!   (full transactions with balances, suited to the sentinel strategy)
//! - `logsSubscribe` with `mentions` = one program id
//!   (signature and log lines only, suited to the log-pattern strategy)

mod monitor;
mod types;

pub use monitor::{
    redact_url, RpcStreamBuilder, RpcStreamConfig, RpcStreamError, RpcStreamMonitor,
    DEFAULT_COMMITMENT,
};
pub use types::{subscribe_request, SubscriptionKind};
