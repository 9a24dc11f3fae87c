//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Token metadata lookups (name resolution)
//! - Message delivery (Telegram)
//! - Upstream event sources (RPC socket, webhook)

pub mod event_source;
pub mod metadata;
pub mod mocks;
pub mod notifier;

pub use event_source::{EventSource, EventSourceError};
pub use metadata::MetadataPort;
pub use notifier::{NotifierPort, NotifyError};
