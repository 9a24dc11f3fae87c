//! Application Layer - Use cases
//!
//! - `pipeline`: burn detection and notification for every inbound record

pub mod pipeline;

pub use pipeline::{BurnPipeline, PipelineOutcome, PipelineSettings, MAX_CONCURRENT_EVENTS};
