//! CLI Adapter
//!
//! Command-line interface for burnwatch.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, RegisterWebhookCmd, ResolveCmd, RunCmd, SendTestCmd};
