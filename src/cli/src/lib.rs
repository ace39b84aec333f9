//! Operator CLI for a persisted block-indexed balance ledger.

pub mod commands;
pub mod config;
pub mod errors;
pub mod session;

// Re-export commonly used types and functions
pub use commands::{advance, balance, history, mint, replace_history, transfer};
pub use config::CliConfig;
pub use errors::CliError;
pub use session::Session;
