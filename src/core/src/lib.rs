//! Block-indexed balance history for fungible-token ledgers.
//!
//! This crate answers "what was account A's balance as of step B?" by keeping,
//! per account, a compact ordered history of checkpoints and searching it with
//! a binary search. At most one checkpoint is stored per account per step.

pub mod batch;
pub mod clock;
pub mod config;
pub mod errors;
pub mod history;
pub mod ledger;
pub mod store;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use clock::StepClock;
pub use config::LedgerConfig;
pub use errors::CoreError;
pub use history::{History, RecordOutcome};
pub use ledger::Ledger;
pub use store::HistoryStore;
pub use token::TracedToken;
pub use types::{Address, Balance, Checkpoint, Step};
