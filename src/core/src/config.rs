//! Configuration for the ledger.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Ledger`](crate::ledger::Ledger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Seed every new history with a `{step: 0, balance: 0}` checkpoint
    /// before its first real write at a step above zero.
    pub seed_genesis: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { seed_genesis: true }
    }
}
