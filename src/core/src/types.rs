//! Core types for block-indexed balance history.

use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte opaque account identifier.
pub type Address = [u8; 32];

/// Token balance, represented as a 128-bit unsigned integer.
pub type Balance = u128;

/// A discrete point in the execution environment's timeline (a block height).
pub type Step = u64;

/// A recorded `(step, balance)` pair: the account's balance became `balance`
/// as of the end of `step`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    /// The step at which the balance took effect
    pub step: Step,
    /// The balance after every change in that step
    pub balance: Balance,
}

impl Checkpoint {
    /// Creates a new checkpoint.
    pub fn new(step: Step, balance: Balance) -> Self {
        Self { step, balance }
    }

    /// The synthetic zero entry a history may start with.
    pub fn genesis() -> Self {
        Self { step: 0, balance: 0 }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checkpoint {{ step: {}, balance: {} }}", self.step, self.balance)
    }
}

/// Derives an address from a human-readable label by hashing it with SHA-256.
pub fn address_from_label(label: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(label.as_bytes());

    let result = hasher.finalize();
    let mut addr = [0u8; 32];
    addr.copy_from_slice(&result);
    addr
}

/// Parses a 64-digit hex address, with or without a `0x` prefix.
pub fn parse_address(s: &str) -> Result<Address, CoreError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| CoreError::InvalidAddress(format!("{}: {}", s, e)))?;

    if bytes.len() != 32 {
        return Err(CoreError::InvalidAddress(format!(
            "{}: expected 32 bytes, got {}",
            s,
            bytes.len()
        )));
    }

    let mut addr = [0u8; 32];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Formats an address as `0x`-prefixed hex.
pub fn format_address(addr: &Address) -> String {
    format!("0x{}", hex::encode(addr))
}
