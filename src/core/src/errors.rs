//! Error types for the core crate.

use crate::types::{Balance, Step};
use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error when reading a checkpoint index beyond the end of a history.
    #[error("Index out of bounds: index {index}, history length {length}")]
    IndexOutOfBounds {
        /// The requested index
        index: usize,
        /// The current history length
        length: usize,
    },

    /// Error when a write targets a step older than the last recorded one.
    #[error("Step regression: last recorded step {last}, attempted step {step}")]
    StepRegression {
        /// The step of the last checkpoint
        last: Step,
        /// The step that was attempted
        step: Step,
    },

    /// Error when a debit exceeds the available balance.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// The required balance
        required: Balance,
        /// The available balance
        available: Balance,
    },

    /// Error when a batch transfer has mismatched recipient and amount lists.
    #[error("Length mismatch: {recipients} recipients, {amounts} amounts")]
    LengthMismatch {
        /// Number of recipients
        recipients: usize,
        /// Number of amounts
        amounts: usize,
    },

    /// Error when a credit would overflow the balance type.
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Error when an address cannot be parsed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when serialization or deserialization fails.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error when the backing store fails.
    #[error("Storage error: {0}")]
    StorageError(String),
}
