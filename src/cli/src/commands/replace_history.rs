//! Replace-history command for the blocktrace CLI.
//!
//! Administrative: overwrites an account's history with the checkpoints in a
//! JSON file, e.g. `[{"step": 0, "balance": 0}, {"step": 10, "balance": 10}]`.
//! Duplicate steps are kept as given.

use crate::errors::CliError;
use crate::session::{resolve_account, Session};
use blocktrace_core::Checkpoint;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Runs the replace-history command, returning the new history length.
pub fn run<P: AsRef<Path>>(session: &mut Session, account: &str, file: P) -> Result<usize, CliError> {
    let addr = resolve_account(account)?;

    let mut contents = String::new();
    File::open(file)?.read_to_string(&mut contents)?;
    let checkpoints: Vec<Checkpoint> = serde_json::from_str(&contents)?;

    if checkpoints.windows(2).any(|w| w[0].step > w[1].step) {
        warn!("Replacement history for {} is not ordered by step", account);
    }

    let length = checkpoints.len();
    session
        .token_mut()
        .ledger_mut()
        .replace_history(&addr, checkpoints)?;

    Ok(length)
}
