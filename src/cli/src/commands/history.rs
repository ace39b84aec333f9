//! History command for the blocktrace CLI.

use crate::errors::CliError;
use crate::session::{resolve_account, Session};
use blocktrace_core::Checkpoint;

/// Runs the history command, returning every checkpoint of `account` in order.
pub fn run(session: &Session, account: &str) -> Result<Vec<Checkpoint>, CliError> {
    let addr = resolve_account(account)?;
    let ledger = session.token().ledger();

    let length = ledger.history_length(&addr);
    let checkpoints = (0..length)
        .map(|index| ledger.checkpoint_at(&addr, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(checkpoints)
}
