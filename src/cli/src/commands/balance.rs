//! Balance command for the blocktrace CLI.

use crate::errors::CliError;
use crate::session::{resolve_account, Session};
use blocktrace_core::{Balance, Step};
use tracing::debug;

/// Runs the balance command: the latest balance, or the balance as of `step`.
pub fn run(session: &Session, account: &str, step: Option<Step>) -> Result<Balance, CliError> {
    let addr = resolve_account(account)?;
    let token = session.token();

    let balance = match step {
        Some(step) => token.balance_of_at_step(&addr, step),
        None => token.balance_of(&addr),
    };
    debug!("Balance of {} at {:?}: {}", account, step, balance);

    Ok(balance)
}
