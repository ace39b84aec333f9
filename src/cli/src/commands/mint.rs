//! Mint command for the blocktrace CLI.

use crate::errors::CliError;
use crate::session::{resolve_account, Session};
use blocktrace_core::{Balance, Step};

/// Runs the mint command at the head step, returning the step and the
/// recipient's new balance.
pub fn run(session: &mut Session, to: &str, amount: Balance) -> Result<(Step, Balance), CliError> {
    if amount == 0 {
        return Err(CliError::InvalidArgument("amount must be positive".to_string()));
    }

    let addr = resolve_account(to)?;
    let step = session.head();
    let balance = session.token_mut().mint(&addr, amount, step)?;

    Ok((step, balance))
}
