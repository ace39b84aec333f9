//! Transfer commands for the blocktrace CLI.

use crate::errors::CliError;
use crate::session::{resolve_account, Session};
use blocktrace_core::{Balance, Step};
use tracing::info;

/// Runs the transfer command at the head step.
pub fn run(session: &mut Session, from: &str, to: &str, amount: Balance) -> Result<Step, CliError> {
    let from_addr = resolve_account(from)?;
    let to_addr = resolve_account(to)?;
    let step = session.head();

    session
        .token_mut()
        .transfer(&from_addr, &to_addr, amount, step)?;

    Ok(step)
}

/// Runs the batch-transfer command: every leg executes at the head step and
/// each affected account gets one checkpoint.
pub fn run_batch(
    session: &mut Session,
    from: &str,
    recipients: &[String],
    amounts: &[Balance],
) -> Result<Step, CliError> {
    if recipients.is_empty() {
        return Err(CliError::InvalidArgument("no recipients given".to_string()));
    }

    let from_addr = resolve_account(from)?;
    let recipient_addrs = recipients
        .iter()
        .map(|r| resolve_account(r))
        .collect::<Result<Vec<_>, _>>()?;
    let step = session.head();

    info!("Batch transfer of {} legs from {}", recipients.len(), from);
    session
        .token_mut()
        .multiple_transfers(&from_addr, &recipient_addrs, amounts, step)?;

    Ok(step)
}
