//! Advance command for the blocktrace CLI.

use crate::errors::CliError;
use crate::session::Session;
use blocktrace_core::Step;

/// Runs the advance command, moving the head step forward by `steps`.
pub fn run(session: &mut Session, steps: Step) -> Result<Step, CliError> {
    if steps == 0 {
        return Err(CliError::InvalidArgument("steps must be positive".to_string()));
    }

    session.advance(steps)
}
