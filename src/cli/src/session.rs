//! A CLI session over a persisted ledger.

use crate::config::CliConfig;
use crate::errors::CliError;
use blocktrace_core::types::{address_from_label, parse_address};
use blocktrace_core::{Address, Ledger, Step, StepClock, TracedToken};
use std::fs;
use tracing::debug;

/// An opened ledger together with the persisted head step.
///
/// Mutating commands execute at the head step; `advance` moves it forward.
pub struct Session {
    /// The token driving the ledger
    token: TracedToken,
    /// The head step
    clock: StepClock,
}

impl Session {
    /// Opens the ledger in the configured data directory, creating it if needed.
    pub fn open(config: &CliConfig) -> Result<Self, CliError> {
        let path = config.ledger_path();
        fs::create_dir_all(&path)?;

        let ledger = Ledger::open(&path, config.ledger)?;
        let head = match ledger.store() {
            Some(store) => store.load_head()?.unwrap_or(0),
            None => 0,
        };
        debug!("Opened ledger at {} with head step {}", path.display(), head);

        Ok(Self {
            token: TracedToken::new(ledger),
            clock: StepClock::new(head),
        })
    }

    /// The token over the opened ledger.
    pub fn token(&self) -> &TracedToken {
        &self.token
    }

    /// Mutable access to the token.
    pub fn token_mut(&mut self) -> &mut TracedToken {
        &mut self.token
    }

    /// The head step.
    pub fn head(&self) -> Step {
        self.clock.current()
    }

    /// Moves the head step forward by `steps` and persists it.
    pub fn advance(&mut self, steps: Step) -> Result<Step, CliError> {
        let head = self.clock.advance(steps);
        if let Some(store) = self.token.ledger().store() {
            store.save_head(head)?;
        }
        Ok(head)
    }
}

/// Resolves an account argument: a 64-digit hex address (optionally
/// `0x`-prefixed) or, failing that, a label hashed into an address.
pub fn resolve_account(arg: &str) -> Result<Address, CliError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CliError::InvalidAccount("empty account".to_string()));
    }

    match parse_address(arg) {
        Ok(addr) => Ok(addr),
        Err(e) if arg.starts_with("0x") => Err(CliError::InvalidAccount(e.to_string())),
        Err(_) => Ok(address_from_label(arg)),
    }
}
