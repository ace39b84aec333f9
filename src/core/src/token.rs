//! A minimal fungible token whose balances are tracked per step.
//!
//! [`TracedToken`] owns a [`Ledger`] and routes every balance change through
//! it: each operation first settles all of its legs in [`PendingBalances`]
//! and only then records one checkpoint per affected account.

use crate::batch::PendingBalances;
use crate::errors::CoreError;
use crate::ledger::Ledger;
use crate::types::{format_address, Address, Balance, Step};
use tracing::info;

/// A fungible token backed by a block-indexed balance ledger.
pub struct TracedToken {
    /// The balance history of every holder
    ledger: Ledger,
}

impl TracedToken {
    /// Creates a token over `ledger`.
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable access to the underlying ledger, for administrative writes.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Consumes the token, returning its ledger.
    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    fn settle(&mut self, step: Step, pending: Vec<(Address, Balance)>) -> Result<(), CoreError> {
        self.ledger.record_balances(step, pending)
    }

    /// Mints `amount` to `to` at `step`, returning the new balance.
    pub fn mint(&mut self, to: &Address, amount: Balance, step: Step) -> Result<Balance, CoreError> {
        let mut pending = PendingBalances::new(&self.ledger);
        pending.credit(to, amount)?;
        let balance = pending.balance(to);
        let finals = pending.finish();

        self.settle(step, finals)?;
        info!("Minted {} to {} at step {}", amount, format_address(to), step);
        Ok(balance)
    }

    /// Transfers `amount` from `from` to `to` at `step`.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
        step: Step,
    ) -> Result<(), CoreError> {
        let mut pending = PendingBalances::new(&self.ledger);
        pending.transfer(from, to, amount)?;
        let finals = pending.finish();

        self.settle(step, finals)?;
        info!(
            "Transferred {} from {} to {} at step {}",
            amount,
            format_address(from),
            format_address(to),
            step
        );
        Ok(())
    }

    /// Transfers `amounts[i]` from `from` to `recipients[i]` for every `i`,
    /// all at `step`.
    ///
    /// Each affected account is recorded once with its final balance. If any
    /// leg fails, no balance changes.
    pub fn multiple_transfers(
        &mut self,
        from: &Address,
        recipients: &[Address],
        amounts: &[Balance],
        step: Step,
    ) -> Result<(), CoreError> {
        if recipients.len() != amounts.len() {
            return Err(CoreError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }

        let mut pending = PendingBalances::new(&self.ledger);
        for (to, amount) in recipients.iter().zip(amounts) {
            pending.transfer(from, to, *amount)?;
        }
        let finals = pending.finish();
        let touched = finals.len();

        self.settle(step, finals)?;
        info!(
            "Applied {} transfers from {} at step {} ({} accounts touched)",
            recipients.len(),
            format_address(from),
            step,
            touched
        );
        Ok(())
    }

    /// The latest balance of `account`.
    pub fn balance_of(&self, account: &Address) -> Balance {
        self.ledger.current_balance(account)
    }

    /// The balance of `account` as of `step`.
    pub fn balance_of_at_step(&self, account: &Address, step: Step) -> Balance {
        self.ledger.balance_at_step(account, step)
    }

    /// The sum of all latest balances.
    pub fn total_supply(&self) -> Balance {
        self.ledger
            .accounts()
            .map(|account| self.ledger.current_balance(account))
            .fold(0, Balance::saturating_add)
    }
}
