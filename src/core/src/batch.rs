//! Aggregation of multi-leg balance effects within one step.
//!
//! A logical operation (a fan-out transfer, say) may touch the same account
//! several times. [`PendingBalances`] applies every leg against a working copy
//! of the affected balances and yields one final balance per account, so the
//! ledger never records an intermediate value.

use crate::errors::CoreError;
use crate::ledger::Ledger;
use crate::types::{Address, Balance};
use std::collections::HashMap;

/// Working balances for the accounts touched by one operation.
pub struct PendingBalances<'a> {
    /// The ledger the starting balances are read from
    ledger: &'a Ledger,
    /// Touched accounts in first-touch order with their working balance
    touched: Vec<(Address, Balance)>,
    /// Position of each account in `touched`
    positions: HashMap<Address, usize>,
}

impl<'a> PendingBalances<'a> {
    /// Starts an empty set of pending changes against `ledger`.
    pub fn new(ledger: &'a Ledger) -> Self {
        Self {
            ledger,
            touched: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn slot(&mut self, account: &Address) -> &mut Balance {
        let index = match self.positions.get(account) {
            Some(&index) => index,
            None => {
                let index = self.touched.len();
                self.touched
                    .push((*account, self.ledger.current_balance(account)));
                self.positions.insert(*account, index);
                index
            }
        };
        &mut self.touched[index].1
    }

    /// The working balance of `account`.
    pub fn balance(&self, account: &Address) -> Balance {
        match self.positions.get(account) {
            Some(&index) => self.touched[index].1,
            None => self.ledger.current_balance(account),
        }
    }

    /// Adds `amount` to `account`.
    pub fn credit(&mut self, account: &Address, amount: Balance) -> Result<(), CoreError> {
        let slot = self.slot(account);
        *slot = slot.checked_add(amount).ok_or(CoreError::BalanceOverflow)?;
        Ok(())
    }

    /// Subtracts `amount` from `account`.
    pub fn debit(&mut self, account: &Address, amount: Balance) -> Result<(), CoreError> {
        let slot = self.slot(account);
        if *slot < amount {
            return Err(CoreError::InsufficientBalance {
                required: amount,
                available: *slot,
            });
        }
        *slot -= amount;
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Balance) -> Result<(), CoreError> {
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    /// Number of distinct accounts touched so far.
    pub fn len(&self) -> usize {
        self.touched.len()
    }

    /// Whether no account has been touched.
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// The final balance of every touched account, one entry per account.
    pub fn finish(self) -> Vec<(Address, Balance)> {
        self.touched
    }
}
