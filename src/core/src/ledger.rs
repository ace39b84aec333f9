//! The ledger of per-account checkpoint histories.

use crate::config::LedgerConfig;
use crate::errors::CoreError;
use crate::history::{CheckpointWrite, History, RecordOutcome};
use crate::store::HistoryStore;
use crate::types::{format_address, Address, Balance, Checkpoint, Step};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Maps every account to its checkpoint history.
///
/// Accounts are created lazily: an account without a history has balance 0
/// at every step. When backed by a [`HistoryStore`], every write is persisted
/// before it becomes visible in memory, so a failed write leaves both sides
/// unchanged.
pub struct Ledger {
    /// Checkpoint histories by account
    histories: HashMap<Address, History>,
    /// Write policy configuration
    config: LedgerConfig,
    /// Optional persistent backing
    store: Option<HistoryStore>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Ledger {
    /// Creates an empty in-memory ledger.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            histories: HashMap::new(),
            config,
            store: None,
        }
    }

    /// Opens a persistent ledger at the given path, loading existing histories.
    pub fn open<P: AsRef<Path>>(path: P, config: LedgerConfig) -> Result<Self, CoreError> {
        Self::with_store(HistoryStore::open(path)?, config)
    }

    /// Creates a ledger backed by `store`, loading existing histories.
    pub fn with_store(store: HistoryStore, config: LedgerConfig) -> Result<Self, CoreError> {
        let histories = store.load_histories()?;
        Ok(Self {
            histories,
            config,
            store: Some(store),
        })
    }

    /// The ledger configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The persistent backing, if any.
    pub fn store(&self) -> Option<&HistoryStore> {
        self.store.as_ref()
    }

    /// Records that `account`'s balance became `balance` as of `step`.
    ///
    /// Appends a checkpoint for a new step and overwrites the trailing one for
    /// the same step. Fails with [`CoreError::StepRegression`] if `step` is
    /// older than the account's last checkpoint.
    pub fn record_balance(
        &mut self,
        account: &Address,
        step: Step,
        balance: Balance,
    ) -> Result<RecordOutcome, CoreError> {
        let plan = self.plan(account, step, balance)?;
        let outcomes = self.commit(vec![(*account, plan)])?;
        Ok(outcomes[0])
    }

    /// Records the final balances of several accounts for one step.
    ///
    /// Every update is validated before anything is written; if any account
    /// would regress, no history changes. An account listed more than once is
    /// recorded once, with its last listed balance.
    pub fn record_balances<I>(&mut self, step: Step, updates: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = (Address, Balance)>,
    {
        let mut finals: Vec<(Address, Balance)> = Vec::new();
        let mut positions: HashMap<Address, usize> = HashMap::new();
        for (account, balance) in updates {
            match positions.get(&account) {
                Some(&i) => finals[i].1 = balance,
                None => {
                    positions.insert(account, finals.len());
                    finals.push((account, balance));
                }
            }
        }

        let plans = finals
            .iter()
            .map(|(account, balance)| Ok((*account, self.plan(account, step, *balance)?)))
            .collect::<Result<Vec<_>, CoreError>>()?;

        self.commit(plans)?;
        Ok(())
    }

    fn plan(
        &self,
        account: &Address,
        step: Step,
        balance: Balance,
    ) -> Result<Vec<CheckpointWrite>, CoreError> {
        let planned = match self.histories.get(account) {
            Some(history) => history.plan(step, balance, self.config.seed_genesis),
            None => History::new().plan(step, balance, self.config.seed_genesis),
        };

        planned.map_err(|e| {
            warn!("Rejected checkpoint for {}: {}", format_address(account), e);
            e
        })
    }

    fn commit(
        &mut self,
        plans: Vec<(Address, Vec<CheckpointWrite>)>,
    ) -> Result<Vec<RecordOutcome>, CoreError> {
        if let Some(store) = &self.store {
            store.commit(&plans)?;
        }

        let mut outcomes = Vec::with_capacity(plans.len());
        for (account, writes) in plans {
            let outcome = self.histories.entry(account).or_default().apply(&writes);
            if let Some(last) = writes.last() {
                debug!(
                    "{:?} checkpoint for {} at step {}: balance {}",
                    outcome,
                    format_address(&account),
                    last.checkpoint.step,
                    last.checkpoint.balance
                );
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// The latest balance of `account`, or 0 if it has no history.
    pub fn current_balance(&self, account: &Address) -> Balance {
        self.histories.get(account).map_or(0, History::latest)
    }

    /// The balance of `account` in effect at `step`.
    ///
    /// Returns 0 for unknown accounts and for steps before the first
    /// checkpoint, and the latest balance for any step at or past the last one.
    pub fn balance_at_step(&self, account: &Address, step: Step) -> Balance {
        self.histories
            .get(account)
            .map_or(0, |history| history.balance_at(step))
    }

    /// Number of checkpoints stored for `account`.
    pub fn history_length(&self, account: &Address) -> usize {
        self.histories.get(account).map_or(0, History::len)
    }

    /// The checkpoint of `account` at `index`.
    pub fn checkpoint_at(&self, account: &Address, index: usize) -> Result<Checkpoint, CoreError> {
        match self.histories.get(account) {
            Some(history) => history.get(index),
            None => Err(CoreError::IndexOutOfBounds { index, length: 0 }),
        }
    }

    /// Replaces the whole history of `account` verbatim.
    ///
    /// Administrative: intended for fixtures and data migration only. The
    /// one-checkpoint-per-step policy is not enforced, so the result may hold
    /// duplicate steps.
    pub fn replace_history(
        &mut self,
        account: &Address,
        checkpoints: Vec<Checkpoint>,
    ) -> Result<(), CoreError> {
        let old_len = self.history_length(account);
        if let Some(store) = &self.store {
            store.replace(account, old_len, &checkpoints)?;
        }

        info!(
            "Replaced history of {}: {} -> {} checkpoints",
            format_address(account),
            old_len,
            checkpoints.len()
        );
        self.histories
            .insert(*account, History::from_checkpoints(checkpoints));
        Ok(())
    }

    /// The history of `account`, if it has one.
    pub fn history(&self, account: &Address) -> Option<&History> {
        self.histories.get(account)
    }

    /// Every account with a history.
    pub fn accounts(&self) -> impl Iterator<Item = &Address> {
        self.histories.keys()
    }
}
