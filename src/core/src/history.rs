//! Per-account checkpoint history.
//!
//! A [`History`] is an ordered sequence of [`Checkpoint`]s. Under the normal
//! write path steps are non-decreasing and there is at most one checkpoint per
//! step: a write at the same step as the trailing checkpoint overwrites it
//! instead of appending. Histories built with [`History::from_checkpoints`]
//! bypass that policy and may hold several checkpoints for one step.

use crate::errors::CoreError;
use crate::types::{Balance, Checkpoint, Step};
use serde::{Deserialize, Serialize};

/// A single positional write produced by the write policy.
///
/// `index == len` appends, `index < len` overwrites in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckpointWrite {
    /// Position in the history
    pub index: usize,
    /// The checkpoint stored at that position
    pub checkpoint: Checkpoint,
}

/// What a call to [`History::record`] did to the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new checkpoint was appended (possibly after a genesis entry).
    Appended,
    /// The trailing checkpoint for the same step was overwritten.
    Overwritten,
}

/// The ordered checkpoint history of one account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    checkpoints: Vec<Checkpoint>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history verbatim, without applying the write policy.
    pub fn from_checkpoints(checkpoints: Vec<Checkpoint>) -> Self {
        Self { checkpoints }
    }

    /// Computes the writes needed to record `balance` as of `step`.
    ///
    /// Does not modify the history. Fails with [`CoreError::StepRegression`]
    /// if `step` is older than the trailing checkpoint.
    pub fn plan(
        &self,
        step: Step,
        balance: Balance,
        seed_genesis: bool,
    ) -> Result<Vec<CheckpointWrite>, CoreError> {
        let checkpoint = Checkpoint::new(step, balance);
        let len = self.checkpoints.len();

        let writes = match self.checkpoints.last() {
            Some(last) if step < last.step => {
                return Err(CoreError::StepRegression {
                    last: last.step,
                    step,
                });
            }
            Some(last) if step == last.step => vec![CheckpointWrite {
                index: len - 1,
                checkpoint,
            }],
            Some(_) => vec![CheckpointWrite { index: len, checkpoint }],
            None if seed_genesis && step > 0 => vec![
                CheckpointWrite {
                    index: 0,
                    checkpoint: Checkpoint::genesis(),
                },
                CheckpointWrite { index: 1, checkpoint },
            ],
            None => vec![CheckpointWrite { index: 0, checkpoint }],
        };

        Ok(writes)
    }

    /// Applies writes produced by [`History::plan`].
    pub fn apply(&mut self, writes: &[CheckpointWrite]) -> RecordOutcome {
        let mut outcome = RecordOutcome::Appended;
        for write in writes {
            if write.index < self.checkpoints.len() {
                self.checkpoints[write.index] = write.checkpoint;
                outcome = RecordOutcome::Overwritten;
            } else {
                debug_assert_eq!(write.index, self.checkpoints.len());
                self.checkpoints.push(write.checkpoint);
            }
        }
        outcome
    }

    /// Records `balance` as of `step`: appends for a new step, overwrites the
    /// trailing checkpoint for the same step.
    pub fn record(
        &mut self,
        step: Step,
        balance: Balance,
        seed_genesis: bool,
    ) -> Result<RecordOutcome, CoreError> {
        let writes = self.plan(step, balance, seed_genesis)?;
        Ok(self.apply(&writes))
    }

    /// The balance of the trailing checkpoint, or 0 for an empty history.
    pub fn latest(&self) -> Balance {
        self.checkpoints.last().map_or(0, |c| c.balance)
    }

    /// The balance in effect at `step`.
    ///
    /// Finds the rightmost checkpoint whose step is `<= step`, so among
    /// checkpoints sharing a step the last inserted one wins. Returns 0 when
    /// every checkpoint is later than `step`.
    pub fn balance_at(&self, step: Step) -> Balance {
        let upper = self.checkpoints.partition_point(|c| c.step <= step);
        match upper {
            0 => 0,
            n => self.checkpoints[n - 1].balance,
        }
    }

    /// The checkpoint at `index`.
    pub fn get(&self, index: usize) -> Result<Checkpoint, CoreError> {
        self.checkpoints
            .get(index)
            .copied()
            .ok_or(CoreError::IndexOutOfBounds {
                index,
                length: self.checkpoints.len(),
            })
    }

    /// The trailing checkpoint, if any.
    pub fn last(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    /// Number of stored checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Whether the history has no checkpoints.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// The checkpoints in insertion order.
    pub fn as_slice(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Iterates over the checkpoints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }
}
