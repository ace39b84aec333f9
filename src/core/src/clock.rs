//! A synthetic execution-environment step counter.

use crate::types::Step;

/// A monotonic step counter standing in for the execution environment's
/// block height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepClock {
    current: Step,
}

impl StepClock {
    /// Creates a clock positioned at `start`.
    pub fn new(start: Step) -> Self {
        Self { current: start }
    }

    /// The current step.
    pub fn current(&self) -> Step {
        self.current
    }

    /// Moves the clock forward by `steps` and returns the new current step.
    pub fn advance(&mut self, steps: Step) -> Step {
        self.current = self.current.saturating_add(steps);
        self.current
    }

    /// Moves the clock forward by one step and returns it.
    pub fn tick(&mut self) -> Step {
        self.advance(1)
    }
}
