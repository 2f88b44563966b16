//! This module provides `Replay`, a cursor over a recorded execution. It keeps the initial
//! configuration, the diff of every step and one live configuration, and moves the live
//! configuration back and forth by applying diffs.

use crate::configuration::Configuration;
use crate::diff::ConfigDiff;
use crate::types::TuringMachineError;

/// Navigates an execution recorded as diffs.
#[derive(Debug, Clone)]
pub struct Replay {
    initial: Configuration,
    diffs: Vec<ConfigDiff>,
    current: Configuration,
    position: usize,
}

impl Replay {
    /// Creates a cursor at step 0 of the execution starting at `initial`.
    pub fn new(initial: Configuration, diffs: Vec<ConfigDiff>) -> Self {
        Self {
            current: initial.clone(),
            initial,
            diffs,
            position: 0,
        }
    }

    /// The number of steps applied to reach the current configuration.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of recorded steps.
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn current(&self) -> &Configuration {
        &self.current
    }

    pub fn diffs(&self) -> &[ConfigDiff] {
        &self.diffs
    }

    /// Moves one step forward. Returns `false` at the end of the execution.
    pub fn forward(&mut self) -> Result<bool, TuringMachineError> {
        let Some(diff) = self.diffs.get(self.position) else {
            return Ok(false);
        };

        self.current.apply_diff(diff)?;
        self.position += 1;
        Ok(true)
    }

    /// Moves one step backward. Returns `false` at the initial configuration.
    pub fn backward(&mut self) -> Result<bool, TuringMachineError> {
        let Some(index) = self.position.checked_sub(1) else {
            return Ok(false);
        };

        self.current.apply_reverse_diff(&self.diffs[index])?;
        self.position = index;
        Ok(true)
    }

    /// Moves to step `index`, clamped to the end of the execution.
    pub fn seek(&mut self, index: usize) -> Result<(), TuringMachineError> {
        let target = index.min(self.diffs.len());

        // Replaying from the start is cheaper than undoing most of the trace.
        if target < self.position && target < self.position - target {
            self.rewind();
        }

        while self.position < target {
            self.forward()?;
        }
        while self.position > target {
            self.backward()?;
        }

        Ok(())
    }

    /// Moves back to the initial configuration.
    pub fn rewind(&mut self) {
        self.current = self.initial.clone();
        self.position = 0;
    }

    /// Moves to the final configuration.
    pub fn to_end(&mut self) -> Result<(), TuringMachineError> {
        self.seek(self.diffs.len())
    }
}
