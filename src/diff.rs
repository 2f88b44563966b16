//! This module defines `ConfigDiff`, the compact record of a single step. A diff is enough to
//! move a configuration one step forward or backward, so an execution trace can be replayed
//! in both directions without storing a full tape snapshot per step.

use crate::configuration::Configuration;
use crate::types::{TuringMachineError, BLANK_SYMBOL};
use serde::{Deserialize, Serialize};

/// The change between two temporally adjacent configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDiff {
    /// The state before the step.
    pub old_state: String,
    /// The state after the step.
    pub new_state: String,
    /// The symbols scanned before the step.
    pub old_symbols: Vec<char>,
    /// The symbols found after the step at the head positions from before the step.
    pub new_symbols: Vec<char>,
    /// The per-tape head movement.
    pub heads_move: Vec<isize>,
    /// The per-tape change in tape length.
    pub tapes_len_diff: Vec<isize>,
}

impl ConfigDiff {
    /// Computes the diff between `old` and its successor `new`.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigDiff)` describing the step.
    /// * `Err(TuringMachineError::DiffTapeCountMismatch)` if the tape counts differ.
    pub fn between(old: &Configuration, new: &Configuration) -> Result<Self, TuringMachineError> {
        if old.tapes.len() != new.tapes.len() {
            return Err(TuringMachineError::DiffTapeCountMismatch(
                old.tapes.len(),
                new.tapes.len(),
            ));
        }

        let old_lens: Vec<usize> = old.tapes.iter().map(Vec::len).collect();
        Ok(Self::record(
            old.state.clone(),
            old.symbols(),
            &old.heads,
            &old_lens,
            new,
        ))
    }

    /// Builds a diff from the facts captured before a step and the configuration after it.
    pub(crate) fn record(
        old_state: String,
        old_symbols: Vec<char>,
        old_heads: &[usize],
        old_lens: &[usize],
        new: &Configuration,
    ) -> Self {
        // The head may have moved away from the cell it wrote, or the cell may have been
        // trimmed off the tape; a trimmed cell reads as blank.
        let new_symbols = new
            .tapes
            .iter()
            .zip(old_heads)
            .map(|(tape, &pos)| tape.get(pos).copied().unwrap_or(BLANK_SYMBOL))
            .collect();

        let heads_move = new
            .heads
            .iter()
            .zip(old_heads)
            .map(|(&new_pos, &old_pos)| new_pos as isize - old_pos as isize)
            .collect();

        let tapes_len_diff = new
            .tapes
            .iter()
            .zip(old_lens)
            .map(|(tape, &old_len)| tape.len() as isize - old_len as isize)
            .collect();

        Self {
            old_state,
            new_state: new.state.clone(),
            old_symbols,
            new_symbols,
            heads_move,
            tapes_len_diff,
        }
    }

    pub fn num_tapes(&self) -> usize {
        self.old_symbols.len()
    }

    fn check_tape_count(&self, config: &Configuration) -> Result<(), TuringMachineError> {
        let counts = [
            self.new_symbols.len(),
            self.heads_move.len(),
            self.tapes_len_diff.len(),
            config.tapes.len(),
        ];

        match counts.iter().find(|&&n| n != self.num_tapes()) {
            Some(&n) => Err(TuringMachineError::DiffTapeCountMismatch(self.num_tapes(), n)),
            None => Ok(()),
        }
    }
}

impl Configuration {
    /// Moves this configuration one step forward by applying `diff`.
    ///
    /// The configuration must be in `diff.old_state` and scan `diff.old_symbols`. On error
    /// the configuration is left unchanged.
    pub fn apply_diff(&mut self, diff: &ConfigDiff) -> Result<(), TuringMachineError> {
        if self.state != diff.old_state {
            return Err(TuringMachineError::DiffStateMismatch {
                expected: diff.old_state.clone(),
                found: self.state.clone(),
            });
        }
        diff.check_tape_count(self)?;

        let scanned = self.symbols();
        for (tape, (&found, &expected)) in scanned.iter().zip(&diff.old_symbols).enumerate() {
            if found != expected {
                return Err(TuringMachineError::DiffSymbolMismatch {
                    tape,
                    expected,
                    found,
                });
            }
        }

        for (i, tape) in self.tapes.iter_mut().enumerate() {
            let head = &mut self.heads[i];

            if let Some(cell) = tape.get_mut(*head) {
                *cell = diff.new_symbols[i];
            }
            let len = tape.len().saturating_add_signed(diff.tapes_len_diff[i]);
            tape.resize(len, BLANK_SYMBOL);
            *head = head.saturating_add_signed(diff.heads_move[i]);
        }

        self.state = diff.new_state.clone();
        Ok(())
    }

    /// Moves this configuration one step backward by undoing `diff`.
    ///
    /// The configuration must be in `diff.new_state` and hold `diff.new_symbols` at the head
    /// positions from before the step. On error the configuration is left unchanged.
    pub fn apply_reverse_diff(&mut self, diff: &ConfigDiff) -> Result<(), TuringMachineError> {
        if self.state != diff.new_state {
            return Err(TuringMachineError::DiffStateMismatch {
                expected: diff.new_state.clone(),
                found: self.state.clone(),
            });
        }
        diff.check_tape_count(self)?;

        let old_heads: Vec<usize> = self
            .heads
            .iter()
            .zip(&diff.heads_move)
            .map(|(&pos, &mv)| pos.saturating_add_signed(-mv))
            .collect();

        for (tape, (cells, &pos)) in self.tapes.iter().zip(&old_heads).enumerate() {
            let found = cells.get(pos).copied().unwrap_or(BLANK_SYMBOL);
            let expected = diff.new_symbols[tape];
            if found != expected {
                return Err(TuringMachineError::DiffSymbolMismatch {
                    tape,
                    expected,
                    found,
                });
            }
        }

        for (i, tape) in self.tapes.iter_mut().enumerate() {
            let len = tape.len().saturating_add_signed(-diff.tapes_len_diff[i]);
            tape.resize(len, BLANK_SYMBOL);
            if let Some(cell) = tape.get_mut(old_heads[i]) {
                *cell = diff.old_symbols[i];
            }
        }

        self.heads = old_heads;
        self.state = diff.old_state.clone();
        Ok(())
    }
}
