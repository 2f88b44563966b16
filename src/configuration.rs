//! This module defines `Configuration`, one instant of a machine's execution: the current
//! state, one head position per tape and the contents of every tape. It implements the
//! single-step transition, including the rule that keeps each tape padded by the minimal
//! blank suffix.

use crate::definition::MachineDefinition;
use crate::diff::ConfigDiff;
use crate::types::{Direction, Halt, Step, TuringMachineError, BLANK_SYMBOL};
use log::trace;
use std::fmt;
use std::sync::Arc;

/// A snapshot of a running machine.
///
/// Every configuration holds a shared handle to its immutable [`MachineDefinition`]; cloning
/// a configuration deep-copies the tapes but never the definition.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) definition: Arc<MachineDefinition>,
    pub(crate) state: String,
    pub(crate) heads: Vec<usize>,
    pub(crate) tapes: Vec<Vec<char>>,
}

impl Configuration {
    /// Creates the initial configuration for `input`.
    ///
    /// Tape 0 holds the input followed by one blank cell; every other tape holds a single
    /// blank cell. All heads start at cell 0.
    ///
    /// # Returns
    ///
    /// * `Ok(Configuration)` in the start state.
    /// * `Err(TuringMachineError::InvalidInputSymbol)` if `input` uses a symbol outside the
    ///   input alphabet.
    pub fn new(
        definition: Arc<MachineDefinition>,
        input: &str,
    ) -> Result<Self, TuringMachineError> {
        definition.check_input(input)?;

        let mut tapes = vec![vec![BLANK_SYMBOL]; definition.num_tapes()];
        if let Some(first) = tapes.first_mut() {
            *first = input.chars().chain([BLANK_SYMBOL]).collect();
        }

        Ok(Self {
            state: definition.start_state().to_string(),
            heads: vec![0; definition.num_tapes()],
            tapes,
            definition,
        })
    }

    pub fn definition(&self) -> &Arc<MachineDefinition> {
        &self.definition
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the head position of every tape.
    pub fn heads(&self) -> &[usize] {
        &self.heads
    }

    /// Returns the contents of every tape.
    pub fn tapes(&self) -> &[Vec<char>] {
        &self.tapes
    }

    /// Returns a vector of symbols currently under each tape's head.
    /// A head beyond the end of its tape scans a blank.
    ///
    /// | a | b | c | tape 1
    /// | d | e |   | tape 2
    ///   0   1   2   index
    ///
    /// heads [0, 2] will return ['a', '_']
    pub fn symbols(&self) -> Vec<char> {
        self.heads
            .iter()
            .zip(&self.tapes)
            .map(|(&pos, tape)| tape.get(pos).copied().unwrap_or(BLANK_SYMBOL))
            .collect()
    }

    pub fn is_halted(&self) -> bool {
        self.definition.is_halting(&self.state)
    }

    pub fn is_accepting(&self) -> bool {
        self.state == self.definition.accept_state()
    }

    /// Returns how the machine halted, or `None` while it is still running.
    pub fn halt(&self) -> Option<Halt> {
        if self.is_accepting() {
            Some(Halt::Accept)
        } else if self.state == self.definition.reject_state() {
            Some(Halt::Reject)
        } else {
            None
        }
    }

    /// Reads the output of the machine: the symbols of the last tape from its head up to the
    /// first blank. Empty if the head is on a blank.
    pub fn output(&self) -> String {
        match (self.tapes.last(), self.heads.last()) {
            (Some(tape), Some(&head)) => tape
                .get(head..)
                .unwrap_or_default()
                .iter()
                .take_while(|&&c| c != BLANK_SYMBOL)
                .collect(),
            _ => String::new(),
        }
    }

    /// Executes a single step in place.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the machine is still running after the step.
    /// * `Step::Halt(_)` if the machine is in a halting state. Calling `step` on a halted
    ///   configuration leaves it unchanged.
    pub fn step(&mut self) -> Step {
        if !self.is_halted() {
            self.advance();
        }

        match self.halt() {
            Some(halt) => Step::Halt(halt),
            None => Step::Continue,
        }
    }

    /// Executes a single step in place and records it as a [`ConfigDiff`].
    ///
    /// Returns `None`, leaving the configuration unchanged, if the machine has already halted.
    pub fn step_with_diff(&mut self) -> Option<ConfigDiff> {
        if self.is_halted() {
            return None;
        }

        let old_state = self.state.clone();
        let old_symbols = self.symbols();
        let old_heads = self.heads.clone();
        let old_lens: Vec<usize> = self.tapes.iter().map(Vec::len).collect();

        self.advance();

        Some(ConfigDiff::record(
            old_state,
            old_symbols,
            &old_heads,
            &old_lens,
            self,
        ))
    }

    /// Applies the transition for the scanned symbols, or moves to the reject state if none
    /// is defined.
    fn advance(&mut self) {
        let definition = Arc::clone(&self.definition);
        let symbols = self.symbols();

        let Some(transition) = definition.transition(&self.state, &symbols) else {
            trace!("{}: no transition on {:?}, rejecting", self.state, symbols);
            self.state = definition.reject_state().to_string();
            return;
        };

        let written = transition.write.mask(&symbols);
        for (i, (&symbol, &direction)) in written.iter().zip(&transition.directions).enumerate() {
            let tape = &mut self.tapes[i];
            let head = &mut self.heads[i];

            tape[*head] = symbol;
            resize_tape(tape, *head, symbol, direction);
            *head = head.saturating_add_signed(direction.offset());
        }

        trace!(
            "{} {:?} -> {} {:?} {:?}",
            self.state,
            symbols,
            transition.next_state,
            written,
            transition.directions
        );
        self.state = transition.next_state.clone();
    }
}

/// Grows or shrinks a tape after `written` was stored at `head`, before the head moves.
///
/// A tape at its right end grows by one blank when the head is about to move right or a
/// non-blank was written there. It shrinks by its last cell when a blank is written at the
/// right end while moving left over a blank, or when a blank is written just before a blank
/// right end and the head does not move right.
fn resize_tape(tape: &mut Vec<char>, head: usize, written: char, direction: Direction) {
    let len = tape.len();
    let at_end = head + 1 == len;
    let blank_written = written == BLANK_SYMBOL;

    if at_end && (direction == Direction::Right || !blank_written) {
        tape.push(BLANK_SYMBOL);
    } else if (direction == Direction::Left
        && at_end
        && blank_written
        && len >= 2
        && tape[len - 2] == BLANK_SYMBOL)
        || (direction != Direction::Right
            && head + 2 == len
            && blank_written
            && tape[len - 1] == BLANK_SYMBOL)
    {
        tape.pop();
    }
}

impl PartialEq for Configuration {
    /// Two configurations are equal when they belong to the same definition and agree on
    /// state, head positions and tape contents.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
            && self.state == other.state
            && self.heads == other.heads
            && self.tapes == other.tapes
    }
}

impl Eq for Configuration {}

impl fmt::Display for Configuration {
    /// Formats as `state | tape | tape ...` with the scanned cell of each tape in brackets.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        for (tape, &head) in self.tapes.iter().zip(&self.heads) {
            write!(f, " | ")?;
            for (i, c) in tape.iter().enumerate() {
                if i == head {
                    write!(f, "[{c}]")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::definition::tests::create_spec;

    pub(crate) fn create_definition(
        input_alphabet: &[&str],
        tape_alphabet: &[&str],
        transitions: &[(&str, &str, &str, &str, &str)],
    ) -> Arc<MachineDefinition> {
        let spec = create_spec(input_alphabet, tape_alphabet, transitions);
        Arc::new(MachineDefinition::new(spec).unwrap())
    }

    fn accept_a() -> Arc<MachineDefinition> {
        create_definition(
            &["a"],
            &["a", "_"],
            &[("q0", "a", "qA", "a", "R"), ("q0", "_", "qR", "_", "S")],
        )
    }

    #[test]
    fn test_initial_configuration() {
        let definition = create_definition(
            &["0"],
            &["0", "_"],
            &[("q0", "0_", "qA", "00", "RR")],
        );
        let config = Configuration::new(definition, "00").unwrap();

        assert_eq!(config.state(), "q0");
        assert_eq!(config.heads(), &[0, 0]);
        assert_eq!(config.tapes(), &[vec!['0', '0', '_'], vec!['_']]);
        assert_eq!(config.symbols(), vec!['0', '_']);
        assert!(!config.is_halted());
    }

    #[test]
    fn test_initial_configuration_rejects_foreign_symbols() {
        assert_eq!(
            Configuration::new(accept_a(), "ab").unwrap_err(),
            TuringMachineError::InvalidInputSymbol('b')
        );
    }

    #[test]
    fn test_step_to_accept() {
        let mut config = Configuration::new(accept_a(), "a").unwrap();

        assert_eq!(config.step(), Step::Halt(Halt::Accept));
        assert_eq!(config.heads(), &[1]);
        assert_eq!(config.tapes(), &[vec!['a', '_']]);
        assert!(config.is_accepting());
    }

    #[test]
    fn test_step_on_halted_configuration_is_noop() {
        let mut config = Configuration::new(accept_a(), "a").unwrap();
        config.step();
        let snapshot = config.clone();

        assert_eq!(config.step(), Step::Halt(Halt::Accept));
        assert_eq!(config, snapshot);
        assert!(config.step_with_diff().is_none());
    }

    #[test]
    fn test_undefined_transition_rejects_without_changes() {
        let definition = create_definition(
            &["a", "b"],
            &["a", "b", "_"],
            &[("q0", "a", "qA", "a", "R")],
        );
        let mut config = Configuration::new(definition, "b").unwrap();

        assert_eq!(config.step(), Step::Halt(Halt::Reject));
        assert_eq!(config.state(), "qR");
        assert_eq!(config.heads(), &[0]);
        assert_eq!(config.tapes(), &[vec!['b', '_']]);
    }

    #[test]
    fn test_wildcard_copies_scanned_symbol() {
        let definition = create_definition(
            &["a", "b"],
            &["a", "b", "_"],
            &[("q0", "a", "qA", "a", "S"), ("q0", "?", "q1", "?", "R")],
        );

        let mut config = Configuration::new(Arc::clone(&definition), "a").unwrap();
        config.step();
        assert_eq!(config.state(), "qA");
        assert_eq!(config.tapes(), &[vec!['a', '_']]);

        let mut config = Configuration::new(definition, "b").unwrap();
        assert_eq!(config.step(), Step::Continue);
        assert_eq!(config.state(), "q1");
        assert_eq!(config.tapes()[0][0], 'b');
        assert_eq!(config.heads(), &[1]);
    }

    #[test]
    fn test_left_move_clamped_at_zero() {
        let definition =
            create_definition(&["a"], &["a", "b", "_"], &[("q0", "a", "q1", "b", "L")]);
        let mut config = Configuration::new(definition, "a").unwrap();

        config.step();
        assert_eq!(config.heads(), &[0]);
        assert_eq!(config.tapes(), &[vec!['b', '_']]);
    }

    #[test]
    fn test_tape_grows_on_right_move_at_end() {
        let mut tape = vec!['a', '_'];
        resize_tape(&mut tape, 1, '_', Direction::Right);
        assert_eq!(tape, vec!['a', '_', '_']);
    }

    #[test]
    fn test_tape_grows_on_non_blank_write_at_end() {
        let mut tape = vec!['a', 'b'];
        resize_tape(&mut tape, 1, 'b', Direction::Stay);
        assert_eq!(tape, vec!['a', 'b', '_']);
    }

    #[test]
    fn test_tape_shrinks_when_leaving_blank_end() {
        let mut tape = vec!['a', '_', '_'];
        resize_tape(&mut tape, 2, '_', Direction::Left);
        assert_eq!(tape, vec!['a', '_']);
    }

    #[test]
    fn test_tape_shrinks_before_blank_end() {
        let mut tape = vec!['a', '_', '_'];
        resize_tape(&mut tape, 1, '_', Direction::Stay);
        assert_eq!(tape, vec!['a', '_']);

        let mut tape = vec!['a', '_', '_'];
        resize_tape(&mut tape, 1, '_', Direction::Left);
        assert_eq!(tape, vec!['a', '_']);
    }

    #[test]
    fn test_tape_unchanged_cases() {
        let mut tape = vec!['a', 'b', '_'];
        resize_tape(&mut tape, 2, '_', Direction::Left);
        assert_eq!(tape, vec!['a', 'b', '_']);

        let mut tape = vec!['_'];
        resize_tape(&mut tape, 0, '_', Direction::Left);
        assert_eq!(tape, vec!['_']);

        let mut tape = vec!['a', 'b', '_'];
        resize_tape(&mut tape, 1, 'b', Direction::Stay);
        assert_eq!(tape, vec!['a', 'b', '_']);
    }

    #[test]
    fn test_output_reads_last_tape_from_head() {
        let definition = create_definition(&["0"], &["0", "_"], &[("q0", "0", "qA", "0", "S")]);
        let mut config = Configuration::new(definition, "00").unwrap();
        assert_eq!(config.output(), "00");

        config.heads[0] = 2;
        assert_eq!(config.output(), "");
    }

    #[test]
    fn test_display() {
        let config = Configuration::new(accept_a(), "aa").unwrap();
        assert_eq!(config.to_string(), "q0 | [a]a_");
    }
}
