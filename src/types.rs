//! This module defines the core data structures and types shared across the engine,
//! including symbol constants, head directions, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The blank symbol. Every tape alphabet must contain it; no input alphabet may.
pub const BLANK_SYMBOL: char = '_';
/// The wildcard meta-symbol, valid only inside transition patterns.
pub const WILDCARD_SYMBOL: char = '?';
/// The maximum number of steps a driver executes before giving up on halting.
pub const MAX_STEPS: usize = 1_000_000;
/// The maximum allowed size for a machine specification document in bytes.
pub const MAX_SPEC_SIZE: usize = 1 << 20; // 1MB

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (clamped at cell 0).
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The signed offset this move applies to a head position.
    pub fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            'S' => Ok(Direction::Stay),
            other => Err(other),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        };
        write!(f, "{c}")
    }
}

/// Represents the outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and has not halted.
    Continue,
    /// The machine is in a halting state.
    Halt(Halt),
}

/// The halting state a machine ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Accept,
    Reject,
}

/// Represents the errors the engine can report.
///
/// Definition errors are raised only while building a
/// [`MachineDefinition`](crate::definition::MachineDefinition). Diff errors signal that a diff
/// was applied to a configuration it was not recorded from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    #[error("The set of states must not be empty")]
    EmptyStates,
    #[error("The input alphabet must not be empty")]
    EmptyInputAlphabet,
    #[error("The tape alphabet must not be empty")]
    EmptyTapeAlphabet,
    #[error("Duplicate symbol '{0}' in tape alphabet")]
    DuplicateTapeSymbol(String),
    #[error("Input symbol '{0}' is not in the tape alphabet")]
    InputNotInTapeAlphabet(String),
    #[error("The tape alphabet must contain the blank symbol '_'")]
    MissingBlank,
    #[error("The input alphabet must not contain the blank symbol '_'")]
    BlankInInputAlphabet,
    #[error("Symbol '{0}' must be exactly one character long")]
    InvalidSymbolLength(String),
    #[error("Alphabet must not contain the wildcard symbol '?'")]
    WildcardInAlphabet,
    #[error("{role} '{state}' is not in the set of states")]
    UnknownState { role: &'static str, state: String },
    #[error(
        "Inconsistent tape count in transition {state}: '{pattern}' \
         (expected {expected} tapes, found {found})"
    )]
    InconsistentTapeCount {
        state: String,
        pattern: String,
        expected: usize,
        found: usize,
    },
    #[error("Transition {0}: '' must read at least one tape")]
    EmptyPattern(String),
    #[error("Halting state '{0}' must not have outgoing transitions")]
    TransitionFromHaltingState(String),
    #[error(
        "Read symbol '{symbol}' in transition {state}: '{pattern}' is not in the tape alphabet"
    )]
    InvalidReadSymbol {
        state: String,
        pattern: String,
        symbol: char,
    },
    #[error(
        "Write symbol '{symbol}' in transition {state}: '{pattern}' is not in the tape alphabet"
    )]
    InvalidWriteSymbol {
        state: String,
        pattern: String,
        symbol: char,
    },
    #[error(
        "Transition {state}: '{pattern}' writes a wildcard on tape {tape} \
         but does not read one there"
    )]
    WildcardWriteWithoutWildcardRead {
        state: String,
        pattern: String,
        tape: usize,
    },
    #[error("Invalid move '{symbol}' in transition {state}: '{pattern}' (expected L, R or S)")]
    InvalidMove {
        state: String,
        pattern: String,
        symbol: char,
    },
    #[error("Overlapping wildcard transitions in state '{state}': '{first}' and '{second}'")]
    OverlappingWildcards {
        state: String,
        first: String,
        second: String,
    },
    #[error("Diff expects state '{expected}' but configuration is in state '{found}'")]
    DiffStateMismatch { expected: String, found: String },
    #[error("Diff expects symbol '{expected}' on tape {tape} but found '{found}'")]
    DiffSymbolMismatch {
        tape: usize,
        expected: char,
        found: char,
    },
    #[error("Configurations have different tape counts ({0} and {1})")]
    DiffTapeCountMismatch(usize, usize),
    #[error("Input symbol '{0}' is not in the input alphabet")]
    InvalidInputSymbol(char),
    #[error("Machine specification error: {0}")]
    SpecError(String),
    #[error("Machine specification is too large ({0} bytes)")]
    SpecTooLarge(usize),
    #[error("File error: {0}")]
    FileError(String),
}

impl From<serde_json::Error> for TuringMachineError {
    fn from(e: serde_json::Error) -> Self {
        TuringMachineError::SpecError(e.to_string())
    }
}
