//! This module defines `MachineDefinition`, the validated and immutable description of a
//! multi-tape Turing Machine, together with `MachineSpec`, the plain-data form it is built from.
//!
//! Transitions are stored in a flat table. Each state keeps an index of its exact
//! (wildcard-free) patterns for constant-time lookups and an ordered list of its wildcard
//! patterns, scanned in table order when no exact pattern applies.

use crate::analyzer::{self, analyze};
use crate::pattern::{Pattern, PatternSymbol};
use crate::types::{Direction, TuringMachineError, BLANK_SYMBOL};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The nested transition table: state -> read pattern -> `[next_state, write_pattern, moves]`.
pub type Delta = IndexMap<String, IndexMap<String, (String, String, String)>>;

/// The unvalidated description of a machine, as produced by a specification parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub states: Vec<String>,
    pub input_alphabet: Vec<String>,
    /// The full tape alphabet, already including the blank symbol.
    pub tape_alphabet: Vec<String>,
    pub start_state: String,
    pub accept_state: String,
    pub reject_state: String,
    pub delta: Delta,
}

/// A single flattened transition rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The state this transition originates from.
    pub state: String,
    /// The pattern of symbols that must be under the heads.
    pub read: Pattern,
    /// The state the machine moves to.
    pub next_state: String,
    /// The symbols to write; wildcard positions copy the scanned symbol.
    pub write: Pattern,
    /// One head movement per tape.
    pub directions: Vec<Direction>,
}

/// Lookup index for the transitions of one state.
#[derive(Debug, Default)]
struct StateRules {
    exact: HashMap<Vec<char>, usize>,
    wildcards: Vec<usize>,
}

/// A validated multi-tape Turing Machine.
///
/// Built once through [`MachineDefinition::new`] and never mutated afterwards, so it can be
/// shared behind an `Arc` by any number of configurations.
#[derive(Debug)]
pub struct MachineDefinition {
    name: Option<String>,
    states: HashSet<String>,
    input_alphabet: HashSet<char>,
    tape_alphabet: Vec<char>,
    start_state: String,
    accept_state: String,
    reject_state: String,
    num_tapes: usize,
    transitions: Vec<Transition>,
    rules: HashMap<String, StateRules>,
}

impl MachineDefinition {
    /// Validates `spec` and builds the flattened transition table.
    ///
    /// Checks run in a fixed order (sets, alphabets, special states, then every transition,
    /// then wildcard overlaps) and the first violation is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDefinition)` if the specification is valid.
    /// * `Err(TuringMachineError)` describing the first violated rule otherwise.
    pub fn new(spec: MachineSpec) -> Result<Self, TuringMachineError> {
        analyze(&spec)?;

        let tape_alphabet: Vec<char> = spec
            .tape_alphabet
            .iter()
            .filter_map(|s| single_char(s))
            .collect();
        let input_alphabet = spec
            .input_alphabet
            .iter()
            .filter_map(|s| single_char(s))
            .collect();

        // The tape count is fixed by the first transition in the table.
        let first = spec
            .delta
            .iter()
            .flat_map(|(state, patterns)| patterns.keys().map(move |read| (state, read)))
            .next();
        let num_tapes = match first {
            Some((state, read)) if read.is_empty() => {
                return Err(TuringMachineError::EmptyPattern(state.clone()))
            }
            Some((_, read)) => read.chars().count(),
            None => 1,
        };

        let mut definition = Self {
            name: spec.name,
            states: spec.states.iter().cloned().collect(),
            input_alphabet,
            tape_alphabet,
            start_state: spec.start_state,
            accept_state: spec.accept_state,
            reject_state: spec.reject_state,
            num_tapes,
            transitions: Vec::new(),
            rules: HashMap::new(),
        };

        for (state, patterns) in spec.delta {
            for (read, (next_state, write, moves)) in patterns {
                let transition =
                    definition.build_transition(&state, &read, next_state, &write, &moves)?;
                definition.insert(transition);
            }
        }

        analyzer::check_wildcard_overlaps(&definition)?;

        let unreachable = analyzer::unreachable_states(&definition);
        if !unreachable.is_empty() {
            warn!("Unreachable states: {:?}", unreachable);
        }

        debug!(
            "Built machine with {} states, {} tapes and {} transitions",
            definition.states.len(),
            definition.num_tapes,
            definition.transitions.len()
        );

        Ok(definition)
    }

    fn build_transition(
        &self,
        state: &str,
        read: &str,
        next_state: String,
        write: &str,
        moves: &str,
    ) -> Result<Transition, TuringMachineError> {
        for found in [read, write, moves].map(|s| s.chars().count()) {
            if found != self.num_tapes {
                return Err(TuringMachineError::InconsistentTapeCount {
                    state: state.to_string(),
                    pattern: read.to_string(),
                    expected: self.num_tapes,
                    found,
                });
            }
        }

        if self.is_halting(state) {
            return Err(TuringMachineError::TransitionFromHaltingState(state.to_string()));
        }

        for (role, name) in [("Transition state", state), ("Next state", next_state.as_str())] {
            if !self.states.contains(name) {
                return Err(TuringMachineError::UnknownState {
                    role,
                    state: name.to_string(),
                });
            }
        }

        let read_pattern = Pattern::parse(read);
        let write_pattern = Pattern::parse(write);

        for symbol in read_pattern.symbols() {
            if let PatternSymbol::Concrete(c) = symbol {
                if !self.tape_alphabet.contains(c) {
                    return Err(TuringMachineError::InvalidReadSymbol {
                        state: state.to_string(),
                        pattern: read.to_string(),
                        symbol: *c,
                    });
                }
            }
        }

        let pairs = write_pattern.symbols().iter().zip(read_pattern.symbols());
        for (tape, (w, r)) in pairs.enumerate() {
            match (w, r) {
                (PatternSymbol::Concrete(c), _) if !self.tape_alphabet.contains(c) => {
                    return Err(TuringMachineError::InvalidWriteSymbol {
                        state: state.to_string(),
                        pattern: read.to_string(),
                        symbol: *c,
                    });
                }
                (PatternSymbol::Wildcard, PatternSymbol::Concrete(_)) => {
                    return Err(TuringMachineError::WildcardWriteWithoutWildcardRead {
                        state: state.to_string(),
                        pattern: read.to_string(),
                        tape,
                    });
                }
                _ => {}
            }
        }

        let directions = moves
            .chars()
            .map(|c| {
                Direction::try_from(c).map_err(|symbol| TuringMachineError::InvalidMove {
                    state: state.to_string(),
                    pattern: read.to_string(),
                    symbol,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Transition {
            state: state.to_string(),
            read: read_pattern,
            next_state,
            write: write_pattern,
            directions,
        })
    }

    fn insert(&mut self, transition: Transition) {
        let index = self.transitions.len();
        let rules = self.rules.entry(transition.state.clone()).or_default();

        match transition.read.to_concrete() {
            Some(tuple) => {
                rules.exact.insert(tuple, index);
            }
            None => rules.wildcards.push(index),
        }

        self.transitions.push(transition);
    }

    /// Finds the transition for `state` scanning `symbols`.
    ///
    /// An exact pattern always takes precedence; otherwise the first wildcard pattern in table
    /// order that matches is used. `None` means the machine rejects.
    pub fn transition(&self, state: &str, symbols: &[char]) -> Option<&Transition> {
        let rules = self.rules.get(state)?;

        rules
            .exact
            .get(symbols)
            .or_else(|| {
                rules
                    .wildcards
                    .iter()
                    .find(|&&i| self.transitions[i].read.matches(symbols))
            })
            .map(|&i| &self.transitions[i])
    }

    /// Returns all transitions in table order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the transitions of `state` whose read pattern contains a wildcard, in table order.
    pub fn wildcard_transitions(&self, state: &str) -> impl Iterator<Item = &Transition> {
        self.rules
            .get(state)
            .into_iter()
            .flat_map(|rules| rules.wildcards.iter().map(|&i| &self.transitions[i]))
    }

    /// Checks whether `state` defines an exact (wildcard-free) transition on `tuple`.
    pub fn has_exact_transition(&self, state: &str, tuple: &[char]) -> bool {
        self.rules
            .get(state)
            .is_some_and(|rules| rules.exact.contains_key(tuple))
    }

    /// Returns the number of exact transitions defined on `state`.
    pub fn exact_transition_count(&self, state: &str) -> usize {
        self.rules.get(state).map_or(0, |rules| rules.exact.len())
    }

    /// Checks that every symbol of `input` belongs to the input alphabet.
    pub fn check_input(&self, input: &str) -> Result<(), TuringMachineError> {
        match input.chars().find(|c| !self.input_alphabet.contains(c)) {
            Some(c) => Err(TuringMachineError::InvalidInputSymbol(c)),
            None => Ok(()),
        }
    }

    pub fn is_halting(&self, state: &str) -> bool {
        state == self.accept_state || state == self.reject_state
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn states(&self) -> &HashSet<String> {
        &self.states
    }

    pub fn input_alphabet(&self) -> &HashSet<char> {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &[char] {
        &self.tape_alphabet
    }

    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    pub fn accept_state(&self) -> &str {
        &self.accept_state
    }

    pub fn reject_state(&self) -> &str {
        &self.reject_state
    }

    pub fn num_tapes(&self) -> usize {
        self.num_tapes
    }

    pub fn blank(&self) -> char {
        BLANK_SYMBOL
    }
}

fn single_char(symbol: &str) -> Option<char> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
