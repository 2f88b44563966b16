//! This module provides the validation checks run while building a machine definition, and
//! a non-fatal reachability analysis. The specification-level checks (sets, alphabets and
//! special states) run before any transition is flattened; the wildcard overlap check runs
//! last, on the finished transition table.

use crate::definition::{MachineDefinition, MachineSpec};
use crate::types::{TuringMachineError, BLANK_SYMBOL, WILDCARD_SYMBOL};
use std::collections::HashSet;

/// Runs the specification-level checks in order and returns the first violation.
///
/// # Arguments
///
/// * `spec` - A reference to the `MachineSpec` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError)` for the first violated rule.
pub fn analyze(spec: &MachineSpec) -> Result<(), TuringMachineError> {
    [check_sets, check_alphabets, check_special_states]
        .iter()
        .try_for_each(|check| check(spec))
}

/// Checks that states and both alphabets are non-empty and that the tape alphabet has no
/// duplicate symbols.
fn check_sets(spec: &MachineSpec) -> Result<(), TuringMachineError> {
    if spec.states.is_empty() {
        return Err(TuringMachineError::EmptyStates);
    }
    if spec.input_alphabet.is_empty() {
        return Err(TuringMachineError::EmptyInputAlphabet);
    }
    if spec.tape_alphabet.is_empty() {
        return Err(TuringMachineError::EmptyTapeAlphabet);
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = spec.tape_alphabet.iter().find(|s| !seen.insert(s.as_str())) {
        return Err(TuringMachineError::DuplicateTapeSymbol(duplicate.clone()));
    }

    Ok(())
}

/// Checks the relationship between the input and tape alphabets and the shape of every
/// alphabet symbol.
fn check_alphabets(spec: &MachineSpec) -> Result<(), TuringMachineError> {
    let blank = BLANK_SYMBOL.to_string();
    let wildcard = WILDCARD_SYMBOL.to_string();

    if let Some(symbol) = spec
        .input_alphabet
        .iter()
        .find(|s| !spec.tape_alphabet.contains(*s))
    {
        return Err(TuringMachineError::InputNotInTapeAlphabet(symbol.clone()));
    }

    if !spec.tape_alphabet.contains(&blank) {
        return Err(TuringMachineError::MissingBlank);
    }

    if spec.input_alphabet.contains(&blank) {
        return Err(TuringMachineError::BlankInInputAlphabet);
    }

    let mut symbols = spec.input_alphabet.iter().chain(&spec.tape_alphabet);
    if let Some(symbol) = symbols.find(|s| s.chars().count() != 1) {
        return Err(TuringMachineError::InvalidSymbolLength(symbol.clone()));
    }

    if spec.input_alphabet.contains(&wildcard) || spec.tape_alphabet.contains(&wildcard) {
        return Err(TuringMachineError::WildcardInAlphabet);
    }

    Ok(())
}

/// Checks that the start, accept and reject states are declared.
fn check_special_states(spec: &MachineSpec) -> Result<(), TuringMachineError> {
    [
        ("Start state", &spec.start_state),
        ("Accept state", &spec.accept_state),
        ("Reject state", &spec.reject_state),
    ]
    .into_iter()
    .find(|(_, state)| !spec.states.contains(*state))
    .map_or(Ok(()), |(role, state)| {
        Err(TuringMachineError::UnknownState {
            role,
            state: state.clone(),
        })
    })
}

/// Checks that no two wildcard patterns of a state are ambiguous.
///
/// Two wildcard patterns are ambiguous when some concrete tuple matches both and the state
/// has no exact transition for that tuple. When an intersection holds more tuples than the
/// state has exact transitions it cannot be covered, so it is rejected without enumeration.
///
/// # Returns
///
/// * `Ok(())` if every overlap is covered by exact transitions.
/// * `Err(TuringMachineError::OverlappingWildcards)` naming the first ambiguous pair.
pub fn check_wildcard_overlaps(definition: &MachineDefinition) -> Result<(), TuringMachineError> {
    let alphabet = definition.tape_alphabet();
    let mut states: Vec<&String> = definition.states().iter().collect();
    states.sort();

    for state in states {
        let wildcards: Vec<_> = definition.wildcard_transitions(state).collect();
        let exact_count = definition.exact_transition_count(state);

        for (i, first) in wildcards.iter().enumerate() {
            for second in &wildcards[i + 1..] {
                let Some(size) = first.read.intersection_size(&second.read, alphabet.len()) else {
                    continue;
                };

                let covered = size <= exact_count
                    && first
                        .read
                        .intersection(&second.read, alphabet)
                        .iter()
                        .all(|tuple| definition.has_exact_transition(state, tuple));

                if !covered {
                    return Err(TuringMachineError::OverlappingWildcards {
                        state: state.clone(),
                        first: first.read.to_string(),
                        second: second.read.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Returns the states that cannot be reached from the start state, sorted.
///
/// The accept and reject states are never reported: a machine is not required to use both.
pub fn unreachable_states(definition: &MachineDefinition) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = vec![definition.start_state()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for transition in definition.transitions() {
            if transition.state == state && !visited.contains(transition.next_state.as_str()) {
                queue.push(&transition.next_state);
            }
        }
    }

    let mut unreachable: Vec<String> = definition
        .states()
        .iter()
        .filter(|s| !visited.contains(s.as_str()) && !definition.is_halting(s))
        .cloned()
        .collect();

    unreachable.sort(); // Sort for deterministic output
    unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::tests::{create_spec, strings};

    #[test]
    fn test_valid_spec() {
        let spec = create_spec(&["a"], &["a", "_"], &[("q0", "a", "qA", "a", "R")]);
        assert!(analyze(&spec).is_ok());
    }

    #[test]
    fn test_empty_sets() {
        let mut spec = create_spec(&["a"], &["a", "_"], &[]);
        spec.states.clear();
        assert_eq!(analyze(&spec), Err(TuringMachineError::EmptyStates));

        let spec = create_spec(&[], &["a", "_"], &[]);
        assert_eq!(analyze(&spec), Err(TuringMachineError::EmptyInputAlphabet));

        let spec = create_spec(&["a"], &[], &[]);
        assert_eq!(analyze(&spec), Err(TuringMachineError::EmptyTapeAlphabet));
    }

    #[test]
    fn test_duplicate_tape_symbol() {
        let spec = create_spec(&["a"], &["a", "_", "a"], &[]);
        assert_eq!(
            analyze(&spec),
            Err(TuringMachineError::DuplicateTapeSymbol("a".to_string()))
        );
    }

    #[test]
    fn test_alphabet_rules() {
        let spec = create_spec(&["a", "b"], &["a", "_"], &[]);
        assert_eq!(
            analyze(&spec),
            Err(TuringMachineError::InputNotInTapeAlphabet("b".to_string()))
        );

        let spec = create_spec(&["a"], &["a"], &[]);
        assert_eq!(analyze(&spec), Err(TuringMachineError::MissingBlank));

        let spec = create_spec(&["a", "_"], &["a", "_"], &[]);
        assert_eq!(analyze(&spec), Err(TuringMachineError::BlankInInputAlphabet));

        let spec = create_spec(&["ab"], &["ab", "_"], &[]);
        assert_eq!(
            analyze(&spec),
            Err(TuringMachineError::InvalidSymbolLength("ab".to_string()))
        );

        let spec = create_spec(&["a"], &["a", "?", "_"], &[]);
        assert_eq!(analyze(&spec), Err(TuringMachineError::WildcardInAlphabet));
    }

    #[test]
    fn test_unknown_special_state() {
        let mut spec = create_spec(&["a"], &["a", "_"], &[]);
        spec.accept_state = "done".to_string();

        match analyze(&spec) {
            Err(TuringMachineError::UnknownState { role, state }) => {
                assert_eq!(role, "Accept state");
                assert_eq!(state, "done");
            }
            other => panic!("Expected UnknownState, got {:?}", other),
        }
    }

    #[test]
    fn test_overlapping_wildcards_rejected() {
        let spec = create_spec(
            &["0", "1"],
            &["0", "1", "_"],
            &[
                ("q0", "0?_", "qA", "0?_", "RRR"),
                ("q0", "?1_", "qA", "?1_", "RRR"),
            ],
        );

        match MachineDefinition::new(spec) {
            Err(TuringMachineError::OverlappingWildcards {
                state,
                first,
                second,
            }) => {
                assert_eq!(state, "q0");
                assert_eq!(first, "0?_");
                assert_eq!(second, "?1_");
            }
            other => panic!("Expected OverlappingWildcards, got {:?}", other),
        }
    }

    #[test]
    fn test_overlap_covered_by_exact_transition() {
        let spec = create_spec(
            &["0", "1"],
            &["0", "1", "_"],
            &[
                ("q0", "0?_", "qA", "0?_", "RRR"),
                ("q0", "?1_", "qA", "?1_", "RRR"),
                ("q0", "01_", "qR", "01_", "SSS"),
            ],
        );
        assert!(MachineDefinition::new(spec).is_ok());
    }

    #[test]
    fn test_wide_overlap_rejected_without_enumeration() {
        let spec = create_spec(
            &["0", "1"],
            &["0", "1", "_"],
            &[
                ("q0", "??????", "qA", "??????", "RRRRRR"),
                ("q0", "0?????", "qR", "0?????", "SSSSSS"),
                ("q0", "000000", "qR", "000000", "SSSSSS"),
            ],
        );
        assert!(matches!(
            MachineDefinition::new(spec),
            Err(TuringMachineError::OverlappingWildcards { .. })
        ));
    }

    #[test]
    fn test_disjoint_wildcards_accepted() {
        let spec = create_spec(
            &["0", "1"],
            &["0", "1", "_"],
            &[
                ("q0", "0?", "qA", "0?", "RR"),
                ("q0", "1?", "qR", "1?", "RR"),
            ],
        );
        assert!(MachineDefinition::new(spec).is_ok());
    }

    #[test]
    fn test_unreachable_states() {
        let mut spec = create_spec(&["a"], &["a", "_"], &[("q0", "a", "qA", "a", "R")]);
        spec.states = strings(&["q0", "q1", "q2", "qA", "qR"]);

        let definition = MachineDefinition::new(spec).unwrap();
        assert_eq!(
            unreachable_states(&definition),
            vec!["q1".to_string(), "q2".to_string()]
        );
    }

    #[test]
    fn test_all_states_reachable() {
        let mut spec = create_spec(
            &["a"],
            &["a", "_"],
            &[("q0", "a", "q1", "a", "R"), ("q1", "_", "qA", "_", "S")],
        );
        spec.states = strings(&["q0", "q1", "qA", "qR"]);

        let definition = MachineDefinition::new(spec).unwrap();
        assert!(unreachable_states(&definition).is_empty());
    }
}
