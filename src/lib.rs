//! This crate provides the execution engine for multi-tape Turing Machines.
//! It includes modules for validating machine definitions (with wildcard transitions),
//! stepping configurations, recording steps as reversible diffs, and replaying executions.

pub mod analyzer;
pub mod configuration;
pub mod definition;
pub mod diff;
pub mod loader;
pub mod machine;
pub mod pattern;
pub mod programs;
pub mod replay;
pub mod types;

/// Re-exports the `analyze` function from the analyzer module.
pub use analyzer::analyze;
/// Re-exports the `Configuration` struct from the configuration module.
pub use configuration::Configuration;
/// Re-exports the machine definition types from the definition module.
pub use definition::{Delta, MachineDefinition, MachineSpec, Transition};
/// Re-exports the `ConfigDiff` struct from the diff module.
pub use diff::ConfigDiff;
/// Re-exports the `SpecLoader` struct from the loader module.
pub use loader::SpecLoader;
/// Re-exports the `TuringMachine` driver from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `Pattern` type from the pattern module.
pub use pattern::{Pattern, PatternSymbol};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Replay` cursor from the replay module.
pub use replay::Replay;
/// Re-exports shared constants and types from the types module.
pub use types::{
    Direction, Halt, Step, TuringMachineError, BLANK_SYMBOL, MAX_SPEC_SIZE, MAX_STEPS,
    WILDCARD_SYMBOL,
};
