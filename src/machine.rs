//! This module defines the `TuringMachine` driver, which executes a shared machine definition
//! against input strings. It can return every configuration visited, or only the per-step
//! diffs plus the final configuration, and derives acceptance and output from a run.

use crate::configuration::Configuration;
use crate::definition::{MachineDefinition, MachineSpec};
use crate::diff::ConfigDiff;
use crate::replay::Replay;
use crate::types::{TuringMachineError, MAX_STEPS};
use log::{debug, warn};
use std::sync::Arc;

/// Executes a [`MachineDefinition`] on inputs.
///
/// The driver is cheap to clone: the definition is shared, and every run owns its own
/// configurations.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    definition: Arc<MachineDefinition>,
    max_steps: usize,
}

impl TuringMachine {
    /// Creates a driver for `definition` with the default step limit.
    pub fn new(definition: impl Into<Arc<MachineDefinition>>) -> Self {
        Self {
            definition: definition.into(),
            max_steps: MAX_STEPS,
        }
    }

    /// Validates `spec` and creates a driver for it.
    pub fn from_spec(spec: MachineSpec) -> Result<Self, TuringMachineError> {
        Ok(Self::new(MachineDefinition::new(spec)?))
    }

    /// Sets the maximum number of steps a run may take before it is abandoned.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn definition(&self) -> &Arc<MachineDefinition> {
        &self.definition
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Creates the initial configuration for `input`.
    pub fn initial_config(&self, input: &str) -> Result<Configuration, TuringMachineError> {
        Configuration::new(Arc::clone(&self.definition), input)
    }

    /// Runs the machine on `input` and returns every configuration visited, starting with the
    /// initial one. At most `max_steps + 1` configurations are returned.
    pub fn configs_visited(&self, input: &str) -> Result<Vec<Configuration>, TuringMachineError> {
        let mut config = self.initial_config(input)?;
        let mut configs = vec![config.clone()];

        while !config.is_halted() && configs.len() <= self.max_steps {
            config.step();
            configs.push(config.clone());
        }

        self.log_outcome(&config, configs.len() - 1);
        Ok(configs)
    }

    /// Runs the machine on `input`, keeping only the diff of each step and the final
    /// configuration.
    pub fn config_diffs_and_final_config(
        &self,
        input: &str,
    ) -> Result<(Vec<ConfigDiff>, Configuration), TuringMachineError> {
        let mut config = self.initial_config(input)?;
        let mut diffs = Vec::new();

        while diffs.len() < self.max_steps {
            match config.step_with_diff() {
                Some(diff) => diffs.push(diff),
                None => break,
            }
        }

        self.log_outcome(&config, diffs.len());
        Ok((diffs, config))
    }

    /// Runs the machine on `input` in place and returns the final configuration.
    pub fn final_config(&self, input: &str) -> Result<Configuration, TuringMachineError> {
        let mut config = self.initial_config(input)?;
        let mut steps = 0;

        while !config.is_halted() && steps < self.max_steps {
            config.step();
            steps += 1;
        }

        self.log_outcome(&config, steps);
        Ok(config)
    }

    /// Checks whether the machine accepts `input`.
    ///
    /// A run that reaches the step limit without halting does not accept.
    pub fn accepts(&self, input: &str) -> Result<bool, TuringMachineError> {
        Ok(self.final_config(input)?.is_accepting())
    }

    /// Runs the machine on `input` and returns the output read from its last tape.
    pub fn run(&self, input: &str) -> Result<String, TuringMachineError> {
        Ok(self.final_config(input)?.output())
    }

    /// Runs the machine on `input` and returns a cursor positioned at the initial
    /// configuration, able to navigate the whole execution.
    pub fn replay(&self, input: &str) -> Result<Replay, TuringMachineError> {
        let initial = self.initial_config(input)?;
        let (diffs, _) = self.config_diffs_and_final_config(input)?;
        Ok(Replay::new(initial, diffs))
    }

    fn log_outcome(&self, config: &Configuration, steps: usize) {
        match config.halt() {
            Some(halt) => debug!(
                "Halted with {:?} in state {} after {} steps",
                halt,
                config.state(),
                steps
            ),
            None => warn!(
                "Step limit of {} reached in state {} without halting",
                self.max_steps,
                config.state()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::tests::create_definition;
    use crate::types::Halt;

    fn accept_a() -> TuringMachine {
        TuringMachine::new(create_definition(
            &["a"],
            &["a", "_"],
            &[("q0", "a", "qA", "a", "R"), ("q0", "_", "qR", "_", "S")],
        ))
    }

    fn looping() -> TuringMachine {
        TuringMachine::new(create_definition(
            &["a"],
            &["a", "_"],
            &[("q0", "?", "q0", "?", "R")],
        ))
    }

    #[test]
    fn test_accepts() {
        let machine = accept_a();
        assert!(machine.accepts("a").unwrap());
        assert!(!machine.accepts("").unwrap());
    }

    #[test]
    fn test_invalid_input_is_rejected_up_front() {
        assert_eq!(
            accept_a().accepts("b"),
            Err(TuringMachineError::InvalidInputSymbol('b'))
        );
    }

    #[test]
    fn test_configs_visited() {
        let configs = accept_a().configs_visited("a").unwrap();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].state(), "q0");
        assert_eq!(configs[1].state(), "qA");
    }

    #[test]
    fn test_step_limit_bounds_configs() {
        let machine = looping().with_max_steps(25);
        let configs = machine.configs_visited("aaa").unwrap();

        assert_eq!(configs.len(), 26);
        assert!(!configs.last().unwrap().is_halted());
    }

    #[test]
    fn test_step_limit_is_not_an_error() {
        let machine = looping().with_max_steps(10);

        let (diffs, config) = machine.config_diffs_and_final_config("a").unwrap();
        assert_eq!(diffs.len(), 10);
        assert_eq!(config.halt(), None);
        assert!(!machine.accepts("a").unwrap());
    }

    #[test]
    fn test_diffs_reach_same_final_config() {
        let machine = accept_a();
        let configs = machine.configs_visited("a").unwrap();
        let (diffs, last) = machine.config_diffs_and_final_config("a").unwrap();

        assert_eq!(diffs.len(), configs.len() - 1);
        assert_eq!(configs.last(), Some(&last));
        assert_eq!(last.halt(), Some(Halt::Accept));
    }

    #[test]
    fn test_run_output() {
        let machine = TuringMachine::new(create_definition(
            &["0"],
            &["0", "_"],
            &[("q0", "0", "qA", "0", "S")],
        ));
        assert_eq!(machine.run("000").unwrap(), "000");
        assert_eq!(machine.run("").unwrap(), "");
    }
}
