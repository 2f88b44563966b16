use crate::definition::{MachineDefinition, MachineSpec};
use crate::loader::SpecLoader;
use crate::types::TuringMachineError;
use log::error;
use std::sync::RwLock;

// Default embedded machines
const MACHINE_TEXTS: [&str; 4] = [
    include_str!("../machines/accept-a.json"),
    include_str!("../machines/doubler.json"),
    include_str!("../machines/palindrome.json"),
    include_str!("../machines/contains-a.json"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<MachineSpec>> = RwLock::new(load_embedded());
}

fn load_embedded() -> Vec<MachineSpec> {
    MACHINE_TEXTS
        .iter()
        .filter_map(|text| match SpecLoader::load_spec_from_string(text) {
            Ok(spec) => Some(spec),
            Err(e) => {
                error!("Failed to parse embedded machine: {}", e);
                None
            }
        })
        .collect()
}

pub struct ProgramManager;

impl ProgramManager {
    /// Adds a machine to the registry after validating it.
    pub fn register(spec: MachineSpec) -> Result<(), TuringMachineError> {
        MachineDefinition::new(spec.clone())?;

        PROGRAMS
            .write()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire write lock".to_string()))?
            .push(spec);

        Ok(())
    }

    /// Get the number of available machines
    pub fn get_program_count() -> usize {
        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a machine by its index
    pub fn get_program_by_index(index: usize) -> Result<MachineSpec, TuringMachineError> {
        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::SpecError(format!("Machine index {} out of range", index))
            })
    }

    /// Get a machine by its name
    pub fn get_program_by_name(name: &str) -> Result<MachineSpec, TuringMachineError> {
        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|spec| spec.name.as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| TuringMachineError::SpecError(format!("Machine '{}' not found", name)))
    }

    /// List all machine names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .filter_map(|spec| spec.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a machine by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let spec = Self::get_program_by_index(index)?;
        let definition = MachineDefinition::new(spec.clone())?;

        Ok(ProgramInfo {
            index,
            name: spec.name.unwrap_or_default(),
            start_state: spec.start_state,
            state_count: spec.states.len(),
            tape_count: definition.num_tapes(),
            transition_count: definition.transitions().len(),
        })
    }
}

/// Summary of a registered machine.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub state_count: usize,
    pub tape_count: usize,
    pub transition_count: usize,
}
