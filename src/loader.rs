//! This module provides the `SpecLoader` struct, responsible for loading machine
//! specifications from JSON files and strings.

use crate::definition::{MachineDefinition, MachineSpec};
use crate::types::{TuringMachineError, MAX_SPEC_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `SpecLoader` is a utility struct for loading machine specifications.
/// It provides methods to load specifications from individual files, from string content,
/// and to discover and load all `.json` files within a specified directory.
pub struct SpecLoader;

impl SpecLoader {
    /// Loads a single machine specification from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the `.json` file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineSpec)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::SpecError)` if the file content is not a valid specification.
    pub fn load_spec(path: &Path) -> Result<MachineSpec, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_spec_from_string(&content)
    }

    /// Parses a machine specification from the provided string content.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineSpec)` if the content is successfully parsed.
    /// * `Err(TuringMachineError::SpecTooLarge)` if the content exceeds `MAX_SPEC_SIZE`.
    /// * `Err(TuringMachineError::SpecError)` if the content is not a valid specification.
    pub fn load_spec_from_string(content: &str) -> Result<MachineSpec, TuringMachineError> {
        if content.len() > MAX_SPEC_SIZE {
            return Err(TuringMachineError::SpecTooLarge(content.len()));
        }

        Ok(serde_json::from_str(content)?)
    }

    /// Loads and validates a machine definition from the specified file path.
    pub fn load_definition(path: &Path) -> Result<MachineDefinition, TuringMachineError> {
        MachineDefinition::new(Self::load_spec(path)?)
    }

    /// Parses and validates a machine definition from the provided string content.
    pub fn load_definition_from_string(
        content: &str,
    ) -> Result<MachineDefinition, TuringMachineError> {
        MachineDefinition::new(Self::load_spec_from_string(content)?)
    }

    /// Loads all machine specification files (`.json` extension) from a given directory.
    ///
    /// Directories and non-`.json` files are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, MachineSpec), TuringMachineError>>` - One element per
    ///   specification file, holding either its path and the parsed `MachineSpec` or the
    ///   error that occurred while loading it.
    pub fn load_specs(directory: &Path) -> Vec<Result<(PathBuf, MachineSpec), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.json files
                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                match Self::load_spec(&path) {
                    Ok(spec) => Some(Ok((path, spec))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load machine from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const ACCEPT_A: &str = r#"{
        "name": "Accept a",
        "states": ["q0", "qA", "qR"],
        "input_alphabet": ["a"],
        "tape_alphabet": ["a", "_"],
        "start_state": "q0",
        "accept_state": "qA",
        "reject_state": "qR",
        "delta": { "q0": { "a": ["qA", "a", "R"], "_": ["qR", "_", "S"] } }
    }"#;

    #[test]
    fn test_load_valid_spec() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("accept-a.json");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(ACCEPT_A.as_bytes()).unwrap();

        let spec = SpecLoader::load_spec(&file_path).unwrap();
        assert_eq!(spec.name.as_deref(), Some("Accept a"));
        assert_eq!(spec.delta["q0"].len(), 2);

        let definition = SpecLoader::load_definition(&file_path).unwrap();
        assert_eq!(definition.num_tapes(), 1);
    }

    #[test]
    fn test_load_invalid_spec() {
        let result = SpecLoader::load_spec_from_string("This is not a valid spec");
        assert!(matches!(result, Err(TuringMachineError::SpecError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = SpecLoader::load_spec(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_definition_errors_surface_verbatim() {
        let content = ACCEPT_A.replace(r#""qR", "_", "S""#, r#""qR", "_", "X""#);
        let error = SpecLoader::load_definition_from_string(&content).unwrap_err();
        assert!(error.to_string().contains("Invalid move 'X'"));
    }

    #[test]
    fn test_zero_tape_definition_is_rejected() {
        let content = ACCEPT_A.replace(
            r#"{ "a": ["qA", "a", "R"], "_": ["qR", "_", "S"] }"#,
            r#"{ "": ["qA", "", ""] }"#,
        );
        assert_eq!(
            SpecLoader::load_definition_from_string(&content).unwrap_err(),
            TuringMachineError::EmptyPattern("q0".to_string())
        );
    }

    #[test]
    fn test_spec_too_large() {
        let content = " ".repeat(MAX_SPEC_SIZE + 1);
        assert_eq!(
            SpecLoader::load_spec_from_string(&content).unwrap_err(),
            TuringMachineError::SpecTooLarge(MAX_SPEC_SIZE + 1)
        );
    }

    #[test]
    fn test_load_specs_from_directory() {
        let dir = tempdir().unwrap();

        let valid_path = dir.path().join("valid.json");
        let mut valid_file = File::create(&valid_path).unwrap();
        valid_file.write_all(ACCEPT_A.as_bytes()).unwrap();

        let invalid_path = dir.path().join("invalid.json");
        let mut invalid_file = File::create(&invalid_path).unwrap();
        invalid_file.write_all(b"{}").unwrap();

        // Create a non-.json file that should be ignored
        let ignored_path = dir.path().join("ignored.txt");
        let mut ignored_file = File::create(&ignored_path).unwrap();
        ignored_file.write_all(b"This file should be ignored").unwrap();

        let results = SpecLoader::load_specs(dir.path());

        // We should have 2 results: 1 success and 1 error
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);

        let error = results.into_iter().find_map(Result::err).unwrap();
        assert!(error.to_string().contains("invalid.json"));
    }
}
