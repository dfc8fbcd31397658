//! Pipeline configuration loading and validation

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Declarative description of an unpacking pipeline, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Human-readable pipeline name
    pub name: String,

    /// Stage names to build, executed in order
    pub stages: Vec<String>,
}

impl PipelineSpec {
    /// Load a spec from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: PipelineSpec =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check structural validity: at least one stage, no blanks, no repeats.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "pipeline '{}' declares no stages",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for stage in &self.stages {
            if stage.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "pipeline '{}' declares an empty stage name",
                    self.name
                )));
            }
            if !seen.insert(stage.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "pipeline '{}' declares stage '{}' more than once",
                    self.name, stage
                )));
            }
        }

        Ok(())
    }
}
