//! Error types for the pipeline engine

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read pipeline config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse pipeline config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid pipeline config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown pipeline stage '{0}'")]
    UnknownStage(String),

    #[error("Pipeline executed with no input event")]
    NoInput,
}
