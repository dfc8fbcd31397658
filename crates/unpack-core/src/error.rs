//! Error types for the unpacking orchestrator
//!
//! Everything here is fatal: the run stops and the error surfaces once at
//! the process boundary. A profile failing to extract an event is not an
//! error anywhere in this crate; that is the designed per-event skip.

use std::path::PathBuf;
use thiserror::Error;

use unpack_pipeline::PipelineError;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown profile '{key}'. Available profiles: {available}")]
    UnknownProfile { key: String, available: String },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open event file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read event record: {0}")]
    Read(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to create output table {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Row has {got} values but the declared schema has {expected} columns")]
    RowArity { got: usize, expected: usize },

    #[error("Failed to encode row: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Input file does not exist: {0}")]
    InputMissing(PathBuf),

    #[error("Pipeline config file not found: {0}")]
    ConfigMissing(PathBuf),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to build pipeline: {0}")]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
