//! Unpack Core - Profile-driven event unpacking orchestrator
//!
//! Drives a two-pass read of a binary event file: a counting pass to learn
//! the true event total, then a processing pass that feeds each event through
//! the decoding pipeline, extracts data products through the selected
//! profile, and commits rows to a tabular sink with live progress reporting.

pub mod app;
pub mod error;
pub mod profile;
pub mod progress;
pub mod registry;
pub mod sink;
pub mod source;

pub use app::{
    EventPipeline, PipelineBuilder, RunEnv, RunOptions, RunSummary, StandardPipelineBuilder,
    UnpackerApp, DEFAULT_MAX_EVENTS,
};
pub use error::{RegistryError, RunError, SinkError, SourceError};
pub use profile::{EventProfile, ProfileKind};
pub use progress::{ProgressReport, ProgressTracker};
pub use registry::ProfileRegistry;
pub use sink::{JsonlSink, JsonlSinkFactory, SinkFactory, TableSink};
pub use source::{EventSource, MidasFileOpener, SourceOpener};
