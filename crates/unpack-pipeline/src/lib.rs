//! Unpack Pipeline - Event decoding engine for MIDAS-style event files
//!
//! This crate provides the decoding side of the unpacker: raw event records,
//! the data product store with scoped read leases, pipeline configuration
//! loading, the stage abstraction with the concrete bank decoders, and the
//! sequential framed file reader.

pub mod config;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod products;
pub mod reader;
pub mod stage;
pub mod store;
pub mod testing;

pub use config::PipelineSpec;
pub use error::{ConfigError, PipelineError};
pub use event::RawEvent;
pub use pipeline::Pipeline;
pub use reader::FramedFileReader;
pub use stage::UnpackStage;
pub use store::{ProductLease, ProductStore, UntypedLease};
