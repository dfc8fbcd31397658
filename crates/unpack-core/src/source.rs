//! Event source boundary
//!
//! The orchestrator only ever sees these traits. Sources are sequential and
//! not assumed rewindable, so the two-pass run opens the file twice through
//! the same opener instead of trying to seek back.

use std::path::Path;

use unpack_pipeline::{FramedFileReader, RawEvent};

use crate::error::SourceError;

/// A sequential stream of raw event records. Closing is dropping.
pub trait EventSource {
    /// Read the next record, `None` at end of stream
    fn read_next(&mut self) -> Result<Option<RawEvent>, SourceError>;
}

/// Opens an event file for one sequential pass
pub trait SourceOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn EventSource>, SourceError>;
}

/// Opener for framed MIDAS-style event files on disk
pub struct MidasFileOpener;

impl SourceOpener for MidasFileOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn EventSource>, SourceError> {
        let reader = FramedFileReader::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Box::new(MidasFileSource { reader }))
    }
}

struct MidasFileSource {
    reader: FramedFileReader<std::io::BufReader<std::fs::File>>,
}

impl EventSource for MidasFileSource {
    fn read_next(&mut self) -> Result<Option<RawEvent>, SourceError> {
        Ok(self.reader.read_next()?)
    }
}
