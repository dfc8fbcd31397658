//! Tabular output sink boundary and the JSON Lines implementation

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::SinkError;

/// A column/row table the profiles write into.
///
/// Columns are declared once before the event loop; every committed row must
/// carry one value per declared column, in declaration order.
pub trait TableSink {
    /// Declare one output column. Redeclaring an existing name is a no-op,
    /// so a repeated schema declaration is harmless.
    fn declare_column(&mut self, name: &str) -> Result<(), SinkError>;

    /// Commit one row of values, ordered like the declared columns
    fn commit_row(&mut self, values: &[Value]) -> Result<(), SinkError>;

    /// Flush and close the table
    fn finalize(&mut self) -> Result<(), SinkError>;
}

/// Creates a sink at the given path
pub trait SinkFactory {
    fn create(&self, path: &Path) -> Result<Box<dyn TableSink>, SinkError>;
}

/// Factory for [`JsonlSink`]
pub struct JsonlSinkFactory;

impl SinkFactory for JsonlSinkFactory {
    fn create(&self, path: &Path) -> Result<Box<dyn TableSink>, SinkError> {
        Ok(Box::new(JsonlSink::create(path)?))
    }
}

/// Table sink writing one JSON object per row
#[derive(Debug)]
pub struct JsonlSink {
    columns: Vec<String>,
    writer: BufWriter<File>,
    rows_written: u64,
}

impl JsonlSink {
    /// Create (or truncate) the output file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| SinkError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Created output table at {}", path.display());

        Ok(Self {
            columns: Vec::new(),
            writer: BufWriter::new(file),
            rows_written: 0,
        })
    }

    /// Rows committed so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl TableSink for JsonlSink {
    fn declare_column(&mut self, name: &str) -> Result<(), SinkError> {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
        Ok(())
    }

    fn commit_row(&mut self, values: &[Value]) -> Result<(), SinkError> {
        if values.len() != self.columns.len() {
            return Err(SinkError::RowArity {
                got: values.len(),
                expected: self.columns.len(),
            });
        }

        let mut row = serde_json::Map::with_capacity(self.columns.len());
        for (column, value) in self.columns.iter().zip(values) {
            row.insert(column.clone(), value.clone());
        }

        serde_json::to_writer(&mut self.writer, &Value::Object(row))?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
