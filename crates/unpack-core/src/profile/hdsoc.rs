//! HDSoC extraction profile
//!
//! Requires the `NaluEvent` product; `NaluTime` is optional.

use serde_json::Value;

use unpack_pipeline::products::nalu::{NaluEvent, NaluTime, NALU_EVENT, NALU_TIME};
use unpack_pipeline::{ProductLease, ProductStore};

use super::product_cell;
use crate::error::SinkError;
use crate::sink::TableSink;

#[derive(Default)]
pub struct HdSocProfile {
    event: Option<ProductLease<NaluEvent>>,
    time: Option<ProductLease<NaluTime>>,
}

impl HdSocProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_schema(&self, sink: &mut dyn TableSink) -> Result<(), SinkError> {
        sink.declare_column("nalu_event")?;
        sink.declare_column("nalu_time")?;
        Ok(())
    }

    pub fn extract_event(&mut self, products: &ProductStore) -> bool {
        self.reset_event_state();

        if !products.has_product(NALU_EVENT) {
            return false;
        }

        let Some(lease) = products.checkout_read(NALU_EVENT) else {
            return false;
        };
        let Ok(event) = lease.downcast::<NaluEvent>() else {
            return false;
        };
        self.event = Some(event);

        if products.has_product(NALU_TIME) {
            if let Some(lease) = products.checkout_read(NALU_TIME) {
                if let Ok(time) = lease.downcast::<NaluTime>() {
                    self.time = Some(time);
                }
            }
        }

        true
    }

    pub fn current_row(&self) -> Vec<Value> {
        vec![
            self.event
                .as_ref()
                .map(|e| product_cell(&**e))
                .unwrap_or(Value::Null),
            self.time
                .as_ref()
                .map(|t| product_cell(&**t))
                .unwrap_or(Value::Null),
        ]
    }

    pub fn reset_event_state(&mut self) {
        self.event = None;
        self.time = None;
    }
}
