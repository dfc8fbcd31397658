//! SAMPIC extraction profile
//!
//! Requires the `SampicEvent` product; `SampicEventTiming` and
//! `SampicCollectorTiming` are optional, and collector timing presence is
//! additionally surfaced as its own boolean output column.

use serde_json::Value;

use unpack_pipeline::products::sampic::{
    SampicCollectorTiming, SampicEvent, SampicEventTiming, SAMPIC_COLLECTOR_TIMING, SAMPIC_EVENT,
    SAMPIC_EVENT_TIMING,
};
use unpack_pipeline::{ProductLease, ProductStore};

use super::product_cell;
use crate::error::SinkError;
use crate::sink::TableSink;

#[derive(Default)]
pub struct SampicProfile {
    event: Option<ProductLease<SampicEvent>>,
    event_timing: Option<ProductLease<SampicEventTiming>>,
    collector_timing: Option<ProductLease<SampicCollectorTiming>>,
    has_collector_timing: bool,
}

impl SampicProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_schema(&self, sink: &mut dyn TableSink) -> Result<(), SinkError> {
        sink.declare_column("sampic_event")?;
        sink.declare_column("sampic_event_timing")?;
        sink.declare_column("sampic_collector_timing")?;
        sink.declare_column("has_sampic_collector_timing")?;
        Ok(())
    }

    pub fn extract_event(&mut self, products: &ProductStore) -> bool {
        self.reset_event_state();

        if !products.has_product(SAMPIC_EVENT) {
            return false;
        }

        let Some(lease) = products.checkout_read(SAMPIC_EVENT) else {
            return false;
        };
        let Ok(event) = lease.downcast::<SampicEvent>() else {
            return false;
        };
        self.event = Some(event);

        if products.has_product(SAMPIC_EVENT_TIMING) {
            if let Some(lease) = products.checkout_read(SAMPIC_EVENT_TIMING) {
                if let Ok(timing) = lease.downcast::<SampicEventTiming>() {
                    self.event_timing = Some(timing);
                }
            }
        }

        if products.has_product(SAMPIC_COLLECTOR_TIMING) {
            if let Some(lease) = products.checkout_read(SAMPIC_COLLECTOR_TIMING) {
                if let Ok(timing) = lease.downcast::<SampicCollectorTiming>() {
                    self.collector_timing = Some(timing);
                }
            }
        }

        self.has_collector_timing = self.collector_timing.is_some();
        true
    }

    pub fn current_row(&self) -> Vec<Value> {
        vec![
            self.event
                .as_ref()
                .map(|e| product_cell(&**e))
                .unwrap_or(Value::Null),
            self.event_timing
                .as_ref()
                .map(|t| product_cell(&**t))
                .unwrap_or(Value::Null),
            self.collector_timing
                .as_ref()
                .map(|t| product_cell(&**t))
                .unwrap_or(Value::Null),
            Value::Bool(self.has_collector_timing),
        ]
    }

    pub fn reset_event_state(&mut self) {
        self.event = None;
        self.event_timing = None;
        self.collector_timing = None;
        self.has_collector_timing = false;
    }
}
