//! Extraction profiles
//!
//! A profile knows which named data products its event-format family
//! produces and how to bind them into output columns. The set of supported
//! families is closed and known at compile time, so profiles are a sum type
//! dispatched with `match` rather than an open trait hierarchy.

mod hdsoc;
mod sampic;

pub use hdsoc::HdSocProfile;
pub use sampic::SampicProfile;

use serde_json::Value;
use unpack_pipeline::ProductStore;

use crate::error::SinkError;
use crate::sink::TableSink;

/// Identity of one supported event-format family.
///
/// Carries the static metadata; per-event extraction state lives in the
/// [`EventProfile`] built by [`ProfileKind::instantiate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Sampic,
    HdSoc,
}

impl ProfileKind {
    /// Canonical lowercase identifier
    pub fn primary_key(self) -> &'static str {
        match self {
            ProfileKind::Sampic => "sampic",
            ProfileKind::HdSoc => "hdsoc",
        }
    }

    /// Human-readable name used in banners and summaries
    pub fn display_name(self) -> &'static str {
        match self {
            ProfileKind::Sampic => "SAMPIC",
            ProfileKind::HdSoc => "HDSoC",
        }
    }

    /// Pipeline config path, relative to the configured base directory
    pub fn config_relative_path(self) -> &'static str {
        match self {
            ProfileKind::Sampic => "config/unpacker_pipelines/SAMPIC/default_unpacking_pipeline.json",
            ProfileKind::HdSoc => "config/unpacker_pipelines/HDSoC/default_unpacking_pipeline.json",
        }
    }

    /// Build a fresh profile with empty extraction state
    pub fn instantiate(self) -> EventProfile {
        match self {
            ProfileKind::Sampic => EventProfile::Sampic(SampicProfile::new()),
            ProfileKind::HdSoc => EventProfile::HdSoc(HdSocProfile::new()),
        }
    }
}

/// A profile with its mutable per-event extraction state.
pub enum EventProfile {
    Sampic(SampicProfile),
    HdSoc(HdSocProfile),
}

impl EventProfile {
    /// The format family this profile belongs to
    pub fn kind(&self) -> ProfileKind {
        match self {
            EventProfile::Sampic(_) => ProfileKind::Sampic,
            EventProfile::HdSoc(_) => ProfileKind::HdSoc,
        }
    }

    /// Declare this profile's output columns on the sink. Called once before
    /// the event loop; safe to call again because column declaration is
    /// idempotent on the sink side.
    pub fn declare_schema(&self, sink: &mut dyn TableSink) -> Result<(), SinkError> {
        match self {
            EventProfile::Sampic(p) => p.declare_schema(sink),
            EventProfile::HdSoc(p) => p.declare_schema(sink),
        }
    }

    /// Bind this event's data products from the store.
    ///
    /// Returns `false` when the event does not belong in the output table:
    /// the required product is absent or of an unexpected kind. That is the
    /// designed per-event skip, not an error. Optional products that are
    /// absent simply stay unbound.
    pub fn extract_event(&mut self, products: &ProductStore) -> bool {
        match self {
            EventProfile::Sampic(p) => p.extract_event(products),
            EventProfile::HdSoc(p) => p.extract_event(products),
        }
    }

    /// Values for the currently-bound row, ordered like the declared
    /// columns. Only meaningful between a successful `extract_event` and the
    /// following `reset_event_state`.
    pub fn current_row(&self) -> Vec<Value> {
        match self {
            EventProfile::Sampic(p) => p.current_row(),
            EventProfile::HdSoc(p) => p.current_row(),
        }
    }

    /// Release all held product leases and null the bound state. Idempotent;
    /// must run after every event, before the product store is cleared.
    pub fn reset_event_state(&mut self) {
        match self {
            EventProfile::Sampic(p) => p.reset_event_state(),
            EventProfile::HdSoc(p) => p.reset_event_state(),
        }
    }
}

/// Serialize a leased product into a table cell
pub(crate) fn product_cell<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
