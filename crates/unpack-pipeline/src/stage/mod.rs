//! Pipeline stage abstraction and the stage factory

mod cursor;
mod nalu;
mod sampic;

pub use nalu::{NaluTimeStage, NaluUnpackStage};
pub use sampic::{SampicCollectorTimingStage, SampicEventTimingStage, SampicUnpackStage};

pub(crate) use cursor::ByteCursor;
pub(crate) use nalu::{NALU_EVENT_BANK, NALU_TIME_BANK};
pub(crate) use sampic::{SAMPIC_COLLECTOR_BANK, SAMPIC_EVENT_BANK, SAMPIC_TIMING_BANK};

use crate::error::PipelineError;
use crate::event::RawEvent;
use crate::store::ProductStore;

/// One decoding stage of an unpacking pipeline.
///
/// A stage inspects the raw event and, when it finds the banks it knows how
/// to decode, registers data products in the store. An event without the
/// stage's banks is not an error: the stage simply produces nothing, which
/// downstream consumers see as an absent product.
pub trait UnpackStage: Send {
    /// Stage name as referenced by pipeline configs
    fn name(&self) -> &'static str;

    /// Decode this event's banks into data products
    fn process(&self, event: &RawEvent, products: &mut ProductStore) -> Result<(), PipelineError>;
}

/// Build a stage from its config name.
///
/// Returns `None` for names no stage is registered under; the pipeline
/// builder turns that into an `UnknownStage` error with the offending name.
pub fn build_stage(name: &str) -> Option<Box<dyn UnpackStage>> {
    match name {
        "sampic_unpack" => Some(Box::new(SampicUnpackStage)),
        "sampic_event_timing" => Some(Box::new(SampicEventTimingStage)),
        "sampic_collector_timing" => Some(Box::new(SampicCollectorTimingStage)),
        "nalu_unpack" => Some(Box::new(NaluUnpackStage)),
        "nalu_time" => Some(Box::new(NaluTimeStage)),
        _ => None,
    }
}
