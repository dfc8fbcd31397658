//! Bank decoders for the SAMPIC format family
//!
//! Bank layout (all little-endian):
//! - `SAMP`: `event_number u32`, `hit_count u16`, then per hit
//!   `board u16`, `channel u16`, `raw_tot i32`, `tot f32`, `amplitude f32`,
//!   `baseline f32`, `peak f32`, `time_instant f64`,
//!   `first_cell_timestamp f64`, `sample_count u16`, `samples [u16]`.
//! - `STIM`: `trigger_timestamp_ns u64`, `coarse_counter u32`.
//! - `SCOL`: `collector_timestamp_ns u64`, `sync_counter u32`.

use tracing::debug;

use super::{ByteCursor, UnpackStage};
use crate::error::PipelineError;
use crate::event::RawEvent;
use crate::products::sampic::{
    SampicCollectorTiming, SampicEvent, SampicEventTiming, SampicHit, MAX_SAMPLES, SAMPIC_EVENT,
    SAMPIC_COLLECTOR_TIMING, SAMPIC_EVENT_TIMING,
};
use crate::store::ProductStore;

pub(crate) const SAMPIC_EVENT_BANK: &str = "SAMP";
pub(crate) const SAMPIC_TIMING_BANK: &str = "STIM";
pub(crate) const SAMPIC_COLLECTOR_BANK: &str = "SCOL";

/// Decodes the main SAMPIC event bank
pub struct SampicUnpackStage;

impl UnpackStage for SampicUnpackStage {
    fn name(&self) -> &'static str {
        "sampic_unpack"
    }

    fn process(&self, event: &RawEvent, products: &mut ProductStore) -> Result<(), PipelineError> {
        let Some(bank) = event.bank(SAMPIC_EVENT_BANK) else {
            return Ok(());
        };

        match decode_sampic_event(bank) {
            Some(decoded) => products.insert(SAMPIC_EVENT, decoded),
            None => debug!("Malformed {} bank in event {}", SAMPIC_EVENT_BANK, event.serial),
        }

        Ok(())
    }
}

/// Decodes per-event trigger timing
pub struct SampicEventTimingStage;

impl UnpackStage for SampicEventTimingStage {
    fn name(&self) -> &'static str {
        "sampic_event_timing"
    }

    fn process(&self, event: &RawEvent, products: &mut ProductStore) -> Result<(), PipelineError> {
        let Some(bank) = event.bank(SAMPIC_TIMING_BANK) else {
            return Ok(());
        };

        let mut cursor = ByteCursor::new(bank);
        let timing = (|| {
            Some(SampicEventTiming {
                trigger_timestamp_ns: cursor.read_u64()?,
                coarse_counter: cursor.read_u32()?,
            })
        })();

        match timing {
            Some(timing) => products.insert(SAMPIC_EVENT_TIMING, timing),
            None => debug!("Malformed {} bank in event {}", SAMPIC_TIMING_BANK, event.serial),
        }

        Ok(())
    }
}

/// Decodes collector-level synchronisation timing
pub struct SampicCollectorTimingStage;

impl UnpackStage for SampicCollectorTimingStage {
    fn name(&self) -> &'static str {
        "sampic_collector_timing"
    }

    fn process(&self, event: &RawEvent, products: &mut ProductStore) -> Result<(), PipelineError> {
        let Some(bank) = event.bank(SAMPIC_COLLECTOR_BANK) else {
            return Ok(());
        };

        let mut cursor = ByteCursor::new(bank);
        let timing = (|| {
            Some(SampicCollectorTiming {
                collector_timestamp_ns: cursor.read_u64()?,
                sync_counter: cursor.read_u32()?,
            })
        })();

        match timing {
            Some(timing) => products.insert(SAMPIC_COLLECTOR_TIMING, timing),
            None => debug!(
                "Malformed {} bank in event {}",
                SAMPIC_COLLECTOR_BANK, event.serial
            ),
        }

        Ok(())
    }
}

fn decode_sampic_event(bank: &[u8]) -> Option<SampicEvent> {
    let mut cursor = ByteCursor::new(bank);
    let event_number = cursor.read_u32()?;
    let hit_count = cursor.read_u16()? as usize;

    let mut hits = Vec::with_capacity(hit_count);
    for _ in 0..hit_count {
        let board = cursor.read_u16()?;
        let channel = cursor.read_u16()?;
        let raw_tot_value = cursor.read_i32()?;
        let tot_value = cursor.read_f32()?;
        let amplitude = cursor.read_f32()?;
        let baseline = cursor.read_f32()?;
        let peak = cursor.read_f32()?;
        let time_instant = cursor.read_f64()?;
        let first_cell_timestamp = cursor.read_f64()?;

        let sample_count = cursor.read_u16()? as usize;
        if sample_count > MAX_SAMPLES {
            return None;
        }
        let samples = cursor.read_u16_array(sample_count)?;

        hits.push(SampicHit {
            board,
            channel,
            raw_tot_value,
            tot_value,
            amplitude,
            baseline,
            peak,
            time_instant,
            first_cell_timestamp,
            samples,
        });
    }

    Some(SampicEvent { event_number, hits })
}
