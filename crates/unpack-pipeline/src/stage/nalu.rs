//! Bank decoders for the HDSoC (NaluScope) format family
//!
//! Bank layout (all little-endian):
//! - `NALU`: `event_number u32`, `channel_count u16`, then per channel
//!   `channel u16`, `window u16`, `sample_count u16`, `samples [u16]`.
//! - `NTIM`: `trigger_time_ns u64`, `window_count u32`.

use tracing::debug;

use super::{ByteCursor, UnpackStage};
use crate::error::PipelineError;
use crate::event::RawEvent;
use crate::products::nalu::{NaluChannel, NaluEvent, NaluTime, NALU_EVENT, NALU_TIME};
use crate::store::ProductStore;

pub(crate) const NALU_EVENT_BANK: &str = "NALU";
pub(crate) const NALU_TIME_BANK: &str = "NTIM";

/// Decodes the main HDSoC event bank
pub struct NaluUnpackStage;

impl UnpackStage for NaluUnpackStage {
    fn name(&self) -> &'static str {
        "nalu_unpack"
    }

    fn process(&self, event: &RawEvent, products: &mut ProductStore) -> Result<(), PipelineError> {
        let Some(bank) = event.bank(NALU_EVENT_BANK) else {
            return Ok(());
        };

        match decode_nalu_event(bank) {
            Some(decoded) => products.insert(NALU_EVENT, decoded),
            None => debug!("Malformed {} bank in event {}", NALU_EVENT_BANK, event.serial),
        }

        Ok(())
    }
}

/// Decodes trigger timing for HDSoC events
pub struct NaluTimeStage;

impl UnpackStage for NaluTimeStage {
    fn name(&self) -> &'static str {
        "nalu_time"
    }

    fn process(&self, event: &RawEvent, products: &mut ProductStore) -> Result<(), PipelineError> {
        let Some(bank) = event.bank(NALU_TIME_BANK) else {
            return Ok(());
        };

        let mut cursor = ByteCursor::new(bank);
        let time = (|| {
            Some(NaluTime {
                trigger_time_ns: cursor.read_u64()?,
                window_count: cursor.read_u32()?,
            })
        })();

        match time {
            Some(time) => products.insert(NALU_TIME, time),
            None => debug!("Malformed {} bank in event {}", NALU_TIME_BANK, event.serial),
        }

        Ok(())
    }
}

fn decode_nalu_event(bank: &[u8]) -> Option<NaluEvent> {
    let mut cursor = ByteCursor::new(bank);
    let event_number = cursor.read_u32()?;
    let channel_count = cursor.read_u16()? as usize;

    let mut channels = Vec::with_capacity(channel_count);
    for _ in 0..channel_count {
        let channel = cursor.read_u16()?;
        let window = cursor.read_u16()?;
        let sample_count = cursor.read_u16()? as usize;
        let samples = cursor.read_u16_array(sample_count)?;

        channels.push(NaluChannel {
            channel,
            window,
            samples,
        });
    }

    Some(NaluEvent {
        event_number,
        channels,
    })
}
