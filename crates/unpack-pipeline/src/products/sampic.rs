//! Data products for the SAMPIC event format family

use serde::{Deserialize, Serialize};

/// Product name the SAMPIC unpack stage registers its event under
pub const SAMPIC_EVENT: &str = "SampicEvent";

/// Product name for per-event timing
pub const SAMPIC_EVENT_TIMING: &str = "SampicEventTiming";

/// Product name for collector-level timing (not emitted by every frontend)
pub const SAMPIC_COLLECTOR_TIMING: &str = "SampicCollectorTiming";

/// Maximum number of waveform samples per hit
pub const MAX_SAMPLES: usize = 64;

/// One decoded SAMPIC channel hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampicHit {
    /// Frontend board index
    pub board: u16,

    /// Channel number on the board
    pub channel: u16,

    /// Raw time-over-threshold counter value
    pub raw_tot_value: i32,

    /// Calibrated time over threshold
    pub tot_value: f32,

    pub amplitude: f32,
    pub baseline: f32,
    pub peak: f32,

    /// Hit time within the acquisition window
    pub time_instant: f64,

    /// Timestamp of the first sampled cell
    pub first_cell_timestamp: f64,

    /// Raw waveform samples (at most [`MAX_SAMPLES`])
    pub samples: Vec<u16>,
}

/// One fully decoded SAMPIC event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampicEvent {
    /// Event number assigned by the frontend
    pub event_number: u32,

    /// All channel hits in this event
    pub hits: Vec<SampicHit>,
}

/// Per-event trigger timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampicEventTiming {
    /// Trigger timestamp in nanoseconds since run start
    pub trigger_timestamp_ns: u64,

    /// Coarse counter sampled at the trigger
    pub coarse_counter: u32,
}

/// Collector-level synchronisation timing.
///
/// Only present when the acquisition ran with an external collector, so
/// downstream consumers must treat it as optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampicCollectorTiming {
    /// Collector timestamp in nanoseconds since run start
    pub collector_timestamp_ns: u64,

    /// Synchronisation counter between frontend and collector
    pub sync_counter: u32,
}
