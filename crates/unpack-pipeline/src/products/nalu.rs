//! Data products for the HDSoC (NaluScope) event format family

use serde::{Deserialize, Serialize};

/// Product name the HDSoC unpack stage registers its event under
pub const NALU_EVENT: &str = "NaluEvent";

/// Product name for trigger timing
pub const NALU_TIME: &str = "NaluTime";

/// Samples captured from one HDSoC channel window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaluChannel {
    /// Channel number
    pub channel: u16,

    /// Sampling window index the readout came from
    pub window: u16,

    /// Raw ADC samples
    pub samples: Vec<u16>,
}

/// One fully decoded HDSoC event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaluEvent {
    /// Event number assigned by the board
    pub event_number: u32,

    /// Per-channel readouts in this event
    pub channels: Vec<NaluChannel>,
}

/// Trigger timing for one HDSoC event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaluTime {
    /// Trigger time in nanoseconds since run start
    pub trigger_time_ns: u64,

    /// Number of windows read out for the event
    pub window_count: u32,
}
