//! Data products produced by the unpacking stages

pub mod nalu;
pub mod sampic;

pub use nalu::{NaluChannel, NaluEvent, NaluTime};
pub use sampic::{SampicCollectorTiming, SampicEvent, SampicEventTiming, SampicHit};
