//! Fixture builders for tests and demos
//!
//! Encoders that mirror the bank layouts the stages decode, plus helpers for
//! writing complete event files in the framed container format. Production
//! code never writes event files; acquisition frontends do. These builders
//! exist so tests and demos can fabricate realistic inputs.

use std::io::{self, Write};
use std::path::Path;

use crate::event::RawEvent;
use crate::products::nalu::{NaluEvent, NaluTime};
use crate::products::sampic::{SampicCollectorTiming, SampicEvent, SampicEventTiming};
use crate::stage::{
    NALU_EVENT_BANK, NALU_TIME_BANK, SAMPIC_COLLECTOR_BANK, SAMPIC_EVENT_BANK, SAMPIC_TIMING_BANK,
};

/// Encode one named bank
pub fn bank(name: &str, body: &[u8]) -> Vec<u8> {
    assert_eq!(name.len(), 4, "bank names are exactly four ASCII bytes");
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// Encode a `SAMP` bank from a decoded event
pub fn sampic_event_bank(event: &SampicEvent) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&event.event_number.to_le_bytes());
    body.extend_from_slice(&(event.hits.len() as u16).to_le_bytes());
    for hit in &event.hits {
        body.extend_from_slice(&hit.board.to_le_bytes());
        body.extend_from_slice(&hit.channel.to_le_bytes());
        body.extend_from_slice(&hit.raw_tot_value.to_le_bytes());
        body.extend_from_slice(&hit.tot_value.to_le_bytes());
        body.extend_from_slice(&hit.amplitude.to_le_bytes());
        body.extend_from_slice(&hit.baseline.to_le_bytes());
        body.extend_from_slice(&hit.peak.to_le_bytes());
        body.extend_from_slice(&hit.time_instant.to_le_bytes());
        body.extend_from_slice(&hit.first_cell_timestamp.to_le_bytes());
        body.extend_from_slice(&(hit.samples.len() as u16).to_le_bytes());
        for sample in &hit.samples {
            body.extend_from_slice(&sample.to_le_bytes());
        }
    }
    bank(SAMPIC_EVENT_BANK, &body)
}

/// Encode an `STIM` bank
pub fn sampic_timing_bank(timing: &SampicEventTiming) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&timing.trigger_timestamp_ns.to_le_bytes());
    body.extend_from_slice(&timing.coarse_counter.to_le_bytes());
    bank(SAMPIC_TIMING_BANK, &body)
}

/// Encode an `SCOL` bank
pub fn sampic_collector_bank(timing: &SampicCollectorTiming) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&timing.collector_timestamp_ns.to_le_bytes());
    body.extend_from_slice(&timing.sync_counter.to_le_bytes());
    bank(SAMPIC_COLLECTOR_BANK, &body)
}

/// Encode a `NALU` bank from a decoded event
pub fn nalu_event_bank(event: &NaluEvent) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&event.event_number.to_le_bytes());
    body.extend_from_slice(&(event.channels.len() as u16).to_le_bytes());
    for ch in &event.channels {
        body.extend_from_slice(&ch.channel.to_le_bytes());
        body.extend_from_slice(&ch.window.to_le_bytes());
        body.extend_from_slice(&(ch.samples.len() as u16).to_le_bytes());
        for sample in &ch.samples {
            body.extend_from_slice(&sample.to_le_bytes());
        }
    }
    bank(NALU_EVENT_BANK, &body)
}

/// Encode an `NTIM` bank
pub fn nalu_time_bank(time: &NaluTime) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&time.trigger_time_ns.to_le_bytes());
    body.extend_from_slice(&time.window_count.to_le_bytes());
    bank(NALU_TIME_BANK, &body)
}

/// Write one framed record in the container format the reader expects
pub fn write_record<W: Write>(writer: &mut W, event: &RawEvent) -> io::Result<()> {
    writer.write_all(&event.serial.to_le_bytes())?;
    writer.write_all(&event.event_id.to_le_bytes())?;
    writer.write_all(&0u16.to_le_bytes())?;
    writer.write_all(&(event.payload.len() as u32).to_le_bytes())?;
    writer.write_all(&event.payload)
}

/// Write a complete event file from a slice of records
pub fn write_event_file(path: impl AsRef<Path>, events: &[RawEvent]) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    for event in events {
        write_record(&mut writer, event)?;
    }
    writer.flush()
}
