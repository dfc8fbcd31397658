//! Progress tracking for the processing pass
//!
//! Progress lines are emitted on a checkpoint schedule derived from the
//! process target: every 5 % of the target, with a minimum step of one event
//! so tiny targets still terminate the schedule, plus a guaranteed line when
//! the target is reached.

use std::fmt;
use std::time::Instant;

const CHECKPOINT_PERCENT: u64 = 5;

pub struct ProgressTracker {
    target: u64,
    step: u64,
    next_checkpoint: u64,
    started: Instant,
}

impl ProgressTracker {
    /// Start tracking toward a process target. The wall clock starts here.
    pub fn new(target: u64) -> Self {
        let step = (target * CHECKPOINT_PERCENT / 100).max(1);
        Self {
            target,
            step,
            // First processed event always reports, mirroring the zero line
            next_checkpoint: 0,
            started: Instant::now(),
        }
    }

    /// Checkpoint step in events
    pub fn step(&self) -> u64 {
        self.step
    }

    /// The zero-progress line printed before the loop starts
    pub fn start_line(&self) -> String {
        format!(
            "[Progress]    0.0% (0/{}) | Time: 0.00 s | Rate: 0.00 events/s",
            self.target
        )
    }

    /// Record the processed count after one event. Returns a report when a
    /// checkpoint is due or the target is reached; the checkpoint schedule
    /// strictly advances after every report.
    pub fn record(&mut self, processed: u64) -> Option<ProgressReport> {
        if processed < self.next_checkpoint && processed != self.target {
            return None;
        }

        let elapsed_secs = self.started.elapsed().as_secs_f64();
        let rate = if elapsed_secs > 0.0 {
            processed as f64 / elapsed_secs
        } else {
            0.0
        };
        let percent = if self.target > 0 {
            100.0 * processed as f64 / self.target as f64
        } else {
            100.0
        };
        let eta_secs = if rate > 0.0 {
            (self.target - processed.min(self.target)) as f64 / rate
        } else {
            0.0
        };

        self.next_checkpoint += self.step;

        Some(ProgressReport {
            processed,
            target: self.target,
            percent,
            elapsed_secs,
            rate,
            eta_secs,
        })
    }
}

/// One progress line's worth of measurements
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub processed: u64,
    pub target: u64,
    pub percent: f64,
    pub elapsed_secs: f64,
    pub rate: f64,
    pub eta_secs: f64,
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Progress] {:>6.1}% ({:>7}/{}) | Time: {:>7.2} s | Rate: {:>8.2} events/s | ETA: {:>7.2} s",
            self.percent, self.processed, self.target, self.elapsed_secs, self.rate, self.eta_secs
        )
    }
}
