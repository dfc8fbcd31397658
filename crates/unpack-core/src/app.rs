//! The two-pass unpacking orchestrator
//!
//! A run counts the file first, because the container format's length is not
//! knowable without a full scan and the requested cap alone is not a safe
//! denominator for progress math. The file is then reopened for the real
//! processing pass; the source is never assumed rewindable.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use unpack_pipeline::{Pipeline, PipelineError, ProductStore, RawEvent};

use crate::error::RunError;
use crate::profile::ProfileKind;
use crate::progress::ProgressTracker;
use crate::registry::ProfileRegistry;
use crate::sink::SinkFactory;
use crate::source::SourceOpener;

/// Cap applied when the caller does not supply one
pub const DEFAULT_MAX_EVENTS: u64 = 10_000_000;

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the input event file
    pub input: PathBuf,

    /// Optional cap on events to process (positive when present)
    pub max_events: Option<u64>,

    /// Registry key of the profile to run with
    pub profile_key: String,

    /// Path of the output table
    pub output: PathBuf,
}

/// What a completed run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Display name of the profile that ran
    pub profile: &'static str,

    /// True total found by the counting pass
    pub events_in_file: u64,

    /// min(requested cap, true total)
    pub events_target: u64,

    /// Events actually read through the pipeline
    pub events_processed: u64,

    /// Rows committed to the sink (processed minus skips)
    pub rows_written: u64,

    /// Wall time of the processing pass
    pub elapsed: Duration,
}

impl RunSummary {
    /// Events per second over the processing pass
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if self.events_processed > 0 && secs > 0.0 {
            self.events_processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// One execution cycle of the external decoding pipeline.
///
/// Execution is synchronous and fully populates the product store before
/// returning; the store must be cleared before the next cycle.
pub trait EventPipeline {
    fn set_input(&mut self, event: RawEvent);
    fn execute(&mut self) -> Result<(), PipelineError>;
    fn products(&mut self) -> &mut ProductStore;
}

impl EventPipeline for Pipeline {
    fn set_input(&mut self, event: RawEvent) {
        Pipeline::set_input(self, event)
    }

    fn execute(&mut self) -> Result<(), PipelineError> {
        Pipeline::execute(self)
    }

    fn products(&mut self) -> &mut ProductStore {
        Pipeline::products(self)
    }
}

/// Builds a pipeline from a validated config path
pub trait PipelineBuilder {
    fn build(&self, config_path: &Path) -> Result<Box<dyn EventPipeline>, PipelineError>;
}

/// Builder backed by the real pipeline engine
pub struct StandardPipelineBuilder;

impl PipelineBuilder for StandardPipelineBuilder {
    fn build(&self, config_path: &Path) -> Result<Box<dyn EventPipeline>, PipelineError> {
        Ok(Box::new(Pipeline::from_config(config_path)?))
    }
}

/// The external collaborators a run is wired against
pub struct RunEnv<'a> {
    pub sources: &'a dyn SourceOpener,
    pub pipelines: &'a dyn PipelineBuilder,
    pub sinks: &'a dyn SinkFactory,
}

pub struct UnpackerApp<'a> {
    registry: &'a ProfileRegistry,
    base_dir: PathBuf,
}

impl<'a> UnpackerApp<'a> {
    /// `base_dir` anchors the profiles' relative config paths.
    pub fn new(registry: &'a ProfileRegistry, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            base_dir: base_dir.into(),
        }
    }

    /// Drive one complete count-then-process run.
    ///
    /// Fatal conditions surface as `RunError`; events the profile cannot
    /// extract are silently skipped. Rows committed before an in-loop fatal
    /// error stay on disk; there is no rollback.
    pub fn run(&self, options: &RunOptions, env: &RunEnv<'_>) -> Result<RunSummary, RunError> {
        let kind = self.registry.get_profile(&options.profile_key)?;
        let requested = options.max_events.unwrap_or(DEFAULT_MAX_EVENTS);

        if !options.input.exists() {
            return Err(RunError::InputMissing(options.input.clone()));
        }

        let config_path = self.base_dir.join(kind.config_relative_path());
        if !config_path.exists() {
            return Err(RunError::ConfigMissing(config_path));
        }

        let mut pipeline = env.pipelines.build(&config_path)?;

        let events_in_file = self.count_events(options, env)?;
        let target = requested.min(events_in_file);

        println!(
            "Using pipeline profile: {} ({})",
            kind.display_name(),
            config_path.display()
        );
        println!("Input file: {}", options.input.display());
        println!("Total events in file: {events_in_file}");
        println!("Events to process: {target}");

        let summary = self.process_events(options, env, kind, pipeline.as_mut(), events_in_file, target)?;

        println!();
        println!("----------------------------------------");
        println!("           Processing Summary");
        println!("----------------------------------------");
        println!("{:<25}{}", "Pipeline profile:", summary.profile);
        println!("{:<25}{:>10}", "Events processed:", summary.events_processed);
        println!("{:<25}{:>10}", "Rows written:", summary.rows_written);
        println!(
            "{:<25}{:>10.2}",
            "Elapsed time (s):",
            summary.elapsed.as_secs_f64()
        );
        println!("{:<25}{:>10.2}", "Events per second:", summary.rate());
        println!("{:<25}{}", "Output written to:", options.output.display());
        println!("----------------------------------------");

        Ok(summary)
    }

    /// Counting pass: drain the source once to learn the true total.
    fn count_events(&self, options: &RunOptions, env: &RunEnv<'_>) -> Result<u64, RunError> {
        debug!("Counting events in {}", options.input.display());
        let mut source = env.sources.open(&options.input)?;
        let mut total = 0u64;
        while source.read_next()?.is_some() {
            total += 1;
        }
        Ok(total)
    }

    /// Processing pass: reopen the source and run the event loop.
    fn process_events(
        &self,
        options: &RunOptions,
        env: &RunEnv<'_>,
        kind: ProfileKind,
        pipeline: &mut dyn EventPipeline,
        events_in_file: u64,
        target: u64,
    ) -> Result<RunSummary, RunError> {
        let mut source = env.sources.open(&options.input)?;
        let mut sink = env.sinks.create(&options.output)?;

        let mut profile = kind.instantiate();
        profile.declare_schema(sink.as_mut())?;

        let mut progress = ProgressTracker::new(target);
        println!("{}", progress.start_line());

        let started = Instant::now();
        let mut processed = 0u64;
        let mut rows_written = 0u64;

        while processed < target {
            let Some(event) = source.read_next()? else {
                // End of stream before the target is an early finish, not
                // an error; the file may have shrunk between passes.
                break;
            };
            processed += 1;

            pipeline.set_input(event);
            pipeline.execute()?;

            if profile.extract_event(pipeline.products()) {
                sink.commit_row(&profile.current_row())?;
                rows_written += 1;
            }

            // Leases must be released before the store is cleared
            profile.reset_event_state();
            pipeline.products().clear();

            if let Some(report) = progress.record(processed) {
                println!("{report}");
            }
        }

        sink.finalize()?;
        drop(source);

        let summary = RunSummary {
            profile: kind.display_name(),
            events_in_file,
            events_target: target,
            events_processed: processed,
            rows_written,
            elapsed: started.elapsed(),
        };

        info!(
            "Run complete: {} events processed, {} rows written",
            summary.events_processed, summary.rows_written
        );

        Ok(summary)
    }
}
