//! End-to-end tests of the orchestrator against mock collaborators.
//!
//! The mocks record every interaction so the tests can assert on the run
//! protocol itself: how often the source is opened, when the sink is
//! created, and which rows get committed.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;

use unpack_core::{
    EventPipeline, PipelineBuilder, ProfileRegistry, RunEnv, RunError, RunOptions, SinkError,
    SinkFactory, SourceError, SourceOpener, TableSink, UnpackerApp,
};
use unpack_pipeline::products::sampic::{SampicEvent, SAMPIC_EVENT};
use unpack_pipeline::{PipelineError, ProductStore, RawEvent};

fn raw_event(serial: u32) -> RawEvent {
    RawEvent {
        serial,
        event_id: 1,
        payload: Vec::new(),
    }
}

// -- mock source --------------------------------------------------------

#[derive(Default)]
struct OpenerLog {
    opens: u32,
}

struct MockOpener {
    events: Vec<RawEvent>,
    /// Events visible per pass; index 0 is the counting pass. Passes beyond
    /// the list see the full event set.
    per_pass_limit: Vec<usize>,
    log: Rc<RefCell<OpenerLog>>,
}

impl MockOpener {
    fn new(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            per_pass_limit: Vec::new(),
            log: Rc::new(RefCell::new(OpenerLog::default())),
        }
    }

    fn with_pass_limits(mut self, limits: &[usize]) -> Self {
        self.per_pass_limit = limits.to_vec();
        self
    }

    fn opens(&self) -> u32 {
        self.log.borrow().opens
    }
}

impl SourceOpener for MockOpener {
    fn open(&self, _path: &Path) -> Result<Box<dyn unpack_core::EventSource>, SourceError> {
        let pass = self.log.borrow().opens as usize;
        self.log.borrow_mut().opens += 1;

        let limit = self
            .per_pass_limit
            .get(pass)
            .copied()
            .unwrap_or(self.events.len());
        Ok(Box::new(MockSource {
            events: self.events[..limit.min(self.events.len())].to_vec(),
            cursor: 0,
        }))
    }
}

struct MockSource {
    events: Vec<RawEvent>,
    cursor: usize,
}

impl unpack_core::EventSource for MockSource {
    fn read_next(&mut self) -> Result<Option<RawEvent>, SourceError> {
        let event = self.events.get(self.cursor).cloned();
        self.cursor += event.is_some() as usize;
        Ok(event)
    }
}

// -- mock pipeline ------------------------------------------------------

/// Produces a `SampicEvent` product for every event whose serial passes the
/// predicate, and nothing for the rest.
struct MockPipeline {
    produce_if: fn(u32) -> bool,
    input: Option<RawEvent>,
    products: ProductStore,
}

impl EventPipeline for MockPipeline {
    fn set_input(&mut self, event: RawEvent) {
        self.input = Some(event);
    }

    fn execute(&mut self) -> Result<(), PipelineError> {
        let event = self.input.take().ok_or(PipelineError::NoInput)?;
        if (self.produce_if)(event.serial) {
            self.products.insert(
                SAMPIC_EVENT,
                SampicEvent {
                    event_number: event.serial,
                    hits: Vec::new(),
                },
            );
        }
        Ok(())
    }

    fn products(&mut self) -> &mut ProductStore {
        &mut self.products
    }
}

struct MockBuilder {
    produce_if: fn(u32) -> bool,
}

impl MockBuilder {
    fn always() -> Self {
        Self {
            produce_if: |_| true,
        }
    }
}

impl PipelineBuilder for MockBuilder {
    fn build(&self, _config_path: &Path) -> Result<Box<dyn EventPipeline>, PipelineError> {
        Ok(Box::new(MockPipeline {
            produce_if: self.produce_if,
            input: None,
            products: ProductStore::new(),
        }))
    }
}

// -- mock sink ----------------------------------------------------------

#[derive(Default)]
struct SinkLog {
    creates: u32,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    finalized: bool,
}

#[derive(Default)]
struct MockSinkFactory {
    log: Rc<RefCell<SinkLog>>,
}

impl MockSinkFactory {
    fn log(&self) -> Rc<RefCell<SinkLog>> {
        Rc::clone(&self.log)
    }
}

impl SinkFactory for MockSinkFactory {
    fn create(&self, _path: &Path) -> Result<Box<dyn TableSink>, SinkError> {
        self.log.borrow_mut().creates += 1;
        Ok(Box::new(MockSink {
            log: Rc::clone(&self.log),
        }))
    }
}

struct MockSink {
    log: Rc<RefCell<SinkLog>>,
}

impl TableSink for MockSink {
    fn declare_column(&mut self, name: &str) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        if !log.columns.iter().any(|c| c == name) {
            log.columns.push(name.to_string());
        }
        Ok(())
    }

    fn commit_row(&mut self, values: &[Value]) -> Result<(), SinkError> {
        self.log.borrow_mut().rows.push(values.to_vec());
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        self.log.borrow_mut().finalized = true;
        Ok(())
    }
}

// -- fixtures -----------------------------------------------------------

/// A workspace with an input file and the SAMPIC pipeline config in place
struct Fixture {
    dir: tempfile::TempDir,
    input: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run00001.mid");
        std::fs::write(&input, b"placeholder").unwrap();

        let config_dir = dir.path().join("config/unpacker_pipelines/SAMPIC");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("default_unpacking_pipeline.json"),
            r#"{"name": "sampic_default", "stages": ["sampic_unpack"]}"#,
        )
        .unwrap();

        Self { dir, input }
    }

    fn options(&self, max_events: Option<u64>) -> RunOptions {
        RunOptions {
            input: self.input.clone(),
            max_events,
            profile_key: "sampic".to_string(),
            output: self.dir.path().join("unpacked.jsonl"),
        }
    }

    fn app<'a>(&self, registry: &'a ProfileRegistry) -> UnpackerApp<'a> {
        UnpackerApp::new(registry, self.dir.path())
    }
}

fn events(n: u32) -> Vec<RawEvent> {
    (0..n).map(raw_event).collect()
}

// -- tests --------------------------------------------------------------

#[test]
fn test_cap_limits_processing_and_source_opens_twice() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    let opener = MockOpener::new(events(100));
    let builder = MockBuilder::always();
    let sinks = MockSinkFactory::default();
    let sink_log = sinks.log();

    let summary = fixture
        .app(&registry)
        .run(
            &fixture.options(Some(50)),
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap();

    assert_eq!(summary.events_in_file, 100);
    assert_eq!(summary.events_target, 50);
    assert_eq!(summary.events_processed, 50);
    assert_eq!(summary.rows_written, 50);
    // One counting pass, one processing pass
    assert_eq!(opener.opens(), 2);

    let log = sink_log.borrow();
    assert_eq!(log.rows.len(), 50);
    assert!(log.finalized);
    assert_eq!(
        log.columns,
        vec![
            "sampic_event",
            "sampic_event_timing",
            "sampic_collector_timing",
            "has_sampic_collector_timing",
        ]
    );
}

#[test]
fn test_target_is_min_of_cap_and_file_total() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    let opener = MockOpener::new(events(7));
    let builder = MockBuilder::always();
    let sinks = MockSinkFactory::default();

    let summary = fixture
        .app(&registry)
        .run(
            &fixture.options(Some(1_000)),
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap();

    assert_eq!(summary.events_target, 7);
    assert_eq!(summary.events_processed, 7);
}

#[test]
fn test_missing_input_fails_before_sink_creation() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    let opener = MockOpener::new(events(3));
    let builder = MockBuilder::always();
    let sinks = MockSinkFactory::default();
    let sink_log = sinks.log();

    let mut options = fixture.options(None);
    options.input = fixture.dir.path().join("missing.mid");

    let err = fixture
        .app(&registry)
        .run(
            &options,
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap_err();

    assert!(matches!(err, RunError::InputMissing(_)));
    assert_eq!(opener.opens(), 0);
    assert_eq!(sink_log.borrow().creates, 0);
}

#[test]
fn test_missing_pipeline_config_is_fatal() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    let opener = MockOpener::new(events(3));
    let builder = MockBuilder::always();
    let sinks = MockSinkFactory::default();
    let sink_log = sinks.log();

    // HDSoC config was never laid down in the fixture
    let mut options = fixture.options(None);
    options.profile_key = "hdsoc".to_string();

    let err = fixture
        .app(&registry)
        .run(
            &options,
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap_err();

    assert!(matches!(err, RunError::ConfigMissing(_)));
    assert_eq!(sink_log.borrow().creates, 0);
}

#[test]
fn test_unknown_profile_is_fatal_before_input_check() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    let opener = MockOpener::new(events(3));
    let builder = MockBuilder::always();
    let sinks = MockSinkFactory::default();

    let mut options = fixture.options(None);
    options.profile_key = "wavedream".to_string();
    // Even a missing input must not mask the unknown profile
    options.input = fixture.dir.path().join("missing.mid");

    let err = fixture
        .app(&registry)
        .run(
            &options,
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap_err();

    assert!(matches!(err, RunError::Registry(_)));
    assert!(err.to_string().contains("wavedream"));
}

#[test]
fn test_events_without_required_product_are_skipped() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    let opener = MockOpener::new(events(10));
    let builder = MockBuilder {
        produce_if: |serial| serial % 2 == 0,
    };
    let sinks = MockSinkFactory::default();
    let sink_log = sinks.log();

    let summary = fixture
        .app(&registry)
        .run(
            &fixture.options(None),
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap();

    // Skips are silent: all ten events count as processed
    assert_eq!(summary.events_processed, 10);
    assert_eq!(summary.rows_written, 5);
    assert_eq!(sink_log.borrow().rows.len(), 5);
    assert!(sink_log.borrow().finalized);
}

#[test]
fn test_early_end_of_stream_finishes_cleanly() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    // Counting pass sees 10 events, processing pass only 6
    let opener = MockOpener::new(events(10)).with_pass_limits(&[10, 6]);
    let builder = MockBuilder::always();
    let sinks = MockSinkFactory::default();
    let sink_log = sinks.log();

    let summary = fixture
        .app(&registry)
        .run(
            &fixture.options(None),
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap();

    assert_eq!(summary.events_in_file, 10);
    assert_eq!(summary.events_target, 10);
    assert_eq!(summary.events_processed, 6);
    assert_eq!(summary.rows_written, 6);
    assert!(sink_log.borrow().finalized);
}

#[test]
fn test_committed_rows_carry_event_numbers() {
    let fixture = Fixture::new();
    let registry = ProfileRegistry::new();
    let opener = MockOpener::new(events(3));
    let builder = MockBuilder::always();
    let sinks = MockSinkFactory::default();
    let sink_log = sinks.log();

    fixture
        .app(&registry)
        .run(
            &fixture.options(None),
            &RunEnv {
                sources: &opener,
                pipelines: &builder,
                sinks: &sinks,
            },
        )
        .unwrap();

    let log = sink_log.borrow();
    let numbers: Vec<u64> = log
        .rows
        .iter()
        .map(|row| row[0]["event_number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![0, 1, 2]);
}
