//! The pipeline engine: one execution cycle per event
//!
//! A pipeline is built once from a config, then driven synchronously:
//! `set_input` hands it the next raw event, `execute` runs every stage
//! against that event, and `products` exposes the store the stages filled.
//! Callers clear the store before the next cycle.

use std::path::Path;

use tracing::{debug, info};

use crate::config::PipelineSpec;
use crate::error::PipelineError;
use crate::event::RawEvent;
use crate::stage::{build_stage, UnpackStage};
use crate::store::ProductStore;

pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn UnpackStage>>,
    input: Option<RawEvent>,
    products: ProductStore,
}

impl Pipeline {
    /// Build a pipeline from a JSON config file
    pub fn from_config(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let spec = PipelineSpec::from_file(path)?;
        Self::from_spec(spec)
    }

    /// Build a pipeline from an already-validated spec
    pub fn from_spec(spec: PipelineSpec) -> Result<Self, PipelineError> {
        spec.validate()?;

        let mut stages = Vec::with_capacity(spec.stages.len());
        for name in &spec.stages {
            let stage =
                build_stage(name).ok_or_else(|| PipelineError::UnknownStage(name.clone()))?;
            stages.push(stage);
        }

        info!(
            "Built pipeline '{}' with {} stage(s)",
            spec.name,
            stages.len()
        );

        Ok(Self {
            name: spec.name,
            stages,
            input: None,
            products: ProductStore::new(),
        })
    }

    /// Pipeline name from the config
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage the next raw event for execution
    pub fn set_input(&mut self, event: RawEvent) {
        self.input = Some(event);
    }

    /// Run every stage against the staged event.
    ///
    /// The product store is fully populated when this returns. Fails if no
    /// input was staged since the last execution.
    pub fn execute(&mut self) -> Result<(), PipelineError> {
        let event = self.input.take().ok_or(PipelineError::NoInput)?;
        debug!("Executing pipeline '{}' on event {}", self.name, event.serial);

        for stage in &self.stages {
            stage.process(&event, &mut self.products)?;
        }

        Ok(())
    }

    /// The product store for the event just executed
    pub fn products(&mut self) -> &mut ProductStore {
        &mut self.products
    }
}
