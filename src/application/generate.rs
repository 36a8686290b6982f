//! Generate Use Case
//!
//! One-shot full regeneration: resolve the directories, run the pipeline once.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::entities::RebuildOutcome;
use crate::domain::ports::{GenerationPipeline, PipelineOptions, PipelineRequest};
use crate::error::RegenResult;
use crate::fs::{absolutize, resolve_input_root};

/// Options shared by `generate` and `watch`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pipeline: PipelineOptions,
}

impl GenerateOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            pipeline: PipelineOptions::default(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: PipelineOptions) -> Self {
        self.pipeline = pipeline;
        self
    }
}

pub struct GenerateUseCase {
    options: GenerateOptions,
    pipeline: Arc<dyn GenerationPipeline>,
}

impl GenerateUseCase {
    pub fn new(options: GenerateOptions, pipeline: Arc<dyn GenerationPipeline>) -> Self {
        Self { options, pipeline }
    }

    /// Absolute directories the pipeline will be invoked with
    pub fn request(&self) -> RegenResult<PipelineRequest> {
        let input = resolve_input_root(&self.options.input_dir)?;
        let output = absolutize(&self.options.output_dir)?;
        Ok(PipelineRequest::new(input, output).with_options(self.options.pipeline.clone()))
    }

    /// Run the pipeline once. Pipeline failures are errors here; only the
    /// watch session recovers from them.
    pub fn execute(&self) -> RegenResult<RebuildOutcome> {
        let request = self.request()?;
        let started = Instant::now();
        self.pipeline.run(&request)?;
        Ok(RebuildOutcome::succeeded(started.elapsed()))
    }
}
