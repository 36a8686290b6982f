//! Watch options

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::generate::GenerateOptions;
use crate::domain::ports::{PipelineOptions, PipelineRequest};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
///
/// The same input/output/pipeline settings the one-shot `generate` command
/// takes; watching adds nothing but the settle delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Directory to watch and build from
    pub input_dir: PathBuf,
    /// Directory the pipeline writes into
    pub output_dir: PathBuf,
    /// Forwarded to every pipeline run
    pub pipeline: PipelineOptions,
    /// Quiet period before a change rebuild starts
    pub debounce: Duration,
}

impl WatchOptions {
    /// Create new watch options with minimal required fields
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            pipeline: PipelineOptions::default(),
            debounce: Duration::from_millis(DEBOUNCE_MS),
        }
    }

    /// Set pipeline options
    pub fn with_pipeline(mut self, pipeline: PipelineOptions) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Set the settle delay (zero disables it)
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Pipeline request for a session rooted at `root`
    pub(crate) fn request(&self, root: &Path, output_dir: &Path) -> PipelineRequest {
        PipelineRequest::new(root, output_dir).with_options(self.pipeline.clone())
    }
}

impl From<GenerateOptions> for WatchOptions {
    fn from(options: GenerateOptions) -> Self {
        Self::new(options.input_dir, options.output_dir).with_pipeline(options.pipeline)
    }
}
