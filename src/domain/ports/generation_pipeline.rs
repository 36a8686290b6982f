//! Generation Pipeline Port
//!
//! The full-regeneration routine is a black box: it gets the input directory,
//! the output directory and the options the orchestrator was started with, and
//! either succeeds or reports why it did not.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

/// Options forwarded verbatim to the pipeline on every run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Build command argv; `{input}` and `{output}` are substituted
    pub command: Vec<String>,
    /// Extra environment for the build
    pub env: BTreeMap<String, String>,
    /// Capture build output instead of inheriting the terminal
    pub quiet: bool,
}

/// A single pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub options: PipelineOptions,
}

impl PipelineRequest {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }
}

/// Why a pipeline run did not succeed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("no build command configured (set [pipeline] command or pass one after `--`)")]
    NotConfigured,

    #[error("failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("build command exited with {}{}", describe_code(.code), describe_stderr(.stderr))]
    Failed { code: Option<i32>, stderr: String },

    #[error("pipeline panicked: {0}")]
    Panicked(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// The external full-regeneration routine
pub trait GenerationPipeline: Send + Sync {
    /// Run a full regeneration from `request.input_dir` into `request.output_dir`
    fn run(&self, request: &PipelineRequest) -> Result<(), PipelineError>;
}
