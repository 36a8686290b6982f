//! Error types for Regen
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{PipelineError, WatchError};

/// Result type alias for Regen operations
pub type RegenResult<T> = Result<T, RegenError>;

/// Main error type for Regen operations
#[derive(Error, Debug)]
pub enum RegenError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Path exists but is not a directory
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Filesystem monitor could not be set up
    #[error("watch error: {0}")]
    Watch(#[from] WatchError),

    /// One-shot pipeline run failed
    #[error("generation failed: {0}")]
    Pipeline(#[from] PipelineError),

    /// The rebuild performed before watching started failed
    #[error("initial rebuild failed: {message}")]
    InitialRebuildFailed { message: String },

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Shutdown signal handler could not be installed
    #[error("failed to install shutdown handler: {0}")]
    Signal(String),
}
