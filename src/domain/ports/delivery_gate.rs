//! Delivery Gate Port
//!
//! Something that can stop and restart the flow of change events. The
//! filesystem monitor implements it; the rebuild guard drives it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the watcher backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WatchError {
    #[error("failed to watch {path}: {message}")]
    Subscribe { path: PathBuf, message: String },

    #[error("watcher backend error: {0}")]
    Backend(String),
}

/// Suspends and resumes event delivery
///
/// A suspended gate keeps observing: changes it would have delivered are
/// counted instead, and `resume` hands the count back so the caller can
/// schedule work for them.
pub trait DeliveryGate: Send + Sync {
    /// Stop delivering events. Once this returns no further event is delivered
    /// until `resume` is called.
    fn suspend(&self);

    /// Re-enable delivery, returning how many changes were held back while
    /// suspended. A no-op returning 0 after the gate has been stopped for good.
    fn resume(&self) -> Result<usize, WatchError>;

    /// Whether events are currently being delivered
    fn is_delivering(&self) -> bool;

    /// Stop for good: no event is delivered after this returns and later
    /// `resume` calls do nothing. Idempotent.
    fn stop(&self);
}
