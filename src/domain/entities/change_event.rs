//! Change event entity
//!
//! One OS-level notification, already translated out of the watcher backend's
//! vocabulary. Events are transient: the lifecycle loop logs them and hands
//! them to the coordinator, nothing stores them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::domain::value_objects::ChangeKind;

/// A single reported filesystem change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// What happened
    pub kind: ChangeKind,
    /// Affected path (the new path for renames)
    pub path: PathBuf,
    /// Path before a rename, when the backend reports both sides
    pub previous: Option<PathBuf>,
    /// When the monitor observed the change
    pub timestamp: DateTime<Local>,
}

impl ChangeEvent {
    /// Create an event stamped with the current local time
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            previous: None,
            timestamp: Local::now(),
        }
    }

    /// Create a rename event carrying both sides of the move
    pub fn renamed(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            previous: Some(from.into()),
            ..Self::new(ChangeKind::Renamed, to)
        }
    }

    /// Override the timestamp (used by tests and replay)
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn previous(&self) -> Option<&Path> {
        self.previous.as_deref()
    }
}
