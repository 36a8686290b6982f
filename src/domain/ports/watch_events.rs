//! Watch Event Port
//!
//! Provides an observable interface for watch sessions.
//! Enables terminal logging, NDJSON event streams, and test recording.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::entities::{ChangeEvent, RebuildOutcome};
use crate::domain::value_objects::ChangeKind;

/// Why a rebuild was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildTrigger {
    /// Unconditional rebuild at startup
    Initial,
    /// One or more change events
    Change,
}

/// Event emitted during a watch session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Monitor created for the root directory
    WatchStarted { root: String },
    /// A change was detected
    FileChanged {
        timestamp: DateTime<Local>,
        kind: ChangeKind,
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<String>,
    },
    /// A pipeline invocation is about to start
    RebuildStarted {
        trigger: RebuildTrigger,
        /// Change events covered by this rebuild
        changes: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        latest: Option<String>,
    },
    /// A pipeline invocation returned
    RebuildComplete {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        duration_ms: u64,
    },
    /// Monitor re-armed, waiting for changes
    Watching,
    /// Non-fatal error (watcher backend, re-arm failure)
    Error { message: String },
    /// Session stopped
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<&ChangeEvent> for WatchEvent {
    fn from(event: &ChangeEvent) -> Self {
        WatchEvent::FileChanged {
            timestamp: event.timestamp,
            kind: event.kind,
            path: event.path.display().to_string(),
            previous: event.previous.as_ref().map(|p| p.display().to_string()),
        }
    }
}

impl From<&RebuildOutcome> for WatchEvent {
    fn from(outcome: &RebuildOutcome) -> Self {
        WatchEvent::RebuildComplete {
            success: outcome.success,
            error: outcome.error.clone(),
            duration_ms: outcome.duration_ms(),
        }
    }
}

/// Trait for receiving watch events
///
/// Implementations can be:
/// - ConsoleEventSink: Human-readable log lines
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait WatchEventSink: Send + Sync {
    /// Handle a watch event
    fn on_event(&self, event: WatchEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl WatchEventSink for NoopEventSink {
    fn on_event(&self, _event: WatchEvent) {}
}
