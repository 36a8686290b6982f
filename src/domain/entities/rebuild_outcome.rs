//! Rebuild outcome entity

use std::time::Duration;

/// Result of one pipeline invocation, kept only long enough to be logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub duration: Duration,
}

impl RebuildOutcome {
    pub fn succeeded(duration: Duration) -> Self {
        Self {
            success: true,
            error: None,
            duration,
        }
    }

    pub fn failed(error: impl Into<String>, duration: Duration) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            duration,
        }
    }

    /// Duration in whole milliseconds, saturating
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}
