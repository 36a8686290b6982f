//! Session state value object - lifecycle of a watch session
//!
//! ```text
//! Idle --(change)--> Building --(pipeline returns)--> Idle
//!   \                   \
//!    +----(shutdown)-----+--> ShuttingDown (terminal)
//! ```

use serde::Serialize;

/// Lifecycle state of a watch session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for the next change
    #[default]
    Idle,
    /// A rebuild is executing
    Building,
    /// Shutdown requested; no new rebuilds are accepted
    ShuttingDown,
}

impl SessionState {
    /// Returns true once shutdown has been entered
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::ShuttingDown)
    }

    /// Returns true while a rebuild is executing
    pub fn is_building(&self) -> bool {
        matches!(self, SessionState::Building)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Building => write!(f, "building"),
            SessionState::ShuttingDown => write!(f, "shutting down"),
        }
    }
}
