//! Change kind value object - what happened to a watched path

use serde::{Deserialize, Serialize};

/// Kind of filesystem change reported by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// A file or directory appeared
    Created,
    /// Contents or metadata changed
    Modified,
    /// A file or directory was removed
    Deleted,
    /// A file or directory was moved or renamed
    Renamed,
}

impl ChangeKind {
    /// Label used in human-readable log lines
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Created => "Created",
            ChangeKind::Modified => "Modified",
            ChangeKind::Deleted => "Deleted",
            ChangeKind::Renamed => "Renamed",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
