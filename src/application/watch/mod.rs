//! Watch Use Case
//!
//! Continuous watching with full rebuilds. It orchestrates:
//! - File system monitoring (via `FileSystemMonitor`)
//! - Suspending delivery while a rebuild runs (`RebuildGuard`)
//! - Serializing and coalescing rebuilds (`RebuildCoordinator`)
//! - The session lifecycle and shutdown (`WatchUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! let options = WatchOptions::new("content", "dist");
//! let use_case = WatchUseCase::new(options, Arc::new(CommandPipeline::new()));
//! use_case.start(shutdown_rx, sink)?;
//! ```

mod coordinator;
mod guard;
mod options;
mod use_case;


pub use coordinator::{RebuildCoordinator, Trigger};
pub use guard::{Exclusive, RebuildGuard};
pub use options::{WatchOptions, DEBOUNCE_MS};
pub use use_case::{WatchSummary, WatchUseCase};
