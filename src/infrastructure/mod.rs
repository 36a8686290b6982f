//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `watcher/` - `FileSystemMonitor` on top of `notify`
//! - `pipeline/` - `CommandPipeline`, the external build command
//! - `events/` - Event sinks (NDJSON)

pub mod events;
pub mod pipeline;
pub mod watcher;

pub use events::JsonEventSink;
pub use pipeline::CommandPipeline;
pub use watcher::{FileSystemMonitor, MonitorItem};
