//! Filesystem watcher infrastructure
//!
//! - `FileSystemMonitor` - recursive `notify` watch implementing `DeliveryGate`
//! - `EventTranslator` - backend events to `ChangeEvent`s

mod monitor;
mod translate;

pub use monitor::{FileSystemMonitor, MonitorItem};
