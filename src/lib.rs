//! Regen - watch-triggered rebuild orchestrator
//!
//! Regen runs an external build command over an input directory, then keeps
//! watching that directory and runs a full rebuild after every change. The
//! build's own writes never re-trigger it and rebuilds never overlap.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    GenerateOptions, GenerateUseCase, RebuildCoordinator, RebuildGuard, Trigger, WatchOptions,
    WatchSummary, WatchUseCase,
};
pub use config::{ColorMode, Config};
pub use domain::entities::{ChangeEvent, RebuildOutcome};
pub use domain::ports::{
    DeliveryGate, GenerationPipeline, NoopEventSink, PipelineError, PipelineOptions,
    PipelineRequest, RebuildTrigger, WatchError, WatchEvent, WatchEventSink,
};
pub use domain::value_objects::{ChangeKind, SessionState};
pub use error::{RegenError, RegenResult};
pub use infrastructure::{CommandPipeline, FileSystemMonitor, JsonEventSink};
