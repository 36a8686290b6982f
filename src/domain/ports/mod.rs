//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod delivery_gate;
pub mod generation_pipeline;
pub mod watch_events;

pub use delivery_gate::{DeliveryGate, WatchError};
pub use generation_pipeline::{
    GenerationPipeline, PipelineError, PipelineOptions, PipelineRequest,
};
pub use watch_events::{NoopEventSink, RebuildTrigger, WatchEvent, WatchEventSink};
