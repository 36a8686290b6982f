//! Domain Layer
//!
//! Pure types describing a watch session and the ports the application layer
//! talks through:
//!
//! - `entities` - `ChangeEvent`, `RebuildOutcome`
//! - `value_objects` - `ChangeKind`, `SessionState`
//! - `ports` - `GenerationPipeline`, `DeliveryGate`, `WatchEventSink`
//!
//! Nothing in here touches the filesystem or spawns processes.

pub mod entities;
pub mod ports;
pub mod value_objects;
