//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `GenerateUseCase` - One-shot full regeneration
//! - `WatchUseCase` - Watch the input tree and rebuild on every change

pub mod generate;
pub mod watch;

pub use generate::{GenerateOptions, GenerateUseCase};
pub use watch::{
    RebuildCoordinator, RebuildGuard, Trigger, WatchOptions, WatchSummary, WatchUseCase,
    DEBOUNCE_MS,
};
