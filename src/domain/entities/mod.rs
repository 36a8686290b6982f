//! Domain entities

mod change_event;
mod rebuild_outcome;

pub use change_event::ChangeEvent;
pub use rebuild_outcome::RebuildOutcome;
