//! Event Sink Implementations
//!
//! Provides concrete implementations of WatchEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//!
//! Human-readable output is rendered by the CLI (`ui::views::watch`).

mod json;

pub use json::JsonEventSink;
