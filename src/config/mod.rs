//! Configuration module for Regen
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (REGEN_*)
//! 3. Project config (`regen.toml`, or the file passed with `--config`)
//! 4. User config (~/.config/regen/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{ConfigWarning, LoadedConfig, PROJECT_CONFIG_FILE};
pub use types::{ColorMode, Config, OutputConfig, PathsConfig, PipelineConfig, WatchConfig};
