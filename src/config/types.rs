//! Configuration types

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::watch::DEBOUNCE_MS;
use crate::domain::ports::PipelineOptions;
use crate::error::RegenResult;

use super::loader::{self, ConfigWarning, LoadedConfig};

/// Build command configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// argv of the build command; `{input}` and `{output}` are substituted
    #[serde(default)]
    pub command: Vec<String>,

    /// Capture build output instead of inheriting the terminal
    #[serde(default)]
    pub quiet: bool,

    /// Extra environment for the build command
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Input and output directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

/// Watch session tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Settle delay before a change rebuild; 0 disables it
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEBOUNCE_MS
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> RegenResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> RegenResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve the config file to use and apply `REGEN_*` overrides
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> RegenResult<LoadedConfig> {
        loader::discover(explicit, cwd)
    }

    /// Apply environment variable overrides (REGEN_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Options forwarded to every pipeline run
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            command: self.pipeline.command.clone(),
            env: self.pipeline.env.clone(),
            quiet: self.pipeline.quiet,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.watch.debounce_ms)
    }
}
