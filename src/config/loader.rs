//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RegenError, RegenResult};

use super::types::{ColorMode, Config};

/// Project config file looked up in the current directory
pub const PROJECT_CONFIG_FILE: &str = "regen.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Configuration plus where it came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from; `None` for built-in defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> RegenResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| RegenError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Pick the config file: `explicit` (must exist), then `regen.toml` in
/// `cwd`, then the user config, then defaults. Env overrides apply last.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> RegenResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => [Some(cwd.join(PROJECT_CONFIG_FILE)), user_config_path()]
            .into_iter()
            .flatten()
            .find(|path| path.is_file()),
    };

    let mut loaded = LoadedConfig::default();
    if let Some(path) = candidate {
        let (config, warnings) = load_with_warnings(&path)?;
        loaded = LoadedConfig {
            config,
            source: Some(path),
            warnings,
        };
    }
    loaded.config = with_env_overrides(loaded.config, |key| std::env::var(key).ok());
    Ok(loaded)
}

/// Apply environment variable overrides (REGEN_* prefix)
pub fn with_env_overrides(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> Config {
    // REGEN_INPUT
    if let Some(input) = get_env("REGEN_INPUT").filter(|v| !v.is_empty()) {
        config.paths.input = PathBuf::from(input);
    }

    // REGEN_OUTPUT
    if let Some(output) = get_env("REGEN_OUTPUT").filter(|v| !v.is_empty()) {
        config.paths.output = PathBuf::from(output);
    }

    // REGEN_DEBOUNCE_MS (ignored unless a valid number)
    if let Some(ms) = get_env("REGEN_DEBOUNCE_MS").and_then(|v| v.trim().parse().ok()) {
        config.watch.debounce_ms = ms;
    }

    // REGEN_COLOR
    if let Some(color) = get_env("REGEN_COLOR").and_then(|v| ColorMode::parse(&v)) {
        config.output.color = color;
    }

    config
}

/// `$XDG_CONFIG_HOME/regen/config.toml`, falling back to `~/.config`
fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|dir| dir.join("regen").join("config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "pipeline",
        "command",
        "quiet",
        "env",
        "paths",
        "input",
        "output",
        "watch",
        "debounce_ms",
        "color",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
