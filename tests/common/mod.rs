//! Test environment for running the `regen` binary in isolation.
//!
//! Every `TestEnv` gets its own project directory and config home so the
//! developer's own `regen.toml` or `REGEN_*` variables never leak in.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Build script that writes `index.html` into the output directory
pub const WRITE_INDEX: &str = r#"mkdir -p "$REGEN_OUTPUT_DIR" && date +%s%N > "$REGEN_OUTPUT_DIR/index.html""#;

/// Result of running a regen CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for TestResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

pub struct TestEnv {
    _project: TempDir,
    _home: TempDir,
    pub project_root: PathBuf,
    pub config_home: PathBuf,
}

impl TestEnv {
    /// Project with an empty `site/` input directory
    pub fn new() -> Self {
        let project = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let project_root = project.path().canonicalize().unwrap();
        fs::create_dir_all(project_root.join("site")).unwrap();

        Self {
            project_root,
            config_home: home.path().to_path_buf(),
            _project: project,
            _home: home,
        }
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.project_root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.project_root.join(rel)
    }

    /// `regen` command rooted at the project, with a scrubbed environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_regen"));
        cmd.current_dir(&self.project_root)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("HOME", &self.config_home)
            .env("NO_COLOR", "1")
            .env_remove("REGEN_INPUT")
            .env_remove("REGEN_OUTPUT")
            .env_remove("REGEN_DEBOUNCE_MS")
            .env_remove("REGEN_COLOR");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.command().args(args).output().unwrap().into()
    }
}

pub fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
