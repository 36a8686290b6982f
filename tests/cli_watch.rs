//! E2E tests for `regen watch`
//!
//! These spawn the binary in JSON mode and follow its NDJSON event stream.
#![cfg(unix)]

mod common;

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use common::{TestEnv, WRITE_INDEX};

const WAIT: Duration = Duration::from_secs(10);

/// Running `regen watch --json` with its stdout parsed line by line
struct WatchProcess {
    child: Child,
    events: Receiver<serde_json::Value>,
    seen: Vec<serde_json::Value>,
}

impl WatchProcess {
    fn spawn(env: &TestEnv, args: &[&str]) -> Self {
        let mut child = env
            .command()
            .arg("watch")
            .arg("--json")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start regen watch");

        let stdout = child.stdout.take().unwrap();
        let (tx, events) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if let Ok(value) = serde_json::from_str(&line) {
                    if tx.send(value).is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            child,
            events,
            seen: Vec::new(),
        }
    }

    /// Wait for the next event named `name`, collecting everything before it
    fn expect_event(&mut self, name: &str) -> serde_json::Value {
        let deadline = Instant::now() + WAIT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(value) => {
                    self.seen.push(value.clone());
                    if value["event"] == name {
                        return value;
                    }
                }
                Err(_) => panic!("timed out waiting for '{name}'; saw: {:?}", self.seen),
            }
        }
    }

    /// Everything emitted within `window`
    fn drain_for(&mut self, window: Duration) -> Vec<serde_json::Value> {
        let deadline = Instant::now() + window;
        let mut drained = Vec::new();
        while let Ok(value) = self
            .events
            .recv_timeout(deadline.saturating_duration_since(Instant::now()))
        {
            self.seen.push(value.clone());
            drained.push(value);
        }
        drained
    }

    fn interrupt(&self) {
        let status = Command::new("kill")
            .arg("-INT")
            .arg(self.child.id().to_string())
            .status()
            .unwrap();
        assert!(status.success());
    }

    fn wait_exit(mut self) -> (i32, Vec<serde_json::Value>) {
        let deadline = Instant::now() + WAIT;
        loop {
            if let Some(status) = self.child.try_wait().unwrap() {
                self.drain_for(Duration::from_millis(200));
                return (status.code().unwrap_or(-1), std::mem::take(&mut self.seen));
            }
            if Instant::now() > deadline {
                let _ = self.child.kill();
                panic!("regen watch did not exit; saw: {:?}", self.seen);
            }
            thread::sleep(Duration::from_millis(20));
        }
    }
}

impl Drop for WatchProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn count(events: &[serde_json::Value], name: &str) -> usize {
    events.iter().filter(|e| e["event"] == name).count()
}

#[test]
fn watch_builds_once_then_waits() {
    let env = TestEnv::new();
    let mut watch = WatchProcess::spawn(&env, &["-i", "site", "-o", "dist", "--", "sh", "-c", WRITE_INDEX]);

    let started = watch.expect_event("watch_started");
    assert_eq!(started["command"], "watch");
    assert_eq!(
        started["root"],
        env.path("site").display().to_string().as_str()
    );

    let rebuild = watch.expect_event("rebuild_started");
    assert_eq!(rebuild["trigger"], "initial");
    let complete = watch.expect_event("rebuild_complete");
    assert_eq!(complete["success"], true);
    watch.expect_event("watching");

    assert!(env.path("dist/index.html").is_file());
}

#[test]
fn watch_rebuilds_after_a_change() {
    let env = TestEnv::new();
    let mut watch = WatchProcess::spawn(&env, &["-i", "site", "-o", "dist", "--", "sh", "-c", WRITE_INDEX]);
    watch.expect_event("watching");

    env.write("site/page.md", "# Hello");

    let changed = watch.expect_event("file_changed");
    assert!(changed["path"].as_str().unwrap().ends_with("page.md"));
    let rebuild = watch.expect_event("rebuild_started");
    assert_eq!(rebuild["trigger"], "change");
    let complete = watch.expect_event("rebuild_complete");
    assert_eq!(complete["success"], true);
    watch.expect_event("watching");
}

#[test]
fn watch_ignores_its_own_output_inside_the_input_dir() {
    let env = TestEnv::new();
    let mut watch = WatchProcess::spawn(
        &env,
        &["-i", "site", "-o", "site/dist", "--", "sh", "-c", WRITE_INDEX],
    );
    watch.expect_event("watching");

    let later = watch.drain_for(Duration::from_millis(800));
    assert_eq!(
        count(&later, "rebuild_started"),
        0,
        "build output re-triggered a rebuild: {later:?}"
    );
    assert!(env.path("site/dist/index.html").is_file());
}

#[test]
fn watch_exits_when_the_initial_build_fails() {
    let env = TestEnv::new();
    let watch = WatchProcess::spawn(&env, &["-i", "site", "--", "sh", "-c", "exit 3"]);

    let (code, events) = watch.wait_exit();

    assert_eq!(code, 1);
    assert_eq!(count(&events, "rebuild_complete"), 1);
    let complete = events
        .iter()
        .find(|e| e["event"] == "rebuild_complete")
        .unwrap();
    assert_eq!(complete["success"], false);
    assert!(complete["error"].as_str().unwrap().contains("exit code 3"));
}

#[test]
fn watch_keeps_running_after_a_failed_change_rebuild() {
    let env = TestEnv::new();
    // Fails whenever a file named broken.md exists
    let script = r#"mkdir -p "$REGEN_OUTPUT_DIR" && test ! -e "$REGEN_INPUT_DIR/broken.md""#;
    let mut watch = WatchProcess::spawn(&env, &["-i", "site", "-o", "dist", "--", "sh", "-c", script]);
    watch.expect_event("watching");

    let broken = env.write("site/broken.md", "oops");
    let complete = watch.expect_event("rebuild_complete");
    assert_eq!(complete["success"], false);
    watch.expect_event("watching");

    std::fs::remove_file(broken).unwrap();
    loop {
        let complete = watch.expect_event("rebuild_complete");
        if complete["success"] == true {
            break;
        }
    }
}

#[test]
fn watch_shuts_down_cleanly_on_interrupt() {
    let env = TestEnv::new();
    let mut watch = WatchProcess::spawn(&env, &["-i", "site", "-o", "dist", "--", "true"]);
    watch.expect_event("watching");

    watch.interrupt();
    let (code, events) = watch.wait_exit();

    assert_eq!(code, 0);
    assert_eq!(count(&events, "shutdown"), 1);
}

#[test]
fn watch_missing_input_dir_fails() {
    let env = TestEnv::new();

    let result = env.run(&["watch", "-i", "nope", "--", "true"]);

    assert_eq!(result.exit_code, 1);
    assert!(
        result.stderr.contains("directory not found"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn watch_console_output_is_human_readable() {
    let env = TestEnv::new();
    let mut child = env
        .command()
        .args(["watch", "-i", "site", "-o", "dist", "--", "true"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();
    let first = lines.next().unwrap().unwrap();

    let _ = child.kill();
    let _ = child.wait();

    assert_eq!(first, "Watching...");
}
