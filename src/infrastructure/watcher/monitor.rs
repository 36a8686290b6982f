//! Filesystem monitor
//!
//! Recursive watch over a root directory built on `notify`. The OS watch is
//! created on the first `resume` and lives until `stop`. Delivery is gated:
//! the notify callback forwards only while holding the gate lock with the
//! gate armed. While suspended, changes are counted rather than forwarded,
//! and `resume` hands the count back. Paths under an ignored directory (the
//! build output) are never delivered or counted.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::entities::ChangeEvent;
use crate::domain::ports::{DeliveryGate, WatchError};
use crate::error::RegenResult;
use crate::fs::{canonicalize_lenient, resolve_input_root};

use super::translate::{EventTranslator, RENAME_PAIR_WINDOW};

/// Item delivered on the monitor's channel
pub type MonitorItem = Result<ChangeEvent, WatchError>;

#[derive(Debug)]
struct Gate {
    armed: bool,
    stopped: bool,
    /// Changes seen while suspended
    missed: usize,
    ignored: Vec<PathBuf>,
    sender: Option<Sender<MonitorItem>>,
    translator: EventTranslator,
}

impl Gate {
    fn dispatch(&mut self, items: Vec<MonitorItem>) {
        for item in items {
            match item {
                Ok(change) if self.is_ignored(&change) => {}
                Ok(_) if !self.armed => self.missed += 1,
                Err(_) if !self.armed => {}
                item => {
                    if let Some(sender) = &self.sender {
                        let _ = sender.send(item);
                    }
                }
            }
        }
    }

    fn is_ignored(&self, change: &ChangeEvent) -> bool {
        let under = |path: &Path| self.ignored.iter().any(|dir| path.starts_with(dir));
        under(&change.path) && change.previous.as_deref().map_or(true, under)
    }
}

/// Recursive, gated filesystem monitor
pub struct FileSystemMonitor {
    root: PathBuf,
    gate: Arc<Mutex<Gate>>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl FileSystemMonitor {
    /// Create a disarmed monitor for `root`.
    ///
    /// Fails when `root` does not exist or is not a directory. No events are
    /// delivered until the first `resume`.
    pub fn new(root: &Path) -> RegenResult<(Self, Receiver<MonitorItem>)> {
        let root = resolve_input_root(root)?;
        let (tx, rx) = unbounded();
        let gate = Arc::new(Mutex::new(Gate {
            armed: false,
            stopped: false,
            missed: 0,
            ignored: Vec::new(),
            sender: Some(tx),
            translator: EventTranslator::default(),
        }));
        spawn_rename_expiry(Arc::downgrade(&gate))?;

        let monitor = Self {
            root,
            gate,
            watcher: Mutex::new(None),
        };
        Ok((monitor, rx))
    }

    /// Create a monitor and arm it immediately
    pub fn start(root: &Path) -> RegenResult<(Self, Receiver<MonitorItem>)> {
        let (monitor, rx) = Self::new(root)?;
        monitor.resume()?;
        Ok((monitor, rx))
    }

    /// Absolute, canonical root being watched
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Never report changes under `dir` (it need not exist yet)
    pub fn ignore_dir(&self, dir: &Path) {
        let dir = canonicalize_lenient(dir).unwrap_or_else(|_| dir.to_path_buf());
        lock(&self.gate).ignored.push(dir);
    }

    fn take_watcher(&self) -> Option<RecommendedWatcher> {
        self.watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn subscribe(&self) -> Result<RecommendedWatcher, WatchError> {
        let gate = Arc::clone(&self.gate);
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| forward(&gate, res),
            Config::default(),
        )
        .map_err(|e| WatchError::Subscribe {
            path: self.root.clone(),
            message: e.to_string(),
        })?;

        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Subscribe {
                path: self.root.clone(),
                message: e.to_string(),
            })?;

        Ok(watcher)
    }

    #[cfg(test)]
    fn missed(&self) -> usize {
        lock(&self.gate).missed
    }
}

impl DeliveryGate for FileSystemMonitor {
    fn suspend(&self) {
        lock(&self.gate).armed = false;
    }

    fn resume(&self) -> Result<usize, WatchError> {
        let mut slot = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        {
            let mut gate = lock(&self.gate);
            if gate.stopped {
                return Ok(0);
            }
            if slot.is_some() {
                gate.armed = true;
                return Ok(std::mem::take(&mut gate.missed));
            }
        }

        // First arm. Subscribing talks to the backend thread, which may be
        // blocked on the gate inside a callback: never hold the gate lock here.
        let watcher = self.subscribe()?;

        let mut gate = lock(&self.gate);
        if gate.stopped {
            drop(gate);
            drop(watcher);
            return Ok(0);
        }
        gate.armed = true;
        gate.missed = 0;
        *slot = Some(watcher);
        Ok(0)
    }

    fn is_delivering(&self) -> bool {
        lock(&self.gate).armed
    }

    /// Release the watch handle for good.
    ///
    /// The channel disconnects once the receiver has drained it.
    fn stop(&self) {
        {
            let mut gate = lock(&self.gate);
            gate.stopped = true;
            gate.armed = false;
            gate.sender = None;
        }
        drop(self.take_watcher());
    }
}

impl Drop for FileSystemMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(gate: &Mutex<Gate>) -> MutexGuard<'_, Gate> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

/// notify callback: translate, then deliver or count
fn forward(gate: &Mutex<Gate>, res: Result<Event, notify::Error>) {
    let mut gate = lock(gate);
    if gate.stopped {
        return;
    }

    let items: Vec<MonitorItem> = match res {
        Ok(event) => gate.translator.translate(event).into_iter().map(Ok).collect(),
        Err(e) => vec![Err(WatchError::Backend(e.to_string()))],
    };
    gate.dispatch(items);
}

/// Turns rename halves nobody completed (moves out of the tree) into
/// `Deleted` events. Exits once the monitor is stopped or dropped.
fn spawn_rename_expiry(gate: Weak<Mutex<Gate>>) -> io::Result<()> {
    thread::Builder::new()
        .name("regen-rename-expiry".to_string())
        .spawn(move || loop {
            thread::sleep(RENAME_PAIR_WINDOW / 2);
            let Some(shared) = gate.upgrade() else {
                return;
            };
            let mut state = lock(&shared);
            if state.stopped {
                return;
            }
            if let Some(change) = state.translator.expire(RENAME_PAIR_WINDOW) {
                state.dispatch(vec![Ok(change)]);
            }
        })?;
    Ok(())
}
