//! Rebuild coordinator
//!
//! Serializes pipeline invocations and coalesces bursts of change events.
//!
//! All session state lives behind one mutex; the Idle -> Building transition
//! is a check-and-set under that lock, so two events delivered at the same
//! instant from different threads can never both start a rebuild. Change
//! rebuilds run on a dedicated worker thread, leaving the caller of
//! `on_change` free to keep consuming events (and to observe shutdown).

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::domain::entities::{ChangeEvent, RebuildOutcome};
use crate::domain::ports::{
    GenerationPipeline, PipelineError, PipelineRequest, RebuildTrigger, WatchEvent,
    WatchEventSink,
};
use crate::domain::value_objects::SessionState;

use super::guard::RebuildGuard;

/// What `on_change` did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Session was idle; a rebuild has been scheduled
    Scheduled,
    /// A rebuild is already pending or running; a single follow-up will cover this event
    Coalesced,
    /// Session is shutting down; no rebuild will run
    Refused,
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    /// Worker has a rebuild to start
    scheduled: bool,
    /// Events arrived after the current rebuild started
    follow_up: bool,
    shutdown_requested: bool,
    pending_changes: usize,
    latest_path: Option<PathBuf>,
    last_change: Option<Instant>,
}

struct Shared {
    pipeline: Arc<dyn GenerationPipeline>,
    request: PipelineRequest,
    guard: RebuildGuard,
    sink: Arc<dyn WatchEventSink>,
    debounce: Duration,
    inner: Mutex<Inner>,
    changed: Condvar,
    rebuilds: AtomicUsize,
}

/// Serializes and coalesces rebuild triggers
pub struct RebuildCoordinator {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RebuildCoordinator {
    pub fn new(
        pipeline: Arc<dyn GenerationPipeline>,
        request: PipelineRequest,
        guard: RebuildGuard,
        sink: Arc<dyn WatchEventSink>,
    ) -> Self {
        Self::with_debounce(pipeline, request, guard, sink, Duration::ZERO)
    }

    /// Like `new`, but the worker waits until no event has arrived for
    /// `debounce` before starting a change rebuild
    pub fn with_debounce(
        pipeline: Arc<dyn GenerationPipeline>,
        request: PipelineRequest,
        guard: RebuildGuard,
        sink: Arc<dyn WatchEventSink>,
        debounce: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                pipeline,
                request,
                guard,
                sink,
                debounce,
                inner: Mutex::new(Inner::default()),
                changed: Condvar::new(),
                rebuilds: AtomicUsize::new(0),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Record a change event, scheduling or coalescing a rebuild
    pub fn on_change(&self, event: &ChangeEvent) -> Trigger {
        let trigger = {
            let mut inner = self.shared.lock();
            if inner.shutdown_requested || inner.state.is_terminal() {
                return Trigger::Refused;
            }

            inner.pending_changes += 1;
            inner.latest_path = Some(event.path.clone());
            inner.last_change = Some(Instant::now());

            if inner.state.is_building() {
                inner.follow_up = true;
                Trigger::Coalesced
            } else {
                inner.state = SessionState::Building;
                inner.scheduled = true;
                Trigger::Scheduled
            }
        };
        self.shared.changed.notify_all();

        if trigger == Trigger::Scheduled && !self.start_worker() {
            return Trigger::Refused;
        }
        trigger
    }

    /// Run a rebuild on the calling thread, waiting for any running one first.
    ///
    /// Returns `None` once the session is shutting down.
    pub fn rebuild_now(&self, trigger: RebuildTrigger) -> Option<RebuildOutcome> {
        let mut inner = self.shared.lock();
        while inner.state.is_building() && !inner.shutdown_requested {
            inner = self.shared.wait(inner);
        }
        if inner.shutdown_requested || inner.state.is_terminal() {
            return None;
        }
        inner.state = SessionState::Building;
        let changes = std::mem::take(&mut inner.pending_changes);
        let latest = inner.latest_path.take();
        drop(inner);

        let outcome = self.shared.execute(trigger, changes, latest);

        let mut inner = self.shared.lock();
        if inner.follow_up && !inner.shutdown_requested {
            // Events coalesced during this run: the worker owns the follow-up
            inner.follow_up = false;
            inner.scheduled = true;
            drop(inner);
            self.shared.changed.notify_all();
            self.start_worker();
        } else {
            self.shared.finish_building(inner);
        }
        Some(outcome)
    }

    /// Enter ShuttingDown, let an in-flight rebuild finish, stop the worker.
    ///
    /// Idempotent.
    pub fn shutdown(&self) {
        {
            let mut inner = self.shared.lock();
            inner.shutdown_requested = true;
            if !inner.state.is_building() {
                inner.state = SessionState::ShuttingDown;
            }
        }
        self.shared.changed.notify_all();

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }

        // A synchronous `rebuild_now` on another thread may still be running
        let mut inner = self.shared.lock();
        while inner.state.is_building() && !inner.scheduled {
            inner = self.shared.wait(inner);
        }
        inner.scheduled = false;
        inner.state = SessionState::ShuttingDown;
    }

    /// Block until no rebuild is running or scheduled
    pub fn wait_idle(&self) {
        let mut inner = self.shared.lock();
        while inner.state.is_building() {
            inner = self.shared.wait(inner);
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// Number of completed pipeline invocations
    pub fn rebuild_count(&self) -> usize {
        self.shared.rebuilds.load(Ordering::SeqCst)
    }

    /// Make sure the worker thread exists; on failure the scheduled rebuild
    /// is dropped and the session returns to Idle
    fn start_worker(&self) -> bool {
        match self.ensure_worker() {
            Ok(()) => true,
            Err(e) => {
                let mut inner = self.shared.lock();
                inner.scheduled = false;
                self.shared.finish_building(inner);
                self.shared.sink.on_event(WatchEvent::Error {
                    message: format!("failed to start rebuild worker: {e}"),
                });
                false
            }
        }
    }

    fn ensure_worker(&self) -> std::io::Result<()> {
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.is_some() {
            return Ok(());
        }
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("regen-rebuild".to_string())
            .spawn(move || shared.worker_loop())?;
        *worker = Some(handle);
        Ok(())
    }
}

impl Drop for RebuildCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Inner>) -> MutexGuard<'a, Inner> {
        self.changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn worker_loop(&self) {
        loop {
            let mut inner = self.lock();
            while !inner.scheduled && !inner.shutdown_requested {
                inner = self.wait(inner);
            }
            if !inner.scheduled {
                return;
            }
            inner.scheduled = false;

            loop {
                inner = self.settle(inner);
                if inner.shutdown_requested {
                    // Scheduled but not started: refused
                    inner.state = SessionState::ShuttingDown;
                    drop(inner);
                    self.changed.notify_all();
                    return;
                }

                // This run observes the filesystem as of now, covering
                // everything that arrived before it
                inner.follow_up = false;
                let changes = std::mem::take(&mut inner.pending_changes);
                let latest = inner.latest_path.take();
                drop(inner);

                self.execute(RebuildTrigger::Change, changes, latest);

                inner = self.lock();
                if inner.follow_up && !inner.shutdown_requested {
                    continue;
                }
                self.finish_building(inner);
                break;
            }
        }
    }

    /// Wait until `debounce` has passed since the last change
    fn settle<'a>(&self, mut inner: MutexGuard<'a, Inner>) -> MutexGuard<'a, Inner> {
        if self.debounce.is_zero() {
            return inner;
        }
        loop {
            if inner.shutdown_requested {
                return inner;
            }
            let elapsed = inner
                .last_change
                .map(|at| at.elapsed())
                .unwrap_or(self.debounce);
            if elapsed >= self.debounce {
                return inner;
            }
            let (guard, _) = self
                .changed
                .wait_timeout(inner, self.debounce - elapsed)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
        }
    }

    /// Building -> Idle, or -> ShuttingDown if shutdown arrived meanwhile.
    ///
    /// Takes the guard the caller checked `follow_up` under, so no event can
    /// slip in between that check and the transition.
    fn finish_building(&self, mut inner: MutexGuard<'_, Inner>) {
        inner.state = if inner.shutdown_requested {
            SessionState::ShuttingDown
        } else {
            SessionState::Idle
        };
        drop(inner);
        self.changed.notify_all();
    }

    /// Changes the gate held back during a rebuild still need one: treat
    /// them like events that arrived while Building
    fn schedule_missed(&self, missed: usize) {
        let mut inner = self.lock();
        if inner.shutdown_requested {
            return;
        }
        inner.pending_changes += missed;
        inner.follow_up = true;
        inner.last_change = Some(Instant::now());
    }

    fn execute(
        &self,
        trigger: RebuildTrigger,
        changes: usize,
        latest: Option<PathBuf>,
    ) -> RebuildOutcome {
        self.sink.on_event(WatchEvent::RebuildStarted {
            trigger,
            changes,
            latest: latest.map(|p| p.display().to_string()),
        });

        let started = Instant::now();
        let exclusive = self.guard.run_exclusive(|| {
            panic::catch_unwind(AssertUnwindSafe(|| self.pipeline.run(&self.request)))
        });
        let result = exclusive
            .output
            .unwrap_or_else(|payload| Err(PipelineError::Panicked(panic_message(payload))));

        let outcome = match result {
            Ok(()) => RebuildOutcome::succeeded(started.elapsed()),
            Err(e) => RebuildOutcome::failed(e.to_string(), started.elapsed()),
        };
        self.rebuilds.fetch_add(1, Ordering::SeqCst);
        self.sink.on_event(WatchEvent::from(&outcome));

        match exclusive.rearm {
            Ok(missed) => {
                if missed > 0 {
                    self.schedule_missed(missed);
                }
                self.sink.on_event(WatchEvent::Watching)
            }
            Err(e) => self.sink.on_event(WatchEvent::Error {
                message: format!("failed to re-arm watcher: {e}"),
            }),
        }

        outcome
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
