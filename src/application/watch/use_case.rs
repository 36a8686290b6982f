//! Watch Use Case implementation
//!
//! The process lifecycle: initial rebuild, then a blocking wait on either the
//! next change or the shutdown signal, then an orderly teardown.

use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{select, Receiver};

use crate::domain::ports::{
    DeliveryGate, GenerationPipeline, RebuildTrigger, WatchError, WatchEvent, WatchEventSink,
};
use crate::error::{RegenError, RegenResult};
use crate::fs::absolutize;
use crate::infrastructure::watcher::{FileSystemMonitor, MonitorItem};

use super::coordinator::{RebuildCoordinator, Trigger};
use super::guard::RebuildGuard;
use super::options::WatchOptions;

/// What a finished session did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// Pipeline invocations, including the initial one
    pub rebuilds: usize,
    /// Change events received
    pub changes: usize,
}

/// Watch Use Case
///
/// Orchestrates continuous file watching with full rebuilds.
/// This is the main entry point for the `regen watch` command.
pub struct WatchUseCase {
    options: WatchOptions,
    pipeline: Arc<dyn GenerationPipeline>,
}

impl WatchUseCase {
    pub fn new(options: WatchOptions, pipeline: Arc<dyn GenerationPipeline>) -> Self {
        Self { options, pipeline }
    }

    /// Start watching (blocking)
    ///
    /// Returns once a message arrives on `shutdown` (or its sender is
    /// dropped). Fails if the input directory cannot be watched or the
    /// initial rebuild fails.
    pub fn start(
        &self,
        shutdown: Receiver<()>,
        sink: Arc<dyn WatchEventSink>,
    ) -> RegenResult<WatchSummary> {
        let (monitor, events) = FileSystemMonitor::new(&self.options.input_dir)?;
        // Build output inside the watched tree must never trigger a rebuild
        monitor.ignore_dir(&absolutize(&self.options.output_dir)?);
        let root = monitor.root().to_path_buf();
        self.run_session(&root, Arc::new(monitor), events, shutdown, sink)
    }

    /// Drive a session over an already-created event source
    pub(crate) fn run_session(
        &self,
        root: &Path,
        gate: Arc<dyn DeliveryGate>,
        events: Receiver<MonitorItem>,
        shutdown: Receiver<()>,
        sink: Arc<dyn WatchEventSink>,
    ) -> RegenResult<WatchSummary> {
        let output_dir = absolutize(&self.options.output_dir)?;
        let coordinator = RebuildCoordinator::with_debounce(
            Arc::clone(&self.pipeline),
            self.options.request(root, &output_dir),
            RebuildGuard::new(Arc::clone(&gate)),
            Arc::clone(&sink),
            self.options.debounce,
        );

        sink.on_event(WatchEvent::WatchStarted {
            root: root.display().to_string(),
        });

        // The guard release at the end of this rebuild arms the monitor
        if let Some(outcome) = coordinator.rebuild_now(RebuildTrigger::Initial) {
            if !outcome.success {
                gate.stop();
                coordinator.shutdown();
                return Err(RegenError::InitialRebuildFailed {
                    message: outcome.error.unwrap_or_default(),
                });
            }
        }
        if !gate.is_delivering() {
            gate.stop();
            coordinator.shutdown();
            return Err(RegenError::Watch(WatchError::Subscribe {
                path: root.to_path_buf(),
                message: "monitor could not be armed".to_string(),
            }));
        }

        let mut changes = 0;
        loop {
            select! {
                recv(events) -> item => match item {
                    Ok(Ok(change)) => {
                        changes += 1;
                        sink.on_event(WatchEvent::from(&change));
                        if coordinator.on_change(&change) == Trigger::Refused {
                            break;
                        }
                    }
                    Ok(Err(e)) => sink.on_event(WatchEvent::Error {
                        message: e.to_string(),
                    }),
                    // Monitor stopped underneath us
                    Err(_) => break,
                },
                recv(shutdown) -> _ => break,
            }
        }

        gate.stop();
        coordinator.shutdown();
        sink.on_event(WatchEvent::Shutdown);

        Ok(WatchSummary {
            rebuilds: coordinator.rebuild_count(),
            changes,
        })
    }
}
