//! Property tests for rebuild serialization and coalescing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use regen::{
    ChangeEvent, ChangeKind, DeliveryGate, GenerationPipeline, NoopEventSink, PipelineError,
    PipelineRequest, RebuildCoordinator, RebuildGuard, SessionState, Trigger, WatchError,
};

/// Pipeline that records overlap and checks delivery is suspended while it runs
struct SpyPipeline {
    gate: Arc<SpyGate>,
    runs: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    ran_while_delivering: AtomicBool,
    fail_every: usize,
}

impl GenerationPipeline for SpyPipeline {
    fn run(&self, _request: &PipelineRequest) -> Result<(), PipelineError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        if self.gate.is_delivering() {
            self.ran_while_delivering.store(true, Ordering::SeqCst);
        }

        thread::sleep(Duration::from_millis(2));
        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail_every > 0 && run % self.fail_every == 0 {
            return Err(PipelineError::Failed {
                code: Some(1),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct SpyGate {
    delivering: AtomicBool,
    suspends: AtomicUsize,
    resumes: AtomicUsize,
}

impl DeliveryGate for SpyGate {
    fn suspend(&self) {
        self.suspends.fetch_add(1, Ordering::SeqCst);
        self.delivering.store(false, Ordering::SeqCst);
    }

    fn resume(&self) -> Result<usize, WatchError> {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        self.delivering.store(true, Ordering::SeqCst);
        Ok(0)
    }

    fn is_delivering(&self) -> bool {
        self.delivering.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        self.delivering.store(false, Ordering::SeqCst);
    }
}

fn setup(fail_every: usize) -> (Arc<SpyPipeline>, Arc<SpyGate>, RebuildCoordinator) {
    let gate = Arc::new(SpyGate::default());
    let pipeline = Arc::new(SpyPipeline {
        gate: Arc::clone(&gate),
        runs: AtomicUsize::new(0),
        active: AtomicUsize::new(0),
        max_active: AtomicUsize::new(0),
        ran_while_delivering: AtomicBool::new(false),
        fail_every,
    });
    let coordinator = RebuildCoordinator::new(
        Arc::clone(&pipeline) as Arc<dyn GenerationPipeline>,
        PipelineRequest::new("/site", "/site/dist"),
        RebuildGuard::new(Arc::clone(&gate) as Arc<dyn DeliveryGate>),
        Arc::new(NoopEventSink),
    );
    (pipeline, gate, coordinator)
}

fn event(i: usize) -> ChangeEvent {
    ChangeEvent::new(ChangeKind::Modified, PathBuf::from(format!("/site/page-{i}.md")))
}

/// A burst: how many events, and the pause after it
fn burst() -> impl Strategy<Value = (usize, u64)> {
    (1usize..=6, 0u64..=6)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 24,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Concurrent event sources never cause overlapping rebuilds,
    /// and every rebuild runs with delivery suspended.
    #[test]
    fn property_rebuilds_never_overlap(
        bursts in proptest::collection::vec(burst(), 1..=6),
        sources in 1usize..=3,
        fail_every in 0usize..=3,
    ) {
        let (pipeline, gate, coordinator) = setup(fail_every);
        let coordinator = Arc::new(coordinator);
        let total: usize = bursts.iter().map(|(n, _)| n).sum::<usize>() * sources;

        let handles: Vec<_> = (0..sources)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                let bursts = bursts.clone();
                thread::spawn(move || {
                    let mut refused = 0;
                    for (i, (count, pause)) in bursts.into_iter().enumerate() {
                        for j in 0..count {
                            if coordinator.on_change(&event(i * 10 + j)) == Trigger::Refused {
                                refused += 1;
                            }
                        }
                        thread::sleep(Duration::from_millis(pause));
                    }
                    refused
                })
            })
            .collect();
        for handle in handles {
            prop_assert_eq!(handle.join().unwrap(), 0);
        }
        coordinator.wait_idle();

        let runs = pipeline.runs.load(Ordering::SeqCst);
        prop_assert_eq!(pipeline.max_active.load(Ordering::SeqCst), 1);
        prop_assert!(!pipeline.ran_while_delivering.load(Ordering::SeqCst));
        prop_assert!(runs >= 1 && runs <= total, "runs={} total={}", runs, total);
        prop_assert_eq!(coordinator.rebuild_count(), runs);
        prop_assert_eq!(gate.suspends.load(Ordering::SeqCst), runs);
        prop_assert_eq!(gate.resumes.load(Ordering::SeqCst), runs);
        prop_assert!(gate.is_delivering());
        prop_assert_eq!(coordinator.state(), SessionState::Idle);
    }

    /// PROPERTY: However many events land during one rebuild, they are
    /// covered by exactly one follow-up.
    #[test]
    fn property_events_during_a_rebuild_coalesce(during in 1usize..=20) {
        let (pipeline, _gate, coordinator) = setup(0);

        prop_assert_eq!(coordinator.on_change(&event(0)), Trigger::Scheduled);
        for i in 1..=during {
            prop_assert_eq!(coordinator.on_change(&event(i)), Trigger::Coalesced);
        }
        coordinator.wait_idle();

        // The scheduled run may not have started before the rest arrived
        let runs = pipeline.runs.load(Ordering::SeqCst);
        prop_assert!(runs == 1 || runs == 2, "runs={}", runs);
    }

    /// PROPERTY: After shutdown, no event starts a rebuild.
    #[test]
    fn property_shutdown_refuses_everything(before in 0usize..=4, after in 1usize..=8) {
        let (pipeline, _gate, coordinator) = setup(0);

        for i in 0..before {
            coordinator.on_change(&event(i));
        }
        coordinator.shutdown();
        let runs = pipeline.runs.load(Ordering::SeqCst);

        for i in 0..after {
            prop_assert_eq!(coordinator.on_change(&event(i)), Trigger::Refused);
        }
        prop_assert!(coordinator.rebuild_now(regen::RebuildTrigger::Initial).is_none());
        prop_assert_eq!(pipeline.runs.load(Ordering::SeqCst), runs);
        prop_assert_eq!(coordinator.state(), SessionState::ShuttingDown);
    }
}
