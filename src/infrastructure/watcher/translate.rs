//! notify event translation
//!
//! Maps backend events onto `ChangeEvent`s, one per notification and path.
//! inotify reports a rename as `From`, `To` and then `Both`, all sharing a
//! tracker cookie; only the `Both` becomes an event. A move out of the tree
//! produces a `From` and nothing else, so a pending `From` that nobody pairs
//! with is turned into `Deleted` by `expire` once the pairing window has
//! passed, or as soon as an unrelated event arrives.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

use crate::domain::entities::ChangeEvent;
use crate::domain::value_objects::ChangeKind;

/// How long a rename `From` waits for its other half
pub(crate) const RENAME_PAIR_WINDOW: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct PendingRename {
    tracker: Option<usize>,
    from: PathBuf,
    /// Destination, once a matching `To` has been seen
    to: Option<PathBuf>,
    seen: Instant,
}

impl PendingRename {
    fn into_event(self) -> ChangeEvent {
        match self.to {
            Some(to) => ChangeEvent::renamed(self.from, to),
            None => ChangeEvent::new(ChangeKind::Deleted, self.from),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct EventTranslator {
    pending: Option<PendingRename>,
}

impl EventTranslator {
    pub(crate) fn translate(&mut self, event: Event) -> Vec<ChangeEvent> {
        let tracker = event.tracker();
        let mut out = Vec::new();
        let mut paths = event.paths.into_iter();

        match event.kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                self.flush(&mut out);
                if let Some(from) = paths.next() {
                    self.pending = Some(PendingRename {
                        tracker,
                        from,
                        to: None,
                        seen: Instant::now(),
                    });
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                if tracker.is_some() && self.pending_matches(tracker) {
                    // `Both` follows with the two sides
                    if let Some(pending) = self.pending.as_mut() {
                        pending.to = paths.next();
                    }
                } else if let Some(from) = self.take_pending(tracker) {
                    out.extend(paths.next().map(|to| ChangeEvent::renamed(from.from, to)));
                } else {
                    self.flush(&mut out);
                    out.extend(paths.map(|p| ChangeEvent::new(ChangeKind::Created, p)));
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                let _ = self.take_pending(tracker);
                self.flush(&mut out);
                match (paths.next(), paths.next()) {
                    (Some(from), Some(to)) => out.push(ChangeEvent::renamed(from, to)),
                    (Some(path), None) => out.push(ChangeEvent::new(ChangeKind::Renamed, path)),
                    _ => {}
                }
            }
            EventKind::Modify(ModifyKind::Name(_)) => {
                self.flush(&mut out);
                out.extend(paths.map(|p| ChangeEvent::new(ChangeKind::Renamed, p)));
            }
            EventKind::Create(_) => {
                self.flush(&mut out);
                out.extend(paths.map(|p| ChangeEvent::new(ChangeKind::Created, p)));
            }
            EventKind::Remove(_) => {
                self.flush(&mut out);
                out.extend(paths.map(|p| ChangeEvent::new(ChangeKind::Deleted, p)));
            }
            EventKind::Modify(_) | EventKind::Any => {
                self.flush(&mut out);
                out.extend(paths.map(|p| ChangeEvent::new(ChangeKind::Modified, p)));
            }
            EventKind::Access(_) | EventKind::Other => {}
        }

        out
    }

    /// Give up on a rename half that has waited longer than `window`
    pub(crate) fn expire(&mut self, window: Duration) -> Option<ChangeEvent> {
        if self.pending.as_ref()?.seen.elapsed() < window {
            return None;
        }
        self.pending.take().map(PendingRename::into_event)
    }

    fn pending_matches(&self, tracker: Option<usize>) -> bool {
        matches!(&self.pending, Some(p) if p.tracker == tracker)
    }

    fn take_pending(&mut self, tracker: Option<usize>) -> Option<PendingRename> {
        if self.pending_matches(tracker) {
            self.pending.take()
        } else {
            None
        }
    }

    fn flush(&mut self, out: &mut Vec<ChangeEvent>) {
        if let Some(pending) = self.pending.take() {
            out.push(pending.into_event());
        }
    }
}
