//! Rebuild guard
//!
//! Suspends monitor delivery for the duration of a rebuild so the pipeline's
//! own writes never re-trigger it. Delivery is resumed by a scope guard, so a
//! failing or panicking rebuild still re-arms the monitor.

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::ports::{DeliveryGate, WatchError};

/// Output of an exclusive section plus the result of re-arming delivery
#[derive(Debug)]
pub struct Exclusive<T> {
    pub output: T,
    /// Changes held back while suspended, or why delivery could not resume
    pub rearm: Result<usize, WatchError>,
}

/// Mutually-exclusive gate around rebuilds
pub struct RebuildGuard {
    gate: Arc<dyn DeliveryGate>,
    exclusive: Mutex<()>,
}

impl RebuildGuard {
    pub fn new(gate: Arc<dyn DeliveryGate>) -> Self {
        Self {
            gate,
            exclusive: Mutex::new(()),
        }
    }

    /// Run `f` with delivery suspended, resuming it on every exit path
    pub fn run_exclusive<T>(&self, f: impl FnOnce() -> T) -> Exclusive<T> {
        let _exclusive = self
            .exclusive
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let suspension = Suspension::begin(self.gate.as_ref());
        let output = f();
        let rearm = suspension.release();

        Exclusive { output, rearm }
    }

    /// Whether the underlying gate is delivering events right now
    pub fn is_delivering(&self) -> bool {
        self.gate.is_delivering()
    }
}

/// Scope guard: delivery stays suspended while this is alive
struct Suspension<'a> {
    gate: &'a dyn DeliveryGate,
    released: bool,
}

impl<'a> Suspension<'a> {
    fn begin(gate: &'a dyn DeliveryGate) -> Self {
        gate.suspend();
        Self {
            gate,
            released: false,
        }
    }

    fn release(mut self) -> Result<usize, WatchError> {
        self.released = true;
        self.gate.resume()
    }
}

impl Drop for Suspension<'_> {
    fn drop(&mut self) {
        // Only reached without `release` when the exclusive section unwinds.
        if !self.released {
            let _ = self.gate.resume();
        }
    }
}
