//! MotionIntegrator: the fixed-rate physics loop.
//!
//! Runs on its own thread. Each tick it snapshots the key-state table,
//! advances the leaky integrator, and emits at most one motion batch and
//! one wheel batch to the sink. The stop flag is polled once per tick
//! boundary; a tick in progress always completes.
//!
//! The integrator never blocks except for its own sleep and never reads
//! the raw event stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use keymouse_core::{BindingTable, KeyStateTable, MotionState, Tuning};
use tracing::{debug, trace};

use crate::infrastructure::pointer_device::{PointerSink, SinkError};

/// The Motion Integrator use case.
pub struct MotionIntegrator {
    keys: Arc<KeyStateTable>,
    bindings: Arc<BindingTable>,
    sink: Arc<dyn PointerSink>,
    tuning: Tuning,
    tick_interval: Duration,
    state: MotionState,
}

impl MotionIntegrator {
    /// Creates an integrator at rest.
    pub fn new(
        keys: Arc<KeyStateTable>,
        bindings: Arc<BindingTable>,
        sink: Arc<dyn PointerSink>,
        tuning: Tuning,
        tick_interval: Duration,
    ) -> Self {
        Self {
            keys,
            bindings,
            sink,
            tuning,
            tick_interval,
            state: MotionState::new(),
        }
    }

    /// Executes one tick: snapshot, integrate, emit.
    ///
    /// The key-state lock is released by `snapshot()` before any sink
    /// call is made.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when a write fails; the loop treats this as a
    /// hard stop rather than silently dropping commands.
    pub fn tick_once(&mut self) -> Result<(), SinkError> {
        let held = self.keys.snapshot();
        let output = self.state.tick(&held, &self.bindings, &self.tuning);

        if let Some((dx, dy)) = output.motion {
            trace!(dx, dy, "motion");
            self.sink.move_rel(dx, dy)?;
        }
        if let Some(delta) = output.scroll {
            trace!(delta, "scroll");
            self.sink.scroll(delta)?;
        }
        Ok(())
    }

    /// Runs the tick loop until `stop` is observed at a tick boundary.
    ///
    /// # Errors
    ///
    /// Returns the first [`SinkError`] encountered; no commands are
    /// retried.
    pub fn run(mut self, stop: Arc<AtomicBool>) -> Result<(), SinkError> {
        debug!(
            tick_ms = self.tick_interval.as_millis() as u64,
            steady_state = f64::from(self.tuning.steady_state_velocity()),
            "motion integrator started"
        );
        while !stop.load(Ordering::Relaxed) {
            self.tick_once()?;
            thread::sleep(self.tick_interval);
        }
        debug!("motion integrator stopped");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
