//! Lifecycle coordination for the motion integrator thread.
//!
//! The integrator must be running before the dispatcher starts consuming
//! the device stream (so no early click or motion is lost) and must be
//! stopped and joined after the dispatcher's loop returns. [`MotionTask`]
//! packages that contract: spawn, `request_stop`, `await_completion`.
//!
//! Stopping is cooperative: the flag is polled at the top of each tick, a
//! tick in progress always completes, and nothing is cancelled
//! mid-operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{error, warn};

use super::drive_pointer::MotionIntegrator;
use crate::infrastructure::pointer_device::SinkError;

/// Error type for the integrator thread's lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The integrator loop aborted on a sink write failure.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The integrator thread panicked.
    #[error("motion integrator thread panicked")]
    Panicked,

    /// The OS refused to spawn the thread.
    #[error("failed to spawn motion integrator thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Handle to the running integrator thread.
pub struct MotionTask {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), SinkError>>>,
}

impl MotionTask {
    /// Starts the integrator on a dedicated named thread.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Spawn`] when the OS cannot create the
    /// thread (reported before the dispatcher ever runs).
    pub fn spawn(integrator: MotionIntegrator) -> Result<Self, LifecycleError> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_thread = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("motion-integrator".to_string())
            .spawn(move || {
                let result = integrator.run(stop_thread);
                if let Err(ref e) = result {
                    error!("motion integrator aborted: {e}");
                }
                result
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Asks the tick loop to exit at its next boundary.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Waits for the tick loop to exit and surfaces its result.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Sink`] if the loop aborted on a write
    /// failure, or [`LifecycleError::Panicked`] if the thread died.
    pub fn await_completion(mut self) -> Result<(), LifecycleError> {
        let handle = self
            .handle
            .take()
            .expect("await_completion consumes the only handle");
        match handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(LifecycleError::Panicked),
        }
    }
}

impl Drop for MotionTask {
    fn drop(&mut self) {
        // Safety net for early-return paths; the normal path joins via
        // await_completion.
        if let Some(handle) = self.handle.take() {
            self.stop.store(true, Ordering::Relaxed);
            if handle.join().is_err() {
                warn!("motion integrator thread panicked during shutdown");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use keymouse_core::{BindingTable, KeyStateTable, Tuning};

    use crate::application::drive_pointer::MotionIntegrator;
    use crate::infrastructure::pointer_device::mock::RecordingSink;
    use crate::infrastructure::pointer_device::PointerSink;

    fn make_integrator(
        keys: &Arc<KeyStateTable>,
        sink: &Arc<RecordingSink>,
    ) -> MotionIntegrator {
        MotionIntegrator::new(
            Arc::clone(keys),
            Arc::new(BindingTable::numpad()),
            Arc::clone(sink) as Arc<dyn PointerSink>,
            Tuning::default(),
            Duration::from_millis(1),
        )
    }

    #[test]
    fn test_stop_and_join_terminates_the_thread() {
        // Arrange
        let keys = Arc::new(KeyStateTable::new());
        let sink = Arc::new(RecordingSink::new());
        let task = MotionTask::spawn(make_integrator(&keys, &sink)).expect("spawn");

        // Act – let it tick a little, then stop
        std::thread::sleep(Duration::from_millis(20));
        task.request_stop();
        let result = task.await_completion();

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_integrator_runs_while_dispatcher_would_be_blocked() {
        // Arrange – a held key with nobody reading any event stream
        let keys = Arc::new(KeyStateTable::new());
        let sink = Arc::new(RecordingSink::new());
        keys.set_pressed(77, true);
        let task = MotionTask::spawn(make_integrator(&keys, &sink)).expect("spawn");

        // Act
        std::thread::sleep(Duration::from_millis(50));
        task.request_stop();
        task.await_completion().expect("clean stop");

        // Assert – motion flowed without any dispatcher involvement
        assert!(!sink.moves().is_empty());
    }

    #[test]
    fn test_sink_failure_surfaces_from_await_completion() {
        // Arrange
        let keys = Arc::new(KeyStateTable::new());
        let sink = Arc::new(RecordingSink::new());
        keys.set_pressed(77, true);
        sink.fail_writes(true);
        let task = MotionTask::spawn(make_integrator(&keys, &sink)).expect("spawn");

        // Act – the loop aborts on its own; no stop request needed
        std::thread::sleep(Duration::from_millis(20));
        let result = task.await_completion();

        // Assert
        assert!(matches!(result, Err(LifecycleError::Sink(_))));
    }

    #[test]
    fn test_drop_without_await_still_stops_the_thread() {
        // Arrange
        let keys = Arc::new(KeyStateTable::new());
        let sink = Arc::new(RecordingSink::new());
        let task = MotionTask::spawn(make_integrator(&keys, &sink)).expect("spawn");

        // Act / Assert – dropping must not hang
        drop(task);
    }
}
