//! EventDispatcher: turns raw device events into key state and clicks.
//!
//! The dispatcher is the program's main loop. It blocks on the raw stream,
//! filters key transitions (auto-repeat is ignored), updates the shared
//! key-state table, and fires button-bound codes at the sink immediately —
//! clicks are low-latency and never wait for the integrator's tick.
//!
//! The key-state lock is confined to the table update; it is never held
//! across a sink call.

use std::sync::Arc;

use keymouse_core::{BindingTable, KeyStateTable, ScanCode};
use thiserror::Error;
use tracing::{info, trace};

use crate::infrastructure::event_source::{
    EventSource, RawEventKind, StreamError, StreamPoll,
};
use crate::infrastructure::pointer_device::{PointerSink, SinkError};

/// Raw key-event value for a release.
const KEY_RELEASED: i32 = 0;
/// Raw key-event value for a press.
const KEY_PRESSED: i32 = 1;

/// Error type for the dispatch loop.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The raw stream failed with a genuine read error.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A click could not be written; the virtual device is gone.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// The Event Dispatcher use case.
pub struct EventDispatcher {
    keys: Arc<KeyStateTable>,
    bindings: Arc<BindingTable>,
    sink: Arc<dyn PointerSink>,
}

impl EventDispatcher {
    /// Creates a dispatcher over the shared key table and sink.
    pub fn new(
        keys: Arc<KeyStateTable>,
        bindings: Arc<BindingTable>,
        sink: Arc<dyn PointerSink>,
    ) -> Self {
        Self {
            keys,
            bindings,
            sink,
        }
    }

    /// Handles one raw key event.
    ///
    /// Values other than pressed/released (auto-repeat) cause no
    /// transition. On a transition the key-state table is updated first,
    /// then a button-bound code is forwarded to the sink immediately.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Sink`] when the click write fails; this is
    /// fatal to the dispatch loop.
    pub fn handle_key(&self, code: ScanCode, value: i32) -> Result<(), DispatchError> {
        let pressed = match value {
            KEY_PRESSED => true,
            KEY_RELEASED => false,
            _ => return Ok(()),
        };

        trace!(code, pressed, "key transition");
        self.keys.set_pressed(code, pressed);

        if let Some(button) = self.bindings.button(code) {
            self.sink.set_button(button, pressed)?;
        }
        Ok(())
    }

    /// Consumes the raw stream until it ends.
    ///
    /// Empty polls are retried silently; non-key categories are ignored; a
    /// closed stream ends the loop cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the stream read or a click write
    /// fails. Either way the caller must still stop and join the
    /// integrator.
    pub fn run(&self, source: &mut dyn EventSource) -> Result<(), DispatchError> {
        loop {
            match source.next_event()? {
                StreamPoll::Event(event) if event.kind == RawEventKind::Key => {
                    self.handle_key(event.code, event.value)?;
                }
                StreamPoll::Event(_) => {
                    // Outside the engine's mapping domain; not an error.
                }
                StreamPoll::WouldBlock => continue,
                StreamPoll::Closed => {
                    info!("input stream ended");
                    return Ok(());
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
