//! Recording pointer sink for unit and integration testing.
//!
//! Mirrors the real sink's wire shape: every command appends its events
//! plus a `Syn` commit marker to a shared log under one lock acquisition,
//! exactly as the uinput sink performs one `emit` per command. Tests can
//! therefore assert both *what* was emitted and that no command was ever
//! truncated or interleaved with another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use keymouse_core::PointerButton;

use super::{PointerSink, SinkError};

/// One event as the consuming device would see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireEvent {
    RelX(i32),
    RelY(i32),
    Wheel(i32),
    Button(PointerButton, bool),
    /// The commit/flush marker ending a batch.
    Syn,
}

/// A [`PointerSink`] that records the wire-event stream.
#[derive(Debug, Default)]
pub struct RecordingSink {
    log: Mutex<Vec<WireEvent>>,
    fail_writes: AtomicBool,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent command fail, as a severed device would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn push_batch(&self, events: &[WireEvent]) -> Result<(), SinkError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(SinkError::Write(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "injected write failure",
            )));
        }
        let mut log = self.log.lock().expect("recording sink lock poisoned");
        log.extend_from_slice(events);
        log.push(WireEvent::Syn);
        Ok(())
    }

    /// Returns the raw wire-event log.
    pub fn wire_log(&self) -> Vec<WireEvent> {
        self.log.lock().expect("recording sink lock poisoned").clone()
    }

    /// Splits the log at commit markers.
    ///
    /// Panics if the log does not parse into well-formed batches (a
    /// trailing batch without its commit marker means a command was
    /// truncated).
    pub fn batches(&self) -> Vec<Vec<WireEvent>> {
        let log = self.wire_log();
        let mut batches = Vec::new();
        let mut current = Vec::new();
        for event in log {
            if event == WireEvent::Syn {
                batches.push(std::mem::take(&mut current));
            } else {
                current.push(event);
            }
        }
        assert!(
            current.is_empty(),
            "wire log ends with an uncommitted batch: {current:?}"
        );
        batches
    }

    /// All recorded motion batches as (dx, dy).
    pub fn moves(&self) -> Vec<(i32, i32)> {
        self.batches()
            .into_iter()
            .filter_map(|batch| match batch.as_slice() {
                [WireEvent::RelX(dx), WireEvent::RelY(dy)] => Some((*dx, *dy)),
                _ => None,
            })
            .collect()
    }

    /// All recorded wheel impulses.
    pub fn scrolls(&self) -> Vec<i32> {
        self.batches()
            .into_iter()
            .filter_map(|batch| match batch.as_slice() {
                [WireEvent::Wheel(delta)] => Some(*delta),
                _ => None,
            })
            .collect()
    }

    /// All recorded button changes in order.
    pub fn buttons(&self) -> Vec<(PointerButton, bool)> {
        self.batches()
            .into_iter()
            .filter_map(|batch| match batch.as_slice() {
                [WireEvent::Button(button, pressed)] => Some((*button, *pressed)),
                _ => None,
            })
            .collect()
    }
}

impl PointerSink for RecordingSink {
    fn move_rel(&self, dx: i32, dy: i32) -> Result<(), SinkError> {
        self.push_batch(&[WireEvent::RelX(dx), WireEvent::RelY(dy)])
    }

    fn scroll(&self, delta: i32) -> Result<(), SinkError> {
        self.push_batch(&[WireEvent::Wheel(delta)])
    }

    fn set_button(&self, button: PointerButton, pressed: bool) -> Result<(), SinkError> {
        self.push_batch(&[WireEvent::Button(button, pressed)])
    }
}
