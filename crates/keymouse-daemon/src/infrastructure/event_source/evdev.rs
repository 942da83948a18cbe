//! Evdev-backed device discovery and raw event stream.
//!
//! Discovery enumerates `/dev/input/event*` and matches the configured
//! device name exactly. The source takes an exclusive grab before the
//! dispatcher starts, so the physical device's native events stop reaching
//! the rest of the system for as long as the daemon runs; the grab is
//! released (best effort) when the source is dropped.

use std::collections::VecDeque;
use std::io;

use evdev::{Device, InputEvent, InputEventKind};
use tracing::{debug, info, warn};

use super::{DiscoveryError, EventSource, RawEvent, RawEventKind, StreamError, StreamPoll};

/// ENODEV: the device node disappeared underneath us (unplugged).
const ENODEV: i32 = 19;

/// Finds the input device whose name matches `name` exactly.
///
/// Must run while the process can open the `/dev/input` nodes (inside the
/// privilege window at startup). Every candidate is logged at debug level
/// to help users pick the right name.
///
/// # Errors
///
/// Returns [`DiscoveryError::NotFound`] when no device matches.
pub fn find_device_by_name(name: &str) -> Result<Device, DiscoveryError> {
    for (path, device) in evdev::enumerate() {
        let device_name = device.name().unwrap_or("");
        debug!(
            path = %path.display(),
            name = device_name,
            phys = device.physical_path().unwrap_or("(none)"),
            "enumerated input device"
        );
        if device_name == name {
            info!(path = %path.display(), name, "found target device");
            return Ok(device);
        }
    }
    Err(DiscoveryError::NotFound(name.to_string()))
}

/// A grabbed evdev device yielding raw events.
pub struct EvdevEventSource {
    device: Device,
    name: String,
    /// fetch_events returns a batch; events queue here between polls.
    buffered: VecDeque<RawEvent>,
}

impl EvdevEventSource {
    /// Takes the exclusive grab and wraps the device as an event source.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::GrabRefused`] when the kernel denies the
    /// grab (typically because another process already holds one).
    pub fn grab(mut device: Device) -> Result<Self, DiscoveryError> {
        let name = device.name().unwrap_or("(unnamed)").to_string();
        device
            .grab()
            .map_err(|source| DiscoveryError::GrabRefused {
                name: name.clone(),
                source,
            })?;
        info!(name = %name, "grabbed device exclusively");
        Ok(Self {
            device,
            name,
            buffered: VecDeque::new(),
        })
    }

    fn convert(event: InputEvent) -> RawEvent {
        let kind = match event.kind() {
            InputEventKind::Key(_) => RawEventKind::Key,
            InputEventKind::RelAxis(_) => RawEventKind::Relative,
            InputEventKind::Synchronization(_) => RawEventKind::Synchronization,
            _ => RawEventKind::Other,
        };
        RawEvent {
            kind,
            code: event.code(),
            value: event.value(),
        }
    }
}

impl EventSource for EvdevEventSource {
    fn next_event(&mut self) -> Result<StreamPoll, StreamError> {
        if let Some(event) = self.buffered.pop_front() {
            return Ok(StreamPoll::Event(event));
        }

        // The device is in blocking mode, so this suspends until the next
        // batch of raw events arrives.
        match self.device.fetch_events() {
            Ok(events) => {
                self.buffered.extend(events.map(Self::convert));
                match self.buffered.pop_front() {
                    Some(event) => Ok(StreamPoll::Event(event)),
                    None => Ok(StreamPoll::WouldBlock),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(StreamPoll::WouldBlock),
            Err(e) if e.raw_os_error() == Some(ENODEV) => {
                info!(name = %self.name, "device disappeared; stream closed");
                Ok(StreamPoll::Closed)
            }
            Err(e) => Err(StreamError::Read(e)),
        }
    }
}

impl Drop for EvdevEventSource {
    fn drop(&mut self) {
        // Best-effort ungrab; dropping the device would also release it.
        if let Err(e) = self.device.ungrab() {
            warn!(name = %self.name, error = %e, "failed to release device grab");
        }
    }
}
