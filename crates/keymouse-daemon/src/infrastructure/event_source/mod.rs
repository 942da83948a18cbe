//! Raw input event stream infrastructure.
//!
//! The dispatcher consumes a blocking stream of raw `(category, code,
//! value)` events from the exclusively-grabbed physical device. The stream
//! stays raw on purpose: filtering key transitions and ignoring other
//! categories is the dispatcher's job, not the source's.
//!
//! The production implementation wraps a grabbed evdev device; tests use
//! [`mock::MockEventSource`].

use thiserror::Error;

pub mod mock;

#[cfg(target_os = "linux")]
pub mod evdev;

/// Raw event category, normalised from the kernel event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    /// A key or button transition (the only category the engine maps).
    Key,
    /// Relative axis motion.
    Relative,
    /// A synchronization marker.
    Synchronization,
    /// Anything else (LEDs, misc, switches, ...).
    Other,
}

/// One raw event as read from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: RawEventKind,
    pub code: u16,
    /// For key events: 0 = released, 1 = pressed, 2 = auto-repeat.
    pub value: i32,
}

/// Outcome of one poll of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPoll {
    /// An event was read.
    Event(RawEvent),
    /// Nothing ready yet; not an error, the caller simply retries.
    WouldBlock,
    /// The stream has ended (device closed or unplugged).
    Closed,
}

/// Error type for stream reads.
///
/// Only raised for genuine read failures; an empty poll is
/// [`StreamPoll::WouldBlock`] and a vanished device is
/// [`StreamPoll::Closed`].
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to read from input device: {0}")]
    Read(#[from] std::io::Error),
}

/// Error type for device discovery and grabbing.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No enumerated device matched the requested name.
    #[error("no input device named {0:?} was found")]
    NotFound(String),

    /// The exclusive grab was refused.
    #[error("failed to grab input device {name:?}: {source}")]
    GrabRefused {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait abstracting the raw event stream.
pub trait EventSource: Send {
    /// Reads the next raw event, blocking until one arrives, the poll
    /// comes back empty, or the stream ends.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] for read failures other than the empty-poll
    /// and device-gone cases, which are reported through [`StreamPoll`].
    fn next_event(&mut self) -> Result<StreamPoll, StreamError>;
}
