//! Virtual pointer output infrastructure.
//!
//! The sink serializes motion, wheel, and button commands into atomic
//! batches: every command writes its event(s) followed by a commit marker
//! under a single lock, so concurrent callers (the physics thread and the
//! dispatcher's click path) never interleave one command inside another.
//!
//! The production implementation is a Linux uinput device; tests use
//! [`mock::RecordingSink`].

use keymouse_core::PointerButton;
use thiserror::Error;

pub mod mock;

#[cfg(target_os = "linux")]
pub mod uinput;

/// Error type for virtual pointer operations.
///
/// A failed write mirrors a severed synthetic-device handle, which is
/// unrecoverable without recreating the device; callers treat it as fatal
/// and never retry.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The virtual device could not be created at startup.
    #[error("failed to create virtual pointer device: {0}")]
    Create(#[source] std::io::Error),

    /// Writing a command batch to the device failed.
    #[error("virtual pointer write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Trait abstracting the virtual pointer device.
///
/// Each call is one atomic transaction: the underlying events plus their
/// commit marker become visible to the consuming device together, or the
/// call fails. No ordering is guaranteed between commands issued by
/// different threads beyond this per-command atomicity.
pub trait PointerSink: Send + Sync {
    /// Moves the pointer by (`dx`, `dy`) device units.
    fn move_rel(&self, dx: i32, dy: i32) -> Result<(), SinkError>;

    /// Turns the wheel by `delta` detents; positive scrolls up.
    fn scroll(&self, delta: i32) -> Result<(), SinkError>;

    /// Presses (`pressed = true`) or releases a pointer button.
    fn set_button(&self, button: PointerButton, pressed: bool) -> Result<(), SinkError>;
}
