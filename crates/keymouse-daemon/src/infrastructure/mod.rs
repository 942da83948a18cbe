//! Infrastructure services for the daemon.
//!
//! Everything that touches the OS lives here: the raw event stream read
//! from a grabbed evdev device, the uinput virtual pointer, the scoped
//! privilege window, and the TOML config store. The application layer only
//! sees the traits defined in these modules, so all of it is unit-testable
//! with the in-memory mocks.

pub mod event_source;
pub mod pointer_device;
pub mod storage;

#[cfg(target_os = "linux")]
pub mod privilege;
