//! # keymouse-core
//!
//! Shared engine library for KeyMouse containing the key-state table, the
//! static binding tables, and the motion-integrator physics.
//!
//! This crate is used by the daemon binary. It has zero dependencies on OS
//! APIs, device nodes, or threads, so it compiles and tests on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! KeyMouse turns a physical keyboard into an auxiliary pointing device:
//! while the keyboard is exclusively grabbed, designated keys drive a
//! synthetic pointer's relative motion, wheel, and buttons instead of
//! producing ordinary keystrokes.
//!
//! This crate (`keymouse-core`) is the shared foundation. It defines:
//!
//! - **`domain::keystate`** – The set of scan codes currently held down,
//!   behind a single mutex so the event-reading thread and the physics
//!   thread can share it safely.
//!
//! - **`domain::bindings`** – The static tables mapping scan codes to
//!   direction axes, scroll directions, and pointer buttons.
//!
//! - **`domain::motion`** – The leaky integrator that converts held
//!   direction keys into per-tick velocity with acceleration and friction.
//!   It is a pure step function; the daemon owns the thread and the clock.

// Rust will look for each module in a subdirectory with the same name
// (e.g., src/domain/mod.rs).
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `keymouse_core::KeyStateTable` instead of the full path.
pub use domain::bindings::{Axis, BindingError, BindingTable, PointerButton, ScanCode};
pub use domain::keystate::KeyStateTable;
pub use domain::motion::{MotionState, TickOutput, Tuning, TuningError};
