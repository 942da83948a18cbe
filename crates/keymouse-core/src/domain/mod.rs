//! Domain entities for KeyMouse.
//!
//! This module contains pure engine logic with no infrastructure
//! dependencies: no device nodes, no uinput, no threads, no clocks. The
//! daemon's application layer drives these types from its own threads and
//! injects the I/O at the seams.

/// Shared set of currently-held scan codes.
pub mod keystate;

/// Static scan-code → direction/scroll/button tables.
pub mod bindings;

/// Velocity integration with acceleration and friction.
///
/// See [`motion::MotionState`] for the per-tick step.
pub mod motion;
