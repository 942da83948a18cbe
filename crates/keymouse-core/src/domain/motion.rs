//! Leaky-integrator pointer physics.
//!
//! Each tick, every held direction key adds a fixed acceleration impulse to
//! the velocity on its axis, then friction multiplies both axes. Under a
//! constantly-held key the velocity converges geometrically to the fixed
//! point `v* = friction * accel / (1 - friction)`; after release it decays
//! geometrically toward zero without ever changing sign.
//!
//! # Why a fixed point? (for beginners)
//!
//! The per-tick update under a held key is `v' = (v + accel) * friction`.
//! Setting `v' = v` and solving gives `v* = friction * accel / (1 -
//! friction)`. With the reference tuning (friction 0.85, accel 1.2/0.85)
//! the pointer tops out at exactly 8 units per tick, and reaches ~95% of
//! that within about 18 ticks — fast enough to feel responsive, slow
//! enough to allow fine positioning with short taps.
//!
//! Scroll has no velocity: held scroll keys contribute a fresh ±1 impulse
//! each tick and nothing is carried over.
//!
//! This module is deliberately free of threads and clocks. The daemon calls
//! [`MotionState::tick`] once per tick from its own physics thread.

use std::collections::HashSet;

use thiserror::Error;

use super::bindings::{Axis, BindingTable, ScanCode};

/// Errors raised when validating tuning constants.
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    /// Friction must satisfy `0 < friction < 1` for the integrator to both
    /// move and converge.
    #[error("friction must be strictly between 0 and 1, got {0}")]
    FrictionOutOfRange(f32),

    /// Acceleration must be positive and finite.
    #[error("acceleration must be positive and finite, got {0}")]
    InvalidAccel(f32),
}

/// Fixed tuning constants for the integrator.
///
/// Set at startup (compile or config time) and never changed while running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    friction: f32,
    accel: f32,
}

impl Tuning {
    /// Stock per-tick friction.
    pub const DEFAULT_FRICTION: f32 = 0.85;

    /// Stock acceleration, chosen so the steady state lands on 8.0 units
    /// per tick.
    pub const DEFAULT_ACCEL: f32 = 1.2 / 0.85;

    /// Validates and builds a tuning.
    ///
    /// # Errors
    ///
    /// Returns [`TuningError`] when `friction` is outside `(0, 1)` or
    /// `accel` is not a positive finite number.
    pub fn new(friction: f32, accel: f32) -> Result<Self, TuningError> {
        if !(friction > 0.0 && friction < 1.0) {
            return Err(TuningError::FrictionOutOfRange(friction));
        }
        if !(accel.is_finite() && accel > 0.0) {
            return Err(TuningError::InvalidAccel(accel));
        }
        Ok(Self { friction, accel })
    }

    /// Per-tick multiplicative velocity decay, in `(0, 1)`.
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Per-tick impulse magnitude contributed by one held direction key.
    pub fn accel(&self) -> f32 {
        self.accel
    }

    /// The velocity a single constantly-held direction key converges to.
    pub fn steady_state_velocity(&self) -> f32 {
        self.friction * self.accel / (1.0 - self.friction)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            friction: Self::DEFAULT_FRICTION,
            accel: Self::DEFAULT_ACCEL,
        }
    }
}

/// What one tick asks the sink to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutput {
    /// Relative motion in integer device units, absent when both truncated
    /// components are zero.
    pub motion: Option<(i32, i32)>,
    /// Wheel impulse, absent when no scroll key contributed this tick.
    pub scroll: Option<i32>,
}

/// The integrator's persistent velocity.
///
/// Owned exclusively by the physics thread; re-derived each tick from the
/// key-state snapshot plus its own previous value. This is the only
/// stateful, non-idempotent entity in the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionState {
    vx: f32,
    vy: f32,
}

impl MotionState {
    /// Creates a state at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current velocity, mainly for diagnostics and tests.
    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    /// Advances the integrator by one tick.
    ///
    /// Reads the held-key snapshot, accumulates direction impulses into the
    /// velocity, applies friction once to both axes, and reports what the
    /// sink should emit. Output units are produced by truncation toward
    /// zero; a truncated (0, 0) motion is reported as `None` so sub-unit
    /// residual velocity emits nothing.
    pub fn tick(
        &mut self,
        held: &HashSet<ScanCode>,
        bindings: &BindingTable,
        tuning: &Tuning,
    ) -> TickOutput {
        let mut scroll = 0i32;

        for dir in bindings.directions() {
            if held.contains(&dir.code) {
                let impulse = f32::from(dir.sign) * tuning.accel();
                match dir.axis {
                    Axis::X => self.vx += impulse,
                    Axis::Y => self.vy += impulse,
                }
            }
        }
        for s in bindings.scrolls() {
            if held.contains(&s.code) {
                scroll += i32::from(s.sign);
            }
        }

        // Friction applies once per tick, after impulses, held keys or not.
        self.vx *= tuning.friction();
        self.vy *= tuning.friction();

        // Truncation toward zero is the output-boundary rounding rule.
        let dx = self.vx as i32;
        let dy = self.vy as i32;

        TickOutput {
            motion: (dx != 0 || dy != 0).then_some((dx, dy)),
            scroll: (scroll != 0).then_some(scroll),
        }
    }
}
