//! Integration test for the reference motion scenario.
//!
//! Exercises the engine domain end-to-end: the numpad binding table, the
//! key-state table, and the integrator, ticked the way the daemon's physics
//! thread ticks them.

use keymouse_core::{BindingTable, KeyStateTable, MotionState, Tuning};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_hold_right_fifty_ticks_then_release_matches_reference_curve() {
    // Arrange – reference tuning: friction 0.85, accel 1.2/0.85 ≈ 1.4118
    let keys = KeyStateTable::new();
    let bindings = BindingTable::numpad();
    let tuning = Tuning::default();
    let mut state = MotionState::new();

    // Act – hold code 77 (Right) for 50 ticks
    keys.set_pressed(77, true);
    let mut velocities = Vec::with_capacity(50);
    for _ in 0..50 {
        state.tick(&keys.snapshot(), &bindings, &tuning);
        velocities.push(state.velocity().0);
    }

    // Assert – monotone rise toward the steady state ≈ 8.0
    for pair in velocities.windows(2) {
        assert!(pair[1] >= pair[0], "velocity must rise monotonically");
    }
    let final_vx = *velocities.last().unwrap();
    assert!(
        (final_vx - 8.0).abs() < 0.05,
        "after 50 ticks vx must sit at the steady state, got {final_vx}"
    );

    // Act – release and decay
    keys.set_pressed(77, false);
    let mut silent_after = None;
    let mut prev = final_vx;
    for tick in 1..=40 {
        let out = state.tick(&keys.snapshot(), &bindings, &tuning);
        let vx = state.velocity().0;
        assert!(vx >= 0.0, "decay must never reverse sign");
        assert!(vx <= prev, "decay must be monotone");
        prev = vx;
        if out.motion.is_none() {
            silent_after = Some(tick);
            break;
        }
    }

    // Assert – the Move stream stops within ~30 ticks of release
    let silent_after = silent_after.expect("decay must go silent");
    assert!(silent_after <= 30, "went silent only after {silent_after} ticks");
}

#[test]
fn test_idle_engine_emits_nothing_from_a_live_key_table() {
    // Arrange
    let keys = KeyStateTable::new();
    let bindings = BindingTable::numpad();
    let tuning = Tuning::default();
    let mut state = MotionState::new();

    // Act – press and release an unbound key; tick throughout
    keys.set_pressed(30, true);
    for _ in 0..10 {
        let out = state.tick(&keys.snapshot(), &bindings, &tuning);
        assert_eq!(out.motion, None);
        assert_eq!(out.scroll, None);
    }
    keys.set_pressed(30, false);

    // Assert – unbound codes never produce output
    let out = state.tick(&keys.snapshot(), &bindings, &tuning);
    assert_eq!(out, keymouse_core::TickOutput::default());
}
