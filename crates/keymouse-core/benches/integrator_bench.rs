//! Criterion benchmarks for the motion integrator hot path.
//!
//! The integrator runs once per 10 ms tick, so its budget is generous, but
//! the tick step and the binding lookups are also exercised per raw key
//! event on the dispatcher side and should stay in the sub-microsecond
//! class.
//!
//! Run with:
//! ```bash
//! cargo bench --package keymouse-core --bench integrator_bench
//! ```

use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keymouse_core::{BindingTable, MotionState, ScanCode, Tuning};

/// Held-key snapshots covering the interesting tick shapes.
fn snapshot(codes: &[ScanCode]) -> HashSet<ScanCode> {
    codes.iter().copied().collect()
}

// ── Benchmarks: per-tick integration step ─────────────────────────────────────

fn bench_tick(c: &mut Criterion) {
    let bindings = BindingTable::numpad();
    let tuning = Tuning::default();
    let mut group = c.benchmark_group("integrator_tick");

    let cases: &[(&str, &[ScanCode])] = &[
        ("idle", &[]),
        ("one_direction", &[77]),
        ("diagonal_plus_scroll", &[77, 76, 78]),
        ("all_bound_keys", &[72, 76, 75, 77, 78, 14, 82, 96, 83]),
    ];

    for (label, codes) in cases {
        let held = snapshot(codes);
        group.bench_with_input(BenchmarkId::new("tick", *label), &held, |b, held| {
            let mut state = MotionState::new();
            b.iter(|| state.tick(black_box(held), &bindings, &tuning))
        });
    }

    group.finish();
}

// ── Benchmarks: binding lookups (per raw key event) ───────────────────────────

fn bench_binding_lookup(c: &mut Criterion) {
    let bindings = BindingTable::numpad();
    let mut group = c.benchmark_group("binding_lookup");

    // Best case: first direction entry. Worst case: unbound code scans all
    // three tables and misses.
    group.bench_function("direction_hit", |b| {
        b.iter(|| bindings.direction(black_box(72)))
    });
    group.bench_function("button_hit", |b| {
        b.iter(|| bindings.button(black_box(83)))
    });
    group.bench_function("unbound_miss", |b| {
        b.iter(|| {
            (
                bindings.direction(black_box(30)),
                bindings.scroll(black_box(30)),
                bindings.button(black_box(30)),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_binding_lookup);
criterion_main!(benches);
