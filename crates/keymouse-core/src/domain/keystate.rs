//! Shared key-state table.
//!
//! The table is the only state shared between the event-reading thread and
//! the physics thread. The event dispatcher inserts a scan code on key-down
//! and removes it on key-up; the motion integrator reads a snapshot once per
//! tick.
//!
//! # Why one mutex for both reads and writes? (for beginners)
//!
//! A single-writer-many-reader lock (`RwLock`) would also be correct here,
//! but contention is negligible: the writer touches the set only on physical
//! key transitions (a few per second) and the reader takes one snapshot
//! every tick (reference: every 10 ms). A plain `Mutex` keeps the invariant
//! easy to state — no caller ever observes the set half-updated — without
//! the extra reasoning RwLock's two lock modes invite.
//!
//! Callers must not hold any lock across sink I/O; `snapshot` therefore
//! returns an owned copy, and `set_pressed` confines the lock to the update
//! itself.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::trace;

use super::bindings::ScanCode;

/// The set of scan codes currently held down.
///
/// Created empty at startup, mutated only by the event dispatcher, read by
/// the motion integrator, discarded at process shutdown. A code is present
/// iff its most recent transition was "down" and no "up" has been observed
/// since.
#[derive(Debug, Default)]
pub struct KeyStateTable {
    held: Mutex<HashSet<ScanCode>>,
}

impl KeyStateTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            held: Mutex::new(HashSet::new()),
        }
    }

    /// Records a key transition.
    ///
    /// Idempotent: inserting an already-present code or removing an absent
    /// one is a no-op observable only via state, never an error.
    pub fn set_pressed(&self, code: ScanCode, down: bool) {
        let mut held = self.held.lock().expect("key-state lock poisoned");
        let changed = if down {
            held.insert(code)
        } else {
            held.remove(&code)
        };
        if changed {
            trace!(code, down, held = held.len(), "key state updated");
        }
    }

    /// Returns a consistent copy of the currently-held set.
    ///
    /// The lock is released before this returns, so the copy may be stale by
    /// the time the caller inspects it; it is never half-updated.
    pub fn snapshot(&self) -> HashSet<ScanCode> {
        self.held.lock().expect("key-state lock poisoned").clone()
    }

    /// Returns `true` if `code` is currently held.
    pub fn is_pressed(&self, code: ScanCode) -> bool {
        self.held
            .lock()
            .expect("key-state lock poisoned")
            .contains(&code)
    }

    /// Returns the number of currently-held codes.
    pub fn held_count(&self) -> usize {
        self.held.lock().expect("key-state lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_pressed_down_inserts_code() {
        // Arrange
        let table = KeyStateTable::new();

        // Act
        table.set_pressed(77, true);

        // Assert
        assert!(table.is_pressed(77));
        assert_eq!(table.held_count(), 1);
    }

    #[test]
    fn test_set_pressed_up_removes_code() {
        // Arrange
        let table = KeyStateTable::new();
        table.set_pressed(77, true);

        // Act
        table.set_pressed(77, false);

        // Assert
        assert!(!table.is_pressed(77));
        assert_eq!(table.held_count(), 0);
    }

    #[test]
    fn test_set_pressed_is_idempotent_for_down() {
        // Arrange
        let table = KeyStateTable::new();

        // Act – press the same code twice
        table.set_pressed(75, true);
        table.set_pressed(75, true);

        // Assert – identical to a single press
        assert!(table.is_pressed(75));
        assert_eq!(table.held_count(), 1);
    }

    #[test]
    fn test_set_pressed_is_idempotent_for_up() {
        // Arrange
        let table = KeyStateTable::new();
        table.set_pressed(75, true);

        // Act
        table.set_pressed(75, false);
        table.set_pressed(75, false);

        // Assert
        assert!(!table.is_pressed(75));
        assert_eq!(table.held_count(), 0);
    }

    #[test]
    fn test_up_for_never_seen_code_stays_absent() {
        // Arrange
        let table = KeyStateTable::new();

        // Act – release a code that was never pressed
        table.set_pressed(96, false);

        // Assert – no negative state
        assert!(!table.is_pressed(96));
        assert_eq!(table.held_count(), 0);
    }

    #[test]
    fn test_snapshot_is_an_owned_copy() {
        // Arrange
        let table = KeyStateTable::new();
        table.set_pressed(72, true);

        // Act
        let snap = table.snapshot();
        table.set_pressed(72, false);

        // Assert – the copy is unaffected by later mutation
        assert!(snap.contains(&72));
        assert!(!table.is_pressed(72));
    }

    #[test]
    fn test_concurrent_toggling_never_corrupts_the_set() {
        // Arrange
        let table = Arc::new(KeyStateTable::new());
        let writers = 4;
        let toggles = 500;

        // Act – several threads toggle disjoint codes while another snapshots
        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let t = Arc::clone(&table);
                thread::spawn(move || {
                    let code = 100 + i as ScanCode;
                    for _ in 0..toggles {
                        t.set_pressed(code, true);
                        t.set_pressed(code, false);
                    }
                })
            })
            .collect();

        let reader = {
            let t = Arc::clone(&table);
            thread::spawn(move || {
                for _ in 0..toggles {
                    // Every snapshot must be internally consistent.
                    let snap = t.snapshot();
                    assert!(snap.len() <= writers as usize);
                }
            })
        };

        for h in handles {
            h.join().expect("writer thread panicked");
        }
        reader.join().expect("reader thread panicked");

        // Assert – every press was matched by a release
        assert_eq!(table.held_count(), 0);
    }
}
