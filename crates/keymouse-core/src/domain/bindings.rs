//! Static scan-code binding tables.
//!
//! A binding table maps scan codes to the three pointer roles: direction
//! keys contribute a signed acceleration impulse on one axis, scroll keys
//! contribute a ±1 wheel impulse, and button keys map to a pointer button.
//! The table is fixed at construction; there is no runtime rebinding and
//! bindings are never persisted.

use thiserror::Error;

/// Numeric identifier for a physical key, independent of layout.
///
/// Opaque to the engine: scan codes are only ever compared for equality.
pub type ScanCode = u16;

/// The two relative axes of the virtual pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// A direction key: while held, it accelerates the pointer along `axis`
/// with the given sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionBinding {
    pub code: ScanCode,
    pub axis: Axis,
    /// +1 or -1; positive X is rightward, positive Y is downward.
    pub sign: i8,
}

/// A scroll key: while held, it contributes `sign` wheel units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollBinding {
    pub code: ScanCode,
    pub sign: i8,
}

/// A button key: pressing and releasing it presses and releases `button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    pub code: ScanCode,
    pub button: PointerButton,
}

/// Errors raised when assembling a binding table.
#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    /// The same scan code appears in more than one table entry.
    #[error("scan code {0} is bound more than once")]
    DuplicateCode(ScanCode),
}

/// The full static mapping: four directions, two scroll directions, three
/// buttons.
///
/// Entry counts are small enough that lookups are linear scans over arrays;
/// the integrator performs at most nine comparisons per tick per held key.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTable {
    directions: [DirectionBinding; 4],
    scrolls: [ScrollBinding; 2],
    buttons: [ButtonBinding; 3],
}

impl BindingTable {
    /// Builds a table, rejecting any scan code bound to more than one role.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::DuplicateCode`] naming the first duplicated
    /// code encountered.
    pub fn new(
        directions: [DirectionBinding; 4],
        scrolls: [ScrollBinding; 2],
        buttons: [ButtonBinding; 3],
    ) -> Result<Self, BindingError> {
        let mut seen: Vec<ScanCode> = Vec::with_capacity(9);
        let all = directions
            .iter()
            .map(|d| d.code)
            .chain(scrolls.iter().map(|s| s.code))
            .chain(buttons.iter().map(|b| b.code));
        for code in all {
            if seen.contains(&code) {
                return Err(BindingError::DuplicateCode(code));
            }
            seen.push(code);
        }
        Ok(Self {
            directions,
            scrolls,
            buttons,
        })
    }

    /// The reference numpad layout: KP8/KP5/KP4/KP6 move, KP+ and Backspace
    /// scroll, KP0/KP-Enter/KP-Dot click left/right/middle.
    pub fn numpad() -> Self {
        // The entry sets are disjoint by construction, so new() cannot fail.
        Self::new(
            [
                DirectionBinding { code: 72, axis: Axis::Y, sign: -1 }, // KP8, up
                DirectionBinding { code: 76, axis: Axis::Y, sign: 1 },  // KP5, down
                DirectionBinding { code: 75, axis: Axis::X, sign: -1 }, // KP4, left
                DirectionBinding { code: 77, axis: Axis::X, sign: 1 },  // KP6, right
            ],
            [
                ScrollBinding { code: 78, sign: 1 },  // KP+, scroll up
                ScrollBinding { code: 14, sign: -1 }, // Backspace, scroll down
            ],
            [
                ButtonBinding { code: 82, button: PointerButton::Left },   // KP0
                ButtonBinding { code: 96, button: PointerButton::Right },  // KP Enter
                ButtonBinding { code: 83, button: PointerButton::Middle }, // KP.
            ],
        )
        .expect("numpad layout has disjoint scan codes")
    }

    /// Looks up the direction binding for `code`, if any.
    pub fn direction(&self, code: ScanCode) -> Option<&DirectionBinding> {
        self.directions.iter().find(|d| d.code == code)
    }

    /// Looks up the scroll sign for `code`, if any.
    pub fn scroll(&self, code: ScanCode) -> Option<i8> {
        self.scrolls.iter().find(|s| s.code == code).map(|s| s.sign)
    }

    /// Looks up the pointer button for `code`, if any.
    pub fn button(&self, code: ScanCode) -> Option<PointerButton> {
        self.buttons
            .iter()
            .find(|b| b.code == code)
            .map(|b| b.button)
    }

    /// Iterates the direction bindings (used by the integrator each tick).
    pub fn directions(&self) -> impl Iterator<Item = &DirectionBinding> {
        self.directions.iter()
    }

    /// Iterates the scroll bindings.
    pub fn scrolls(&self) -> impl Iterator<Item = &ScrollBinding> {
        self.scrolls.iter()
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::numpad()
    }
}
