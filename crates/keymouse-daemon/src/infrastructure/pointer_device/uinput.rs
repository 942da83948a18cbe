//! Linux uinput implementation of the virtual pointer.
//!
//! Creates a synthetic pointer with exactly the capabilities the engine
//! needs: two relative axes, one wheel axis, and three buttons. Each
//! [`PointerSink`] call emits its events plus an explicit `SYN_REPORT`
//! in a single `emit`, guarded by the device mutex — that batch is the
//! atomic command+commit unit the engine relies on.
//!
//! The kernel device node is removed automatically when the
//! `VirtualDevice` is dropped, so there is no manual destroy path.

use std::sync::Mutex;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
};
use keymouse_core::PointerButton;
use tracing::{debug, info};

use super::{PointerSink, SinkError};

/// Name the synthetic device registers under `/sys/class/input`.
const DEVICE_NAME: &str = "KeyMouse Virtual Pointer";

/// The uinput-backed pointer sink.
pub struct UinputPointer {
    device: Mutex<VirtualDevice>,
}

impl UinputPointer {
    /// Creates the virtual pointer device.
    ///
    /// Must run while the process can open `/dev/uinput` (inside the
    /// privilege window at startup).
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Create`] when the uinput device cannot be
    /// registered.
    pub fn create() -> Result<Self, SinkError> {
        let keys = AttributeSet::from_iter([Key::BTN_LEFT, Key::BTN_RIGHT, Key::BTN_MIDDLE]);
        let axes = AttributeSet::from_iter([
            RelativeAxisType::REL_X,
            RelativeAxisType::REL_Y,
            // The wheel axis also convinces libinput this is a mouse.
            RelativeAxisType::REL_WHEEL,
        ]);

        let device = VirtualDeviceBuilder::new()
            .map_err(SinkError::Create)?
            .name(DEVICE_NAME)
            .with_keys(&keys)
            .map_err(SinkError::Create)?
            .with_relative_axes(&axes)
            .map_err(SinkError::Create)?
            .build()
            .map_err(SinkError::Create)?;

        info!(name = DEVICE_NAME, "virtual pointer created");
        Ok(Self {
            device: Mutex::new(device),
        })
    }

    /// One atomic batch: events followed by the commit marker.
    fn emit_batch(&self, events: &[InputEvent]) -> Result<(), SinkError> {
        let mut device = self.device.lock().expect("pointer device lock poisoned");
        device.emit(events)?;
        Ok(())
    }
}

fn syn() -> InputEvent {
    InputEvent::new(EventType::SYNCHRONIZATION, 0, 0)
}

fn button_code(button: PointerButton) -> u16 {
    match button {
        PointerButton::Left => Key::BTN_LEFT.code(),
        PointerButton::Right => Key::BTN_RIGHT.code(),
        PointerButton::Middle => Key::BTN_MIDDLE.code(),
    }
}

impl PointerSink for UinputPointer {
    fn move_rel(&self, dx: i32, dy: i32) -> Result<(), SinkError> {
        self.emit_batch(&[
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, dx),
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, dy),
            syn(),
        ])
    }

    fn scroll(&self, delta: i32) -> Result<(), SinkError> {
        self.emit_batch(&[
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_WHEEL.0, delta),
            syn(),
        ])
    }

    fn set_button(&self, button: PointerButton, pressed: bool) -> Result<(), SinkError> {
        debug!(?button, pressed, "button change");
        self.emit_batch(&[
            InputEvent::new(EventType::KEY, button_code(button), i32::from(pressed)),
            syn(),
        ])
    }
}
