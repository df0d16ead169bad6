//! Recording listeners shared by the unit tests.

use std::sync::{Arc, Mutex};

use padkit_hid::ControlKind;

use crate::control::Control;
use crate::dispatch::lock;
use crate::gamepad::Gamepad;
use crate::listener::{GamepadListener, ManagerListener};

/// Records every value-changed callback as `(kind, value)`.
pub(crate) struct RecordingPadListener {
    events: Mutex<Vec<(ControlKind, i32)>>,
}

impl RecordingPadListener {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn events(&self) -> Vec<(ControlKind, i32)> {
        lock(&self.events).clone()
    }
}

impl GamepadListener for RecordingPadListener {
    fn value_changed(&self, _gamepad: &Gamepad, control: &Control) {
        lock(&self.events).push((control.kind(), control.value()));
    }
}

/// Calls `stop_listening` from inside its first callback.
pub(crate) struct StopOnFirstEvent {
    seen: Mutex<u32>,
}

impl StopOnFirstEvent {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(0),
        })
    }

    pub(crate) fn seen(&self) -> u32 {
        *lock(&self.seen)
    }
}

impl GamepadListener for StopOnFirstEvent {
    fn value_changed(&self, gamepad: &Gamepad, _control: &Control) {
        *lock(&self.seen) += 1;
        gamepad.stop_listening();
    }
}

/// Records attach/detach callbacks by gamepad name.
pub(crate) struct RecordingManagerListener {
    attached: Mutex<Vec<String>>,
    detached: Mutex<Vec<String>>,
}

impl RecordingManagerListener {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            attached: Mutex::new(Vec::new()),
            detached: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn attached(&self) -> Vec<String> {
        lock(&self.attached).clone()
    }

    pub(crate) fn detached(&self) -> Vec<String> {
        lock(&self.detached).clone()
    }
}

impl ManagerListener for RecordingManagerListener {
    fn gamepad_attached(&self, gamepad: &Arc<Gamepad>) {
        lock(&self.attached).push(gamepad.name().to_string());
    }

    fn gamepad_detached(&self, gamepad: &Arc<Gamepad>) {
        lock(&self.detached).push(gamepad.name().to_string());
    }
}
