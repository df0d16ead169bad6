use std::sync::Arc;

use crate::control::Control;
use crate::gamepad::Gamepad;

/// Receives per-control value changes from a gamepad.
///
/// Callbacks run synchronously in the backend's delivery context, one
/// call per changed element, in arrival order. Implementations needing
/// mutable state use interior mutability; they may call back into the
/// gamepad (including `stop_listening`) from inside the callback.
pub trait GamepadListener: Send + Sync {
    fn value_changed(&self, gamepad: &Gamepad, control: &Control);
}

/// Receives attach/detach notifications from a manager.
///
/// `gamepad_detached` fires before the raw device resources are
/// released, so the gamepad's final name and control values are still
/// readable from inside the callback.
pub trait ManagerListener: Send + Sync {
    fn gamepad_attached(&self, gamepad: &Arc<Gamepad>);
    fn gamepad_detached(&self, gamepad: &Arc<Gamepad>);
}
