//! Attached USB HID gamepads as a normalized control model.
//!
//! A [`GamepadManager`] watches a [`HidBackend`] for matching devices and
//! vends one [`Gamepad`] per attached device. Each gamepad classifies its
//! raw HID elements into [`Control`]s (buttons, dpad, axes, sliders) and,
//! while listening, turns raw value-changed events into synchronous
//! [`GamepadListener`] callbacks. Clients never see a HID report
//! descriptor.
//!
//! The backend is a trait, so the whole pipeline runs against the
//! in-memory [`ScriptedBackend`] in tests and demos without any real
//! device or OS run loop.

mod backend;
mod control;
mod dispatch;
mod error;
mod gamepad;
mod listener;
mod manager;
mod scripted;

#[cfg(test)]
mod testing;

pub use padkit_hid::{
    classify, usage, ClassifiedElement, ControlKind, DpadDirection,
    ElementDescriptor, ElementFlags, ElementId, DPAD_FREE,
};

pub use crate::backend::{DeviceFilter, DeviceId, HidBackend, HotplugSink, InputSink};
pub use crate::control::Control;
pub use crate::error::{Error, Result};
pub use crate::gamepad::Gamepad;
pub use crate::listener::{GamepadListener, ManagerListener};
pub use crate::manager::GamepadManager;
pub use crate::scripted::{ScriptedBackend, ScriptedDevice};
