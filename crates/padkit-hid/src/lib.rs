//! HID element classification for gamepads and joysticks.
//!
//! Turns raw HID element descriptors (usage page, usage, logical range)
//! into the normalized control kinds the rest of padkit works with. The
//! classifier is a pure function of the descriptor and never fails: an
//! element it does not recognize is simply not a control.

mod classify;
mod element;
mod kind;

pub mod usage;

pub use classify::{classify, ClassifiedElement};
pub use element::{ElementDescriptor, ElementFlags, ElementId};
pub use kind::{
    ControlKind, DpadDirection, DPAD_DOWN, DPAD_DOWN_LEFT, DPAD_DOWN_RIGHT,
    DPAD_FREE, DPAD_LEFT, DPAD_RIGHT, DPAD_UP, DPAD_UP_LEFT, DPAD_UP_RIGHT,
};
