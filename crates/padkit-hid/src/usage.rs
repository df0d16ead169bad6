//! Usage page and usage constants from the HID Usage Tables spec 1.0.
//!
//! Only the pages and Generic Desktop usages the classifier and the
//! default device filter consult are listed here.

// Usage pages
pub const PAGE_GENERIC_DESKTOP: u32 = 0x01;
pub const PAGE_SIMULATION_CONTROLS: u32 = 0x02;
pub const PAGE_GAME_CONTROLS: u32 = 0x05;
pub const PAGE_KEYBOARD: u32 = 0x07;
pub const PAGE_LED: u32 = 0x08;
pub const PAGE_BUTTON: u32 = 0x09;
pub const PAGE_CONSUMER: u32 = 0x0C;
pub const PAGE_VENDOR_DEFINED_START: u32 = 0xFF00;

// Generic Desktop (0x01) usages
pub const GD_POINTER: u32 = 0x01;
pub const GD_MOUSE: u32 = 0x02;
pub const GD_JOYSTICK: u32 = 0x04;
pub const GD_GAMEPAD: u32 = 0x05;
pub const GD_KEYBOARD: u32 = 0x06;

pub const GD_X: u32 = 0x30;
pub const GD_Y: u32 = 0x31;
pub const GD_Z: u32 = 0x32;
pub const GD_RX: u32 = 0x33;
pub const GD_RY: u32 = 0x34;
pub const GD_RZ: u32 = 0x35;
pub const GD_SLIDER: u32 = 0x36;
pub const GD_DIAL: u32 = 0x37;
pub const GD_WHEEL: u32 = 0x38;
pub const GD_HAT_SWITCH: u32 = 0x39;
