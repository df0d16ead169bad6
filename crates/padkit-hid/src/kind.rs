// DPad values. 0..=7 are the eight compass directions in clockwise order
// starting at "up"; 15 means centered (no direction pressed). Clients
// branch on these literal values, so they are fixed for good.
pub const DPAD_UP: i32 = 0;
pub const DPAD_UP_RIGHT: i32 = 1;
pub const DPAD_RIGHT: i32 = 2;
pub const DPAD_DOWN_RIGHT: i32 = 3;
pub const DPAD_DOWN: i32 = 4;
pub const DPAD_DOWN_LEFT: i32 = 5;
pub const DPAD_LEFT: i32 = 6;
pub const DPAD_UP_LEFT: i32 = 7;
pub const DPAD_FREE: i32 = 15;

/// Normalized kind of a classified control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Numbered button, 1..=32.
    Button(u8),
    /// Hat switch / POV, see the `DPAD_*` constants.
    DPad,
    AxisX,
    AxisY,
    AxisZ,
    AxisRx,
    AxisRy,
    AxisRz,
    Slider,
}

impl ControlKind {
    /// Numeric code of this kind.
    ///
    /// Buttons map to their number (1..=32), the dpad to 1025, the axes
    /// to 1026..=1031 and sliders to 1032. Existing clients switch on
    /// these numbers, so the mapping is part of the ABI.
    pub fn code(self) -> i32 {
        match self {
            Self::Button(n) => i32::from(n),
            Self::DPad => 1025,
            Self::AxisX => 1026,
            Self::AxisY => 1027,
            Self::AxisZ => 1028,
            Self::AxisRx => 1029,
            Self::AxisRy => 1030,
            Self::AxisRz => 1031,
            Self::Slider => 1032,
        }
    }

    /// True for any of the six axis kinds.
    pub fn is_axis(self) -> bool {
        matches!(
            self,
            Self::AxisX
                | Self::AxisY
                | Self::AxisZ
                | Self::AxisRx
                | Self::AxisRy
                | Self::AxisRz
        )
    }
}

/// A dpad direction decoded from a reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpadDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl DpadDirection {
    /// Decode a reported dpad value. Returns `None` for [`DPAD_FREE`]
    /// and for anything outside the 0..=7 direction range.
    pub fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            DPAD_UP => Self::Up,
            DPAD_UP_RIGHT => Self::UpRight,
            DPAD_RIGHT => Self::Right,
            DPAD_DOWN_RIGHT => Self::DownRight,
            DPAD_DOWN => Self::Down,
            DPAD_DOWN_LEFT => Self::DownLeft,
            DPAD_LEFT => Self::Left,
            DPAD_UP_LEFT => Self::UpLeft,
            _ => return None,
        })
    }
}
