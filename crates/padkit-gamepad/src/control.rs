use padkit_hid::ControlKind;

/// Read-only view of one classified control.
///
/// `Control` is a value snapshot: [`crate::Gamepad::controls`] and the
/// value-changed callback hand out fresh copies, so clients can never
/// mutate the gamepad's internal state through one. Only the owning
/// gamepad updates values, and only when a report arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    kind: ControlKind,
    value: i32,
    min: i32,
    max: i32,
}

impl Control {
    pub(crate) fn new(kind: ControlKind, value: i32, min: i32, max: i32) -> Self {
        Self {
            kind,
            value,
            min,
            max,
        }
    }

    pub(crate) fn set_value(&mut self, value: i32) {
        self.value = value;
    }

    /// Kind of this control.
    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    /// Latest reported value. Zero before the first report arrives.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Minimum supported value, fixed at classification time.
    pub fn min_value(&self) -> i32 {
        self.min
    }

    /// Maximum supported value, fixed at classification time.
    pub fn max_value(&self) -> i32 {
        self.max
    }
}
