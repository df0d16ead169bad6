/// Identity of a HID element within its device.
///
/// Identity is distinct from usage: two elements of one device may report
/// the same usage (a noisy descriptor can list a usage twice), so value
/// routing always goes by element id, never by usage.
pub type ElementId = u32;

/// Descriptor flags reported for an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementFlags {
    pub is_virtual: bool,
    pub relative: bool,
    pub wrapping: bool,
    pub nonlinear: bool,
    pub array: bool,
    pub preferred_state: bool,
    pub null_state: bool,
}

/// One discrete, independently reported input dimension of a HID device,
/// as described by its report descriptor.
///
/// Descriptors are read-only input to classification; padkit never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDescriptor {
    pub id: ElementId,
    pub usage_page: u32,
    pub usage: u32,
    pub logical_min: i32,
    pub logical_max: i32,
    pub physical_min: i32,
    pub physical_max: i32,
    pub report_id: u32,
    pub report_size: u32,
    pub report_count: u32,
    pub flags: ElementFlags,
}

impl ElementDescriptor {
    /// A descriptor with the given identity, usage and logical range and
    /// everything else zeroed. Handy for tests and simple backends.
    pub fn new(
        id: ElementId,
        usage_page: u32,
        usage: u32,
        logical_min: i32,
        logical_max: i32,
    ) -> Self {
        Self {
            id,
            usage_page,
            usage,
            logical_min,
            logical_max,
            physical_min: logical_min,
            physical_max: logical_max,
            report_id: 0,
            report_size: 0,
            report_count: 0,
            flags: ElementFlags::default(),
        }
    }
}
