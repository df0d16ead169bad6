use std::sync::Arc;

use padkit_hid::{usage, ElementDescriptor, ElementId};

use crate::error::Result;

/// Opaque handle to a raw device, assigned by the backend.
pub type DeviceId = u32;

/// Predicate deciding which raw devices count as gamepads.
///
/// A device matches when its product usage equals any of the listed
/// `(usage page, usage)` pairs. The default matches the Generic Desktop
/// joystick and gamepad classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    usages: Vec<(u32, u32)>,
}

impl DeviceFilter {
    pub fn new(usages: Vec<(u32, u32)>) -> Self {
        Self { usages }
    }

    /// True when a device with the given product usage matches.
    pub fn matches(&self, usage_page: u32, usage: u32) -> bool {
        self.usages.iter().any(|&(p, u)| p == usage_page && u == usage)
    }
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self::new(vec![
            (usage::PAGE_GENERIC_DESKTOP, usage::GD_JOYSTICK),
            (usage::PAGE_GENERIC_DESKTOP, usage::GD_GAMEPAD),
        ])
    }
}

/// Receives hot-plug notifications from a backend while a watch is open.
pub trait HotplugSink: Send + Sync {
    fn device_attached(&self, device: DeviceId);
    fn device_detached(&self, device: DeviceId);
}

/// Receives raw value-changed events for one device while it is open
/// for listening.
pub trait InputSink: Send + Sync {
    fn value_changed(&self, element: ElementId, value: i32);
}

/// The raw HID collaborator: enumeration, element descriptors, open and
/// close, and callback registration for hot-plug and input reports.
///
/// All methods take `&self`; implementations use interior mutability.
/// Sinks are invoked on whatever thread the backend delivers events on,
/// and an implementation must not hold its own locks while invoking a
/// sink, so that sink code may call back into the backend. After
/// `unwatch`/`unlisten` return the backend must deliver no further calls
/// to the corresponding sink.
pub trait HidBackend: Send + Sync {
    /// Synchronously list currently attached devices matching the filter.
    fn enumerate(&self, filter: &DeviceFilter) -> Vec<DeviceId>;

    /// Vendor-supplied product string, if the device reports one.
    fn product_name(&self, device: DeviceId) -> Option<String>;

    /// Element descriptors of the device's input report layout.
    fn elements(&self, device: DeviceId) -> Vec<ElementDescriptor>;

    /// Open the device's input-report channel.
    fn open(&self, device: DeviceId) -> Result<()>;

    /// Close the device. Unknown or already-closed devices are ignored.
    fn close(&self, device: DeviceId);

    /// Open the discovery watch and register for hot-plug events. An
    /// implementation may announce already-attached matching devices
    /// through the sink before returning; callers must tolerate seeing
    /// the same device here and in `enumerate`.
    fn watch(&self, filter: &DeviceFilter, sink: Arc<dyn HotplugSink>) -> Result<()>;

    /// Close the discovery watch. No-op when not watching.
    fn unwatch(&self);

    /// Register for value-changed events of an open device.
    fn listen(&self, device: DeviceId, sink: Arc<dyn InputSink>) -> Result<()>;

    /// Unregister the device's input sink. Unknown devices are ignored.
    fn unlisten(&self, device: DeviceId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_matches_joysticks_and_gamepads() {
        let filter = DeviceFilter::default();
        assert!(filter.matches(usage::PAGE_GENERIC_DESKTOP, usage::GD_JOYSTICK));
        assert!(filter.matches(usage::PAGE_GENERIC_DESKTOP, usage::GD_GAMEPAD));
        assert!(!filter.matches(usage::PAGE_GENERIC_DESKTOP, usage::GD_MOUSE));
        assert!(!filter.matches(usage::PAGE_BUTTON, usage::GD_GAMEPAD));
    }
}
