use std::sync::{Arc, Mutex};

use ahash::{AHashMap, AHashSet};

use padkit_hid::{usage, ElementDescriptor, ElementId};

use crate::backend::{DeviceFilter, DeviceId, HidBackend, HotplugSink, InputSink};
use crate::dispatch::lock;
use crate::error::{Error, Result};

/// Description of one simulated device for a [`ScriptedBackend`].
///
/// Built with chained helpers; the convenience element builders assign
/// sequential element ids starting at 1, in the order they are called.
pub struct ScriptedDevice {
    name: String,
    usage_page: u32,
    usage: u32,
    elements: Vec<ElementDescriptor>,
    open_fails: bool,
    next_element: ElementId,
}

impl ScriptedDevice {
    /// A device reporting as a Generic Desktop gamepad.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            usage_page: usage::PAGE_GENERIC_DESKTOP,
            usage: usage::GD_GAMEPAD,
            elements: Vec::new(),
            open_fails: false,
            next_element: 1,
        }
    }

    /// Override the product usage the matching filter sees.
    pub fn with_usage(mut self, usage_page: u32, usage: u32) -> Self {
        self.usage_page = usage_page;
        self.usage = usage;
        self
    }

    /// Make `open` fail, simulating a busy or permission-denied device.
    pub fn failing_open(mut self) -> Self {
        self.open_fails = true;
        self
    }

    /// Add a raw element descriptor, keeping the caller's element id.
    pub fn element(mut self, descriptor: ElementDescriptor) -> Self {
        self.elements.push(descriptor);
        self
    }

    /// Add a button element with the given usage.
    pub fn button(mut self, n: u32) -> Self {
        let id = self.next_id();
        self.element(ElementDescriptor::new(id, usage::PAGE_BUTTON, n, 0, 1))
    }

    /// Add a hat-switch element reporting logical 0..=7.
    pub fn dpad(mut self) -> Self {
        let id = self.next_id();
        self.element(ElementDescriptor::new(
            id,
            usage::PAGE_GENERIC_DESKTOP,
            usage::GD_HAT_SWITCH,
            0,
            7,
        ))
    }

    /// Add an axis element for a Generic Desktop usage.
    pub fn axis(mut self, axis_usage: u32, min: i32, max: i32) -> Self {
        let id = self.next_id();
        self.element(ElementDescriptor::new(
            id,
            usage::PAGE_GENERIC_DESKTOP,
            axis_usage,
            min,
            max,
        ))
    }

    /// Add a slider element.
    pub fn slider(mut self, min: i32, max: i32) -> Self {
        let id = self.next_id();
        self.element(ElementDescriptor::new(
            id,
            usage::PAGE_GENERIC_DESKTOP,
            usage::GD_SLIDER,
            min,
            max,
        ))
    }

    fn next_id(&mut self) -> ElementId {
        let id = self.next_element;
        self.next_element += 1;
        id
    }
}

struct State {
    devices: AHashMap<DeviceId, ScriptedDevice>,
    open: AHashSet<DeviceId>,
    hotplug: Option<(DeviceFilter, Arc<dyn HotplugSink>)>,
    inputs: AHashMap<DeviceId, Arc<dyn InputSink>>,
    next_device: DeviceId,
    fail_watch: bool,
    announce_on_watch: bool,
}

/// In-memory [`HidBackend`] driven entirely by the caller.
///
/// Hot-plug and input sinks fire synchronously on the thread calling
/// [`plug`](Self::plug)/[`unplug`](Self::unplug)/
/// [`deliver`](Self::deliver), which makes callback ordering
/// deterministic. Internal locks are released before any sink is
/// invoked, so sink code may call back into the backend.
pub struct ScriptedBackend {
    state: Mutex<State>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                devices: AHashMap::new(),
                open: AHashSet::new(),
                hotplug: None,
                inputs: AHashMap::new(),
                next_device: 1,
                fail_watch: false,
                announce_on_watch: false,
            }),
        }
    }

    /// Make the next `watch` call fail, simulating a discovery
    /// mechanism that cannot be opened.
    pub fn fail_next_watch(&self) {
        lock(&self.state).fail_watch = true;
    }

    /// Make `watch` announce already attached matching devices through
    /// the sink before it returns, as discovery mechanisms that report
    /// present devices on registration do.
    pub fn announce_on_watch(&self) {
        lock(&self.state).announce_on_watch = true;
    }

    /// Clear a device's `failing_open` flag so a retry can succeed.
    pub fn allow_open(&self, device: DeviceId) {
        if let Some(dev) = lock(&self.state).devices.get_mut(&device) {
            dev.open_fails = false;
        }
    }

    /// Attach a device. Fires the hot-plug sink when a watch is open
    /// and the device matches its filter.
    pub fn plug(&self, device: ScriptedDevice) -> DeviceId {
        let (id, sink) = {
            let mut state = lock(&self.state);
            let id = state.next_device;
            state.next_device += 1;
            let matches = state
                .hotplug
                .as_ref()
                .is_some_and(|(f, _)| f.matches(device.usage_page, device.usage));
            state.devices.insert(id, device);
            let sink = if matches {
                state.hotplug.as_ref().map(|(_, s)| s.clone())
            } else {
                None
            };
            (id, sink)
        };
        if let Some(sink) = sink {
            sink.device_attached(id);
        }
        id
    }

    /// Announce an already attached device a second time, as a
    /// discovery mechanism that reports the same device both in
    /// enumeration and through its watch would. Dropped when no watch
    /// is open or the device does not match its filter.
    pub fn announce(&self, device: DeviceId) {
        let sink = {
            let state = lock(&self.state);
            let Some(dev) = state.devices.get(&device) else {
                return;
            };
            state
                .hotplug
                .as_ref()
                .filter(|(f, _)| f.matches(dev.usage_page, dev.usage))
                .map(|(_, s)| s.clone())
        };
        if let Some(sink) = sink {
            sink.device_attached(device);
        }
    }

    /// Detach a device. The hot-plug sink fires after the backend has
    /// forgotten the device, like a real hot-unplug; late `unlisten`/
    /// `close` calls for it are ignored.
    pub fn unplug(&self, device: DeviceId) {
        let sink = {
            let mut state = lock(&self.state);
            let Some(gone) = state.devices.remove(&device) else {
                return;
            };
            state.open.remove(&device);
            state.inputs.remove(&device);
            state
                .hotplug
                .as_ref()
                .filter(|(f, _)| f.matches(gone.usage_page, gone.usage))
                .map(|(_, s)| s.clone())
        };
        if let Some(sink) = sink {
            sink.device_detached(device);
        }
    }

    /// Deliver a raw value-changed report. Dropped when nobody is
    /// listening on the device.
    pub fn deliver(&self, device: DeviceId, element: ElementId, value: i32) {
        let sink = lock(&self.state).inputs.get(&device).cloned();
        if let Some(sink) = sink {
            sink.value_changed(element, value);
        }
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HidBackend for ScriptedBackend {
    fn enumerate(&self, filter: &DeviceFilter) -> Vec<DeviceId> {
        let state = lock(&self.state);
        let mut ids: Vec<DeviceId> = state
            .devices
            .iter()
            .filter(|(_, d)| filter.matches(d.usage_page, d.usage))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn product_name(&self, device: DeviceId) -> Option<String> {
        lock(&self.state).devices.get(&device).map(|d| d.name.clone())
    }

    fn elements(&self, device: DeviceId) -> Vec<ElementDescriptor> {
        lock(&self.state)
            .devices
            .get(&device)
            .map(|d| d.elements.clone())
            .unwrap_or_default()
    }

    fn open(&self, device: DeviceId) -> Result<()> {
        let mut state = lock(&self.state);
        match state.devices.get(&device) {
            None => Err(Error::Open(format!("no such device: {device}"))),
            Some(d) if d.open_fails => {
                Err(Error::Open(format!("device is busy: {device}")))
            }
            Some(_) => {
                state.open.insert(device);
                Ok(())
            }
        }
    }

    fn close(&self, device: DeviceId) {
        lock(&self.state).open.remove(&device);
    }

    fn watch(&self, filter: &DeviceFilter, sink: Arc<dyn HotplugSink>) -> Result<()> {
        let announced = {
            let mut state = lock(&self.state);
            if state.fail_watch {
                state.fail_watch = false;
                return Err(Error::Watch("discovery unavailable".to_string()));
            }
            if state.hotplug.is_some() {
                return Err(Error::Watch("already watching".to_string()));
            }
            state.hotplug = Some((filter.clone(), sink.clone()));
            if state.announce_on_watch {
                let mut ids: Vec<DeviceId> = state
                    .devices
                    .iter()
                    .filter(|(_, d)| filter.matches(d.usage_page, d.usage))
                    .map(|(id, _)| *id)
                    .collect();
                ids.sort_unstable();
                ids
            } else {
                Vec::new()
            }
        };
        for id in announced {
            sink.device_attached(id);
        }
        Ok(())
    }

    fn unwatch(&self) {
        lock(&self.state).hotplug = None;
    }

    fn listen(&self, device: DeviceId, sink: Arc<dyn InputSink>) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.open.contains(&device) {
            return Err(Error::Open(format!("device not open: {device}")));
        }
        state.inputs.insert(device, sink);
        Ok(())
    }

    fn unlisten(&self, device: DeviceId) {
        lock(&self.state).inputs.remove(&device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_honors_the_filter() {
        let backend = ScriptedBackend::new();
        let pad = backend.plug(ScriptedDevice::new("Pad"));
        backend.plug(
            ScriptedDevice::new("Mouse")
                .with_usage(usage::PAGE_GENERIC_DESKTOP, usage::GD_MOUSE),
        );
        let joystick = backend.plug(
            ScriptedDevice::new("Stick")
                .with_usage(usage::PAGE_GENERIC_DESKTOP, usage::GD_JOYSTICK),
        );

        assert_eq!(
            backend.enumerate(&DeviceFilter::default()),
            vec![pad, joystick]
        );
    }

    #[test]
    fn listen_requires_an_open_device() {
        struct NullSink;
        impl InputSink for NullSink {
            fn value_changed(&self, _element: ElementId, _value: i32) {}
        }

        let backend = ScriptedBackend::new();
        let id = backend.plug(ScriptedDevice::new("Pad").button(1));
        assert!(matches!(
            backend.listen(id, Arc::new(NullSink)),
            Err(Error::Open(_))
        ));
        backend.open(id).unwrap();
        backend.listen(id, Arc::new(NullSink)).unwrap();
    }

    #[test]
    fn announce_is_dropped_without_a_watch() {
        let backend = ScriptedBackend::new();
        let id = backend.plug(ScriptedDevice::new("Pad").button(1));
        // No watch open; must not panic.
        backend.announce(id);
        backend.announce(id + 7);
    }

    #[test]
    fn delivery_to_an_unlistened_device_is_dropped() {
        let backend = ScriptedBackend::new();
        let id = backend.plug(ScriptedDevice::new("Pad").button(1));
        // No listener registered; must not panic.
        backend.deliver(id, 1, 1);
        backend.deliver(id + 7, 1, 1);
    }
}
