use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use smallvec::SmallVec;

use padkit_hid::{classify, ElementId};

use crate::backend::{DeviceId, HidBackend, InputSink};
use crate::control::Control;
use crate::dispatch::{lock, DispatchGuard};
use crate::error::{Error, Result};
use crate::listener::GamepadListener;

const UNKNOWN_NAME: &str = "Unknown";

/// One control together with the identity of the element backing it.
/// Routing goes by element identity, never by usage.
struct ControlSlot {
    element: ElementId,
    control: Control,
}

/// One attached gamepad: its classified controls and the listen
/// lifecycle for raw value-changed events.
///
/// Gamepads are constructed by [`crate::GamepadManager`] when a matching
/// raw device appears. The control set is built once at attach time and
/// its kinds and bounds never change afterwards; only values move.
pub struct Gamepad {
    device: DeviceId,
    name: String,
    backend: Arc<dyn HidBackend>,
    controls: Mutex<SmallVec<[ControlSlot; 16]>>,
    listener: Mutex<Option<Arc<dyn GamepadListener>>>,
    listening: AtomicBool,
    detached: AtomicBool,
    guard: DispatchGuard,
}

impl Gamepad {
    pub(crate) fn new(backend: Arc<dyn HidBackend>, device: DeviceId) -> Self {
        let name = backend
            .product_name(device)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let mut slots: SmallVec<[ControlSlot; 16]> = backend
            .elements(device)
            .iter()
            .filter_map(|el| {
                classify(el).map(|c| ControlSlot {
                    element: el.id,
                    control: Control::new(c.kind, 0, c.min, c.max),
                })
            })
            .collect();
        // Classification order: buttons ascending by usage, then dpad,
        // then axes, then sliders. The ABI codes sort exactly this way;
        // the sort is stable so equal kinds keep element-table order.
        slots.sort_by_key(|s| s.control.kind().code());
        Self {
            device,
            name,
            backend,
            controls: Mutex::new(slots),
            listener: Mutex::new(None),
            listening: AtomicBool::new(false),
            detached: AtomicBool::new(false),
            guard: DispatchGuard::new(),
        }
    }

    pub(crate) fn device(&self) -> DeviceId {
        self.device
    }

    /// Product name of the device, or `"Unknown"`. Stable for the
    /// gamepad's lifetime, including after detach.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of all classified controls with their latest values.
    /// Safe to call from any thread.
    pub fn controls(&self) -> Vec<Control> {
        lock(&self.controls).iter().map(|s| s.control).collect()
    }

    /// True between a successful `start_listening` and `stop_listening`.
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Open the raw device and start delivering value changes to the
    /// listener.
    ///
    /// On failure nothing changes: the gamepad is not listening and the
    /// call may be retried. Fails with [`Error::Detached`] once the
    /// device is gone or the owning manager stopped watching.
    pub fn start_listening(
        self: &Arc<Self>,
        listener: Arc<dyn GamepadListener>,
    ) -> Result<()> {
        let mut slot = lock(&self.listener);
        if self.detached.load(Ordering::SeqCst) {
            return Err(Error::Detached);
        }
        if self.listening.load(Ordering::SeqCst) {
            return Err(Error::AlreadyListening);
        }
        self.backend.open(self.device)?;
        let sink: Arc<dyn InputSink> = Arc::new(PadSink {
            pad: Arc::downgrade(self),
        });
        if let Err(e) = self.backend.listen(self.device, sink) {
            self.backend.close(self.device);
            return Err(e);
        }
        *slot = Some(listener);
        self.listening.store(true, Ordering::SeqCst);
        log::debug!("{}: listening", self.name);
        Ok(())
    }

    /// Stop delivering value changes and close the raw device.
    ///
    /// No-op when not listening. Safe to call from inside a
    /// value-changed callback. When called from any other thread it
    /// returns only after an in-flight callback has completed; no
    /// callback is delivered after it returns.
    pub fn stop_listening(&self) {
        if !self.listening.swap(false, Ordering::SeqCst) {
            return;
        }
        self.backend.unlisten(self.device);
        self.backend.close(self.device);
        self.guard.drain();
        lock(&self.listener).take();
        log::debug!("{}: stopped listening", self.name);
    }

    /// Mark the gamepad detached and stop dispatching. Raw resources are
    /// released separately so a detach callback can still observe the
    /// final state. Returns whether the device was open for listening.
    pub(crate) fn quiesce(&self) -> bool {
        self.detached.store(true, Ordering::SeqCst);
        let was_listening = self.listening.swap(false, Ordering::SeqCst);
        self.guard.drain();
        was_listening
    }

    /// Release the raw device after `quiesce`.
    pub(crate) fn release_raw(&self, was_listening: bool) {
        if was_listening {
            self.backend.unlisten(self.device);
        }
        self.backend.close(self.device);
        lock(&self.listener).take();
    }

    /// Raw value-changed handler, invoked in the backend's delivery
    /// context. One listener callback per changed element, in arrival
    /// order, never coalesced.
    fn handle_value(&self, element: ElementId, value: i32) {
        if self.detached.load(Ordering::SeqCst)
            || !self.listening.load(Ordering::SeqCst)
        {
            return;
        }
        let snapshot = {
            let mut slots = lock(&self.controls);
            let Some(slot) = slots.iter_mut().find(|s| s.element == element)
            else {
                // Unsupported element or a report id reused by a noisy
                // device; not an error.
                log::debug!(
                    "{}: ignoring report for unknown element {element}",
                    self.name
                );
                return;
            };
            slot.control.set_value(value);
            slot.control
        };
        if value < snapshot.min_value() || value > snapshot.max_value() {
            // Passed through as-is: clamping would hide device bugs
            // from clients.
            log::warn!(
                "{}: {:?} reported {value} outside [{}, {}]",
                self.name,
                snapshot.kind(),
                snapshot.min_value(),
                snapshot.max_value()
            );
        }
        let Some(listener) = lock(&self.listener).clone() else {
            return;
        };
        self.guard.dispatch(|| {
            if self.listening.load(Ordering::SeqCst) {
                listener.value_changed(self, &snapshot);
            }
        });
    }
}

/// Routes backend input events to the gamepad without keeping it alive.
struct PadSink {
    pad: Weak<Gamepad>,
}

impl InputSink for PadSink {
    fn value_changed(&self, element: ElementId, value: i32) {
        if let Some(pad) = self.pad.upgrade() {
            pad.handle_value(element, value);
        }
    }
}
