use std::sync::{Arc, Mutex, Weak};

use ahash::AHashMap;

use crate::backend::{DeviceFilter, DeviceId, HidBackend, HotplugSink};
use crate::dispatch::{lock, DispatchGuard};
use crate::error::{Error, Result};
use crate::gamepad::Gamepad;
use crate::listener::ManagerListener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    Idle,
    Watching,
    Stopped,
}

/// Shared state reachable from both the manager and the backend's
/// hot-plug callbacks.
struct Inner {
    backend: Arc<dyn HidBackend>,
    filter: DeviceFilter,
    state: Mutex<WatchState>,
    registry: Mutex<AHashMap<DeviceId, Arc<Gamepad>>>,
    listener: Mutex<Option<Arc<dyn ManagerListener>>>,
    guard: DispatchGuard,
}

/// Registry of currently attached gamepads.
///
/// The watch lifecycle is `Idle -> Watching -> Stopped` and never
/// re-enters `Watching`: reusing a torn-down discovery mechanism is
/// undefined territory on most platforms, so a fresh manager must be
/// constructed to watch again.
pub struct GamepadManager {
    inner: Arc<Inner>,
}

impl GamepadManager {
    /// Manager with the default joystick/gamepad matching filter.
    pub fn new(backend: Arc<dyn HidBackend>) -> Self {
        Self::with_filter(backend, DeviceFilter::default())
    }

    /// Manager with a custom matching predicate.
    pub fn with_filter(backend: Arc<dyn HidBackend>, filter: DeviceFilter) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                filter,
                state: Mutex::new(WatchState::Idle),
                registry: Mutex::new(AHashMap::new()),
                listener: Mutex::new(None),
                guard: DispatchGuard::new(),
            }),
        }
    }

    /// Open the discovery watch and synchronously enumerate currently
    /// attached matching devices, firing `gamepad_attached` for each.
    ///
    /// On failure the manager stays `Idle` and the call may be retried.
    pub fn start_watching(&self, listener: Arc<dyn ManagerListener>) -> Result<()> {
        {
            let mut state = lock(&self.inner.state);
            match *state {
                WatchState::Watching => return Err(Error::AlreadyWatching),
                WatchState::Stopped => return Err(Error::WatchStopped),
                WatchState::Idle => {}
            }
            *lock(&self.inner.listener) = Some(listener);
            *state = WatchState::Watching;
        }
        // The watch call runs outside the state lock: a backend may
        // announce already-present devices synchronously from inside
        // it, which re-enters `Inner::attach`.
        let sink: Arc<dyn HotplugSink> = Arc::new(HotplugRouter {
            inner: Arc::downgrade(&self.inner),
        });
        if let Err(e) = self.inner.backend.watch(&self.inner.filter, sink) {
            let mut state = lock(&self.inner.state);
            if *state == WatchState::Watching {
                *state = WatchState::Idle;
                lock(&self.inner.listener).take();
            }
            return Err(e);
        }
        if *lock(&self.inner.state) != WatchState::Watching {
            // stop_watching ran between the state flip and the watch
            // call; it had nothing to unwatch yet.
            self.inner.backend.unwatch();
            return Err(Error::WatchStopped);
        }
        // Initial enumeration also runs unlocked so attach callbacks
        // may call back into the manager.
        for device in self.inner.backend.enumerate(&self.inner.filter) {
            self.inner.attach(device);
        }
        Ok(())
    }

    /// Close the discovery watch.
    ///
    /// Idempotent. After it returns no attach/detach callback is
    /// delivered, and previously vended gamepads remain queryable but
    /// refuse further `start_listening`.
    pub fn stop_watching(&self) {
        {
            let mut state = lock(&self.inner.state);
            if *state != WatchState::Watching {
                return;
            }
            *state = WatchState::Stopped;
        }
        self.inner.backend.unwatch();
        self.inner.guard.drain();
        lock(&self.inner.listener).take();

        let pads: Vec<Arc<Gamepad>> =
            lock(&self.inner.registry).values().cloned().collect();
        for pad in pads {
            let was_listening = pad.quiesce();
            pad.release_raw(was_listening);
        }
        log::debug!("stopped watching");
    }

    /// Snapshot of currently attached gamepads, ordered by raw handle.
    /// Empty before `start_watching`. Safe to call from any thread.
    pub fn gamepads(&self) -> Vec<Arc<Gamepad>> {
        let mut pads: Vec<Arc<Gamepad>> =
            lock(&self.inner.registry).values().cloned().collect();
        pads.sort_by_key(|p| p.device());
        pads
    }
}

impl Drop for GamepadManager {
    fn drop(&mut self) {
        self.stop_watching();
    }
}

impl Inner {
    /// Hot-plug attach handler; also drives the initial enumeration.
    fn attach(&self, device: DeviceId) {
        if *lock(&self.state) != WatchState::Watching {
            return;
        }
        if lock(&self.registry).contains_key(&device) {
            // A backend may announce a device both in enumeration and
            // through the watch; the first one wins.
            return;
        }
        let pad = Arc::new(Gamepad::new(self.backend.clone(), device));
        lock(&self.registry).insert(device, pad.clone());
        log::debug!("attached {} ({device})", pad.name());
        let Some(listener) = lock(&self.listener).clone() else {
            return;
        };
        self.guard.dispatch(|| {
            if *lock(&self.state) == WatchState::Watching {
                listener.gamepad_attached(&pad);
            }
        });
    }

    /// Hot-plug detach handler. The detach callback fires before the
    /// raw resources are released so the listener can still read the
    /// gamepad's final name and control values.
    fn detach(&self, device: DeviceId) {
        let Some(pad) = lock(&self.registry).remove(&device) else {
            return;
        };
        let was_listening = pad.quiesce();
        log::debug!("detached {} ({device})", pad.name());
        if let Some(listener) = lock(&self.listener).clone() {
            self.guard.dispatch(|| {
                if *lock(&self.state) == WatchState::Watching {
                    listener.gamepad_detached(&pad);
                }
            });
        }
        pad.release_raw(was_listening);
    }
}

/// Routes backend hot-plug events to the manager without keeping it
/// alive.
struct HotplugRouter {
    inner: Weak<Inner>,
}

impl HotplugSink for HotplugRouter {
    fn device_attached(&self, device: DeviceId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.attach(device);
        }
    }

    fn device_detached(&self, device: DeviceId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.detach(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{ScriptedBackend, ScriptedDevice};
    use crate::testing::{RecordingManagerListener, RecordingPadListener};
    use padkit_hid::{usage, ControlKind};

    fn gamepad_device(name: &str) -> ScriptedDevice {
        ScriptedDevice::new(name)
            .button(1)
            .button(2)
            .dpad()
            .axis(usage::GD_X, -512, 511)
            .axis(usage::GD_Y, -512, 511)
    }

    #[test]
    fn watching_with_no_devices_yields_an_empty_registry() {
        let backend = Arc::new(ScriptedBackend::new());
        let manager = GamepadManager::new(backend);
        let listener = RecordingManagerListener::new();

        manager.start_watching(listener.clone()).unwrap();
        assert!(manager.gamepads().is_empty());
        assert!(listener.attached().is_empty());
    }

    #[test]
    fn devices_present_before_watching_are_enumerated() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.plug(gamepad_device("Pad 1"));
        let manager = GamepadManager::new(backend);
        let listener = RecordingManagerListener::new();

        manager.start_watching(listener.clone()).unwrap();
        let pads = manager.gamepads();
        assert_eq!(pads.len(), 1);
        assert_eq!(pads[0].name(), "Pad 1");
        assert_eq!(listener.attached(), vec!["Pad 1".to_string()]);
    }

    #[test]
    fn non_matching_devices_are_not_picked_up() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.plug(
            ScriptedDevice::new("Keyboard")
                .with_usage(usage::PAGE_GENERIC_DESKTOP, usage::GD_KEYBOARD),
        );
        let manager = GamepadManager::new(backend.clone());
        manager
            .start_watching(RecordingManagerListener::new())
            .unwrap();
        assert!(manager.gamepads().is_empty());

        // Hot-plugged non-matching devices are filtered by the backend
        // watch as well.
        backend.plug(
            ScriptedDevice::new("Mouse")
                .with_usage(usage::PAGE_GENERIC_DESKTOP, usage::GD_MOUSE),
        );
        assert!(manager.gamepads().is_empty());
    }

    #[test]
    fn hotplug_attach_fires_the_listener_once() {
        let backend = Arc::new(ScriptedBackend::new());
        let manager = GamepadManager::new(backend.clone());
        let listener = RecordingManagerListener::new();
        manager.start_watching(listener.clone()).unwrap();

        backend.plug(gamepad_device("Pad 1"));
        assert_eq!(listener.attached(), vec!["Pad 1".to_string()]);
        assert_eq!(manager.gamepads().len(), 1);
    }

    #[test]
    fn a_repeated_attach_announcement_is_ignored() {
        let backend = Arc::new(ScriptedBackend::new());
        let manager = GamepadManager::new(backend.clone());
        let listener = RecordingManagerListener::new();
        manager.start_watching(listener.clone()).unwrap();

        let id = backend.plug(gamepad_device("Pad 1"));
        backend.announce(id);
        assert_eq!(listener.attached(), vec!["Pad 1".to_string()]);
        assert_eq!(manager.gamepads().len(), 1);
    }

    #[test]
    fn devices_announced_from_inside_watch_are_attached_once() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.announce_on_watch();
        backend.plug(gamepad_device("Pad 1"));
        let manager = GamepadManager::new(backend);
        let listener = RecordingManagerListener::new();

        // The announcement arrives synchronously from inside the watch
        // call; the enumeration that follows sees the device again.
        manager.start_watching(listener.clone()).unwrap();
        assert_eq!(listener.attached(), vec!["Pad 1".to_string()]);
        assert_eq!(manager.gamepads().len(), 1);
    }

    #[test]
    fn start_watching_failure_leaves_the_manager_retryable() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.fail_next_watch();
        let manager = GamepadManager::new(backend);
        let listener = RecordingManagerListener::new();

        assert!(matches!(
            manager.start_watching(listener.clone()),
            Err(Error::Watch(_))
        ));
        assert!(manager.gamepads().is_empty());

        manager.start_watching(listener).unwrap();
    }

    #[test]
    fn a_stopped_manager_never_watches_again() {
        let backend = Arc::new(ScriptedBackend::new());
        let manager = GamepadManager::new(backend);
        manager
            .start_watching(RecordingManagerListener::new())
            .unwrap();
        manager.stop_watching();
        manager.stop_watching(); // second stop is a no-op

        assert!(matches!(
            manager.start_watching(RecordingManagerListener::new()),
            Err(Error::WatchStopped)
        ));
    }

    #[test]
    fn stop_watching_silences_hotplug_and_blocks_listening() {
        let backend = Arc::new(ScriptedBackend::new());
        let manager = GamepadManager::new(backend.clone());
        let listener = RecordingManagerListener::new();
        manager.start_watching(listener.clone()).unwrap();
        backend.plug(gamepad_device("Pad 1"));
        let pad = manager.gamepads().remove(0);

        manager.stop_watching();
        backend.plug(gamepad_device("Pad 2"));
        assert_eq!(listener.attached(), vec!["Pad 1".to_string()]);

        // Still queryable, but listening is over.
        assert_eq!(pad.name(), "Pad 1");
        assert_eq!(pad.controls().len(), 5);
        assert!(matches!(
            pad.start_listening(RecordingPadListener::new()),
            Err(Error::Detached)
        ));
    }

    #[test]
    fn detach_fires_once_and_keeps_final_state_readable() {
        let backend = Arc::new(ScriptedBackend::new());
        let manager = GamepadManager::new(backend.clone());
        let listener = RecordingManagerListener::new();
        manager.start_watching(listener.clone()).unwrap();

        let id = backend.plug(gamepad_device("Pad 1"));
        let pad = manager.gamepads().remove(0);
        let pad_listener = RecordingPadListener::new();
        pad.start_listening(pad_listener.clone()).unwrap();
        backend.deliver(id, 1, 1);

        backend.unplug(id);
        assert_eq!(listener.detached(), vec!["Pad 1".to_string()]);
        assert!(manager.gamepads().is_empty());

        // Last-known state survives the detach.
        assert_eq!(pad.name(), "Pad 1");
        assert_eq!(pad.controls()[0].kind(), ControlKind::Button(1));
        assert_eq!(pad.controls()[0].value(), 1);

        // But the pad is done: no more listening, no more callbacks.
        assert!(matches!(
            pad.start_listening(RecordingPadListener::new()),
            Err(Error::Detached)
        ));
        backend.deliver(id, 1, 0);
        assert_eq!(pad_listener.events().len(), 1);
    }

    #[test]
    fn unplugging_an_unknown_device_is_ignored() {
        let backend = Arc::new(ScriptedBackend::new());
        let manager = GamepadManager::new(backend.clone());
        let listener = RecordingManagerListener::new();
        manager.start_watching(listener.clone()).unwrap();

        backend.unplug(42);
        assert!(listener.detached().is_empty());
    }

    #[test]
    fn gamepads_are_ordered_by_raw_handle() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.plug(gamepad_device("Pad 1"));
        backend.plug(gamepad_device("Pad 2"));
        backend.plug(gamepad_device("Pad 3"));
        let manager = GamepadManager::new(backend);
        manager
            .start_watching(RecordingManagerListener::new())
            .unwrap();

        let names: Vec<String> = manager
            .gamepads()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Pad 1", "Pad 2", "Pad 3"]);
    }
}
