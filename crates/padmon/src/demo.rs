use std::sync::Arc;

use padkit_gamepad::{usage, DeviceId, ScriptedBackend, ScriptedDevice, DPAD_FREE};

// Element ids follow the builder order below.
const BUTTONS: u32 = 4;
const EL_DPAD: u32 = 5;
const EL_X: u32 = 6;
const EL_Y: u32 = 7;
const EL_SLIDER: u32 = 8;

pub(crate) fn demo_device() -> ScriptedDevice {
    ScriptedDevice::new("Padkit Demo Pad")
        .button(1)
        .button(2)
        .button(3)
        .button(4)
        .dpad()
        .axis(usage::GD_X, -512, 511)
        .axis(usage::GD_Y, -512, 511)
        .slider(0, 255)
}

/// Feeds the scripted demo device one batch of reports per tick:
/// buttons press and release in rotation, the dpad walks the compass
/// and returns to center, the sticks sweep, the slider ramps.
pub(crate) struct DemoDriver {
    backend: Arc<ScriptedBackend>,
    device: DeviceId,
    step: u32,
}

impl DemoDriver {
    pub(crate) fn new(backend: Arc<ScriptedBackend>, device: DeviceId) -> Self {
        Self {
            backend,
            device,
            step: 0,
        }
    }

    pub(crate) fn tick(&mut self) {
        let step = self.step;
        self.step = self.step.wrapping_add(1);

        let button = 1 + (step / 2) % BUTTONS;
        let pressed = i32::from(step % 2 == 0);
        self.backend.deliver(self.device, button, pressed);

        let hat = step % 9;
        let hat_value = if hat == 8 { DPAD_FREE } else { hat as i32 };
        self.backend.deliver(self.device, EL_DPAD, hat_value);

        self.backend.deliver(self.device, EL_X, triangle(step, -512, 511));
        self.backend
            .deliver(self.device, EL_Y, triangle(step.wrapping_add(8), -512, 511));
        self.backend
            .deliver(self.device, EL_SLIDER, ((step * 16) % 256) as i32);
    }
}

/// Triangle wave between min and max with a period of 32 steps.
fn triangle(step: u32, min: i32, max: i32) -> i32 {
    let span = max - min;
    let phase = (step % 32) as i32;
    if phase < 16 {
        min + span * phase / 16
    } else {
        max - span * (phase - 16) / 16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_stays_within_bounds() {
        for step in 0..128 {
            let v = triangle(step, -512, 511);
            assert!((-512..=511).contains(&v));
        }
    }
}
