use crate::element::ElementDescriptor;
use crate::kind::ControlKind;
use crate::usage;

/// Result of classifying one element: its normalized kind and the value
/// bounds the control will advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedElement {
    pub kind: ControlKind,
    pub min: i32,
    pub max: i32,
}

/// Classify a raw HID element into a control kind, if it is one padkit
/// understands.
///
/// Pure function of the descriptor. Returns `None` for anything that is
/// not a gamepad control (vendor pages, LEDs, system keys, buttons above
/// 32, ...); that is not an error, the element is just skipped.
///
/// Bounds come from the element's logical range, with two exceptions:
/// buttons are forced to `[0, 1]` and dpads to `[0, 15]` regardless of
/// what the descriptor claims, to normalize away malformed descriptors.
pub fn classify(element: &ElementDescriptor) -> Option<ClassifiedElement> {
    match element.usage_page {
        usage::PAGE_BUTTON => {
            if (1..=32).contains(&element.usage) {
                Some(ClassifiedElement {
                    kind: ControlKind::Button(element.usage as u8),
                    min: 0,
                    max: 1,
                })
            } else {
                None
            }
        }
        usage::PAGE_GENERIC_DESKTOP => {
            let kind = match element.usage {
                usage::GD_HAT_SWITCH => ControlKind::DPad,
                usage::GD_X => ControlKind::AxisX,
                usage::GD_Y => ControlKind::AxisY,
                usage::GD_Z => ControlKind::AxisZ,
                usage::GD_RX => ControlKind::AxisRx,
                usage::GD_RY => ControlKind::AxisRy,
                usage::GD_RZ => ControlKind::AxisRz,
                usage::GD_SLIDER => ControlKind::Slider,
                _ => return None,
            };
            let (min, max) = match kind {
                ControlKind::DPad => (0, 15),
                _ => (element.logical_min, element.logical_max),
            };
            Some(ClassifiedElement { kind, min, max })
        }
        _ => None,
    }
}
