//! Device backend over the GLFW joystick slots
//!
//! GLFW reports neither keyboards nor mice and has no composite devices, so
//! every present slot is a leaf. Controls are ordered buttons, then axes,
//! then hats; axis 0 is X and axis 1 is Y.

use std::collections::HashMap;

use glfw::{JoystickHats, JoystickId};
use log::debug;

use crate::input::controllers::backend::{ControlDescriptor, DeviceBackend, DeviceType, PovDirection};
use crate::input::controllers::ControllerError;

const JOYSTICK_SLOTS: i32 = 16;

#[derive(Debug, Default)]
struct Snapshot {
    buttons: Vec<bool>,
    axes: Vec<f32>,
    hats: Vec<PovDirection>,
}

/// GLFW joystick [`DeviceBackend`]
pub struct GlfwJoysticks {
    glfw: glfw::Glfw,
    snapshots: HashMap<JoystickId, Snapshot>,
}

impl GlfwJoysticks {
    /// Use an existing GLFW handle, typically from the window system
    pub fn new(glfw: glfw::Glfw) -> Self {
        Self {
            glfw,
            snapshots: HashMap::new(),
        }
    }

    /// Initialize GLFW just for joystick access
    pub fn init() -> Result<Self, ControllerError> {
        let glfw = glfw::init(glfw::log_errors)
            .map_err(|e| ControllerError::BackendUnavailable(format!("GLFW unavailable: {e:?}")))?;
        Ok(Self::new(glfw))
    }
}

impl std::fmt::Debug for GlfwJoysticks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlfwJoysticks")
            .field("polled", &self.snapshots.len())
            .finish_non_exhaustive()
    }
}

fn to_pov(hats: JoystickHats) -> PovDirection {
    let up = hats.contains(JoystickHats::Up);
    let down = hats.contains(JoystickHats::Down);
    let left = hats.contains(JoystickHats::Left);
    let right = hats.contains(JoystickHats::Right);
    match (up, down, left, right) {
        (true, false, true, false) => PovDirection::UpLeft,
        (true, false, false, true) => PovDirection::UpRight,
        (true, false, _, _) => PovDirection::Up,
        (false, true, true, false) => PovDirection::DownLeft,
        (false, true, false, true) => PovDirection::DownRight,
        (false, true, _, _) => PovDirection::Down,
        (_, _, true, false) => PovDirection::Left,
        (_, _, false, true) => PovDirection::Right,
        _ => PovDirection::Centered,
    }
}

fn axis_name(index: usize) -> String {
    match index {
        0 => "X".to_string(),
        1 => "Y".to_string(),
        n => format!("Axis {n}"),
    }
}

impl DeviceBackend for GlfwJoysticks {
    type Device = JoystickId;

    fn enumerate(&mut self) -> Result<Vec<JoystickId>, ControllerError> {
        let present: Vec<_> = (0..JOYSTICK_SLOTS)
            .filter_map(JoystickId::from_i32)
            .filter(|id| self.glfw.get_joystick(*id).is_present())
            .collect();
        debug!("{} joystick slot(s) in use", present.len());
        Ok(present)
    }

    fn device_type(&self, device: &JoystickId) -> DeviceType {
        if self.glfw.get_joystick(*device).is_gamepad() {
            DeviceType::Gamepad
        } else {
            DeviceType::Stick
        }
    }

    fn sub_devices(&self, _device: &JoystickId) -> Vec<JoystickId> {
        Vec::new()
    }

    fn name(&self, device: &JoystickId) -> String {
        self.glfw
            .get_joystick(*device)
            .get_name()
            .unwrap_or_else(|| format!("Joystick {}", *device as i32))
    }

    fn controls(&self, device: &JoystickId) -> Vec<ControlDescriptor> {
        let joystick = self.glfw.get_joystick(*device);
        let buttons = joystick.get_buttons().len();
        let axes = joystick.get_axes().len();
        let hats = joystick.get_hats().len();

        (0..buttons)
            .map(|b| ControlDescriptor::button(format!("Button {b}")))
            .chain((0..axes).map(|a| ControlDescriptor::axis(axis_name(a))))
            .chain((0..hats).map(|h| ControlDescriptor::pov(format!("Hat {h}"))))
            .collect()
    }

    fn poll_device(&mut self, device: &JoystickId) -> bool {
        let joystick = self.glfw.get_joystick(*device);
        if !joystick.is_present() {
            self.snapshots.remove(device);
            return false;
        }
        let snapshot = Snapshot {
            buttons: joystick.get_buttons().iter().map(|state| *state != 0).collect(),
            axes: joystick.get_axes(),
            hats: joystick.get_hats().into_iter().map(to_pov).collect(),
        };
        self.snapshots.insert(*device, snapshot);
        true
    }

    fn read_button(&self, device: &JoystickId, index: usize) -> bool {
        self.snapshots
            .get(device)
            .and_then(|s| s.buttons.get(index).copied())
            .unwrap_or(false)
    }

    fn read_axis(&self, device: &JoystickId, index: usize) -> f32 {
        self.snapshots
            .get(device)
            .and_then(|s| s.axes.get(index).copied())
            .unwrap_or(0.0)
    }

    fn read_pov(&self, device: &JoystickId, index: usize) -> PovDirection {
        self.snapshots
            .get(device)
            .and_then(|s| s.hats.get(index).copied())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hat_bits_to_direction() {
        assert_eq!(to_pov(JoystickHats::Up | JoystickHats::Right), PovDirection::UpRight);
        assert_eq!(to_pov(JoystickHats::Down), PovDirection::Down);
        assert_eq!(to_pov(JoystickHats::Left), PovDirection::Left);
        assert_eq!(to_pov(JoystickHats::Centered), PovDirection::Centered);
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(axis_name(0), "X");
        assert_eq!(axis_name(1), "Y");
        assert_eq!(axis_name(4), "Axis 4");
    }
}
