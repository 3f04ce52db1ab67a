//! Native device backend contract
//!
//! A backend exposes a forest of device references. Composite devices carry
//! sub-devices and no controls of their own; leaves carry an ordered control
//! list and are refreshed with [`DeviceBackend::poll_device`].

use crate::input::controllers::ControllerError;

/// Device category as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Keyboard, never registered as a controller
    Keyboard,
    /// Mouse, never registered as a controller
    Mouse,
    /// Gamepad
    Gamepad,
    /// Joystick or flight stick
    Stick,
    /// Wheel
    Wheel,
    /// A single native device exposing sub-devices
    Composite,
    /// Anything else
    Unknown,
}

impl DeviceType {
    /// Whether devices of this type are excluded from enumeration
    pub const fn is_keyboard_or_mouse(&self) -> bool {
        matches!(self, Self::Keyboard | Self::Mouse)
    }
}

/// Category of one control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Two-state button
    Button,
    /// Analog axis
    Axis,
    /// Point-of-view hat
    Pov,
}

/// One control in enumeration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDescriptor {
    /// Control category
    pub kind: ControlKind,
    /// Human-readable name
    pub name: String,
}

impl ControlDescriptor {
    /// A button descriptor
    pub fn button(name: impl Into<String>) -> Self {
        Self {
            kind: ControlKind::Button,
            name: name.into(),
        }
    }

    /// An axis descriptor
    pub fn axis(name: impl Into<String>) -> Self {
        Self {
            kind: ControlKind::Axis,
            name: name.into(),
        }
    }

    /// A POV hat descriptor
    pub fn pov(name: impl Into<String>) -> Self {
        Self {
            kind: ControlKind::Pov,
            name: name.into(),
        }
    }
}

/// Direction of a POV hat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PovDirection {
    /// Released
    #[default]
    Centered,
    /// Up
    Up,
    /// Up and right
    UpRight,
    /// Right
    Right,
    /// Down and right
    DownRight,
    /// Down
    Down,
    /// Down and left
    DownLeft,
    /// Left
    Left,
    /// Up and left
    UpLeft,
}

impl PovDirection {
    /// Horizontal component: -1 left, 1 right
    pub const fn x(&self) -> f32 {
        match self {
            Self::Left | Self::UpLeft | Self::DownLeft => -1.0,
            Self::Right | Self::UpRight | Self::DownRight => 1.0,
            Self::Centered | Self::Up | Self::Down => 0.0,
        }
    }

    /// Vertical component: -1 up, 1 down
    pub const fn y(&self) -> f32 {
        match self {
            Self::Up | Self::UpLeft | Self::UpRight => -1.0,
            Self::Down | Self::DownLeft | Self::DownRight => 1.0,
            Self::Centered | Self::Left | Self::Right => 0.0,
        }
    }
}

/// Native device enumeration and polling
///
/// Control reads are indexed within their kind: button 1 is the second
/// button, whatever its position in the full control list.
pub trait DeviceBackend {
    /// Backend-specific device reference
    type Device: Clone;

    /// Every top-level device
    ///
    /// [`ControllerError::BackendUnavailable`] means the native library is
    /// missing; any other error is an initialization failure.
    fn enumerate(&mut self) -> Result<Vec<Self::Device>, ControllerError>;

    /// Category of a device
    fn device_type(&self, device: &Self::Device) -> DeviceType;

    /// Sub-devices of a composite device, empty for leaves
    fn sub_devices(&self, device: &Self::Device) -> Vec<Self::Device>;

    /// Display name
    fn name(&self, device: &Self::Device) -> String;

    /// Controls in natural enumeration order
    fn controls(&self, device: &Self::Device) -> Vec<ControlDescriptor>;

    /// Refresh a device's state; `false` when it is gone
    fn poll_device(&mut self, device: &Self::Device) -> bool;

    /// Button state as of the last poll
    fn read_button(&self, device: &Self::Device, index: usize) -> bool;

    /// Raw axis value as of the last poll
    fn read_axis(&self, device: &Self::Device, index: usize) -> f32;

    /// POV direction as of the last poll
    fn read_pov(&self, device: &Self::Device, index: usize) -> PovDirection;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pov_components() {
        assert_eq!((PovDirection::UpLeft.x(), PovDirection::UpLeft.y()), (-1.0, -1.0));
        assert_eq!((PovDirection::Right.x(), PovDirection::Right.y()), (1.0, 0.0));
        assert_eq!((PovDirection::Centered.x(), PovDirection::Centered.y()), (0.0, 0.0));
    }

    #[test]
    fn test_keyboard_and_mouse_excluded() {
        assert!(DeviceType::Keyboard.is_keyboard_or_mouse());
        assert!(DeviceType::Mouse.is_keyboard_or_mouse());
        assert!(!DeviceType::Composite.is_keyboard_or_mouse());
    }
}
