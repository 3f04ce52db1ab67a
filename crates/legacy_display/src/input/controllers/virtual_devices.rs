//! In-memory device backend
//!
//! Devices form a tree: composite devices own children, leaves own controls.
//! Control values are set directly and observed at the next poll.

use crate::input::controllers::backend::{ControlDescriptor, ControlKind, DeviceBackend, DeviceType, PovDirection};
use crate::input::controllers::ControllerError;

#[derive(Debug, Clone)]
struct VirtualNode {
    name: String,
    device_type: DeviceType,
    children: Vec<usize>,
    controls: Vec<ControlDescriptor>,
    buttons: Vec<bool>,
    axes: Vec<f32>,
    povs: Vec<PovDirection>,
    connected: bool,
}

/// Scriptable [`DeviceBackend`]
#[derive(Debug, Clone, Default)]
pub struct VirtualDevices {
    nodes: Vec<VirtualNode>,
    roots: Vec<usize>,
    enumerate_error: Option<ControllerError>,
    polls: usize,
}

impl VirtualDevices {
    /// An empty device tree
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: &str, device_type: DeviceType) -> usize {
        self.nodes.push(VirtualNode {
            name: name.to_string(),
            device_type,
            children: Vec::new(),
            controls: Vec::new(),
            buttons: Vec::new(),
            axes: Vec::new(),
            povs: Vec::new(),
            connected: true,
        });
        self.nodes.len() - 1
    }

    /// Add a top-level device
    pub fn add_device(&mut self, name: &str, device_type: DeviceType) -> usize {
        let id = self.insert(name, device_type);
        self.roots.push(id);
        id
    }

    /// Add a sub-device under `parent`
    pub fn add_child(&mut self, parent: usize, name: &str, device_type: DeviceType) -> usize {
        let id = self.insert(name, device_type);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Append a button control
    pub fn add_button(&mut self, device: usize, name: &str) {
        if let Some(node) = self.nodes.get_mut(device) {
            node.controls.push(ControlDescriptor::button(name));
            node.buttons.push(false);
        }
    }

    /// Append an axis control
    pub fn add_axis(&mut self, device: usize, name: &str) {
        if let Some(node) = self.nodes.get_mut(device) {
            node.controls.push(ControlDescriptor::axis(name));
            node.axes.push(0.0);
        }
    }

    /// Append a POV hat control
    pub fn add_pov(&mut self, device: usize, name: &str) {
        if let Some(node) = self.nodes.get_mut(device) {
            node.controls.push(ControlDescriptor::pov(name));
            node.povs.push(PovDirection::Centered);
        }
    }

    /// Set a button for the next poll
    pub fn set_button(&mut self, device: usize, index: usize, pressed: bool) {
        if let Some(slot) = self.nodes.get_mut(device).and_then(|n| n.buttons.get_mut(index)) {
            *slot = pressed;
        }
    }

    /// Set a raw axis value for the next poll
    pub fn set_axis(&mut self, device: usize, index: usize, value: f32) {
        if let Some(slot) = self.nodes.get_mut(device).and_then(|n| n.axes.get_mut(index)) {
            *slot = value;
        }
    }

    /// Set a POV direction for the next poll
    pub fn set_pov(&mut self, device: usize, index: usize, direction: PovDirection) {
        if let Some(slot) = self.nodes.get_mut(device).and_then(|n| n.povs.get_mut(index)) {
            *slot = direction;
        }
    }

    /// Mark a device as unplugged
    pub fn disconnect(&mut self, device: usize) {
        if let Some(node) = self.nodes.get_mut(device) {
            node.connected = false;
        }
    }

    /// Make enumeration fail with `error` until cleared with `None`
    pub fn fail_enumeration(&mut self, error: Option<ControllerError>) {
        self.enumerate_error = error;
    }

    /// Device polls served so far
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// A gamepad with X and Y axes, `buttons` buttons and one hat
    pub fn add_gamepad(&mut self, name: &str, buttons: usize) -> usize {
        let id = self.add_device(name, DeviceType::Gamepad);
        self.add_axis(id, "X");
        self.add_axis(id, "Y");
        for b in 0..buttons {
            self.add_button(id, &format!("Button {b}"));
        }
        self.add_pov(id, "Hat");
        id
    }
}

impl DeviceBackend for VirtualDevices {
    type Device = usize;

    fn enumerate(&mut self) -> Result<Vec<usize>, ControllerError> {
        match &self.enumerate_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.roots.clone()),
        }
    }

    fn device_type(&self, device: &usize) -> DeviceType {
        self.nodes.get(*device).map_or(DeviceType::Unknown, |n| n.device_type)
    }

    fn sub_devices(&self, device: &usize) -> Vec<usize> {
        self.nodes.get(*device).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn name(&self, device: &usize) -> String {
        self.nodes.get(*device).map(|n| n.name.clone()).unwrap_or_default()
    }

    fn controls(&self, device: &usize) -> Vec<ControlDescriptor> {
        self.nodes.get(*device).map(|n| n.controls.clone()).unwrap_or_default()
    }

    fn poll_device(&mut self, device: &usize) -> bool {
        self.polls += 1;
        self.nodes.get(*device).is_some_and(|n| n.connected)
    }

    fn read_button(&self, device: &usize, index: usize) -> bool {
        self.nodes
            .get(*device)
            .and_then(|n| n.buttons.get(index).copied())
            .unwrap_or(false)
    }

    fn read_axis(&self, device: &usize, index: usize) -> f32 {
        self.nodes
            .get(*device)
            .and_then(|n| n.axes.get(index).copied())
            .unwrap_or(0.0)
    }

    fn read_pov(&self, device: &usize, index: usize) -> PovDirection {
        self.nodes
            .get(*device)
            .and_then(|n| n.povs.get(index).copied())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_structure() {
        let mut devices = VirtualDevices::new();
        let hub = devices.add_device("Hub", DeviceType::Composite);
        let left = devices.add_child(hub, "Left", DeviceType::Stick);
        devices.add_axis(left, "X");
        devices.add_button(left, "Trigger");

        assert_eq!(devices.enumerate().unwrap(), vec![hub]);
        assert_eq!(devices.sub_devices(&hub), vec![left]);
        let kinds: Vec<_> = devices.controls(&left).iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ControlKind::Axis, ControlKind::Button]);
    }

    #[test]
    fn test_values_read_back() {
        let mut devices = VirtualDevices::new();
        let pad = devices.add_gamepad("Pad", 2);
        devices.set_button(pad, 1, true);
        devices.set_axis(pad, 0, -0.5);
        devices.set_pov(pad, 0, PovDirection::Left);

        assert!(devices.poll_device(&pad));
        assert!(devices.read_button(&pad, 1));
        assert!(!devices.read_button(&pad, 0));
        assert!((devices.read_axis(&pad, 0) + 0.5).abs() < f32::EPSILON);
        assert_eq!(devices.read_pov(&pad, 0), PovDirection::Left);

        devices.disconnect(pad);
        assert!(!devices.poll_device(&pad));
    }
}
