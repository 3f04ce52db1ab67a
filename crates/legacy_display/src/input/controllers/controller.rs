//! One enumerated leaf device and its last-known control state

use crate::input::controllers::backend::{ControlDescriptor, ControlKind, DeviceBackend, PovDirection};
use crate::input::controllers::event::{ControllerEvent, EventKind};

/// A registered leaf device
///
/// Axis values are normalised against the largest magnitude seen so far on
/// that axis (never below 1.0), then filtered through the axis dead zone.
#[derive(Debug, Clone)]
pub struct Controller<D> {
    index: usize,
    name: String,
    device: D,
    layout: Vec<(ControlKind, usize)>,
    button_names: Vec<String>,
    axis_names: Vec<String>,
    pov_names: Vec<String>,
    buttons: Vec<bool>,
    axes: Vec<f32>,
    axis_max: Vec<f32>,
    dead_zones: Vec<f32>,
    povs: Vec<PovDirection>,
    x_axis: Option<usize>,
    y_axis: Option<usize>,
}

impl<D: Clone> Controller<D> {
    pub(crate) fn new(index: usize, name: String, device: D, controls: &[ControlDescriptor], dead_zone: f32) -> Self {
        let mut controller = Self {
            index,
            name,
            device,
            layout: Vec::with_capacity(controls.len()),
            button_names: Vec::new(),
            axis_names: Vec::new(),
            pov_names: Vec::new(),
            buttons: Vec::new(),
            axes: Vec::new(),
            axis_max: Vec::new(),
            dead_zones: Vec::new(),
            povs: Vec::new(),
            x_axis: None,
            y_axis: None,
        };
        for control in controls {
            let slot = match control.kind {
                ControlKind::Button => {
                    controller.button_names.push(control.name.clone());
                    controller.buttons.push(false);
                    controller.buttons.len() - 1
                }
                ControlKind::Axis => {
                    controller.axis_names.push(control.name.clone());
                    controller.axes.push(0.0);
                    controller.axis_max.push(1.0);
                    controller.dead_zones.push(dead_zone);
                    controller.axes.len() - 1
                }
                ControlKind::Pov => {
                    controller.pov_names.push(control.name.clone());
                    controller.povs.push(PovDirection::Centered);
                    controller.povs.len() - 1
                }
            };
            controller.layout.push((control.kind, slot));
        }
        controller.x_axis = controller.find_axis("x", 0);
        controller.y_axis = controller.find_axis("y", 1);
        controller
    }

    fn find_axis(&self, name: &str, fallback: usize) -> Option<usize> {
        self.axis_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .or_else(|| (fallback < self.axes.len()).then_some(fallback))
    }

    pub(crate) fn device(&self) -> &D {
        &self.device
    }

    /// Read fresh values and report every changed control in layout order
    #[allow(clippy::float_cmp)]
    pub(crate) fn refresh<B: DeviceBackend<Device = D>>(&mut self, backend: &B, nanos: u64) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        for position in 0..self.layout.len() {
            let (kind, slot) = self.layout[position];
            match kind {
                ControlKind::Button => {
                    let pressed = backend.read_button(&self.device, slot);
                    if pressed != self.buttons[slot] {
                        self.buttons[slot] = pressed;
                        events.push(ControllerEvent::button(self.index, slot, pressed, nanos));
                    }
                }
                ControlKind::Axis => {
                    let value = self.normalise(slot, backend.read_axis(&self.device, slot));
                    if value != self.axes[slot] {
                        self.axes[slot] = value;
                        let kind = if Some(slot) == self.x_axis {
                            EventKind::XAxis
                        } else if Some(slot) == self.y_axis {
                            EventKind::YAxis
                        } else {
                            EventKind::Axis
                        };
                        events.push(ControllerEvent::value(self.index, slot, kind, value, nanos));
                    }
                }
                ControlKind::Pov => {
                    let direction = backend.read_pov(&self.device, slot);
                    let previous = std::mem::replace(&mut self.povs[slot], direction);
                    if direction.x() != previous.x() {
                        events.push(ControllerEvent::value(self.index, slot, EventKind::PovX, direction.x(), nanos));
                    }
                    if direction.y() != previous.y() {
                        events.push(ControllerEvent::value(self.index, slot, EventKind::PovY, direction.y(), nanos));
                    }
                }
            }
        }
        let (x, y) = (self.x_axis_value(), self.y_axis_value());
        events.into_iter().map(|e| e.with_axes(x, y)).collect()
    }

    fn normalise(&mut self, axis: usize, raw: f32) -> f32 {
        let magnitude = raw.abs();
        if magnitude > self.axis_max[axis] {
            self.axis_max[axis] = magnitude;
        }
        let value = raw / self.axis_max[axis];
        if value.abs() < self.dead_zones[axis] {
            0.0
        } else {
            value
        }
    }

    /// Enumeration index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of buttons
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Name of a button
    pub fn button_name(&self, index: usize) -> Option<&str> {
        self.button_names.get(index).map(String::as_str)
    }

    /// Whether a button was down at the last poll
    pub fn is_button_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Number of axes
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Name of an axis
    pub fn axis_name(&self, index: usize) -> Option<&str> {
        self.axis_names.get(index).map(String::as_str)
    }

    /// Filtered axis value at the last poll
    pub fn axis_value(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Dead zone of an axis
    pub fn dead_zone(&self, index: usize) -> f32 {
        self.dead_zones.get(index).copied().unwrap_or(0.0)
    }

    /// Set the dead zone of an axis; out-of-range axes are ignored
    pub fn set_dead_zone(&mut self, index: usize, zone: f32) {
        if let Some(slot) = self.dead_zones.get_mut(index) {
            *slot = zone.clamp(0.0, 1.0);
        }
    }

    /// X axis value, 0 when the device has none
    pub fn x_axis_value(&self) -> f32 {
        self.x_axis.map_or(0.0, |a| self.axes[a])
    }

    /// Y axis value, 0 when the device has none
    pub fn y_axis_value(&self) -> f32 {
        self.y_axis.map_or(0.0, |a| self.axes[a])
    }

    /// Number of POV hats
    pub fn pov_count(&self) -> usize {
        self.povs.len()
    }

    /// Name of a POV hat
    pub fn pov_name(&self, index: usize) -> Option<&str> {
        self.pov_names.get(index).map(String::as_str)
    }

    /// Horizontal component of the first POV hat
    pub fn pov_x(&self) -> f32 {
        self.povs.first().map_or(0.0, PovDirection::x)
    }

    /// Vertical component of the first POV hat
    pub fn pov_y(&self) -> f32 {
        self.povs.first().map_or(0.0, PovDirection::y)
    }
}
