//! Controller enumeration, polling and the discrete event queue
//!
//! [`Controllers::create`] registers every leaf device once, skipping
//! keyboards and mice and expanding composite devices depth-first. Each
//! [`Controllers::poll`] refreshes the devices in index order and appends one
//! [`ControllerEvent`] per changed control. The consumer walks the queue with
//! [`Controllers::next`] and reads the current record through the
//! `get_event_*` / `is_event_*` accessors.

pub mod backend;
pub mod controller;
pub mod event;
pub mod glfw;
pub mod virtual_devices;

use log::{debug, info, warn};
use thiserror::Error;

use crate::display::ErrorKind;
use crate::foundation::time::MonotonicClock;
use crate::input::queue::EventQueue;

pub use self::backend::{ControlDescriptor, ControlKind, DeviceBackend, DeviceType, PovDirection};
pub use self::controller::Controller;
pub use self::event::{ControllerEvent, EventKind};
pub use self::glfw::GlfwJoysticks;
pub use self::virtual_devices::VirtualDevices;

/// Controller subsystem errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Device enumeration failed
    #[error("Failed to initialise controllers: {0}")]
    Initialization(String),

    /// The native device library is not present
    #[error("Controller backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Controller index outside the enumerated range
    #[error("Controller index {index} out of range, {count} controller(s) enumerated")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Enumerated controllers
        count: usize,
    },

    /// An event accessor was called with no current event
    #[error("No current controller event")]
    NoCurrentEvent,
}

impl ControllerError {
    /// Position of this error in the taxonomy
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Initialization(_) | Self::BackendUnavailable(_) => ErrorKind::Initialization,
            Self::IndexOutOfRange { .. } | Self::NoCurrentEvent => ErrorKind::InvalidState,
        }
    }
}

/// Result type for controller operations
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Outcome of the last [`Controllers::create`] attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CreationState {
    /// Never attempted, or destroyed since
    #[default]
    NotAttempted,
    /// Devices enumerated
    Created,
    /// The native library is missing; the subsystem reports no controllers
    Unavailable,
    /// Enumeration failed; the next `create` retries
    Failed,
}

/// The controller subsystem over one device backend
#[derive(Debug)]
pub struct Controllers<B: DeviceBackend> {
    backend: B,
    state: CreationState,
    controllers: Vec<Controller<B::Device>>,
    queue: EventQueue<ControllerEvent>,
    clock: MonotonicClock,
    default_dead_zone: f32,
}

impl<B: DeviceBackend> Controllers<B> {
    /// Wrap a backend; nothing is enumerated until [`create`](Self::create)
    pub fn new(backend: B) -> Self {
        Self::with_dead_zone(backend, 0.0)
    }

    /// Wrap a backend, assigning `dead_zone` to every axis at enumeration
    pub fn with_dead_zone(backend: B, dead_zone: f32) -> Self {
        Self {
            backend,
            state: CreationState::NotAttempted,
            controllers: Vec::new(),
            queue: EventQueue::new(),
            clock: MonotonicClock::new(),
            default_dead_zone: dead_zone,
        }
    }

    /// Enumerate devices
    ///
    /// Does nothing once enumeration succeeded or the backend was found to be
    /// unavailable. A failed attempt returns the error and may be retried.
    pub fn create(&mut self) -> ControllerResult<()> {
        if matches!(self.state, CreationState::Created | CreationState::Unavailable) {
            return Ok(());
        }
        match self.backend.enumerate() {
            Ok(devices) => {
                self.controllers.clear();
                for device in devices {
                    if self.backend.device_type(&device).is_keyboard_or_mouse() {
                        continue;
                    }
                    self.register(device);
                }
                self.state = CreationState::Created;
                info!("Controllers created: {} controller(s)", self.controllers.len());
                Ok(())
            }
            Err(ControllerError::BackendUnavailable(reason)) => {
                warn!("Controller backend unavailable, continuing without controllers: {reason}");
                self.state = CreationState::Unavailable;
                Ok(())
            }
            Err(e) => {
                self.state = CreationState::Failed;
                Err(e)
            }
        }
    }

    // Keyboards and mice are only skipped at the root; every leaf of a
    // composite is registered whatever its type.
    fn register(&mut self, device: B::Device) {
        let device_type = self.backend.device_type(&device);
        let children = self.backend.sub_devices(&device);
        if children.is_empty() {
            let index = self.controllers.len();
            let name = self.backend.name(&device);
            let controls = self.backend.controls(&device);
            debug!("Controller {index}: {name} ({device_type:?}, {} controls)", controls.len());
            self.controllers
                .push(Controller::new(index, name, device, &controls, self.default_dead_zone));
        } else {
            for child in children {
                self.register(child);
            }
        }
    }

    /// Whether the subsystem is usable (possibly with no controllers)
    pub fn is_created(&self) -> bool {
        matches!(self.state, CreationState::Created | CreationState::Unavailable)
    }

    /// Outcome of the last creation attempt
    pub fn creation_state(&self) -> CreationState {
        self.state
    }

    /// Drop all devices and queued events; the next `create` enumerates again
    pub fn destroy(&mut self) {
        self.controllers.clear();
        self.queue.clear();
        self.state = CreationState::NotAttempted;
    }

    /// Refresh every device in index order, queueing detected changes
    pub fn poll(&mut self) {
        for controller in &mut self.controllers {
            if !self.backend.poll_device(controller.device()) {
                continue;
            }
            let nanos = self.clock.now_nanos();
            for event in controller.refresh(&self.backend, nanos) {
                self.queue.push(Some(event));
            }
        }
    }

    pub(crate) fn add_event(&mut self, event: Option<ControllerEvent>) {
        self.queue.push(event);
    }

    /// Number of registered controllers
    pub fn get_controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// A registered controller
    pub fn get_controller(&self, index: usize) -> ControllerResult<&Controller<B::Device>> {
        self.controllers.get(index).ok_or(ControllerError::IndexOutOfRange {
            index,
            count: self.controllers.len(),
        })
    }

    /// A registered controller, mutably, e.g. to adjust dead zones
    pub fn get_controller_mut(&mut self, index: usize) -> ControllerResult<&mut Controller<B::Device>> {
        let count = self.controllers.len();
        self.controllers
            .get_mut(index)
            .ok_or(ControllerError::IndexOutOfRange { index, count })
    }

    /// Iterate the registered controllers in index order
    pub fn controllers(&self) -> impl Iterator<Item = &Controller<B::Device>> {
        self.controllers.iter()
    }

    /// Empty the event queue and clear the current event
    pub fn clear_events(&mut self) {
        self.queue.clear();
    }

    /// Advance to the next queued event
    pub fn next(&mut self) -> bool {
        self.queue.next()
    }

    /// Events waiting to be consumed
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// The current event
    pub fn current_event(&self) -> ControllerResult<&ControllerEvent> {
        self.queue.current().ok_or(ControllerError::NoCurrentEvent)
    }

    /// The controller that produced the current event
    pub fn get_event_source(&self) -> ControllerResult<&Controller<B::Device>> {
        let source = self.current_event()?.source;
        self.get_controller(source)
    }

    /// Control index of the current event within its kind
    pub fn get_event_control_index(&self) -> ControllerResult<usize> {
        Ok(self.current_event()?.control_index)
    }

    /// Whether the current event is a button edge
    pub fn is_event_button(&self) -> ControllerResult<bool> {
        Ok(self.current_event()?.kind == EventKind::Button)
    }

    /// Whether the current event is any axis change
    pub fn is_event_axis(&self) -> ControllerResult<bool> {
        Ok(self.current_event()?.kind.is_axis())
    }

    /// Whether the current event is an X axis change
    pub fn is_event_x_axis(&self) -> ControllerResult<bool> {
        Ok(self.current_event()?.kind == EventKind::XAxis)
    }

    /// Whether the current event is a Y axis change
    pub fn is_event_y_axis(&self) -> ControllerResult<bool> {
        Ok(self.current_event()?.kind == EventKind::YAxis)
    }

    /// Whether the current event is a horizontal POV change
    pub fn is_event_pov_x(&self) -> ControllerResult<bool> {
        Ok(self.current_event()?.kind == EventKind::PovX)
    }

    /// Whether the current event is a vertical POV change
    pub fn is_event_pov_y(&self) -> ControllerResult<bool> {
        Ok(self.current_event()?.kind == EventKind::PovY)
    }

    /// Button state carried by the current event
    pub fn get_event_button_state(&self) -> ControllerResult<bool> {
        Ok(self.current_event()?.button_state)
    }

    /// Value carried by the current axis or POV event
    pub fn get_event_value(&self) -> ControllerResult<f32> {
        Ok(self.current_event()?.value)
    }

    /// Source X axis value when the current event was detected
    pub fn get_event_x_axis_value(&self) -> ControllerResult<f32> {
        Ok(self.current_event()?.x_value)
    }

    /// Source Y axis value when the current event was detected
    pub fn get_event_y_axis_value(&self) -> ControllerResult<f32> {
        Ok(self.current_event()?.y_value)
    }

    /// Timestamp of the current event
    pub fn get_event_nanoseconds(&self) -> ControllerResult<u64> {
        Ok(self.current_event()?.nanos)
    }

    /// The device backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The device backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn two_devices_with_composite() -> VirtualDevices {
        let mut devices = VirtualDevices::new();
        devices.add_device("Keyboard", DeviceType::Keyboard);
        devices.add_gamepad("A", 2);
        devices.add_device("Mouse", DeviceType::Mouse);
        let b = devices.add_device("B", DeviceType::Composite);
        for leaf in ["B1", "B2", "B3"] {
            let id = devices.add_child(b, leaf, DeviceType::Stick);
            devices.add_button(id, "Fire");
            devices.add_button(id, "Alt");
        }
        devices
    }

    #[test]
    fn test_composite_expands_to_leaves() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();

        assert_eq!(controllers.get_controller_count(), 4);
        let names: Vec<_> = controllers.controllers().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["A", "B1", "B2", "B3"]);
        for (i, c) in controllers.controllers().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_keyboard_leaf_of_composite_is_registered() {
        let mut devices = VirtualDevices::new();
        devices.add_device("Keyboard", DeviceType::Keyboard);
        let pad = devices.add_device("Pad", DeviceType::Composite);
        let stick = devices.add_child(pad, "Stick", DeviceType::Stick);
        devices.add_button(stick, "Fire");
        let keys = devices.add_child(pad, "Keys", DeviceType::Keyboard);
        devices.add_button(keys, "Macro");

        let mut controllers = Controllers::new(devices);
        controllers.create().unwrap();

        let names: Vec<_> = controllers.controllers().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Stick", "Keys"]);
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        controllers.backend_mut().add_gamepad("Late", 1);
        controllers.create().unwrap();
        assert_eq!(controllers.get_controller_count(), 4);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        let err = controllers.get_controller(4).unwrap_err();
        assert_eq!(err, ControllerError::IndexOutOfRange { index: 4, count: 4 });
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_button_edge_emits_exactly_one_event() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        controllers.poll();
        controllers.clear_events();

        // Controller 2 is the second leaf of B
        let leaf = 5;
        controllers.backend_mut().set_button(leaf, 1, true);
        controllers.poll();

        assert_eq!(controllers.pending_events(), 1);
        assert!(controllers.next());
        let event = *controllers.current_event().unwrap();
        assert_eq!(event.source, 2);
        assert_eq!(event.control_index, 1);
        assert_eq!(event.kind, EventKind::Button);
        assert!(event.button_state);
        assert!(!controllers.next());

        controllers.poll();
        assert_eq!(controllers.pending_events(), 0);
    }

    #[test]
    fn test_events_follow_device_then_control_order() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        let pad = 1;
        controllers.backend_mut().set_button(6, 0, true);
        controllers.backend_mut().set_button(pad, 1, true);
        controllers.backend_mut().set_axis(pad, 0, 0.5);
        controllers.poll();

        let mut seen = Vec::new();
        while controllers.next() {
            let e = controllers.current_event().unwrap();
            seen.push((e.source, e.kind, e.control_index));
        }
        assert_eq!(
            seen,
            vec![
                (0, EventKind::XAxis, 0),
                (0, EventKind::Button, 1),
                (3, EventKind::Button, 0),
            ]
        );
    }

    #[test]
    fn test_accessors_fail_without_current_event() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        assert_eq!(controllers.is_event_button(), Err(ControllerError::NoCurrentEvent));
        assert!(controllers.get_event_source().is_err());

        controllers.add_event(Some(ControllerEvent::button(0, 0, true, 1)));
        assert!(controllers.next());
        assert!(controllers.is_event_button().unwrap());
        assert!(!controllers.next());
        assert_eq!(
            controllers.get_event_nanoseconds(),
            Err(ControllerError::NoCurrentEvent)
        );
    }

    #[test]
    fn test_add_event_ignores_none() {
        let mut controllers = Controllers::new(VirtualDevices::new());
        controllers.add_event(None);
        assert!(!controllers.next());
    }

    #[test]
    fn test_clear_events_then_next_is_false() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        controllers.backend_mut().set_button(1, 0, true);
        controllers.poll();
        controllers.clear_events();
        assert!(!controllers.next());
    }

    #[test]
    fn test_dead_zone_and_normalisation() {
        let mut devices = VirtualDevices::new();
        let pad = devices.add_gamepad("Pad", 0);
        let mut controllers = Controllers::with_dead_zone(devices, 0.2);
        controllers.create().unwrap();

        controllers.backend_mut().set_axis(pad, 0, 0.1);
        controllers.poll();
        assert_eq!(controllers.pending_events(), 0);

        controllers.backend_mut().set_axis(pad, 0, 2.0);
        controllers.poll();
        controllers.backend_mut().set_axis(pad, 0, 1.0);
        controllers.poll();
        let c = controllers.get_controller(0).unwrap();
        assert_relative_eq!(c.x_axis_value(), 0.5);

        controllers.get_controller_mut(0).unwrap().set_dead_zone(0, 0.6);
        controllers.poll();
        assert_relative_eq!(controllers.get_controller(0).unwrap().x_axis_value(), 0.0);
    }

    #[test]
    fn test_pov_reports_components() {
        let mut devices = VirtualDevices::new();
        let pad = devices.add_gamepad("Pad", 0);
        let mut controllers = Controllers::new(devices);
        controllers.create().unwrap();

        controllers.backend_mut().set_pov(pad, 0, PovDirection::UpRight);
        controllers.poll();
        let mut kinds = Vec::new();
        while controllers.next() {
            kinds.push((controllers.current_event().unwrap().kind, controllers.get_event_value().unwrap()));
        }
        assert_eq!(kinds, vec![(EventKind::PovX, 1.0), (EventKind::PovY, -1.0)]);
        let c = controllers.get_controller(0).unwrap();
        assert_relative_eq!(c.pov_x(), 1.0);
        assert_relative_eq!(c.pov_y(), -1.0);
    }

    #[test]
    fn test_unavailable_backend_reports_no_controllers() {
        let mut devices = two_devices_with_composite();
        devices.fail_enumeration(Some(ControllerError::BackendUnavailable("no library".into())));
        let mut controllers = Controllers::new(devices);

        controllers.create().unwrap();
        assert!(controllers.is_created());
        assert_eq!(controllers.creation_state(), CreationState::Unavailable);
        assert_eq!(controllers.get_controller_count(), 0);
        assert!(controllers.get_controller(0).is_err());
    }

    #[test]
    fn test_failed_enumeration_can_be_retried() {
        let mut devices = two_devices_with_composite();
        devices.fail_enumeration(Some(ControllerError::Initialization("bus error".into())));
        let mut controllers = Controllers::new(devices);

        let err = controllers.create().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Initialization);
        assert_eq!(controllers.creation_state(), CreationState::Failed);
        assert!(!controllers.is_created());

        controllers.backend_mut().fail_enumeration(None);
        controllers.create().unwrap();
        assert_eq!(controllers.get_controller_count(), 4);
    }

    #[test]
    fn test_destroy_allows_re_enumeration() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        controllers.destroy();
        assert!(!controllers.is_created());
        assert_eq!(controllers.get_controller_count(), 0);

        controllers.backend_mut().add_gamepad("C", 1);
        controllers.create().unwrap();
        assert_eq!(controllers.get_controller_count(), 5);
    }

    #[test]
    fn test_disconnected_device_is_skipped() {
        let mut controllers = Controllers::new(two_devices_with_composite());
        controllers.create().unwrap();
        controllers.backend_mut().set_button(1, 0, true);
        controllers.backend_mut().disconnect(1);
        controllers.poll();
        assert_eq!(controllers.pending_events(), 0);
    }
}
