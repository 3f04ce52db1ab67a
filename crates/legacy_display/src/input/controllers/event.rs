//! Controller event records

/// What changed in a [`ControllerEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A button edge
    Button,
    /// An axis other than X or Y
    Axis,
    /// The X axis
    XAxis,
    /// The Y axis
    YAxis,
    /// Horizontal POV component
    PovX,
    /// Vertical POV component
    PovY,
}

impl EventKind {
    /// Whether this is any axis kind
    pub const fn is_axis(&self) -> bool {
        matches!(self, Self::Axis | Self::XAxis | Self::YAxis)
    }
}

/// One detected control change, immutable once created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerEvent {
    /// Index of the controller that produced it
    pub source: usize,
    /// Control index within its kind
    pub control_index: usize,
    /// What changed
    pub kind: EventKind,
    /// Button state, meaningful for [`EventKind::Button`]
    pub button_state: bool,
    /// New axis or POV component value in [-1, 1]
    pub value: f32,
    /// Source's X axis value when the event was detected
    pub x_value: f32,
    /// Source's Y axis value when the event was detected
    pub y_value: f32,
    /// Monotonic timestamp
    pub nanos: u64,
}

impl ControllerEvent {
    /// A button edge
    pub const fn button(source: usize, control_index: usize, pressed: bool, nanos: u64) -> Self {
        Self {
            source,
            control_index,
            kind: EventKind::Button,
            button_state: pressed,
            value: 0.0,
            x_value: 0.0,
            y_value: 0.0,
            nanos,
        }
    }

    /// An axis or POV value change
    pub const fn value(source: usize, control_index: usize, kind: EventKind, value: f32, nanos: u64) -> Self {
        Self {
            source,
            control_index,
            kind,
            button_state: false,
            value,
            x_value: 0.0,
            y_value: 0.0,
            nanos,
        }
    }

    /// Attach the source's X and Y axis values
    pub const fn with_axes(mut self, x_value: f32, y_value: f32) -> Self {
        self.x_value = x_value;
        self.y_value = y_value;
        self
    }
}
