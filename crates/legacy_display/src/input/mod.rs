//! Pull-style input consumers
//!
//! The keyboard and mouse are fed by the display's callback bridge; the
//! controllers poll a [`DeviceBackend`](controllers::DeviceBackend) directly.
//! All three expose the same cursor model: `next()` advances, and the current
//! record stays readable until the next advance.

pub mod controllers;
pub mod keyboard;
pub mod mouse;
pub mod queue;

pub use controllers::{Controller, ControllerError, ControllerEvent, Controllers, CreationState, EventKind};
pub use keyboard::{KeyEvent, Keyboard};
pub use mouse::{Mouse, MouseEvent};
pub use queue::EventQueue;
