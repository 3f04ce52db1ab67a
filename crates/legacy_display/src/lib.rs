//! # Legacy Display
//!
//! A single-window, pull-style display and controller API layered on GLFW.
//!
//! ## Features
//!
//! - **One Logical Window**: explicit create/destroy lifecycle with
//!   policy-driven recreate-vs-resize on mode changes
//! - **Callback Bridge**: native push callbacks funnelled into a bounded
//!   channel and applied once per frame
//! - **Keyboard and Mouse**: buffered events plus polled state
//! - **Controllers**: leaf-device enumeration, state diffing and a discrete
//!   event queue with "current event" accessors
//! - **Headless Backend**: every lifecycle path runs without a display
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use legacy_display::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = GlfwWindowSystem::new()?;
//!     let mut display = Display::new(system, DisplayConfig::default())?;
//!     display.create_default()?;
//!
//!     while !display.is_close_requested() {
//!         display.update(true)?;
//!         display.sync(60);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_possible_truncation
)]

pub mod backend;
pub mod config;
pub mod core;
pub mod display;
pub mod foundation;
pub mod input;

pub use display::{Display, DisplayError, DisplayResult, ErrorKind, LifecycleState};

/// Common imports for display users
pub mod prelude {
    pub use crate::{
        backend::{GlfwWindowSystem, HeadlessWindowSystem, WindowSystem},
        core::config::{CompatConfig, Config, ControllerConfig, DisplayConfig, RecreatePolicy},
        display::{
            icon::{IconError, IconSet},
            ContextAttribs, Display, DisplayError, DisplayMode, DisplayResult, ErrorKind, LifecycleState,
            PixelFormat,
        },
        input::{
            controllers::{DeviceBackend, GlfwJoysticks, VirtualDevices},
            Controller, ControllerError, ControllerEvent, Controllers, EventKind, Keyboard, Mouse,
        },
    };
}
