//! Backend-agnostic native windowing and context contract
//!
//! This module defines the trait every native windowing backend implements.
//! The [`Display`](crate::display::Display) lifecycle manager is the only
//! caller; applications pick a backend once and hand it over at construction.
//!
//! # Backends
//!
//! - **`glfw`**: real windows and OpenGL contexts through the `glfw` crate
//! - **`headless`**: in-memory windows for tests and display-less machines

pub mod glfw;
pub mod headless;

use crate::display::callbacks::Callbacks;
use crate::display::icon::IconImage;
use crate::display::DisplayMode;

pub use self::glfw::GlfwWindowSystem;
pub use self::headless::HeadlessWindowSystem;

/// Opaque identifier of one native window
///
/// Identifiers are never reused by a backend, so a stale id can never alias
/// a newer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u64);

impl WindowId {
    /// Raw numeric value, for logging
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Which monitor, if any, a window is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonitorBinding {
    /// A regular decorated window
    #[default]
    Windowed,
    /// Exclusive fullscreen on the primary monitor
    Primary,
}

impl MonitorBinding {
    /// Binding for a fullscreen flag
    pub const fn for_fullscreen(fullscreen: bool) -> Self {
        if fullscreen {
            Self::Primary
        } else {
            Self::Windowed
        }
    }

    /// Whether the window is monitor-bound
    pub const fn is_fullscreen(&self) -> bool {
        matches!(self, Self::Primary)
    }
}

/// Context profile hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextProfile {
    /// Core profile
    Core,
    /// Compatibility profile
    Compatibility,
}

/// A native window-creation hint
///
/// Hints accumulate between [`WindowSystem::default_window_hints`] calls and
/// apply to the next window created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowHint {
    /// Whether the window is shown on creation
    Visible(bool),
    /// Whether the user may resize the window
    Resizable(bool),
    /// Debug graphics context
    DebugContext(bool),
    /// Requested context version (major, minor)
    ContextVersion(u32, u32),
    /// Requested context profile
    Profile(ContextProfile),
    /// Forward-compatible context
    ForwardCompatible(bool),
    /// Accumulation buffer bits per colour channel and alpha bits
    Accumulation {
        /// Bits per colour channel
        color: u32,
        /// Alpha bits
        alpha: u32,
    },
    /// Alpha bits
    AlphaBits(u32),
    /// Auxiliary buffers
    AuxBuffers(u32),
    /// Depth bits
    DepthBits(u32),
    /// Multisample count
    Samples(u32),
    /// Stencil bits
    StencilBits(u32),
    /// Stereo rendering
    Stereo(bool),
    /// sRGB framebuffer
    SrgbCapable(bool),
}

/// Parameters of one native window creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    /// Client width in screen coordinates
    pub width: u32,
    /// Client height in screen coordinates
    pub height: u32,
    /// Title text
    pub title: String,
    /// Monitor binding
    pub monitor: MonitorBinding,
    /// Window whose context the new one shares objects with
    pub share_with: Option<WindowId>,
}

/// Key action reported by the key callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Key released
    Release,
    /// Key pressed
    Press,
    /// Key held long enough to auto-repeat
    Repeat,
}

impl KeyAction {
    /// Whether the key is down after this action
    pub const fn is_down(&self) -> bool {
        !matches!(self, Self::Release)
    }
}

/// Native windowing and context operations
///
/// All methods are called from the single thread that owns the display.
/// Methods taking a [`WindowId`] ignore ids that are not live, except where
/// a `Result` is returned.
pub trait WindowSystem {
    /// The desktop video mode of the primary monitor
    fn primary_video_mode(&mut self) -> Option<DisplayMode>;

    /// Every video mode of the primary monitor
    fn video_modes(&mut self) -> Vec<DisplayMode>;

    /// Reset all creation hints to their defaults
    fn default_window_hints(&mut self);

    /// Set one creation hint
    fn window_hint(&mut self, hint: WindowHint);

    /// Create a window with the accumulated hints
    ///
    /// Returns `None` when the native backend refuses.
    fn create_window(&mut self, request: &WindowRequest) -> Option<WindowId>;

    /// Destroy a window
    fn destroy_window(&mut self, window: WindowId);

    /// Register the full callback set on a window, replacing any previous set
    fn set_callbacks(&mut self, window: WindowId, callbacks: Callbacks);

    /// Unregister and free the callback set of a window
    ///
    /// Returns `true` when a set was registered.
    fn release_callbacks(&mut self, window: WindowId) -> bool;

    /// Pump the native event queue, invoking registered callbacks
    fn poll_events(&mut self);

    /// Present the back buffer
    fn swap_buffers(&mut self, window: WindowId) -> Result<(), String>;

    /// Client size in screen coordinates
    fn window_size(&self, window: WindowId) -> (u32, u32);

    /// Resize the client area
    fn set_window_size(&mut self, window: WindowId, width: u32, height: u32);

    /// Framebuffer size in pixels
    fn framebuffer_size(&self, window: WindowId) -> (u32, u32);

    /// Window position in screen coordinates
    fn window_pos(&self, window: WindowId) -> (i32, i32);

    /// Move the window
    fn set_window_pos(&mut self, window: WindowId, x: i32, y: i32);

    /// Current monitor binding
    fn window_monitor(&self, window: WindowId) -> MonitorBinding;

    /// Rebind a live window to a monitor, or release it to windowed mode
    fn set_window_monitor(&mut self, window: WindowId, monitor: MonitorBinding, width: u32, height: u32, refresh_rate: u32);

    /// Toggle user resizability on a live window
    fn set_window_resizable(&mut self, window: WindowId, resizable: bool);

    /// Change the title text
    fn set_title(&mut self, window: WindowId, title: &str);

    /// Make the window visible
    fn show_window(&mut self, window: WindowId);

    /// Replace the window icon candidates
    fn set_icon(&mut self, window: WindowId, images: &[IconImage]) -> Result<(), String>;

    /// Whether the user asked to close the window
    fn should_close(&self, window: WindowId) -> bool;

    /// Capture or release the cursor
    fn set_cursor_grabbed(&mut self, window: WindowId, grabbed: bool) -> Result<(), String>;

    /// Bind a window's context to the calling thread, or unbind with `None`
    fn make_context_current(&mut self, window: Option<WindowId>) -> Result<(), String>;

    /// The window whose context is current on the calling thread
    fn current_context(&self) -> Option<WindowId>;

    /// Set the swap interval of the current context
    fn set_swap_interval(&mut self, interval: i32);
}
