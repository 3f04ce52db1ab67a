//! Single-window display lifecycle
//!
//! [`Display`] owns the one logical window of the process, its graphics
//! context, the callback bridge feeding it and the keyboard and mouse that
//! depend on it. Client code drives it synchronously: configure, `create`,
//! then call `update` once per frame.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ create / update / set_display_mode
//!        ┌──────▼──────┐
//!        │   Display   │ ← lifecycle state machine (this module)
//!        └──┬───────┬──┘
//!           │       │ drains
//!           │  ┌────▼──────────┐
//!           │  │CallbackBridge │ ← callbacks.rs
//!           │  └────▲──────────┘
//!           │       │ translated messages
//!     ┌─────▼───────┴──┐
//!     │  WindowSystem  │ ← backend trait (glfw / headless)
//!     └────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! `Uninitialized → Created ⇄ ModeChanging → Destroyed`, and `Destroyed`
//! may be created again. A mode, fullscreen or resizable change is satisfied
//! either by resizing the live window or by replacing it, as decided by the
//! [`RecreatePolicy`]. Replacement creates the new window and binds its
//! context first, so a failure leaves the old window, its callbacks and its
//! context untouched.
//!
//! At most one display in the process owns a live window at a time; see
//! [`window_live`].
//!
//! # Latency
//!
//! Size changes reported by the native backend reach [`Display::width`] and
//! [`Display::height`] only at the end of the `update` that drained them.

pub mod callbacks;
pub mod error;
pub mod icon;
pub mod mode;


use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, info, warn};
use parking_lot::{const_reentrant_mutex, ReentrantMutex, ReentrantMutexGuard};

use crate::backend::{MonitorBinding, WindowHint, WindowId, WindowRequest, WindowSystem};
use crate::core::config::{DisplayConfig, RecreatePolicy};
use crate::foundation::time::FrameSync;
use crate::input::keyboard::Keyboard;
use crate::input::mouse::Mouse;

use self::callbacks::{CallbackBridge, WindowMessage};
use self::icon::{IconError, IconSet, IconTracker};

pub use self::error::{DisplayError, DisplayResult, ErrorKind};
pub use self::mode::{ContextAttribs, ContextFlags, DisplayMode, PixelFormat, ProfileMask};

static LIFECYCLE_LOCK: ReentrantMutex<()> = const_reentrant_mutex(());

/// The process-wide lock serialising lifecycle-affecting calls
///
/// Every public lifecycle operation of [`Display`] holds it for its whole
/// duration. It is reentrant, so a caller may hold it across several calls.
pub fn lifecycle_lock() -> &'static ReentrantMutex<()> {
    &LIFECYCLE_LOCK
}

fn lock() -> ReentrantMutexGuard<'static, ()> {
    LIFECYCLE_LOCK.lock()
}

// Set while any display owns a native window. Written under LIFECYCLE_LOCK.
static WINDOW_LIVE: AtomicBool = AtomicBool::new(false);

/// Whether some display in the process currently owns a live window
pub fn window_live() -> bool {
    WINDOW_LIVE.load(Ordering::Acquire)
}

/// Lifecycle state of the display window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Never created
    #[default]
    Uninitialized,
    /// A window and context are live
    Created,
    /// A window replacement is in progress
    ModeChanging,
    /// Destroyed; may be created again
    Destroyed,
}

/// Geometry and hints of a replacement window
#[derive(Debug, Clone, Copy)]
struct WindowTarget {
    width: u32,
    height: u32,
    monitor: MonitorBinding,
    resizable: bool,
}

/// The single logical display window
pub struct Display<W: WindowSystem> {
    system: W,
    config: DisplayConfig,
    state: LifecycleState,
    window: Option<WindowId>,

    mode: DisplayMode,
    desktop_mode: DisplayMode,
    pixel_format: Option<PixelFormat>,
    context_attribs: Option<ContextAttribs>,

    title: String,
    fullscreen: bool,
    resizable: bool,
    vsync: bool,
    swap_interval: i32,

    focused: bool,
    visible: bool,
    dirty: bool,
    x: i32,
    y: i32,
    requested_location: Option<(i32, i32)>,
    width: u32,
    height: u32,
    framebuffer_width: u32,
    framebuffer_height: u32,
    resized: bool,
    pending_resize: Option<(u32, u32)>,

    icons: IconTracker,
    bridge: CallbackBridge,
    keyboard: Keyboard,
    mouse: Mouse,
    frame_sync: FrameSync,
}

impl<W: WindowSystem> Display<W> {
    /// Bind a display to a window system, without creating a window
    ///
    /// The initial display mode is the desktop mode of the primary monitor.
    pub fn new(mut system: W, config: DisplayConfig) -> DisplayResult<Self> {
        config.validate()?;
        let desktop_mode = system
            .primary_video_mode()
            .ok_or_else(|| DisplayError::Initialization("No video mode for the primary monitor".to_string()))?;
        info!("Initial mode: {desktop_mode}");

        Ok(Self {
            system,
            state: LifecycleState::Uninitialized,
            window: None,
            mode: desktop_mode,
            desktop_mode,
            pixel_format: None,
            context_attribs: None,
            title: config.title.clone(),
            fullscreen: false,
            resizable: config.initial_resizable,
            vsync: false,
            swap_interval: config.swap_interval,
            focused: false,
            visible: false,
            dirty: false,
            x: -1,
            y: -1,
            requested_location: None,
            width: desktop_mode.width(),
            height: desktop_mode.height(),
            framebuffer_width: desktop_mode.width(),
            framebuffer_height: desktop_mode.height(),
            resized: false,
            pending_resize: None,
            icons: IconTracker::new(),
            bridge: CallbackBridge::new(config.event_channel_capacity),
            keyboard: Keyboard::new(),
            mouse: Mouse::new(),
            frame_sync: FrameSync::new(),
            config,
        })
    }

    /// Create the window with a pixel format and optional context attributes
    ///
    /// Once created, further calls do nothing, whatever their parameters.
    pub fn create(&mut self, pixel_format: PixelFormat, attribs: Option<ContextAttribs>) -> DisplayResult<()> {
        let _guard = lock();
        if self.is_created() {
            debug!("Display already created, ignoring create request");
            return Ok(());
        }
        self.pixel_format = Some(pixel_format);
        self.context_attribs = attribs;
        self.create_native()
    }

    /// Create the window with the backend's default hints
    pub fn create_default(&mut self) -> DisplayResult<()> {
        let _guard = lock();
        if self.is_created() {
            debug!("Display already created, ignoring create request");
            return Ok(());
        }
        self.pixel_format = None;
        self.context_attribs = None;
        self.create_native()
    }

    fn apply_creation_hints(&mut self, visible: bool, resizable: bool) {
        self.system.default_window_hints();
        if let Some(format) = self.pixel_format {
            for hint in format.window_hints() {
                self.system.window_hint(hint);
            }
        }
        if let Some(attribs) = self.context_attribs {
            for hint in attribs.window_hints() {
                self.system.window_hint(hint);
            }
        }
        self.system.window_hint(WindowHint::Visible(visible));
        self.system.window_hint(WindowHint::Resizable(resizable));
        if self.config.debug_context {
            self.system.window_hint(WindowHint::DebugContext(true));
        }
    }

    fn centred(&self) -> (i32, i32) {
        let offset = |desktop: u32, size: u32| {
            i32::try_from((i64::from(desktop) - i64::from(size)) / 2).unwrap_or(0)
        };
        (
            offset(self.desktop_mode.width(), self.mode.width()),
            offset(self.desktop_mode.height(), self.mode.height()),
        )
    }

    fn create_native(&mut self) -> DisplayResult<()> {
        if window_live() {
            return Err(DisplayError::invalid_state("Another display window is already live"));
        }
        if let Some(desktop) = self.system.primary_video_mode() {
            self.desktop_mode = desktop;
        }
        let fullscreen = self.fullscreen && self.mode.is_fullscreen_capable();
        self.apply_creation_hints(false, self.resizable);

        let request = WindowRequest {
            width: self.mode.width(),
            height: self.mode.height(),
            title: self.title.clone(),
            monitor: MonitorBinding::for_fullscreen(fullscreen),
            share_with: None,
        };
        let window = self
            .system
            .create_window(&request)
            .ok_or_else(|| DisplayError::Initialization(format!("Failed to create display window ({})", self.mode)))?;
        self.system.set_callbacks(window, self.bridge.callbacks());

        self.width = self.mode.width();
        self.height = self.mode.height();
        (self.framebuffer_width, self.framebuffer_height) = self.system.framebuffer_size(window);

        if !fullscreen {
            let (x, y) = self.requested_location.unwrap_or_else(|| self.centred());
            self.system.set_window_pos(window, x, y);
            self.x = x;
            self.y = y;
        }

        if let Err(e) = self.system.make_context_current(Some(window)) {
            self.system.release_callbacks(window);
            self.system.destroy_window(window);
            return Err(DisplayError::Initialization(format!("Failed to make context current: {e}")));
        }

        self.system.show_window(window);
        self.visible = true;
        self.window = Some(window);
        self.fullscreen = fullscreen;

        self.keyboard.create();
        self.mouse.create();
        self.mouse.set_window_height(self.height);
        self.rebind_cursor(window);

        self.apply_initial_icons(window);
        self.system.set_swap_interval(self.swap_interval);

        self.state = LifecycleState::Created;
        WINDOW_LIVE.store(true, Ordering::Release);
        info!("Display created: {} ({})", self.mode, if fullscreen { "fullscreen" } else { "windowed" });
        Ok(())
    }

    fn apply_initial_icons(&mut self, window: WindowId) {
        if self.config.disable_window_icon {
            return;
        }
        if let Some(pending) = self.icons.take_pending() {
            self.icons.activate(&mut self.system, window, pending);
        } else if let Some(active) = self.icons.active().cloned() {
            self.icons.activate(&mut self.system, window, active);
        } else {
            self.icons
                .activate(&mut self.system, window, Rc::new(IconSet::default_icons()));
        }
    }

    fn rebind_cursor(&mut self, window: WindowId) {
        if !self.mouse.is_grabbed() {
            return;
        }
        if let Err(e) = self.system.set_cursor_grabbed(window, true) {
            warn!("Failed to set new window cursor: {e}");
        }
    }

    /// Release callbacks and destroy the window
    ///
    /// Safe to call repeatedly and before creation.
    pub fn destroy(&mut self) {
        let _guard = lock();
        let Some(window) = self.window.take() else {
            return;
        };
        if self.system.current_context() == Some(window) {
            if let Err(e) = self.system.make_context_current(None) {
                warn!("Failed to release context: {e}");
            }
        }
        self.system.release_callbacks(window);
        self.system.destroy_window(window);
        // Messages from the destroyed window no longer apply
        self.bridge.drain();

        self.keyboard.destroy();
        self.mouse.destroy();
        self.pending_resize = None;
        self.resized = false;
        self.focused = false;
        self.visible = false;
        self.state = LifecycleState::Destroyed;
        WINDOW_LIVE.store(false, Ordering::Release);
        info!("Display destroyed");
    }

    /// Swap buffers and optionally process native events
    pub fn update(&mut self, process_messages: bool) -> DisplayResult<()> {
        let _guard = lock();
        self.swap_buffers()?;
        self.dirty = false;
        if process_messages {
            self.process_messages();
        }
        Ok(())
    }

    /// Present the back buffer
    ///
    /// A [`DisplayError::SwapFailed`] has no recovery path.
    pub fn swap_buffers(&mut self) -> DisplayResult<()> {
        let window = self.live_window()?;
        self.system.swap_buffers(window).map_err(|e| {
            error!("Buffer swap failed: {e}");
            DisplayError::SwapFailed(e)
        })
    }

    /// Pump native events and apply everything the callbacks reported
    ///
    /// Keyboard and mouse are polled afterwards, then the resize latch is
    /// resolved.
    pub fn process_messages(&mut self) {
        let _guard = lock();
        self.system.poll_events();
        for message in self.bridge.drain() {
            self.apply_message(message);
        }
        self.keyboard.poll();
        self.mouse.poll();

        if let Some((width, height)) = self.pending_resize.take() {
            self.resized = true;
            self.width = width;
            self.height = height;
            self.mouse.set_window_height(height);
        } else {
            self.resized = false;
        }
    }

    fn apply_message(&mut self, message: WindowMessage) {
        match message {
            WindowMessage::Key { key, action } => self.keyboard.key_event(key, action),
            WindowMessage::Char(c) => self.keyboard.char_event(c),
            WindowMessage::CursorEnter(inside) => self.mouse.set_inside_window(inside),
            WindowMessage::CursorMoved { x, y } => self.mouse.move_event(x, y),
            WindowMessage::MouseButton { button, pressed } => self.mouse.button_event(button, pressed),
            WindowMessage::Wheel(units) => self.mouse.wheel_event(units),
            WindowMessage::Focused(focused) => self.focused = focused,
            WindowMessage::Visible(visible) => self.visible = visible,
            WindowMessage::Resized { width, height } => {
                self.pending_resize = Some((clamp_dimension(width), clamp_dimension(height)));
            }
            WindowMessage::Moved { x, y } => {
                self.x = x;
                self.y = y;
            }
            WindowMessage::Dirty => self.dirty = true,
            WindowMessage::FramebufferResized { width, height } => {
                self.framebuffer_width = clamp_dimension(width);
                self.framebuffer_height = clamp_dimension(height);
            }
        }
    }

    fn live_window(&self) -> DisplayResult<WindowId> {
        self.window
            .ok_or_else(|| DisplayError::invalid_state("Display is not created"))
    }

    /// Switch display mode
    ///
    /// Before creation the mode is only stored. Afterwards an equal mode does
    /// nothing, and any other mode resizes or replaces the window per policy.
    pub fn set_display_mode(&mut self, mode: DisplayMode) -> DisplayResult<()> {
        let _guard = lock();
        if mode == self.mode {
            // Capability is not a window attribute; adopt it without touching the window
            self.mode = mode;
            return Ok(());
        }
        let attribute_change = mode.attribute_change(&self.mode);
        let Some(window) = self.window else {
            debug!("Display not created, storing mode {mode}");
            self.mode = mode;
            return Ok(());
        };

        let fullscreen = self.fullscreen && mode.is_fullscreen_capable();
        if self.config.recreate.should_recreate(attribute_change) {
            self.recreate(WindowTarget {
                width: mode.width(),
                height: mode.height(),
                monitor: MonitorBinding::for_fullscreen(fullscreen),
                resizable: self.resizable,
            })?;
            self.fullscreen = fullscreen;
        } else {
            debug!("Resizing display in place to {mode}");
            self.system.set_window_size(window, mode.width(), mode.height());
        }
        self.mode = mode;
        Ok(())
    }

    /// Switch mode and take the fullscreen state from the mode's capability
    pub fn set_display_mode_and_fullscreen(&mut self, mode: DisplayMode) -> DisplayResult<()> {
        let _guard = lock();
        let fullscreen = mode.is_fullscreen_capable();
        let fullscreen_change = fullscreen != self.fullscreen;
        if mode == self.mode && !fullscreen_change {
            return Ok(());
        }
        let attribute_change = mode.attribute_change(&self.mode) || fullscreen_change;

        if let Some(window) = self.window {
            let monitor = MonitorBinding::for_fullscreen(fullscreen);
            if self.config.recreate.should_recreate(attribute_change) {
                self.recreate(WindowTarget {
                    width: mode.width(),
                    height: mode.height(),
                    monitor,
                    resizable: self.resizable,
                })?;
            } else if fullscreen_change {
                self.system
                    .set_window_monitor(window, monitor, mode.width(), mode.height(), mode.frequency());
            } else {
                self.system.set_window_size(window, mode.width(), mode.height());
            }
        }
        self.mode = mode;
        self.fullscreen = fullscreen;
        Ok(())
    }

    /// Bind the window to the primary monitor, or release it
    ///
    /// Entering fullscreen requires a fullscreen-capable mode.
    pub fn set_fullscreen(&mut self, fullscreen: bool) -> DisplayResult<()> {
        let _guard = lock();
        if self.fullscreen == fullscreen {
            return Ok(());
        }
        if fullscreen && !self.mode.is_fullscreen_capable() {
            return Err(DisplayError::invalid_state("Display mode is not fullscreen capable"));
        }
        if let Some(window) = self.window {
            let (width, height) = self.system.window_size(window);
            let monitor = MonitorBinding::for_fullscreen(fullscreen);
            if self.config.recreate.should_recreate(true) {
                self.recreate(WindowTarget {
                    width,
                    height,
                    monitor,
                    resizable: self.resizable,
                })?;
            } else {
                self.system
                    .set_window_monitor(window, monitor, width, height, self.mode.frequency());
            }
        }
        self.fullscreen = fullscreen;
        Ok(())
    }

    /// Allow or forbid user resizing
    ///
    /// The window is replaced only under `recreate_on_attribute_change`;
    /// `always_recreate_on_resize` does not apply, as no size changes.
    pub fn set_resizable(&mut self, resizable: bool) -> DisplayResult<()> {
        let _guard = lock();
        if self.resizable == resizable {
            return Ok(());
        }
        if let Some(window) = self.window {
            if self.config.recreate.recreate_on_attribute_change {
                let (width, height) = self.system.window_size(window);
                self.recreate(WindowTarget {
                    width,
                    height,
                    monitor: self.system.window_monitor(window),
                    resizable,
                })?;
            } else {
                self.system.set_window_resizable(window, resizable);
            }
        }
        self.resizable = resizable;
        Ok(())
    }

    fn recreate(&mut self, target: WindowTarget) -> DisplayResult<()> {
        let old = self.live_window()?;
        self.state = LifecycleState::ModeChanging;
        let result = self.replace_window(old, target);
        self.state = LifecycleState::Created;
        result
    }

    fn replace_window(&mut self, old: WindowId, target: WindowTarget) -> DisplayResult<()> {
        self.apply_creation_hints(self.visible, target.resizable);
        let request = WindowRequest {
            width: target.width,
            height: target.height,
            title: self.title.clone(),
            monitor: target.monitor,
            share_with: Some(old),
        };
        let new = self.system.create_window(&request).ok_or_else(|| {
            warn!("Window recreation failed, keeping the current window");
            DisplayError::Initialization(format!(
                "Failed to recreate display window ({}x{})",
                target.width, target.height
            ))
        })?;

        // The old window stays live until the new context is bound
        if let Err(e) = self.system.make_context_current(Some(new)) {
            warn!("Recreated context could not be made current, keeping the current window");
            self.system.destroy_window(new);
            if let Err(restore) = self.system.make_context_current(Some(old)) {
                warn!("Failed to restore the previous context: {restore}");
            }
            return Err(DisplayError::Initialization(format!(
                "Failed to make recreated context current: {e}"
            )));
        }
        self.system.release_callbacks(old);
        self.system.destroy_window(old);
        self.window = Some(new);

        self.rebind_cursor(new);
        self.system.set_title(new, &self.title);
        self.system.set_callbacks(new, self.bridge.callbacks());

        self.system.set_swap_interval(0);
        self.swap_interval = 0;
        self.vsync = false;
        if self.visible {
            self.system.show_window(new);
        }
        if !self.config.disable_window_icon {
            if let Some(active) = self.icons.active().cloned() {
                self.icons.activate(&mut self.system, new, active);
            }
        }

        self.pending_resize = Some(self.system.window_size(new));
        (self.framebuffer_width, self.framebuffer_height) = self.system.framebuffer_size(new);
        info!(
            "Display window recreated ({}x{}, {:?}): {} -> {}",
            target.width,
            target.height,
            target.monitor,
            old.raw(),
            new.raw()
        );
        Ok(())
    }

    /// Change the title, natively when the window exists
    pub fn set_title(&mut self, title: &str) {
        let _guard = lock();
        title.clone_into(&mut self.title);
        if let Some(window) = self.window {
            self.system.set_title(window, title);
        }
    }

    /// Move the window, or remember the position for creation
    pub fn set_location(&mut self, x: i32, y: i32) {
        let _guard = lock();
        match self.window {
            Some(window) => self.system.set_window_pos(window, x, y),
            None => {
                self.requested_location = Some((x, y));
                self.x = x;
                self.y = y;
            }
        }
    }

    /// Set the window icon from raw square RGBA8 buffers
    ///
    /// Invalid buffers are rejected; a native failure to apply the icon is
    /// only logged.
    pub fn set_icon(&mut self, buffers: &[&[u8]]) -> Result<(), IconError> {
        let set = IconSet::from_rgba(buffers)?;
        self.set_icon_set(Rc::new(set));
        Ok(())
    }

    /// Set the window icon from image files
    pub fn set_icon_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), IconError> {
        let set = IconSet::from_files(paths)?;
        self.set_icon_set(Rc::new(set));
        Ok(())
    }

    /// Apply a prepared icon set, or cache it until creation
    pub fn set_icon_set(&mut self, set: Rc<IconSet>) {
        let _guard = lock();
        if self.config.disable_window_icon {
            debug!("Window icons disabled, ignoring icon request");
            return;
        }
        match self.window {
            Some(window) => {
                self.icons.activate(&mut self.system, window, set);
            }
            None => self.icons.cache(set),
        }
    }

    /// Capture or release the cursor; the request survives recreation
    pub fn set_cursor_grabbed(&mut self, grabbed: bool) {
        let _guard = lock();
        self.mouse.set_grabbed(grabbed);
        if let Some(window) = self.window {
            if let Err(e) = self.system.set_cursor_grabbed(window, grabbed) {
                warn!("Failed to change cursor grab: {e}");
            }
        }
    }

    /// Enable or disable vertical sync
    pub fn set_vsync_enabled(&mut self, enabled: bool) {
        let _guard = lock();
        self.vsync = enabled;
        if self.window.is_some() {
            self.system.set_swap_interval(i32::from(enabled));
        }
    }

    /// Set the swap interval, applied now when created and at every creation
    pub fn set_swap_interval(&mut self, interval: i32) {
        let _guard = lock();
        self.swap_interval = interval;
        if self.window.is_some() {
            self.system.set_swap_interval(interval);
        }
    }

    /// Whether this display's context is current
    pub fn is_current(&self) -> bool {
        self.window.is_some() && self.system.current_context() == self.window
    }

    /// Make this display's context current
    pub fn make_current(&mut self) -> DisplayResult<()> {
        let _guard = lock();
        let window = self.live_window()?;
        if self.is_current() {
            return Ok(());
        }
        self.system
            .make_context_current(Some(window))
            .map_err(|e| DisplayError::Initialization(format!("Failed to make context current: {e}")))
    }

    /// Unbind any current context
    pub fn release_context(&mut self) -> DisplayResult<()> {
        let _guard = lock();
        self.system
            .make_context_current(None)
            .map_err(|e| DisplayError::invalid_state(format!("Failed to release context: {e}")))
    }

    /// Sleep so that successive calls run at `fps` frames per second
    pub fn sync(&mut self, fps: i32) {
        self.frame_sync.sync(fps);
    }

    /// Fullscreen-capable modes of the primary monitor
    pub fn get_available_display_modes(&mut self) -> Vec<DisplayMode> {
        self.system
            .video_modes()
            .into_iter()
            .filter(DisplayMode::is_fullscreen_capable)
            .collect()
    }

    /// The desktop mode of the primary monitor
    pub fn get_desktop_display_mode(&mut self) -> DisplayMode {
        if let Some(desktop) = self.system.primary_video_mode() {
            self.desktop_mode = desktop;
        }
        self.desktop_mode
    }

    /// The active mode
    pub fn get_display_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether a window and context are live
    pub fn is_created(&self) -> bool {
        matches!(self.state, LifecycleState::Created | LifecycleState::ModeChanging)
    }

    /// The live window
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    /// Client width as of the last update
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Client height as of the last update
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Framebuffer width in pixels
    pub fn framebuffer_width(&self) -> u32 {
        self.framebuffer_width
    }

    /// Framebuffer height in pixels
    pub fn framebuffer_height(&self) -> u32 {
        self.framebuffer_height
    }

    /// Window X position, -1 before it is known
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Window Y position, -1 before it is known
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Whether the last update resolved a resize
    pub fn was_resized(&self) -> bool {
        self.resized
    }

    /// Whether the contents were damaged since the last update
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the window has focus
    pub fn is_active(&self) -> bool {
        self.focused
    }

    /// Whether the window is shown and not iconified
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the user asked to close the window
    pub fn is_close_requested(&self) -> bool {
        self.window.is_some_and(|w| self.system.should_close(w))
    }

    /// Current title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the window is monitor-bound
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether the user may resize the window
    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    /// Whether vertical sync is enabled
    pub fn is_vsync_enabled(&self) -> bool {
        self.vsync
    }

    /// The recreate-vs-resize policy in effect
    pub fn recreate_policy(&self) -> RecreatePolicy {
        self.config.recreate
    }

    /// Keyboard fed by this display
    pub fn keyboard(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    /// Mouse fed by this display
    pub fn mouse(&mut self) -> &mut Mouse {
        &mut self.mouse
    }

    /// The window system
    pub fn system(&self) -> &W {
        &self.system
    }

    /// The window system, mutably
    pub fn system_mut(&mut self) -> &mut W {
        &mut self.system
    }
}

impl<W: WindowSystem> fmt::Debug for Display<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("state", &self.state)
            .field("window", &self.window)
            .field("mode", &self.mode)
            .field("fullscreen", &self.fullscreen)
            .field("resizable", &self.resizable)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl<W: WindowSystem> Drop for Display<W> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn clamp_dimension(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
