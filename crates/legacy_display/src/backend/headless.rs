//! In-memory window system
//!
//! Behaves like a single-monitor native backend without touching the OS:
//! windows are records, callbacks are stored per window and invoked from
//! [`WindowSystem::poll_events`] with events injected via
//! [`HeadlessWindowSystem::inject`]. Every native interaction is counted so
//! lifecycle behaviour can be asserted.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::backend::{MonitorBinding, WindowHint, WindowId, WindowRequest, WindowSystem};
use crate::display::callbacks::{Callbacks, NativeEvent};
use crate::display::icon::IconImage;
use crate::display::DisplayMode;

/// State of one in-memory window
#[derive(Debug)]
pub struct HeadlessWindow {
    /// Title text
    pub title: String,
    /// Client size
    pub size: (u32, u32),
    /// Position
    pub pos: (i32, i32),
    /// Monitor binding
    pub monitor: MonitorBinding,
    /// Resizable attribute
    pub resizable: bool,
    /// Visible attribute
    pub visible: bool,
    /// Hints that were in effect at creation
    pub hints: Vec<WindowHint>,
    /// Context this window shares objects with
    pub shared_with: Option<WindowId>,
    /// Close flag
    pub should_close: bool,
    /// Cursor grab state
    pub cursor_grabbed: bool,
    /// Number of icon images last applied
    pub icon_count: usize,
    /// Number of buffer swaps
    pub swaps: usize,
    callbacks: Option<Callbacks>,
    queued: VecDeque<NativeEvent>,
}

/// In-memory [`WindowSystem`]
#[derive(Debug)]
pub struct HeadlessWindowSystem {
    desktop: DisplayMode,
    modes: Vec<DisplayMode>,
    hints: Vec<WindowHint>,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    next_id: u64,
    current: Option<WindowId>,
    swap_interval: i32,
    registrations: HashMap<WindowId, usize>,
    releases: usize,
    windows_created: usize,
    windows_destroyed: usize,
    fail_next_create: bool,
    fail_next_bind: bool,
    fail_swaps: bool,
    fail_icons: bool,
    fail_cursor: bool,
}

impl Default for HeadlessWindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessWindowSystem {
    /// A system with a 1920x1080, 24 bpp, 60 Hz desktop
    pub fn new() -> Self {
        Self::with_desktop(DisplayMode::native(1920, 1080, 24, 60))
    }

    /// A system with a custom desktop mode
    pub fn with_desktop(desktop: DisplayMode) -> Self {
        let modes = vec![
            DisplayMode::native(640, 480, desktop.bits_per_pixel(), desktop.frequency()),
            DisplayMode::native(800, 600, desktop.bits_per_pixel(), desktop.frequency()),
            DisplayMode::native(1280, 720, desktop.bits_per_pixel(), desktop.frequency()),
            desktop,
        ];
        Self {
            desktop,
            modes,
            hints: Vec::new(),
            windows: BTreeMap::new(),
            next_id: 1,
            current: None,
            swap_interval: 0,
            registrations: HashMap::new(),
            releases: 0,
            windows_created: 0,
            windows_destroyed: 0,
            fail_next_create: false,
            fail_next_bind: false,
            fail_swaps: false,
            fail_icons: false,
            fail_cursor: false,
        }
    }

    /// Queue a native event for delivery at the next poll
    pub fn inject(&mut self, window: WindowId, event: NativeEvent) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.queued.push_back(event);
        }
    }

    /// Raise the close flag as if the user clicked the close button
    pub fn request_close(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.should_close = true;
        }
    }

    /// Make the next window creation fail
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    /// Make the next attempt to bind a window's context fail
    ///
    /// Unbinding with `None` is unaffected.
    pub fn fail_next_bind(&mut self) {
        self.fail_next_bind = true;
    }

    /// Make buffer swaps fail
    pub fn fail_swaps(&mut self, fail: bool) {
        self.fail_swaps = fail;
    }

    /// Make icon application fail
    pub fn fail_icons(&mut self, fail: bool) {
        self.fail_icons = fail;
    }

    /// Make cursor grabbing fail
    pub fn fail_cursor(&mut self, fail: bool) {
        self.fail_cursor = fail;
    }

    /// A live window's record
    pub fn window(&self, window: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&window)
    }

    /// Number of live windows
    pub fn live_windows(&self) -> usize {
        self.windows.len()
    }

    /// Windows created so far
    pub fn windows_created(&self) -> usize {
        self.windows_created
    }

    /// Windows destroyed so far
    pub fn windows_destroyed(&self) -> usize {
        self.windows_destroyed
    }

    /// Whether a window currently has callbacks registered
    pub fn has_callbacks(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.callbacks.is_some())
    }

    /// How many times callbacks were registered on a window
    pub fn registrations(&self, window: WindowId) -> usize {
        self.registrations.get(&window).copied().unwrap_or(0)
    }

    /// Callback sets released so far
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Icon images last applied to a window
    pub fn icon_count(&self, window: WindowId) -> usize {
        self.windows.get(&window).map_or(0, |w| w.icon_count)
    }

    /// Current swap interval
    pub fn swap_interval(&self) -> i32 {
        self.swap_interval
    }

    /// Hints accumulated since the last reset
    pub fn pending_hints(&self) -> &[WindowHint] {
        &self.hints
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn primary_video_mode(&mut self) -> Option<DisplayMode> {
        Some(self.desktop)
    }

    fn video_modes(&mut self) -> Vec<DisplayMode> {
        self.modes.clone()
    }

    fn default_window_hints(&mut self) {
        self.hints.clear();
    }

    fn window_hint(&mut self, hint: WindowHint) {
        self.hints.push(hint);
    }

    fn create_window(&mut self, request: &WindowRequest) -> Option<WindowId> {
        if std::mem::take(&mut self.fail_next_create) {
            return None;
        }
        let hint_says = |pred: fn(&WindowHint) -> Option<bool>, default: bool| {
            self.hints.iter().rev().find_map(pred).unwrap_or(default)
        };
        let visible = hint_says(|h| if let WindowHint::Visible(v) = h { Some(*v) } else { None }, true);
        let resizable = hint_says(|h| if let WindowHint::Resizable(r) = h { Some(*r) } else { None }, true);

        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows_created += 1;
        let size = if request.monitor.is_fullscreen() {
            (self.desktop.width(), self.desktop.height())
        } else {
            (request.width, request.height)
        };
        self.windows.insert(
            id,
            HeadlessWindow {
                title: request.title.clone(),
                size,
                pos: (0, 0),
                monitor: request.monitor,
                resizable,
                visible,
                hints: self.hints.clone(),
                shared_with: request.share_with,
                should_close: false,
                cursor_grabbed: false,
                icon_count: 0,
                swaps: 0,
                callbacks: None,
                queued: VecDeque::new(),
            },
        );
        Some(id)
    }

    fn destroy_window(&mut self, window: WindowId) {
        if self.windows.remove(&window).is_some() {
            self.windows_destroyed += 1;
            if self.current == Some(window) {
                self.current = None;
            }
        }
    }

    fn set_callbacks(&mut self, window: WindowId, callbacks: Callbacks) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.callbacks = Some(callbacks);
            *self.registrations.entry(window).or_insert(0) += 1;
        }
    }

    fn release_callbacks(&mut self, window: WindowId) -> bool {
        let released = self
            .windows
            .get_mut(&window)
            .and_then(|w| w.callbacks.take())
            .is_some();
        if released {
            self.releases += 1;
        }
        released
    }

    fn poll_events(&mut self) {
        for w in self.windows.values_mut() {
            let events: Vec<_> = w.queued.drain(..).collect();
            let Some(callbacks) = w.callbacks.as_mut() else {
                continue;
            };
            for event in events {
                match event {
                    NativeEvent::Size(width, height) => {
                        w.size = (width.max(0).unsigned_abs(), height.max(0).unsigned_abs());
                    }
                    NativeEvent::Pos(x, y) => w.pos = (x, y),
                    _ => {}
                }
                callbacks.dispatch(event);
            }
        }
    }

    fn swap_buffers(&mut self, window: WindowId) -> Result<(), String> {
        if self.fail_swaps {
            return Err("swap chain lost".to_string());
        }
        let w = self
            .windows
            .get_mut(&window)
            .ok_or_else(|| format!("no window {}", window.raw()))?;
        w.swaps += 1;
        Ok(())
    }

    fn window_size(&self, window: WindowId) -> (u32, u32) {
        self.windows.get(&window).map_or((0, 0), |w| w.size)
    }

    fn set_window_size(&mut self, window: WindowId, width: u32, height: u32) {
        if let Some(w) = self.windows.get_mut(&window) {
            if w.size != (width, height) {
                w.size = (width, height);
                let (iw, ih) = (i32::try_from(width).unwrap_or(i32::MAX), i32::try_from(height).unwrap_or(i32::MAX));
                w.queued.push_back(NativeEvent::Size(iw, ih));
                w.queued.push_back(NativeEvent::FramebufferSize(iw, ih));
            }
        }
    }

    fn framebuffer_size(&self, window: WindowId) -> (u32, u32) {
        self.window_size(window)
    }

    fn window_pos(&self, window: WindowId) -> (i32, i32) {
        self.windows.get(&window).map_or((0, 0), |w| w.pos)
    }

    fn set_window_pos(&mut self, window: WindowId, x: i32, y: i32) {
        if let Some(w) = self.windows.get_mut(&window) {
            if w.pos != (x, y) {
                w.pos = (x, y);
                w.queued.push_back(NativeEvent::Pos(x, y));
            }
        }
    }

    fn window_monitor(&self, window: WindowId) -> MonitorBinding {
        self.windows.get(&window).map_or(MonitorBinding::Windowed, |w| w.monitor)
    }

    fn set_window_monitor(&mut self, window: WindowId, monitor: MonitorBinding, width: u32, height: u32, _refresh_rate: u32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.monitor = monitor;
        }
        self.set_window_size(window, width, height);
    }

    fn set_window_resizable(&mut self, window: WindowId, resizable: bool) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.resizable = resizable;
        }
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.title = title.to_string();
        }
    }

    fn show_window(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.visible = true;
        }
    }

    fn set_icon(&mut self, window: WindowId, images: &[IconImage]) -> Result<(), String> {
        if self.fail_icons {
            return Err("icons unsupported".to_string());
        }
        let w = self
            .windows
            .get_mut(&window)
            .ok_or_else(|| format!("no window {}", window.raw()))?;
        w.icon_count = images.len();
        Ok(())
    }

    fn should_close(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.should_close)
    }

    fn set_cursor_grabbed(&mut self, window: WindowId, grabbed: bool) -> Result<(), String> {
        if self.fail_cursor {
            return Err("cursor unavailable".to_string());
        }
        let w = self
            .windows
            .get_mut(&window)
            .ok_or_else(|| format!("no window {}", window.raw()))?;
        w.cursor_grabbed = grabbed;
        Ok(())
    }

    fn make_context_current(&mut self, window: Option<WindowId>) -> Result<(), String> {
        match window {
            Some(id) if !self.windows.contains_key(&id) => Err(format!("no window {}", id.raw())),
            Some(id) if std::mem::take(&mut self.fail_next_bind) => {
                Err(format!("context of window {} unavailable", id.raw()))
            }
            other => {
                self.current = other;
                Ok(())
            }
        }
    }

    fn current_context(&self) -> Option<WindowId> {
        self.current
    }

    fn set_swap_interval(&mut self, interval: i32) {
        self.swap_interval = interval;
    }
}
