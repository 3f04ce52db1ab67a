//! Window system over GLFW
//!
//! Provides native windows with OpenGL contexts. GLFW event queues are
//! per-window receivers; [`WindowSystem::poll_events`] pumps GLFW and then
//! replays each window's queued events into its registered callbacks.

use std::collections::HashMap;

use glfw::{Context, WindowEvent, WindowMode};
use log::{debug, warn};

use crate::backend::{ContextProfile, KeyAction, MonitorBinding, WindowHint, WindowId, WindowRequest, WindowSystem};
use crate::display::callbacks::{Callbacks, NativeEvent};
use crate::display::icon::IconImage;
use crate::display::{DisplayError, DisplayMode};

struct NativeWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    callbacks: Option<Callbacks>,
    monitor: MonitorBinding,
}

/// GLFW-backed [`WindowSystem`]
pub struct GlfwWindowSystem {
    // Windows drop before the library handle
    windows: HashMap<WindowId, NativeWindow>,
    glfw: glfw::Glfw,
    next_id: u64,
}

impl GlfwWindowSystem {
    /// Initialize GLFW
    ///
    /// GLFW errors raised later are logged rather than treated as fatal.
    pub fn new() -> Result<Self, DisplayError> {
        let glfw = glfw::init(glfw::log_errors)
            .map_err(|e| DisplayError::Initialization(format!("GLFW initialization failed: {e:?}")))?;
        debug!("GLFW {} initialized", glfw::get_version_string());
        Ok(Self {
            windows: HashMap::new(),
            glfw,
            next_id: 1,
        })
    }

    /// A handle to the library, for joystick access on the same thread
    pub fn glfw(&self) -> glfw::Glfw {
        self.glfw.clone()
    }

    fn native(&self, window: WindowId) -> Option<&NativeWindow> {
        self.windows.get(&window)
    }

    fn native_mut(&mut self, window: WindowId) -> Option<&mut NativeWindow> {
        self.windows.get_mut(&window)
    }
}

impl std::fmt::Debug for GlfwWindowSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlfwWindowSystem")
            .field("windows", &self.windows.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

fn to_display_mode(mode: &glfw::VidMode) -> DisplayMode {
    DisplayMode::native(
        mode.width,
        mode.height,
        mode.red_bits + mode.green_bits + mode.blue_bits,
        mode.refresh_rate,
    )
}

fn to_glfw_hint(hint: WindowHint) -> Vec<glfw::WindowHint> {
    use glfw::WindowHint as H;
    match hint {
        WindowHint::Visible(v) => vec![H::Visible(v)],
        WindowHint::Resizable(r) => vec![H::Resizable(r)],
        WindowHint::DebugContext(d) => vec![H::OpenGlDebugContext(d)],
        WindowHint::ContextVersion(major, minor) => vec![H::ContextVersion(major, minor)],
        WindowHint::Profile(ContextProfile::Core) => vec![H::OpenGlProfile(glfw::OpenGlProfileHint::Core)],
        WindowHint::Profile(ContextProfile::Compatibility) => {
            vec![H::OpenGlProfile(glfw::OpenGlProfileHint::Compat)]
        }
        WindowHint::ForwardCompatible(f) => vec![H::OpenGlForwardCompat(f)],
        WindowHint::Accumulation { color, alpha } => vec![
            H::AccumRedBits(Some(color)),
            H::AccumGreenBits(Some(color)),
            H::AccumBlueBits(Some(color)),
            H::AccumAlphaBits(Some(alpha)),
        ],
        WindowHint::AlphaBits(n) => vec![H::AlphaBits(Some(n))],
        WindowHint::AuxBuffers(n) => vec![H::AuxBuffers(Some(n))],
        WindowHint::DepthBits(n) => vec![H::DepthBits(Some(n))],
        WindowHint::Samples(n) => vec![H::Samples(Some(n))],
        WindowHint::StencilBits(n) => vec![H::StencilBits(Some(n))],
        WindowHint::Stereo(s) => vec![H::Stereo(s)],
        WindowHint::SrgbCapable(s) => vec![H::SRgbCapable(s)],
    }
}

fn to_native_event(event: WindowEvent) -> Option<NativeEvent> {
    let event = match event {
        WindowEvent::Key(key, scancode, action, mods) => NativeEvent::Key {
            key: key as i32,
            scancode,
            action: match action {
                glfw::Action::Release => KeyAction::Release,
                glfw::Action::Press => KeyAction::Press,
                glfw::Action::Repeat => KeyAction::Repeat,
            },
            mods: mods.bits(),
        },
        WindowEvent::Char(c) => NativeEvent::Char(c),
        WindowEvent::CursorEnter(entered) => NativeEvent::CursorEnter(entered),
        WindowEvent::CursorPos(x, y) => NativeEvent::CursorPos(x, y),
        WindowEvent::MouseButton(button, action, _) => {
            NativeEvent::MouseButton(button as i32, action != glfw::Action::Release)
        }
        WindowEvent::Focus(focused) => NativeEvent::Focus(focused),
        WindowEvent::Iconify(iconified) => NativeEvent::Iconify(iconified),
        WindowEvent::Size(w, h) => NativeEvent::Size(w, h),
        WindowEvent::Pos(x, y) => NativeEvent::Pos(x, y),
        WindowEvent::Refresh => NativeEvent::Refresh,
        WindowEvent::FramebufferSize(w, h) => NativeEvent::FramebufferSize(w, h),
        WindowEvent::Scroll(x, y) => NativeEvent::Scroll(x, y),
        _ => return None,
    };
    Some(event)
}

fn set_polling(window: &mut glfw::PWindow, enabled: bool) {
    window.set_key_polling(enabled);
    window.set_char_polling(enabled);
    window.set_cursor_enter_polling(enabled);
    window.set_cursor_pos_polling(enabled);
    window.set_mouse_button_polling(enabled);
    window.set_focus_polling(enabled);
    window.set_iconify_polling(enabled);
    window.set_size_polling(enabled);
    window.set_pos_polling(enabled);
    window.set_refresh_polling(enabled);
    window.set_framebuffer_size_polling(enabled);
    window.set_scroll_polling(enabled);
}

fn unsigned_pair((a, b): (i32, i32)) -> (u32, u32) {
    (u32::try_from(a).unwrap_or(0), u32::try_from(b).unwrap_or(0))
}

impl WindowSystem for GlfwWindowSystem {
    fn primary_video_mode(&mut self) -> Option<DisplayMode> {
        self.glfw
            .with_primary_monitor(|_, monitor| monitor.and_then(|m| m.get_video_mode()))
            .map(|mode| to_display_mode(&mode))
    }

    fn video_modes(&mut self) -> Vec<DisplayMode> {
        self.glfw.with_primary_monitor(|_, monitor| {
            monitor.map_or_else(Vec::new, |m| m.get_video_modes().iter().map(to_display_mode).collect())
        })
    }

    fn default_window_hints(&mut self) {
        self.glfw.default_window_hints();
    }

    fn window_hint(&mut self, hint: WindowHint) {
        for native in to_glfw_hint(hint) {
            self.glfw.window_hint(native);
        }
    }

    fn create_window(&mut self, request: &WindowRequest) -> Option<WindowId> {
        let parent = request
            .share_with
            .and_then(|id| self.windows.get(&id))
            .map(|native| &native.window);
        let title = request.title.as_str();
        let (width, height) = (request.width, request.height);

        let monitor_binding = request.monitor;
        let (created, bound) = self.glfw.with_primary_monitor(|glfw, monitor| {
            let (mode, bound) = match (monitor_binding, monitor) {
                (MonitorBinding::Primary, Some(m)) => (WindowMode::FullScreen(&*m), MonitorBinding::Primary),
                (MonitorBinding::Primary, None) => {
                    warn!("No primary monitor, creating a windowed window instead");
                    (WindowMode::Windowed, MonitorBinding::Windowed)
                }
                (MonitorBinding::Windowed, _) => (WindowMode::Windowed, MonitorBinding::Windowed),
            };
            let created = match parent {
                Some(parent) => parent.create_shared(width, height, title, mode),
                None => glfw.create_window(width, height, title, mode),
            };
            (created, bound)
        });

        let (window, events) = created?;
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(
            id,
            NativeWindow {
                window,
                events,
                callbacks: None,
                monitor: bound,
            },
        );
        Some(id)
    }

    fn destroy_window(&mut self, window: WindowId) {
        // Dropping the PWindow destroys the native window
        self.windows.remove(&window);
    }

    fn set_callbacks(&mut self, window: WindowId, callbacks: Callbacks) {
        if let Some(native) = self.native_mut(window) {
            set_polling(&mut native.window, true);
            native.callbacks = Some(callbacks);
        }
    }

    fn release_callbacks(&mut self, window: WindowId) -> bool {
        let Some(native) = self.native_mut(window) else {
            return false;
        };
        set_polling(&mut native.window, false);
        // Discard events queued for the released set
        for _ in glfw::flush_messages(&native.events) {}
        native.callbacks.take().is_some()
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
        for native in self.windows.values_mut() {
            for (_, event) in glfw::flush_messages(&native.events) {
                if let (Some(callbacks), Some(event)) = (native.callbacks.as_mut(), to_native_event(event)) {
                    callbacks.dispatch(event);
                }
            }
        }
    }

    fn swap_buffers(&mut self, window: WindowId) -> Result<(), String> {
        let native = self.native_mut(window).ok_or_else(|| format!("window {} is not live", window.raw()))?;
        native.window.swap_buffers();
        Ok(())
    }

    fn window_size(&self, window: WindowId) -> (u32, u32) {
        self.native(window).map_or((0, 0), |n| unsigned_pair(n.window.get_size()))
    }

    fn set_window_size(&mut self, window: WindowId, width: u32, height: u32) {
        if let Some(native) = self.native_mut(window) {
            native.window.set_size(
                i32::try_from(width).unwrap_or(i32::MAX),
                i32::try_from(height).unwrap_or(i32::MAX),
            );
        }
    }

    fn framebuffer_size(&self, window: WindowId) -> (u32, u32) {
        self.native(window)
            .map_or((0, 0), |n| unsigned_pair(n.window.get_framebuffer_size()))
    }

    fn window_pos(&self, window: WindowId) -> (i32, i32) {
        self.native(window).map_or((0, 0), |n| n.window.get_pos())
    }

    fn set_window_pos(&mut self, window: WindowId, x: i32, y: i32) {
        if let Some(native) = self.native_mut(window) {
            native.window.set_pos(x, y);
        }
    }

    fn window_monitor(&self, window: WindowId) -> MonitorBinding {
        self.native(window).map_or(MonitorBinding::Windowed, |n| n.monitor)
    }

    fn set_window_monitor(&mut self, window: WindowId, monitor: MonitorBinding, width: u32, height: u32, refresh_rate: u32) {
        let Some(native) = self.windows.get_mut(&window) else {
            return;
        };
        let bound = self.glfw.with_primary_monitor(|_, primary| match (monitor, primary) {
            (MonitorBinding::Primary, Some(m)) => {
                let refresh = (refresh_rate > 0).then_some(refresh_rate);
                native.window.set_monitor(WindowMode::FullScreen(&*m), 0, 0, width, height, refresh);
                MonitorBinding::Primary
            }
            (MonitorBinding::Primary, None) => {
                warn!("No primary monitor, staying windowed");
                native.monitor
            }
            (MonitorBinding::Windowed, _) => {
                let (x, y) = native.window.get_pos();
                native.window.set_monitor(WindowMode::Windowed, x, y, width, height, None);
                MonitorBinding::Windowed
            }
        });
        native.monitor = bound;
    }

    fn set_window_resizable(&mut self, window: WindowId, resizable: bool) {
        if let Some(native) = self.native_mut(window) {
            native.window.set_resizable(resizable);
        }
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        if let Some(native) = self.native_mut(window) {
            native.window.set_title(title);
        }
    }

    fn show_window(&mut self, window: WindowId) {
        if let Some(native) = self.native_mut(window) {
            native.window.show();
        }
    }

    fn set_icon(&mut self, window: WindowId, images: &[IconImage]) -> Result<(), String> {
        let native = self.native_mut(window).ok_or_else(|| format!("window {} is not live", window.raw()))?;
        let pixels = images
            .iter()
            .map(|image| glfw::PixelImage {
                width: image.width,
                height: image.height,
                pixels: image.packed_pixels(),
            })
            .collect();
        native.window.set_icon_from_pixels(pixels);
        Ok(())
    }

    fn should_close(&self, window: WindowId) -> bool {
        self.native(window).is_some_and(|n| n.window.should_close())
    }

    fn set_cursor_grabbed(&mut self, window: WindowId, grabbed: bool) -> Result<(), String> {
        let native = self.native_mut(window).ok_or_else(|| format!("window {} is not live", window.raw()))?;
        native.window.set_cursor_mode(if grabbed {
            glfw::CursorMode::Disabled
        } else {
            glfw::CursorMode::Normal
        });
        Ok(())
    }

    fn make_context_current(&mut self, window: Option<WindowId>) -> Result<(), String> {
        match window {
            Some(id) => {
                let native = self.native_mut(id).ok_or_else(|| format!("window {} is not live", id.raw()))?;
                native.window.make_current();
            }
            None => glfw::make_context_current(None),
        }
        Ok(())
    }

    fn current_context(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|(_, native)| native.window.is_current())
            .map(|(id, _)| *id)
    }

    fn set_swap_interval(&mut self, interval: i32) {
        let interval = match u32::try_from(interval) {
            Ok(0) | Err(_) => glfw::SwapInterval::None,
            Ok(n) => glfw::SwapInterval::Sync(n),
        };
        self.glfw.set_swap_interval(interval);
    }
}
