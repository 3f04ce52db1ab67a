//! Callback bridge between native push callbacks and the pull-style display
//!
//! The native backend invokes callbacks while it pumps its event queue. Each
//! callback here does one thing: translate its native arguments into a
//! [`WindowMessage`] and push it onto a bounded channel. The display drains
//! that channel after the pump returns and applies the messages in order, so
//! no callback ever touches display state or calls back into the backend.
//!
//! ```text
//! poll_events() ──► native callback ──► WindowMessage ──► channel
//!                                                          │
//! process_messages() ◄── drain ◄───────────────────────────┘
//! ```

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::warn;

use crate::backend::KeyAction;

/// Wheel units reported per scroll step
pub const WHEEL_UNITS_PER_STEP: f64 = 120.0;

/// Key callback: key, scancode, action, modifiers
pub type KeyCallback = Box<dyn FnMut(i32, i32, KeyAction, i32)>;
/// Character callback: Unicode code point
pub type CharCallback = Box<dyn FnMut(char)>;
/// Cursor enter/leave callback
pub type CursorEnterCallback = Box<dyn FnMut(bool)>;
/// Cursor position callback, top-left origin
pub type CursorPosCallback = Box<dyn FnMut(f64, f64)>;
/// Mouse button callback: button, pressed
pub type MouseButtonCallback = Box<dyn FnMut(i32, bool)>;
/// Focus callback
pub type WindowFocusCallback = Box<dyn FnMut(bool)>;
/// Iconify callback
pub type WindowIconifyCallback = Box<dyn FnMut(bool)>;
/// Window size callback
pub type WindowSizeCallback = Box<dyn FnMut(i32, i32)>;
/// Window position callback
pub type WindowPosCallback = Box<dyn FnMut(i32, i32)>;
/// Refresh (damage) callback
pub type WindowRefreshCallback = Box<dyn FnMut()>;
/// Framebuffer size callback
pub type FramebufferSizeCallback = Box<dyn FnMut(i32, i32)>;
/// Scroll callback: x offset, y offset
pub type ScrollCallback = Box<dyn FnMut(f64, f64)>;

/// The twelve callback categories registered on every window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackCategory {
    /// Key press/release/repeat
    Key,
    /// Character input
    Char,
    /// Cursor enter/leave
    CursorEnter,
    /// Cursor position
    CursorPos,
    /// Mouse button
    MouseButton,
    /// Window focus
    WindowFocus,
    /// Window iconify
    WindowIconify,
    /// Window size
    WindowSize,
    /// Window position
    WindowPos,
    /// Window refresh
    WindowRefresh,
    /// Framebuffer size
    FramebufferSize,
    /// Scroll wheel
    Scroll,
}

impl CallbackCategory {
    /// Every category, in registration order
    pub const ALL: [Self; 12] = [
        Self::Key,
        Self::Char,
        Self::CursorEnter,
        Self::CursorPos,
        Self::MouseButton,
        Self::WindowFocus,
        Self::WindowIconify,
        Self::WindowSize,
        Self::WindowPos,
        Self::WindowRefresh,
        Self::FramebufferSize,
        Self::Scroll,
    ];
}

/// One event as the native backend reports it, before translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    /// Key event
    Key {
        /// Native key code
        key: i32,
        /// Platform scancode
        scancode: i32,
        /// Action
        action: KeyAction,
        /// Modifier bits
        mods: i32,
    },
    /// Character input
    Char(char),
    /// Cursor entered (`true`) or left the client area
    CursorEnter(bool),
    /// Cursor moved, top-left origin
    CursorPos(f64, f64),
    /// Mouse button pressed (`true`) or released
    MouseButton(i32, bool),
    /// Focus gained or lost
    Focus(bool),
    /// Iconified (`true`) or restored
    Iconify(bool),
    /// Client area resized
    Size(i32, i32),
    /// Window moved
    Pos(i32, i32),
    /// Contents need redrawing
    Refresh,
    /// Framebuffer resized
    FramebufferSize(i32, i32),
    /// Scroll offsets
    Scroll(f64, f64),
}

impl NativeEvent {
    /// The callback category that receives this event
    pub const fn category(&self) -> CallbackCategory {
        match self {
            Self::Key { .. } => CallbackCategory::Key,
            Self::Char(_) => CallbackCategory::Char,
            Self::CursorEnter(_) => CallbackCategory::CursorEnter,
            Self::CursorPos(..) => CallbackCategory::CursorPos,
            Self::MouseButton(..) => CallbackCategory::MouseButton,
            Self::Focus(_) => CallbackCategory::WindowFocus,
            Self::Iconify(_) => CallbackCategory::WindowIconify,
            Self::Size(..) => CallbackCategory::WindowSize,
            Self::Pos(..) => CallbackCategory::WindowPos,
            Self::Refresh => CallbackCategory::WindowRefresh,
            Self::FramebufferSize(..) => CallbackCategory::FramebufferSize,
            Self::Scroll(..) => CallbackCategory::Scroll,
        }
    }
}

/// A translated event, ready to be applied by the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowMessage {
    /// Forward to the keyboard
    Key {
        /// Native key code
        key: i32,
        /// Action
        action: KeyAction,
    },
    /// Forward to the keyboard, paired with the latest key
    Char(char),
    /// Forward to the mouse
    CursorEnter(bool),
    /// Forward to the mouse
    CursorMoved {
        /// X, top-left origin
        x: f64,
        /// Y, top-left origin
        y: f64,
    },
    /// Forward to the mouse
    MouseButton {
        /// Button index
        button: i32,
        /// Whether the button is down
        pressed: bool,
    },
    /// Wheel movement in wheel units
    Wheel(i32),
    /// Focus state
    Focused(bool),
    /// Visibility (not iconified)
    Visible(bool),
    /// Pending resize for the next latch
    Resized {
        /// New width
        width: i32,
        /// New height
        height: i32,
    },
    /// New position
    Moved {
        /// X
        x: i32,
        /// Y
        y: i32,
    },
    /// Contents are dirty
    Dirty,
    /// New framebuffer size
    FramebufferResized {
        /// Width in pixels
        width: i32,
        /// Height in pixels
        height: i32,
    },
}

/// One callback per category, owned by the backend for one window's lifetime
pub struct Callbacks {
    /// Key callback
    pub key: KeyCallback,
    /// Character callback
    pub char: CharCallback,
    /// Cursor enter callback
    pub cursor_enter: CursorEnterCallback,
    /// Cursor position callback
    pub cursor_pos: CursorPosCallback,
    /// Mouse button callback
    pub mouse_button: MouseButtonCallback,
    /// Focus callback
    pub window_focus: WindowFocusCallback,
    /// Iconify callback
    pub window_iconify: WindowIconifyCallback,
    /// Size callback
    pub window_size: WindowSizeCallback,
    /// Position callback
    pub window_pos: WindowPosCallback,
    /// Refresh callback
    pub window_refresh: WindowRefreshCallback,
    /// Framebuffer size callback
    pub framebuffer_size: FramebufferSizeCallback,
    /// Scroll callback
    pub scroll: ScrollCallback,
}

impl Callbacks {
    /// Invoke the callback matching a native event
    pub fn dispatch(&mut self, event: NativeEvent) {
        match event {
            NativeEvent::Key { key, scancode, action, mods } => (self.key)(key, scancode, action, mods),
            NativeEvent::Char(c) => (self.char)(c),
            NativeEvent::CursorEnter(entered) => (self.cursor_enter)(entered),
            NativeEvent::CursorPos(x, y) => (self.cursor_pos)(x, y),
            NativeEvent::MouseButton(button, pressed) => (self.mouse_button)(button, pressed),
            NativeEvent::Focus(focused) => (self.window_focus)(focused),
            NativeEvent::Iconify(iconified) => (self.window_iconify)(iconified),
            NativeEvent::Size(w, h) => (self.window_size)(w, h),
            NativeEvent::Pos(x, y) => (self.window_pos)(x, y),
            NativeEvent::Refresh => (self.window_refresh)(),
            NativeEvent::FramebufferSize(w, h) => (self.framebuffer_size)(w, h),
            NativeEvent::Scroll(x, y) => (self.scroll)(x, y),
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Bounded message channel fed by the callbacks
pub struct CallbackBridge {
    sender: Sender<WindowMessage>,
    receiver: Receiver<WindowMessage>,
}

impl CallbackBridge {
    /// Create a bridge holding at most `capacity` undrained messages
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Build a fresh callback set feeding this bridge
    pub fn callbacks(&self) -> Callbacks {
        let key = self.sender.clone();
        let chars = self.sender.clone();
        let enter = self.sender.clone();
        let cursor = self.sender.clone();
        let button = self.sender.clone();
        let focus = self.sender.clone();
        let iconify = self.sender.clone();
        let size = self.sender.clone();
        let pos = self.sender.clone();
        let refresh = self.sender.clone();
        let framebuffer = self.sender.clone();
        let scroll = self.sender.clone();

        Callbacks {
            key: Box::new(move |key_code, _scancode, action, _mods| {
                forward(&key, WindowMessage::Key { key: key_code, action });
            }),
            char: Box::new(move |c| forward(&chars, WindowMessage::Char(c))),
            cursor_enter: Box::new(move |entered| forward(&enter, WindowMessage::CursorEnter(entered))),
            cursor_pos: Box::new(move |x, y| forward(&cursor, WindowMessage::CursorMoved { x, y })),
            mouse_button: Box::new(move |b, pressed| {
                forward(&button, WindowMessage::MouseButton { button: b, pressed });
            }),
            window_focus: Box::new(move |focused| forward(&focus, WindowMessage::Focused(focused))),
            window_iconify: Box::new(move |iconified| {
                forward(&iconify, WindowMessage::Visible(!iconified));
            }),
            window_size: Box::new(move |width, height| {
                forward(&size, WindowMessage::Resized { width, height });
            }),
            window_pos: Box::new(move |x, y| forward(&pos, WindowMessage::Moved { x, y })),
            window_refresh: Box::new(move || forward(&refresh, WindowMessage::Dirty)),
            framebuffer_size: Box::new(move |width, height| {
                forward(&framebuffer, WindowMessage::FramebufferResized { width, height });
            }),
            scroll: Box::new(move |_x, y| {
                forward(&scroll, WindowMessage::Wheel((y * WHEEL_UNITS_PER_STEP) as i32));
            }),
        }
    }

    /// Take every message queued so far, in arrival order
    pub fn drain(&self) -> Vec<WindowMessage> {
        self.receiver.try_iter().collect()
    }

    /// Number of undrained messages
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

fn forward(sender: &Sender<WindowMessage>, message: WindowMessage) {
    if let Err(TrySendError::Full(dropped)) = sender.try_send(message) {
        warn!("Callback channel full, dropping {dropped:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_translates_in_order() {
        let bridge = CallbackBridge::new(16);
        let mut callbacks = bridge.callbacks();

        callbacks.dispatch(NativeEvent::Key { key: 65, scancode: 30, action: KeyAction::Press, mods: 0 });
        callbacks.dispatch(NativeEvent::Char('a'));
        callbacks.dispatch(NativeEvent::Scroll(0.0, -1.5));
        callbacks.dispatch(NativeEvent::Iconify(true));

        assert_eq!(
            bridge.drain(),
            vec![
                WindowMessage::Key { key: 65, action: KeyAction::Press },
                WindowMessage::Char('a'),
                WindowMessage::Wheel(-180),
                WindowMessage::Visible(false),
            ]
        );
        assert_eq!(bridge.pending(), 0);
    }

    #[test]
    fn test_full_channel_drops_newest() {
        let bridge = CallbackBridge::new(2);
        let mut callbacks = bridge.callbacks();
        callbacks.dispatch(NativeEvent::Pos(1, 1));
        callbacks.dispatch(NativeEvent::Pos(2, 2));
        callbacks.dispatch(NativeEvent::Pos(3, 3));

        assert_eq!(
            bridge.drain(),
            vec![WindowMessage::Moved { x: 1, y: 1 }, WindowMessage::Moved { x: 2, y: 2 }]
        );
    }

    #[test]
    fn test_every_category_has_a_native_event() {
        let events = [
            NativeEvent::Key { key: 0, scancode: 0, action: KeyAction::Release, mods: 0 },
            NativeEvent::Char('x'),
            NativeEvent::CursorEnter(true),
            NativeEvent::CursorPos(0.0, 0.0),
            NativeEvent::MouseButton(0, true),
            NativeEvent::Focus(true),
            NativeEvent::Iconify(false),
            NativeEvent::Size(1, 1),
            NativeEvent::Pos(0, 0),
            NativeEvent::Refresh,
            NativeEvent::FramebufferSize(1, 1),
            NativeEvent::Scroll(0.0, 1.0),
        ];
        let categories: Vec<_> = events.iter().map(NativeEvent::category).collect();
        assert_eq!(categories, CallbackCategory::ALL.to_vec());
    }

    #[test]
    fn test_old_callback_sets_share_the_channel() {
        let bridge = CallbackBridge::new(8);
        let mut first = bridge.callbacks();
        let mut second = bridge.callbacks();
        first.dispatch(NativeEvent::Refresh);
        second.dispatch(NativeEvent::Focus(false));
        drop(first);
        assert_eq!(bridge.drain(), vec![WindowMessage::Dirty, WindowMessage::Focused(false)]);
    }
}
