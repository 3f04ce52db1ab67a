//! Mouse consumer fed by the display's callback bridge
//!
//! Positions are reported with a bottom-left origin. Motion and wheel deltas
//! accumulate between polls and are latched by [`Mouse::poll`].

use std::collections::HashSet;

use log::debug;

use crate::foundation::time::MonotonicClock;
use crate::input::queue::EventQueue;

/// One buffered mouse event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Button that changed, `None` for motion and wheel events
    pub button: Option<i32>,
    /// Whether the button is down after this event
    pub pressed: bool,
    /// X at the time of the event
    pub x: i32,
    /// Y at the time of the event, bottom-left origin
    pub y: i32,
    /// X movement carried by this event
    pub dx: i32,
    /// Y movement carried by this event
    pub dy: i32,
    /// Wheel movement carried by this event
    pub dwheel: i32,
    /// Monotonic timestamp
    pub nanos: u64,
}

/// Buffered and polled mouse state
#[derive(Debug, Default)]
pub struct Mouse {
    created: bool,
    grabbed: bool,
    inside: bool,
    window_height: u32,
    x: i32,
    y: i32,
    accum_dx: i32,
    accum_dy: i32,
    accum_wheel: i32,
    dx: i32,
    dy: i32,
    dwheel: i32,
    buttons: HashSet<i32>,
    queue: EventQueue<MouseEvent>,
    clock: MonotonicClock,
}

impl Mouse {
    /// An uncreated mouse
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting events
    pub fn create(&mut self) {
        if !self.created {
            debug!("Mouse created");
            self.created = true;
        }
    }

    /// Stop accepting events and forget transient state
    ///
    /// The grab request survives so it can be reapplied to the next window.
    pub fn destroy(&mut self) {
        self.created = false;
        self.inside = false;
        self.accum_dx = 0;
        self.accum_dy = 0;
        self.accum_wheel = 0;
        self.dx = 0;
        self.dy = 0;
        self.dwheel = 0;
        self.buttons.clear();
        self.queue.clear();
    }

    /// Whether events are being accepted
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Client height used to flip native top-left coordinates
    pub fn set_window_height(&mut self, height: u32) {
        self.window_height = height;
    }

    /// Record a native cursor position, top-left origin
    pub fn move_event(&mut self, x: f64, y: f64) {
        if !self.created {
            return;
        }
        let height = i32::try_from(self.window_height).unwrap_or(i32::MAX);
        let new_x = x.floor() as i32;
        let new_y = height - 1 - y.floor() as i32;
        let (dx, dy) = (new_x - self.x, new_y - self.y);
        if dx == 0 && dy == 0 {
            return;
        }
        self.x = new_x;
        self.y = new_y;
        self.accum_dx += dx;
        self.accum_dy += dy;
        self.push(None, false, dx, dy, 0);
    }

    /// Record a button transition
    pub fn button_event(&mut self, button: i32, pressed: bool) {
        if !self.created {
            return;
        }
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
        self.push(Some(button), pressed, 0, 0, 0);
    }

    /// Record wheel movement in wheel units
    pub fn wheel_event(&mut self, units: i32) {
        if !self.created || units == 0 {
            return;
        }
        self.accum_wheel += units;
        self.push(None, false, 0, 0, units);
    }

    /// Record the cursor entering or leaving the client area
    pub fn set_inside_window(&mut self, inside: bool) {
        self.inside = inside;
    }

    fn push(&mut self, button: Option<i32>, pressed: bool, dx: i32, dy: i32, dwheel: i32) {
        let nanos = self.clock.now_nanos();
        self.queue.push(Some(MouseEvent {
            button,
            pressed,
            x: self.x,
            y: self.y,
            dx,
            dy,
            dwheel,
            nanos,
        }));
    }

    /// Latch the deltas accumulated since the previous poll
    pub fn poll(&mut self) {
        if !self.created {
            return;
        }
        self.dx = std::mem::take(&mut self.accum_dx);
        self.dy = std::mem::take(&mut self.accum_dy);
        self.dwheel = std::mem::take(&mut self.accum_wheel);
    }

    /// Record whether the cursor should be captured
    pub fn set_grabbed(&mut self, grabbed: bool) {
        self.grabbed = grabbed;
    }

    /// Whether the cursor is captured
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Whether the cursor is inside the client area
    pub fn is_inside_window(&self) -> bool {
        self.inside
    }

    /// Latest X
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Latest Y, bottom-left origin
    pub fn y(&self) -> i32 {
        self.y
    }

    /// X movement latched at the last poll
    pub fn dx(&self) -> i32 {
        self.dx
    }

    /// Y movement latched at the last poll
    pub fn dy(&self) -> i32 {
        self.dy
    }

    /// Wheel movement latched at the last poll
    pub fn dwheel(&self) -> i32 {
        self.dwheel
    }

    /// Whether a button is down
    pub fn is_button_down(&self, button: i32) -> bool {
        self.buttons.contains(&button)
    }

    /// Advance to the next buffered event
    pub fn next(&mut self) -> bool {
        self.queue.next()
    }

    /// The current buffered event
    pub fn event(&self) -> Option<&MouseEvent> {
        self.queue.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created(height: u32) -> Mouse {
        let mut mouse = Mouse::new();
        mouse.create();
        mouse.set_window_height(height);
        mouse
    }

    #[test]
    fn test_y_is_flipped_to_bottom_left() {
        let mut mouse = created(600);
        mouse.move_event(10.0, 0.0);
        assert_eq!((mouse.x(), mouse.y()), (10, 599));
        mouse.move_event(10.0, 599.0);
        assert_eq!(mouse.y(), 0);
    }

    #[test]
    fn test_deltas_latch_on_poll() {
        let mut mouse = created(100);
        mouse.move_event(0.0, 99.0);
        mouse.poll();
        mouse.move_event(5.0, 89.0);
        mouse.move_event(8.0, 89.0);
        assert_eq!(mouse.dx(), 0);
        mouse.poll();
        assert_eq!((mouse.dx(), mouse.dy()), (8, 10));
        mouse.poll();
        assert_eq!((mouse.dx(), mouse.dy()), (0, 0));
    }

    #[test]
    fn test_wheel_and_buttons_queue_events() {
        let mut mouse = created(100);
        mouse.button_event(0, true);
        mouse.wheel_event(-120);
        mouse.poll();

        assert!(mouse.is_button_down(0));
        assert_eq!(mouse.dwheel(), -120);
        assert!(mouse.next());
        assert_eq!(mouse.event().unwrap().button, Some(0));
        assert!(mouse.next());
        assert_eq!(mouse.event().unwrap().dwheel, -120);
        assert!(!mouse.next());
    }

    #[test]
    fn test_grab_survives_destroy() {
        let mut mouse = created(100);
        mouse.set_grabbed(true);
        mouse.button_event(1, true);
        mouse.destroy();
        assert!(mouse.is_grabbed());
        assert!(!mouse.is_button_down(1));
    }
}
