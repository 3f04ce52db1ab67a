//! Keyboard consumer fed by the display's callback bridge
//!
//! Key and character events are queued as they arrive. The key-down table is
//! only refreshed by [`Keyboard::poll`], so it reflects the state as of the
//! last frame rather than the middle of an event drain.

use std::collections::HashSet;

use log::debug;

use crate::backend::KeyAction;
use crate::foundation::time::MonotonicClock;
use crate::input::queue::EventQueue;

/// One buffered keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Native key code
    pub key: i32,
    /// Character produced, for character events
    pub character: Option<char>,
    /// Whether the key is down
    pub pressed: bool,
    /// Whether this is an auto-repeat
    pub repeat: bool,
    /// Monotonic timestamp
    pub nanos: u64,
}

/// Buffered and polled keyboard state
#[derive(Debug, Default)]
pub struct Keyboard {
    created: bool,
    repeat_events: bool,
    latest_key: i32,
    down: HashSet<i32>,
    pending_down: HashSet<i32>,
    queue: EventQueue<KeyEvent>,
    clock: MonotonicClock,
}

impl Keyboard {
    /// An uncreated keyboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting events
    pub fn create(&mut self) {
        if !self.created {
            debug!("Keyboard created");
            self.created = true;
        }
    }

    /// Stop accepting events and forget all state
    pub fn destroy(&mut self) {
        self.created = false;
        self.latest_key = 0;
        self.down.clear();
        self.pending_down.clear();
        self.queue.clear();
    }

    /// Whether events are being accepted
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Queue auto-repeat events as well as presses and releases
    pub fn enable_repeat_events(&mut self, enable: bool) {
        self.repeat_events = enable;
    }

    /// Whether auto-repeat events are queued
    pub fn are_repeat_events_enabled(&self) -> bool {
        self.repeat_events
    }

    /// Record a native key event
    pub fn key_event(&mut self, key: i32, action: KeyAction) {
        if !self.created {
            return;
        }
        self.latest_key = key;
        if action.is_down() {
            self.pending_down.insert(key);
        } else {
            self.pending_down.remove(&key);
        }
        let repeat = action == KeyAction::Repeat;
        if repeat && !self.repeat_events {
            return;
        }
        let nanos = self.clock.now_nanos();
        self.queue.push(Some(KeyEvent {
            key,
            character: None,
            pressed: action.is_down(),
            repeat,
            nanos,
        }));
    }

    /// Record a character, attributed to the most recent key
    pub fn char_event(&mut self, character: char) {
        if !self.created {
            return;
        }
        let nanos = self.clock.now_nanos();
        self.queue.push(Some(KeyEvent {
            key: self.latest_key,
            character: Some(character),
            pressed: true,
            repeat: false,
            nanos,
        }));
    }

    /// Refresh the polled key-down table
    pub fn poll(&mut self) {
        if self.created {
            self.down.clone_from(&self.pending_down);
        }
    }

    /// Whether a key was down at the last poll
    pub fn is_key_down(&self, key: i32) -> bool {
        self.down.contains(&key)
    }

    /// Advance to the next buffered event
    pub fn next(&mut self) -> bool {
        self.queue.next()
    }

    /// The current buffered event
    pub fn event(&self) -> Option<&KeyEvent> {
        self.queue.current()
    }

    /// Buffered events not yet consumed
    pub fn number_of_events(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncreated_keyboard_ignores_events() {
        let mut keyboard = Keyboard::new();
        keyboard.key_event(65, KeyAction::Press);
        keyboard.poll();
        assert!(!keyboard.next());
        assert!(!keyboard.is_key_down(65));
    }

    #[test]
    fn test_char_inherits_latest_key() {
        let mut keyboard = Keyboard::new();
        keyboard.create();
        keyboard.key_event(65, KeyAction::Press);
        keyboard.char_event('a');

        assert!(keyboard.next());
        assert_eq!(keyboard.event().unwrap().character, None);
        assert!(keyboard.next());
        let event = keyboard.event().unwrap();
        assert_eq!((event.key, event.character), (65, Some('a')));
        assert!(!keyboard.next());
    }

    #[test]
    fn test_key_table_updates_on_poll() {
        let mut keyboard = Keyboard::new();
        keyboard.create();
        keyboard.key_event(32, KeyAction::Press);
        assert!(!keyboard.is_key_down(32));
        keyboard.poll();
        assert!(keyboard.is_key_down(32));
        keyboard.key_event(32, KeyAction::Release);
        keyboard.poll();
        assert!(!keyboard.is_key_down(32));
    }

    #[test]
    fn test_repeat_events_filtered_unless_enabled() {
        let mut keyboard = Keyboard::new();
        keyboard.create();
        keyboard.key_event(10, KeyAction::Repeat);
        assert_eq!(keyboard.number_of_events(), 0);

        keyboard.enable_repeat_events(true);
        keyboard.key_event(10, KeyAction::Repeat);
        assert!(keyboard.next());
        assert!(keyboard.event().unwrap().repeat);
    }

    #[test]
    fn test_destroy_clears_queue() {
        let mut keyboard = Keyboard::new();
        keyboard.create();
        keyboard.key_event(1, KeyAction::Press);
        keyboard.destroy();
        assert!(!keyboard.is_created());
        assert_eq!(keyboard.number_of_events(), 0);
    }
}
