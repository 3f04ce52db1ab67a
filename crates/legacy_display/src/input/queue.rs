//! Single-consumer FIFO queue with a current-record cursor
//!
//! Producers append; the consumer advances with [`EventQueue::next`] and
//! inspects [`EventQueue::current`] until the next advance.

use std::collections::VecDeque;

/// FIFO of records plus the single "current" slot
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    events: VecDeque<T>,
    current: Option<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            events: VecDeque::new(),
            current: None,
        }
    }
}

impl<T> EventQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; `None` is ignored
    pub fn push(&mut self, event: Option<T>) {
        if let Some(event) = event {
            self.events.push_back(event);
        }
    }

    /// Pop the head into the current slot
    ///
    /// Returns `false` and clears the current slot when the queue is empty.
    pub fn next(&mut self) -> bool {
        self.current = self.events.pop_front();
        self.current.is_some()
    }

    /// The record selected by the last successful [`next`](Self::next)
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Drop every queued record and reset the current slot
    pub fn clear(&mut self) {
        self.events.clear();
        self.current = None;
    }

    /// Records not yet consumed
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is waiting to be consumed
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = EventQueue::new();
        queue.push(Some(1));
        queue.push(Some(2));
        queue.push(Some(3));

        let mut seen = Vec::new();
        while queue.next() {
            seen.push(*queue.current().unwrap());
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(queue.current().is_none());
    }

    #[test]
    fn test_none_is_ignored() {
        let mut queue: EventQueue<u8> = EventQueue::new();
        queue.push(None);
        assert!(queue.is_empty());
        assert!(!queue.next());
    }

    #[test]
    fn test_clear_resets_current() {
        let mut queue = EventQueue::new();
        queue.push(Some('a'));
        queue.push(Some('b'));
        assert!(queue.next());
        queue.clear();
        assert!(queue.current().is_none());
        assert!(!queue.next());
        assert_eq!(queue.len(), 0);
    }
}
