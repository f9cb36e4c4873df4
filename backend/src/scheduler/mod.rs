//! Pending-event scheduler with deterministic ordering.
//!
//! Events are ordered by:
//! 1. Time (earlier first)
//! 2. Sequence number (FIFO for events at the same time)
//!
//! Sequence numbers are assigned at enqueue time and never reused, so no two
//! keys compare equal and the pop order is fully determined by the order of
//! `push` calls.

use crate::core::time::SimTime;
use crate::models::Event;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Key for ordering events in the scheduler.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EventKey {
    /// When this event should be processed.
    pub time: SimTime,
    /// Enqueue order, for deterministic FIFO among simultaneous events.
    pub sequence: u64,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.sequence.cmp(&other.sequence)
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of pending events
///
/// # Example
/// ```
/// use alert_propagation_core::{Event, Scheduler};
///
/// let mut scheduler = Scheduler::new();
/// scheduler.push(Event::originate_alert(1, "late", 5));
/// scheduler.push(Event::originate_alert(1, "first", 0));
/// scheduler.push(Event::originate_alert(2, "second", 0));
///
/// let order: Vec<String> = std::iter::from_fn(|| scheduler.pop_min())
///     .map(|(_, event)| event.description().to_string())
///     .collect();
/// assert_eq!(order, vec!["first", "second", "late"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BTreeMap<EventKey, Event>,
    next_sequence: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `event` at its own time, returning the key it was filed under
    pub fn push(&mut self, event: Event) -> EventKey {
        let key = EventKey {
            time: event.time(),
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.queue.insert(key, event);
        key
    }

    /// Remove and return the entry with the smallest `(time, sequence)`
    ///
    /// Returns `None` when nothing is pending.
    pub fn pop_min(&mut self) -> Option<(EventKey, Event)> {
        self.queue.pop_first()
    }

    /// Key of the next entry `pop_min` would return
    pub fn peek_key(&self) -> Option<EventKey> {
        self.queue.first_key_value().map(|(key, _)| *key)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total number of events ever enqueued
    pub fn total_enqueued(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key_ordering() {
        let earlier = EventKey {
            time: 1,
            sequence: 9,
        };
        let later = EventKey {
            time: 2,
            sequence: 0,
        };
        assert!(earlier < later, "Time dominates sequence");
    }

    #[test]
    fn test_sequence_ordering_at_same_time() {
        let first = EventKey {
            time: 1,
            sequence: 1,
        };
        let second = EventKey {
            time: 1,
            sequence: 2,
        };
        assert!(first < second, "Lower sequence should process first");
    }

    #[test]
    fn test_pop_on_empty() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.pop_min().is_none());
        assert!(scheduler.peek_key().is_none());
    }

    #[test]
    fn test_sequence_survives_pops() {
        let mut scheduler = Scheduler::new();
        scheduler.push(Event::originate_alert(1, "a", 0));
        scheduler.pop_min();
        let key = scheduler.push(Event::originate_alert(1, "b", 0));

        assert_eq!(key.sequence, 1);
        assert_eq!(scheduler.total_enqueued(), 2);
    }
}
