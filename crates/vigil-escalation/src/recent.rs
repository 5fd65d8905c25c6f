//! Bounded alert log for the UI, oldest first.

use std::collections::VecDeque;

use vigil_core::models::AlertEvent;

/// Keeps the last `capacity` alerts in insertion order; the oldest is dropped.
#[derive(Debug, Clone)]
pub struct RecentAlertLog {
    capacity: usize,
    entries: VecDeque<AlertEvent>,
}

impl RecentAlertLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: AlertEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &AlertEvent> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&AlertEvent> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
