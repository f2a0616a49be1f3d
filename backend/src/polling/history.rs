use common::model::reading::Reading;
use std::collections::VecDeque;

/// Bounded, most-recent-first window of readings for one polling session.
#[derive(Debug)]
pub struct ReadingHistory {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl ReadingHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds `reading` at the front, evicting the oldest one once full.
    pub fn push(&mut self, reading: Reading) {
        self.readings.push_front(reading);
        self.readings.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Copies the window out, most recent first.
    pub fn to_vec(&self) -> Vec<Reading> {
        self.readings.iter().cloned().collect()
    }
}
