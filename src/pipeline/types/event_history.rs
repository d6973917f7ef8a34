use std::collections::VecDeque;
use std::time::Duration;

/// Number of compression timestamps retained per session.
pub const EVENT_HISTORY_CAPACITY: usize = 10;

/// Fixed-capacity FIFO of compression-completion timestamps.
/// Pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct EventHistory {
    events: VecDeque<Duration>,
    capacity: usize,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, at: Duration) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(at);
    }

    /// The newest `count` timestamps, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = Duration> + '_ {
        let skip = self.events.len().saturating_sub(count);
        self.events.iter().skip(skip).copied()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<Duration> {
        self.events.back().copied()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new()
    }
}
