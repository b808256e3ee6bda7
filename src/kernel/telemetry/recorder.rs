use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Ring buffer of turn events. Oldest events fall off once full.
#[derive(Debug)]
pub struct TelemetryRecorder {
    events: VecDeque<TelemetryEvent>,
    capacity: usize,
    evicted: u64,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            evicted: 0,
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        while self.events.len() >= self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
        self.events.push_back(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to the capacity bound. Snapshots only count what is held.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.events)
    }
}
