use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

use super::intent::{Intent, Provenance};
use super::time::Tick;

/// One dispatched action, kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub tick: Tick,
    pub intent: Intent,
    pub text: String,
    pub confidence: f32,
    pub provenance: Provenance,
    pub success: bool,
}

/// Bounded execution history. Nothing in the decision path reads it.
#[derive(Debug, Clone)]
pub struct ExecutionHistory {
    records: VecDeque<HistoryRecord>,
    capacity: usize,
}

impl ExecutionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
