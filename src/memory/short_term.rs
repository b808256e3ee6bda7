use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::kernel::intent::Intent;
use crate::memory::store::TranscriptStore;
use crate::memory::types::{Role, TranscriptEntry};

pub const MAX_ITEMS: usize = 50;
pub const TTL: Duration = Duration::from_secs(300);
pub const MAX_READ_LIMIT: usize = 10;
pub const DEFAULT_READ_LIMIT: usize = 5;
pub const MIN_READ_CONFIDENCE: f32 = 0.70;

/// Filters for `ShortTermMemory::fetch_recent`. `None` means the default.
#[derive(Debug, Clone, Default)]
pub struct RecentQuery {
    pub limit: Option<usize>,
    pub role: Option<Role>,
    pub intents: Option<Vec<Intent>>,
    pub min_confidence: Option<f32>,
}

/// Session transcript: FIFO, capped at `MAX_ITEMS`, entries expire after `TTL`.
#[derive(Debug, Default)]
pub struct ShortTermMemory {
    items: VecDeque<TranscriptEntry>,
}

impl ShortTermMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, role: Role, content: &str, intent: Intent, confidence: f32) {
        self.store_at(role, content, intent, confidence, Instant::now());
    }

    pub fn store_at(
        &mut self,
        role: Role,
        content: &str,
        intent: Intent,
        confidence: f32,
        now: Instant,
    ) {
        self.items.push_back(TranscriptEntry {
            role,
            content: content.to_string(),
            intent,
            confidence,
            stored_at: now,
        });
        self.cleanup(now);
    }

    pub fn fetch_recent(&mut self, query: &RecentQuery) -> Vec<TranscriptEntry> {
        self.fetch_recent_at(query, Instant::now())
    }

    /// Newest last. An out-of-range limit yields nothing.
    pub fn fetch_recent_at(&mut self, query: &RecentQuery, now: Instant) -> Vec<TranscriptEntry> {
        self.cleanup(now);

        let limit = query.limit.unwrap_or(DEFAULT_READ_LIMIT);
        if limit == 0 || limit > MAX_READ_LIMIT {
            return Vec::new();
        }
        let floor = query.min_confidence.unwrap_or(MIN_READ_CONFIDENCE);

        let matching: Vec<TranscriptEntry> = self
            .items
            .iter()
            .filter(|e| query.role.map_or(true, |r| e.role == r))
            .filter(|e| {
                query
                    .intents
                    .as_ref()
                    .map_or(true, |intents| intents.contains(&e.intent))
            })
            .filter(|e| e.confidence >= floor)
            .cloned()
            .collect();

        let skip = matching.len().saturating_sub(limit);
        matching.into_iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn cleanup(&mut self, now: Instant) {
        while self
            .items
            .front()
            .is_some_and(|e| now.saturating_duration_since(e.stored_at) > TTL)
        {
            self.items.pop_front();
        }
        while self.items.len() > MAX_ITEMS {
            self.items.pop_front();
        }
        debug!(len = self.items.len(), "short-term memory cleaned");
    }
}

impl TranscriptStore for ShortTermMemory {
    fn save(&mut self, role: Role, text: &str, intent: Intent) {
        self.store(role, text, intent, 1.0);
    }

    fn save_scored(&mut self, role: Role, text: &str, intent: Intent, confidence: f32) {
        self.store(role, text, intent, confidence);
    }
}
