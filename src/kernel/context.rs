use serde::Serialize;

use super::intent::{Args, Intent};
use super::time::Tick;

/// The last successfully executed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextEntry {
    pub intent: Intent,
    pub text: String,
    pub entities: Args,
    pub recorded_at: Tick,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextStatus<'a> {
    /// Nothing was ever recorded this session.
    Never,
    /// Something was recorded and has since been cleared or aged out.
    Expired,
    Live(&'a ContextEntry),
}

/// Single-slot conversation context. Overwritten or cleared, never queued.
///
/// Only `KernelState::reduce` mutates it.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    entry: Option<ContextEntry>,
    ever_recorded: bool,
    ttl_turns: Option<u64>,
}

impl ConversationContext {
    pub fn new(ttl_turns: Option<u64>) -> Self {
        Self {
            entry: None,
            ever_recorded: false,
            ttl_turns,
        }
    }

    pub fn status(&self) -> ContextStatus<'_> {
        match (&self.entry, self.ever_recorded) {
            (Some(entry), _) => ContextStatus::Live(entry),
            (None, true) => ContextStatus::Expired,
            (None, false) => ContextStatus::Never,
        }
    }

    pub fn last(&self) -> Option<&ContextEntry> {
        self.entry.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.entry.is_some()
    }

    /// True when the live entry has outlived the TTL at `now`.
    pub fn is_stale_at(&self, now: Tick) -> bool {
        match (&self.entry, self.ttl_turns) {
            (Some(entry), Some(ttl)) => now.since(entry.recorded_at) > ttl,
            _ => false,
        }
    }

    pub(crate) fn record(&mut self, entry: ContextEntry) {
        self.entry = Some(entry);
        self.ever_recorded = true;
    }

    pub(crate) fn clear(&mut self) {
        self.entry = None;
    }
}
