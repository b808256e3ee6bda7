use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::action::ActionOutcome;

pub const MIN_NOTE_WORDS: usize = 3;
pub const DEFAULT_NOTE_LIMIT: usize = 5;

/// In-session note store. Clones share the same notes; nothing is written
/// to disk.
#[derive(Debug, Clone, Default)]
pub struct NoteBook {
    notes: Arc<Mutex<Vec<String>>>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects content shorter than `MIN_NOTE_WORDS` words.
    pub fn save(&self, content: &str) -> ActionOutcome {
        let content = content.trim();
        if content.split_whitespace().count() < MIN_NOTE_WORDS {
            return ActionOutcome::failed("Please say the note content again.");
        }

        let mut notes = match self.notes.lock() {
            Ok(notes) => notes,
            Err(e) => {
                warn!(error = %e, "note store lock poisoned");
                return ActionOutcome::failed("I couldn't save that note.");
            }
        };
        notes.push(content.to_string());
        debug!(count = notes.len(), "note saved");
        ActionOutcome::ok(format!("I saved this note: {content}"))
    }

    /// Newest first, numbered from 1.
    pub fn recent(&self, limit: usize) -> ActionOutcome {
        let notes = match self.notes.lock() {
            Ok(notes) => notes,
            Err(e) => {
                warn!(error = %e, "note store lock poisoned");
                return ActionOutcome::failed("I couldn't read your notes.");
            }
        };
        if notes.is_empty() {
            return ActionOutcome::ok("You have no notes.");
        }

        let lines: Vec<String> = notes
            .iter()
            .rev()
            .take(limit.max(1))
            .enumerate()
            .map(|(i, note)| format!("{}. {note}", i + 1))
            .collect();
        ActionOutcome::ok(format!("Your recent notes:\n{}", lines.join("\n")))
    }

    pub fn len(&self) -> usize {
        self.notes.lock().map_or(0, |notes| notes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
