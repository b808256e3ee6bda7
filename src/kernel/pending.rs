use serde::Serialize;

use super::error::TurnError;
use super::intent::{missing_slots, Args, Intent, Slot};
use super::time::Tick;

/// Slot-filling phase, for telemetry and callers that only need the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SlotPhase {
    NoPending,
    AwaitingSlots,
}

/// An intent waiting for required arguments across turns.
///
/// Exists only while `missing` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingSlots {
    pub intent: Intent,
    pub args: Args,
    pub missing: Vec<Slot>,
    /// Confidence of the turn that opened the request.
    pub confidence: f32,
    /// Utterance that opened the request.
    pub text: String,
    pub opened_at: Tick,
}

impl PendingSlots {
    /// `None` when nothing is missing: a complete request never waits.
    pub fn open(
        intent: Intent,
        args: Args,
        confidence: f32,
        text: &str,
        opened_at: Tick,
    ) -> Option<Self> {
        let missing = missing_slots(intent, &args);
        if missing.is_empty() {
            return None;
        }
        Some(Self {
            intent,
            args,
            missing,
            confidence,
            text: text.to_string(),
            opened_at,
        })
    }

    /// Merge newly filled values. Blank values never overwrite.
    pub fn merge(&mut self, filled: Args) {
        for (slot, value) in filled {
            if !value.trim().is_empty() {
                self.args.insert(slot, value);
            }
        }
        self.missing = missing_slots(self.intent, &self.args);
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn prompt(&self) -> TurnError {
        TurnError::MissingRequiredSlot {
            intent: self.intent,
            missing: self.missing.clone(),
        }
    }
}

/// Last-resort single-slot recovery: with exactly one slot missing and no
/// extracted value for it, the whole utterance becomes that slot's value.
pub fn recover_single_slot(mut extracted: Args, text: &str, missing: &[Slot]) -> Args {
    if let [only] = missing {
        let empty = extracted.get(only).map_or(true, |v| v.trim().is_empty());
        let text = text.trim();
        if empty && !text.is_empty() {
            extracted.insert(*only, text.to_string());
        }
    }
    extracted
}
