use serde::{Deserialize, Serialize};

use crate::kernel::cancel::InterruptSource;
use crate::kernel::intent::{Intent, Provenance};
use crate::kernel::policy::InterruptPolicy;
use crate::kernel::time::Tick;

// Allowed: intents, reason codes, ticks, enums
// Forbidden: utterance text, argument values

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    TurnCompleted {
        tick: Tick,
        intent: Intent,
        outcome: OutcomeKind,
        reason: Option<String>,
    },

    Interruption {
        source: InterruptSource,
        policy: InterruptPolicy,
    },

    Slot {
        intent: Intent,
        event: SlotEventKind,
    },

    Reference {
        kind: ReferenceKind,
    },

    Dispatch {
        intent: Intent,
        provenance: Provenance,
        success: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Executed,
    Failed,
    Rejected,
    Prompted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotEventKind {
    Opened,
    Reprompted,
    Recovered,
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    Resolved,
    Blocked,
    FellThrough,
}
