//! Turn-level rejection taxonomy and configuration errors.
//!
//! `TurnError` never escapes the orchestrator as an `Err`: it is carried in
//! `TurnResult::reason`, its `Display` is the user-facing message and
//! `code()` is the stable reason code.

use super::cancel::InterruptSource;
use super::intent::{Intent, Slot};
use super::policy::InterruptPolicy;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TurnError {
    #[error("Intent not supported.")]
    UnknownIntent,

    #[error("I can't perform that action.")]
    LowConfidence { confidence: f32 },

    #[error("I need to be more certain before I {}.", describe(.intent))]
    InsufficientConfidenceForDangerousAction { intent: Intent, confidence: f32 },

    #[error("Please provide {}.", join_slots(.missing))]
    MissingRequiredSlot { intent: Intent, missing: Vec<Slot> },

    #[error("I won't repeat that action for safety.")]
    DangerousReplayBlocked { intent: Intent },

    #[error("Please be more specific.")]
    AmbiguousReference { confidence: f32 },

    #[error("That earlier request is no longer available. Please say it in full.")]
    StaleContextReference,

    #[error("Previous context does not apply to this action.")]
    CrossIntentReferenceBlocked { previous: Intent, current: Intent },

    #[error("{}", cancel_message(.policy))]
    InterruptCancelled {
        origin: InterruptSource,
        policy: InterruptPolicy,
    },

    #[error("{message}")]
    BackendExecutionFailure { intent: Intent, message: String },

    #[error("{message}")]
    ArgumentValidationFailed { intent: Intent, message: String },
}

impl TurnError {
    pub fn code(&self) -> &'static str {
        match self {
            TurnError::UnknownIntent => "unknown_intent",
            TurnError::LowConfidence { .. } => "low_confidence",
            TurnError::InsufficientConfidenceForDangerousAction { .. } => {
                "insufficient_confidence_for_dangerous_action"
            }
            TurnError::MissingRequiredSlot { .. } => "missing_required_slot",
            TurnError::DangerousReplayBlocked { .. } => "dangerous_replay_blocked",
            TurnError::AmbiguousReference { .. } => "ambiguous_reference",
            TurnError::StaleContextReference => "context_expired",
            TurnError::CrossIntentReferenceBlocked { .. } => "cross_intent_blocked",
            TurnError::InterruptCancelled { .. } => "interrupt_cancelled",
            TurnError::BackendExecutionFailure { .. } => "backend_execution_failure",
            TurnError::ArgumentValidationFailed { .. } => "argument_validation_failed",
        }
    }
}

fn describe(intent: &Intent) -> &'static str {
    match intent {
        Intent::OpenBrowser => "open the browser",
        Intent::OpenTerminal => "open a terminal",
        Intent::ListFiles => "list files",
        Intent::OpenFileManager => "open the file manager",
        Intent::OpenFile => "open a file",
        Intent::SearchWeb => "search the web",
        Intent::ReadFile => "read a file",
        Intent::ReadNotes => "read your notes",
        Intent::SaveNote => "save a note",
        Intent::Greeting | Intent::Help | Intent::Exit | Intent::Unknown => "do that",
    }
}

fn cancel_message(policy: &InterruptPolicy) -> &'static str {
    policy.cancel_message()
}

fn join_slots(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(Slot::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
