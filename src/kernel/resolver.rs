use super::context::{ContextStatus, ConversationContext};
use super::error::TurnError;
use super::gate::is_valid_confidence;
use super::intent::{filter_entities, is_dangerous, takes_dictation, Args, Intent};
use super::utterance::Utterance;

/// Pronoun-like words that point back at the previous action.
pub const REFERENCE_WORDS: &[&str] = &["it", "that", "there", "again", "same", "them"];

/// A reference that may be dispatched for the current intent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    pub intent: Intent,
    /// Context entities filtered to the current intent's whitelist.
    pub args: Args,
    /// Boosted confidence, capped at 1.0.
    pub confidence: f32,
    /// Text of the action being referred to.
    pub source_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No reference vocabulary in the utterance.
    NotAReference,
    /// Reference words, but nothing was ever recorded. Ordinary handling continues.
    NoContext,
    Resolved(ResolvedReference),
    /// Firm rejection; the turn ends here.
    Blocked(TurnError),
}

impl Resolution {
    pub fn reason(&self) -> &'static str {
        match self {
            Resolution::NotAReference => "not_a_reference",
            Resolution::NoContext => "no_context",
            Resolution::Resolved(_) => "resolved",
            Resolution::Blocked(err) => err.code(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    min_reference_confidence: f32,
    boost: f32,
}

impl ReferenceResolver {
    pub fn new(min_reference_confidence: f32, boost: f32) -> Self {
        Self {
            min_reference_confidence,
            boost,
        }
    }

    /// Whole-word match only: "item" or "thatch" never count.
    pub fn is_reference(utterance: &Utterance) -> bool {
        utterance.contains_any_word(REFERENCE_WORDS)
    }

    /// Pure: the caller applies any context clearing implied by a `Blocked`.
    pub fn resolve(
        &self,
        utterance: &Utterance,
        intent: Intent,
        confidence: f32,
        context: &ConversationContext,
    ) -> Resolution {
        if takes_dictation(intent) || !Self::is_reference(utterance) {
            return Resolution::NotAReference;
        }

        if !is_valid_confidence(confidence) || confidence < self.min_reference_confidence {
            return Resolution::Blocked(TurnError::AmbiguousReference { confidence });
        }

        let entry = match context.status() {
            ContextStatus::Never => return Resolution::NoContext,
            ContextStatus::Expired => return Resolution::Blocked(TurnError::StaleContextReference),
            ContextStatus::Live(entry) => entry,
        };

        if entry.intent != intent {
            return Resolution::Blocked(TurnError::CrossIntentReferenceBlocked {
                previous: entry.intent,
                current: intent,
            });
        }

        if is_dangerous(intent) {
            return Resolution::Blocked(TurnError::DangerousReplayBlocked { intent });
        }

        Resolution::Resolved(ResolvedReference {
            intent,
            args: filter_entities(intent, &entry.entities),
            confidence: (confidence * self.boost).min(1.0),
            source_text: entry.text.clone(),
        })
    }
}
