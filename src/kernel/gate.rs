use tracing::debug;

use super::error::TurnError;
use super::intent::{is_dangerous, Intent};
use super::utterance::Utterance;

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Allow,
    Reject(TurnError),
}

/// Confidence and safety gate. Stateless: identical inputs always decide alike.
#[derive(Debug, Clone)]
pub struct ConfidenceGate {
    min_confidence: f32,
    high_confidence: f32,
}

impl ConfidenceGate {
    pub fn new(min_confidence: f32, high_confidence: f32) -> Self {
        Self {
            min_confidence,
            high_confidence,
        }
    }

    pub fn decide(&self, intent: Intent, confidence: f32, utterance: &Utterance) -> GateDecision {
        debug!(%intent, confidence, tokens = utterance.tokens().len(), "gate check");

        if intent == Intent::Unknown {
            return GateDecision::Reject(TurnError::UnknownIntent);
        }
        // NaN and out-of-range values are refused before any comparison.
        if !is_valid_confidence(confidence) || confidence < self.min_confidence {
            return GateDecision::Reject(TurnError::LowConfidence { confidence });
        }
        if is_dangerous(intent) && confidence < self.high_confidence {
            return GateDecision::Reject(TurnError::InsufficientConfidenceForDangerousAction {
                intent,
                confidence,
            });
        }
        GateDecision::Allow
    }
}

/// Finite and within [0, 1].
pub fn is_valid_confidence(confidence: f32) -> bool {
    (0.0..=1.0).contains(&confidence)
}
