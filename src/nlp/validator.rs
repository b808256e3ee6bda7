use serde::Serialize;

use super::normalizer::normalize_text;
use crate::kernel::policy::is_interrupt_word;

/// Single words that are complete commands on their own.
const SYSTEM_WORDS: &[&str] = &["exit", "quit", "bye", "help", "hi", "hello", "hey"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Empty,
    TooShort,
    TooFewWords,
    Repeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(String),
    Invalid { clean: String, reason: RejectReason },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }
}

/// Filters noise before classification.
#[derive(Debug, Default)]
pub struct InputValidator {
    last_input: Option<String>,
}

impl InputValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `slot_pending` relaxes the length rules: a one-word answer to a
    /// prompt is a real answer.
    pub fn validate(&mut self, raw: &str, slot_pending: bool) -> Validation {
        let clean = normalize_text(raw);
        if clean.is_empty() {
            return Validation::Invalid {
                clean,
                reason: RejectReason::Empty,
            };
        }

        let words: Vec<&str> = clean.split(' ').collect();
        let exempt = slot_pending
            || words
                .iter()
                .all(|w| is_interrupt_word(w) || SYSTEM_WORDS.contains(w));

        if !exempt && clean.chars().count() < 3 {
            return Validation::Invalid {
                clean,
                reason: RejectReason::TooShort,
            };
        }
        if !exempt && words.len() < 2 {
            return Validation::Invalid {
                clean,
                reason: RejectReason::TooFewWords,
            };
        }

        let interrupt = words.iter().any(|w| is_interrupt_word(w));
        if !interrupt && self.last_input.as_deref() == Some(clean.as_str()) {
            return Validation::Invalid {
                clean,
                reason: RejectReason::Repeat,
            };
        }

        self.last_input = Some(clean.clone());
        Validation::Valid(clean)
    }

    pub fn reset(&mut self) {
        self.last_input = None;
    }
}
