use serde::{Deserialize, Serialize};

use super::intent::Intent;

/// How aggressively an interrupt cancels work tied to an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterruptPolicy {
    /// Cancel immediately and clear all turn-scoped state.
    Hard,
    /// Drop only the pending request; conversation context is left alone.
    Soft,
    /// No-op.
    Ignore,
}

impl InterruptPolicy {
    pub fn cancel_message(&self) -> &'static str {
        match self {
            InterruptPolicy::Hard => "Okay, stopped.",
            InterruptPolicy::Soft => "Okay, I dropped that request.",
            InterruptPolicy::Ignore => "Okay.",
        }
    }
}

/// Static policy table. Unknown or absent intents fail safe to `Hard`.
pub fn resolve_policy(intent: Option<Intent>) -> InterruptPolicy {
    match intent {
        Some(Intent::OpenBrowser)
        | Some(Intent::OpenTerminal)
        | Some(Intent::OpenFile)
        | Some(Intent::OpenFileManager)
        | Some(Intent::SaveNote) => InterruptPolicy::Hard,
        Some(Intent::SearchWeb)
        | Some(Intent::ListFiles)
        | Some(Intent::ReadFile)
        | Some(Intent::ReadNotes) => InterruptPolicy::Soft,
        Some(Intent::Greeting) | Some(Intent::Help) => InterruptPolicy::Ignore,
        Some(Intent::Exit) | Some(Intent::Unknown) | None => InterruptPolicy::Hard,
    }
}

/// Interrupt vocabulary. Multi-word phrases must match consecutive tokens.
pub const INTERRUPT_PHRASES: &[&[&str]] = &[
    &["stop"],
    &["cancel"],
    &["abort"],
    &["quit"],
    &["ruk", "ja"],
    &["band", "karo"],
];

pub const NEGATION_TOKENS: &[&str] = &["dont", "don't", "not", "never", "no"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptMatch {
    pub phrase: String,
    pub position: usize,
}

/// Find the first non-negated interrupt phrase anywhere in `tokens`.
pub fn detect_embedded_interrupt(tokens: &[String]) -> Option<InterruptMatch> {
    for position in 0..tokens.len() {
        let Some(phrase) = INTERRUPT_PHRASES
            .iter()
            .find(|phrase| phrase_matches_at(tokens, position, phrase))
        else {
            continue;
        };

        let negated = position > 0 && NEGATION_TOKENS.contains(&tokens[position - 1].as_str());
        if negated {
            continue;
        }

        return Some(InterruptMatch {
            phrase: phrase.join(" "),
            position,
        });
    }
    None
}

pub fn is_interrupt_word(token: &str) -> bool {
    INTERRUPT_PHRASES.iter().any(|phrase| phrase.len() == 1 && phrase[0] == token)
}

fn phrase_matches_at(tokens: &[String], position: usize, phrase: &[&str]) -> bool {
    tokens.len() >= position + phrase.len()
        && phrase
            .iter()
            .zip(&tokens[position..])
            .all(|(word, token)| token == word)
}
