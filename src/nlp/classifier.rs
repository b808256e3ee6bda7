use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::kernel::intent::{ClassifiedIntent, Intent};

/// Turns tokens into a scored intent.
pub trait Classifier: Send {
    fn classify(&self, tokens: &[String]) -> BTreeMap<Intent, u32>;
    fn pick_best(&self, scores: &BTreeMap<Intent, u32>, tokens: &[String]) -> ClassifiedIntent;
}

const KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Greeting, &["hi", "hello", "hey"]),
    (Intent::Help, &["help", "commands"]),
    (Intent::Exit, &["exit", "quit", "bye"]),
    (
        Intent::OpenBrowser,
        &[
            "browser", "chrome", "firefox", "internet", "youtube", "google", "github", "gmail",
            "netflix", "spotify", "chatgpt", "website", "site",
        ],
    ),
    (Intent::OpenTerminal, &["terminal", "console", "shell", "bash", "cmd"]),
    (Intent::ListFiles, &["list", "ls", "contents"]),
    (
        Intent::OpenFileManager,
        &["files", "file", "folder", "directory", "downloads", "download", "desktop", "documents"],
    ),
    (Intent::OpenFile, &["txt", "pdf", "md", "log", "doc", "docx"]),
    (Intent::SearchWeb, &["search", "find", "lookup", "query"]),
    (Intent::ReadFile, &["txt", "md", "log"]),
    (Intent::ReadNotes, &["notes"]),
    (Intent::SaveNote, &["note"]),
];

/// Verbs that hint at an intent without naming its object.
const VERB_ALIASES: &[(&str, Intent)] = &[
    ("search", Intent::SearchWeb),
    ("find", Intent::SearchWeb),
    ("lookup", Intent::SearchWeb),
    ("look", Intent::SearchWeb),
    ("list", Intent::ListFiles),
    ("show", Intent::ListFiles),
    ("read", Intent::ReadFile),
    ("read", Intent::ReadNotes),
    ("show", Intent::ReadNotes),
    ("save", Intent::SaveNote),
    ("write", Intent::SaveNote),
];

const OPEN_VERBS: &[&str] = &["open", "launch", "start"];

/// Intents an open verb can launch. The browser is the fallback when none
/// of the others has keyword evidence.
const OPENABLE: &[Intent] = &[
    Intent::OpenTerminal,
    Intent::OpenFileManager,
    Intent::OpenFile,
    Intent::OpenBrowser,
];

/// Words that lift refined confidence.
const STRONG_VERBS: &[&str] = &["open", "save", "read", "exit", "play", "stop"];

/// Keyword and verb-alias scoring. No learned component.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn has_alias_hit(intent: Intent, tokens: &[String]) -> bool {
        tokens.iter().any(|t| {
            VERB_ALIASES
                .iter()
                .any(|(verb, aliased)| *aliased == intent && t == verb)
        })
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, tokens: &[String]) -> BTreeMap<Intent, u32> {
        let mut scores: BTreeMap<Intent, u32> = Intent::ALL.iter().map(|i| (*i, 0)).collect();

        for (intent, keywords) in KEYWORDS {
            let hits = tokens.iter().filter(|t| keywords.contains(&t.as_str())).count();
            *scores.entry(*intent).or_default() += hits as u32;
        }

        for token in tokens {
            for (verb, intent) in VERB_ALIASES {
                if token == verb {
                    *scores.entry(*intent).or_default() += 1;
                }
            }
        }

        if tokens.iter().any(|t| OPEN_VERBS.contains(&t.as_str())) {
            let evidenced = OPENABLE
                .iter()
                .any(|i| *i != Intent::OpenBrowser && scores.get(i).copied().unwrap_or(0) > 0);
            if !evidenced {
                *scores.entry(Intent::OpenBrowser).or_default() += 1;
            }
            for intent in OPENABLE {
                if let Some(score) = scores.get_mut(intent) {
                    if *score > 0 {
                        *score += 1;
                    }
                }
            }
        }

        scores
    }

    /// Highest score wins; ties go to the intent whose verb was spoken, then
    /// to declaration order.
    fn pick_best(&self, scores: &BTreeMap<Intent, u32>, tokens: &[String]) -> ClassifiedIntent {
        let best = scores
            .iter()
            .filter(|(_, score)| **score > 0)
            .max_by_key(|(intent, score)| {
                (**score, Self::has_alias_hit(**intent, tokens), Reverse(**intent))
            });

        let Some((&intent, &score)) = best else {
            return ClassifiedIntent::unknown();
        };

        if intent == Intent::Exit {
            return ClassifiedIntent {
                intent,
                confidence: 1.0,
            };
        }

        let confidence = (score as f32 / tokens.len().max(1) as f32).min(1.0);
        ClassifiedIntent { intent, confidence }
    }
}

/// Adjust raw classifier confidence with cheap lexical cues.
pub fn refine_confidence(
    base: f32,
    tokens: &[String],
    intent: Intent,
    last_intent: Option<Intent>,
) -> f32 {
    let mut confidence = base;

    if tokens.iter().any(|t| STRONG_VERBS.contains(&t.as_str())) {
        confidence += 0.15;
    }

    if tokens.len() <= 2 && !matches!(intent, Intent::Greeting | Intent::Help) {
        confidence -= 0.10;
    }

    if last_intent == Some(intent) {
        confidence += 0.20;
    }

    confidence.clamp(0.0, 1.0)
}
