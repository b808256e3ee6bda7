use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Intent categories produced by the classifier.
///
/// Declaration order doubles as the classifier's tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Help,
    Exit,
    OpenBrowser,
    OpenTerminal,
    ListFiles,
    OpenFileManager,
    OpenFile,
    SearchWeb,
    ReadFile,
    ReadNotes,
    SaveNote,
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 13] = [
        Intent::Greeting,
        Intent::Help,
        Intent::Exit,
        Intent::OpenBrowser,
        Intent::OpenTerminal,
        Intent::ListFiles,
        Intent::OpenFileManager,
        Intent::OpenFile,
        Intent::SearchWeb,
        Intent::ReadFile,
        Intent::ReadNotes,
        Intent::SaveNote,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Exit => "exit",
            Intent::OpenBrowser => "open_browser",
            Intent::OpenTerminal => "open_terminal",
            Intent::ListFiles => "list_files",
            Intent::OpenFileManager => "open_file_manager",
            Intent::OpenFile => "open_file",
            Intent::SearchWeb => "search_web",
            Intent::ReadFile => "read_file",
            Intent::ReadNotes => "read_notes",
            Intent::SaveNote => "save_note",
            Intent::Unknown => "unknown",
        }
    }

    /// Small-talk intents answered by the session without touching a backend.
    pub fn is_conversational(&self) -> bool {
        matches!(self, Intent::Greeting | Intent::Help | Intent::Exit)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named argument an action can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Url,
    Query,
    Path,
    Filename,
    FullPath,
    Command,
    Note,
    Target,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Url => "url",
            Slot::Query => "query",
            Slot::Path => "path",
            Slot::Filename => "filename",
            Slot::FullPath => "full_path",
            Slot::Command => "command",
            Slot::Note => "note",
            Slot::Target => "target",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved arguments, keyed by slot.
pub type Args = BTreeMap<Slot, String>;

/// Classifier output for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIntent {
    pub intent: Intent,
    pub confidence: f32,
}

impl ClassifiedIntent {
    pub fn unknown() -> Self {
        Self { intent: Intent::Unknown, confidence: 0.0 }
    }
}

/// Where the arguments of an action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Extracted from the current utterance.
    Fresh,
    /// Taken from the conversation context through a reference ("do it again").
    Followup,
    /// Supplied by the caller or accumulated through slot filling.
    Replay,
}

/// A fully assembled request, built once per turn and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub intent: Intent,
    pub args: Args,
    pub confidence: f32,
    pub provenance: Provenance,
}
