use serde::Serialize;

use super::notes::DEFAULT_NOTE_LIMIT;
use crate::kernel::intent::{Args, Intent, Slot};

/// Closed dispatch table: one variant per intent a backend can execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    OpenBrowser { url: String },
    SearchWeb { query: String },
    OpenFileManager { path: String },
    ListFiles { path: String },
    OpenFile { filename: String, full_path: Option<String> },
    OpenTerminal { command: String },
    ReadFile { filename: String, full_path: Option<String> },
    SaveNote { content: String },
    ReadNotes { limit: usize },
}

impl Action {
    /// Build the action for `intent` from resolved arguments.
    ///
    /// `None` for intents with nothing to dispatch, or when a required value
    /// is absent or blank.
    pub fn from_request(intent: Intent, args: &Args) -> Option<Action> {
        let value = |slot: Slot| {
            args.get(&slot)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match intent {
            Intent::OpenBrowser => Some(Action::OpenBrowser { url: value(Slot::Url)? }),
            Intent::SearchWeb => Some(Action::SearchWeb { query: value(Slot::Query)? }),
            Intent::OpenFileManager => Some(Action::OpenFileManager { path: value(Slot::Path)? }),
            Intent::ListFiles => Some(Action::ListFiles { path: value(Slot::Path)? }),
            Intent::OpenFile => Some(Action::OpenFile {
                filename: value(Slot::Filename)?,
                full_path: value(Slot::FullPath),
            }),
            Intent::OpenTerminal => Some(Action::OpenTerminal {
                command: value(Slot::Command)?,
            }),
            Intent::ReadFile => Some(Action::ReadFile {
                filename: value(Slot::Filename)?,
                full_path: value(Slot::FullPath),
            }),
            Intent::SaveNote => Some(Action::SaveNote {
                content: value(Slot::Note)?,
            }),
            Intent::ReadNotes => Some(Action::ReadNotes {
                limit: DEFAULT_NOTE_LIMIT,
            }),
            Intent::Greeting | Intent::Help | Intent::Exit | Intent::Unknown => None,
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            Action::OpenBrowser { .. } => Intent::OpenBrowser,
            Action::SearchWeb { .. } => Intent::SearchWeb,
            Action::OpenFileManager { .. } => Intent::OpenFileManager,
            Action::ListFiles { .. } => Intent::ListFiles,
            Action::OpenFile { .. } => Intent::OpenFile,
            Action::OpenTerminal { .. } => Intent::OpenTerminal,
            Action::ReadFile { .. } => Intent::ReadFile,
            Action::SaveNote { .. } => Intent::SaveNote,
            Action::ReadNotes { .. } => Intent::ReadNotes,
        }
    }

    pub fn name(&self) -> &'static str {
        self.intent().as_str()
    }
}

/// What a backend reports back for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
