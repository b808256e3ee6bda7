use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::normalizer::{normalize_spoken_filename, tokenize};
use crate::kernel::intent::{Args, Intent, Slot};

/// Pulls structured arguments out of free text for one intent.
pub trait ArgumentExtractor: Send {
    fn extract(&self, text: &str, intent: Intent) -> Args;

    /// `Err` carries the user-facing reason.
    fn validate(&self, args: &Args, intent: Intent) -> Result<(), String>;
}

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://[^\s]+|www\.[^\s]+\.[^\s]+)").expect("valid url regex")
});
static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(~?/[^\s/][^\s]*|[A-Za-z]:\\[^\s\\][^\s]*)").expect("valid path regex")
});
static SEARCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:search|find|google)\s+(?:for\s+)?(.+)").expect("valid search regex")
});
static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:save|write|take)\s+(?:a\s+|this\s+)?note\b\s*(?:that\s+)?:?\s*(.*)")
        .expect("valid note regex")
});

const WEBSITES: &[(&str, &str)] = &[
    ("youtube", "https://youtube.com"),
    ("google", "https://google.com"),
    ("github", "https://github.com"),
    ("gmail", "https://gmail.com"),
    ("chatgpt", "https://chat.openai.com"),
    ("netflix", "https://netflix.com"),
    ("spotify", "https://spotify.com"),
];

const TERMINAL_WORDS: &[&str] = &["terminal", "cmd", "bash", "shell", "powershell"];

/// Table-and-regex extraction. Deterministic and offline.
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    home: PathBuf,
    system_dirs: Vec<(&'static str, PathBuf)>,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        let home = directories::BaseDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_home(home)
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let system_dirs = [
            ("downloads", "Downloads"),
            ("desktop", "Desktop"),
            ("documents", "Documents"),
            ("pictures", "Pictures"),
            ("music", "Music"),
            ("videos", "Videos"),
        ]
        .into_iter()
        .map(|(name, dir)| (name, home.join(dir)))
        .chain(std::iter::once(("home", home.clone())))
        .collect();

        Self { home, system_dirs }
    }

    fn known_dir(&self, tokens: &[String]) -> Option<(&'static str, String)> {
        self.system_dirs
            .iter()
            .find(|(name, _)| tokens.iter().any(|t| t == name))
            .map(|(name, path)| (*name, path.to_string_lossy().into_owned()))
    }

    fn expand_home(&self, path: &str) -> String {
        match path.strip_prefix('~') {
            Some(rest) => self
                .home
                .join(rest.trim_start_matches('/'))
                .to_string_lossy()
                .into_owned(),
            None => path.to_string(),
        }
    }

    fn browser_args(&self, text: &str, tokens: &[String]) -> Args {
        if let Some((name, url)) = WEBSITES
            .iter()
            .find(|(name, _)| tokens.iter().any(|t| t == name))
        {
            return args([(Slot::Url, url.to_string()), (Slot::Target, name.to_string())]);
        }

        if let Some(m) = URL_RE.captures(text).and_then(|c| c.get(1)) {
            let mut url = m.as_str().to_string();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                url = format!("https://{url}");
            }
            return args([(Slot::Url, url), (Slot::Target, "custom".to_string())]);
        }

        args([
            (Slot::Url, "https://google.com".to_string()),
            (Slot::Target, "default".to_string()),
        ])
    }

    fn terminal_args(&self, text: &str) -> Args {
        let words: Vec<&str> = text.split_whitespace().collect();
        let command = words
            .iter()
            .position(|w| TERMINAL_WORDS.contains(&w.to_lowercase().as_str()))
            .map(|i| words[i + 1..].join(" "))
            .filter(|c| !c.is_empty());

        match command {
            Some(command) => args([
                (Slot::Command, command),
                (Slot::Target, "with_command".to_string()),
            ]),
            None => args([(Slot::Target, "default".to_string())]),
        }
    }

    fn file_manager_args(&self, text: &str, tokens: &[String]) -> Args {
        if let Some((name, path)) = self.known_dir(tokens) {
            return args([(Slot::Path, path), (Slot::Target, name.to_string())]);
        }
        if let Some(m) = PATH_RE.captures(text).and_then(|c| c.get(1)) {
            return args([
                (Slot::Path, self.expand_home(m.as_str())),
                (Slot::Target, "custom_path".to_string()),
            ]);
        }
        args([
            (Slot::Path, self.home.to_string_lossy().into_owned()),
            (Slot::Target, "home".to_string()),
        ])
    }

    fn list_files_args(&self, text: &str, tokens: &[String]) -> Args {
        if let Some((name, path)) = self.known_dir(tokens) {
            return args([(Slot::Path, path), (Slot::Target, name.to_string())]);
        }
        if let Some(m) = PATH_RE.captures(text).and_then(|c| c.get(1)) {
            return args([
                (Slot::Path, self.expand_home(m.as_str())),
                (Slot::Target, "custom_path".to_string()),
            ]);
        }
        args([
            (Slot::Path, self.home.to_string_lossy().into_owned()),
            (Slot::Target, "home".to_string()),
        ])
    }

    fn search_args(&self, text: &str) -> Args {
        SEARCH_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|q| !q.is_empty())
            .map(|query| args([(Slot::Query, query), (Slot::Target, "web_search".to_string())]))
            .unwrap_or_default()
    }

    fn file_args(&self, text: &str) -> Args {
        let spoken = normalize_spoken_filename(&text.to_lowercase());
        spoken
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| matches!(c, ',' | '!' | '?' | '"' | '\'')))
            .map(|w| w.trim_end_matches('.'))
            .find(|w| w.contains('.'))
            .map(|filename| {
                args([
                    (Slot::Filename, filename.to_string()),
                    (Slot::Target, "named_file".to_string()),
                ])
            })
            .unwrap_or_default()
    }

    /// Filename plus a full path when a known folder is named.
    fn read_file_args(&self, text: &str, tokens: &[String]) -> Args {
        let mut found = self.file_args(text);
        let joined = match (found.get(&Slot::Filename), self.known_dir(tokens)) {
            (Some(filename), Some((_, dir))) => Some(
                PathBuf::from(dir)
                    .join(filename)
                    .to_string_lossy()
                    .into_owned(),
            ),
            _ => None,
        };
        if let Some(full_path) = joined {
            found.insert(Slot::FullPath, full_path);
        }
        found
    }

    fn note_args(&self, text: &str) -> Args {
        NOTE_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|note| !note.is_empty())
            .map(|note| args([(Slot::Note, note)]))
            .unwrap_or_default()
    }
}

impl ArgumentExtractor for HeuristicExtractor {
    fn extract(&self, text: &str, intent: Intent) -> Args {
        let tokens = tokenize(text);
        match intent {
            Intent::OpenBrowser => self.browser_args(text, &tokens),
            Intent::OpenTerminal => self.terminal_args(text),
            Intent::OpenFileManager => self.file_manager_args(text, &tokens),
            Intent::ListFiles => self.list_files_args(text, &tokens),
            Intent::SearchWeb => self.search_args(text),
            Intent::OpenFile => self.file_args(text),
            Intent::ReadFile => self.read_file_args(text, &tokens),
            Intent::SaveNote => self.note_args(text),
            Intent::ReadNotes => Args::new(),
            Intent::Greeting | Intent::Help | Intent::Exit | Intent::Unknown => Args::new(),
        }
    }

    fn validate(&self, args: &Args, intent: Intent) -> Result<(), String> {
        match intent {
            Intent::SearchWeb
                if args.get(&Slot::Query).map_or(true, |q| q.trim().is_empty()) =>
            {
                Err("Missing search query".to_string())
            }
            Intent::OpenFileManager => match args.get(&Slot::Path) {
                Some(path) if !PathBuf::from(self.expand_home(path)).exists() => {
                    Err(format!("Path does not exist: {path}"))
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

fn args<const N: usize>(pairs: [(Slot, String); N]) -> Args {
    pairs.into_iter().collect()
}
