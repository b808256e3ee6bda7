use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use super::action::{Action, ActionOutcome};
use super::backend::ActionBackend;
use super::notes::NoteBook;
use crate::kernel::cancel::InterruptSignal;

const LIST_LIMIT: usize = 20;
const READABLE_EXTENSIONS: &[&str] = &["txt", "md", "log"];
const MAX_READ_BYTES: u64 = 1024 * 1024;
const MAX_READ_CHARS: usize = 800;

#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPENER: &str = "xdg-open";

/// Why a path was refused by the home sandbox.
enum Refused {
    Missing,
    OutsideHome,
}

/// Desktop backend: launches through the platform opener, lists and reads
/// inside `home`, and keeps session notes.
#[derive(Debug, Clone)]
pub struct SystemActions {
    home: PathBuf,
    opener: String,
    terminal: String,
    notes: NoteBook,
}

impl Default for SystemActions {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemActions {
    pub fn new() -> Self {
        let home = directories::BaseDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_home(home)
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            opener: DEFAULT_OPENER.to_string(),
            terminal: "xterm".to_string(),
            notes: NoteBook::new(),
        }
    }

    /// Replace the platform opener, e.g. with a wrapper script.
    pub fn with_opener(mut self, opener: impl Into<String>) -> Self {
        self.opener = opener.into();
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    fn open_browser(&self, url: &str) -> ActionOutcome {
        match self.launch(&self.opener, &[url]) {
            Ok(()) => ActionOutcome::ok(format!("Opening {url}")),
            Err(e) => ActionOutcome::failed(format!("Failed to open browser: {e}")),
        }
    }

    fn search_web(&self, query: &str) -> ActionOutcome {
        let url = format!(
            "https://www.google.com/search?q={}",
            urlencoding::encode(query)
        );
        match self.launch(&self.opener, &[&url]) {
            Ok(()) => ActionOutcome::ok(format!("Searching for {query}")),
            Err(e) => ActionOutcome::failed(format!("Failed to search: {e}")),
        }
    }

    fn open_file_manager(&self, path: &str) -> ActionOutcome {
        let dir = match self.sandboxed(&self.expand(path)) {
            Ok(dir) if dir.is_dir() => dir,
            Ok(_) | Err(Refused::Missing) => {
                return ActionOutcome::failed(format!("Path does not exist: {path}"))
            }
            Err(Refused::OutsideHome) => {
                return ActionOutcome::failed("I can't access that location.")
            }
        };
        let target = dir.to_string_lossy();
        match self.launch(&self.opener, &[&target]) {
            Ok(()) => ActionOutcome::ok(format!("Opening {}", dir.display())),
            Err(e) => ActionOutcome::failed(format!("Failed to open file manager: {e}")),
        }
    }

    fn open_terminal(&self, command: &str) -> ActionOutcome {
        match self.launch(&self.terminal, &["-hold", "-e", "sh", "-c", command]) {
            Ok(()) => ActionOutcome::ok(format!("Opening a terminal running `{command}`")),
            Err(e) => ActionOutcome::failed(format!("Failed to open terminal: {e}")),
        }
    }

    fn open_file(&self, filename: &str, full_path: Option<&str>) -> ActionOutcome {
        let path = match self.sandboxed(&self.file_candidate(filename, full_path)) {
            Ok(path) if path.is_file() => path,
            Ok(_) | Err(Refused::Missing) => {
                return ActionOutcome::failed(format!("I couldn't find {filename}."))
            }
            Err(Refused::OutsideHome) => {
                return ActionOutcome::failed("I can't open files outside your home folder.")
            }
        };

        let target = path.to_string_lossy();
        match self.launch(&self.opener, &[&target]) {
            Ok(()) => ActionOutcome::ok(format!("Opening {filename}")),
            Err(e) => ActionOutcome::failed(format!("Failed to open {filename}: {e}")),
        }
    }

    /// Plain text only (`.txt`, `.md`, `.log`), at most 1 MB, shown up to
    /// 800 characters.
    pub fn read_file(&self, filename: &str, full_path: Option<&str>) -> ActionOutcome {
        let path = match self.sandboxed(&self.file_candidate(filename, full_path)) {
            Ok(path) if path.is_file() => path,
            Ok(_) | Err(Refused::Missing) => {
                return ActionOutcome::failed(format!("I couldn't find {filename}."))
            }
            Err(Refused::OutsideHome) => {
                return ActionOutcome::failed("I can't read files outside your home folder.")
            }
        };

        let readable = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| READABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        let small = std::fs::metadata(&path).is_ok_and(|m| m.len() <= MAX_READ_BYTES);
        if !readable || !small {
            return ActionOutcome::failed("That file cannot be read safely.");
        }

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "read_file failed");
                return ActionOutcome::failed("That file cannot be read safely.");
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        let content = text.trim();
        if content.is_empty() {
            return ActionOutcome::ok("The file is empty.");
        }

        let mut shown: String = content.chars().take(MAX_READ_CHARS).collect();
        if content.chars().count() > MAX_READ_CHARS {
            shown.push_str("...");
        }
        ActionOutcome::ok(format!("Here is the content of {filename}:\n{shown}"))
    }

    /// First twenty entries by name, folders before files. Only inside `home`.
    pub fn list_files(&self, path: &str) -> ActionOutcome {
        let dir = match self.sandboxed(&self.expand(path)) {
            Ok(dir) => dir,
            Err(Refused::Missing) => return ActionOutcome::failed("I couldn't list files there."),
            Err(Refused::OutsideHome) => {
                return ActionOutcome::failed("I can't access that location.")
            }
        };
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "list_files failed");
                return ActionOutcome::failed("I couldn't list files there.");
            }
        };

        let mut names: Vec<(String, bool)> = entries
            .filter_map(Result::ok)
            .map(|entry| {
                let is_dir = entry.path().is_dir();
                (entry.file_name().to_string_lossy().into_owned(), is_dir)
            })
            .collect();
        names.sort();
        names.truncate(LIST_LIMIT);

        if names.is_empty() {
            return ActionOutcome::ok("That folder is empty.");
        }

        let folders: Vec<String> = names
            .iter()
            .filter(|(_, is_dir)| *is_dir)
            .map(|(name, _)| format!("{name}/"))
            .collect();
        let files: Vec<&str> = names
            .iter()
            .filter(|(_, is_dir)| !*is_dir)
            .map(|(name, _)| name.as_str())
            .collect();

        let mut parts = Vec::new();
        if !folders.is_empty() {
            parts.push(format!("Folders: {}", folders.join(", ")));
        }
        if !files.is_empty() {
            parts.push(format!("Files: {}", files.join(", ")));
        }
        ActionOutcome::ok(parts.join(" | "))
    }

    fn expand(&self, path: &str) -> PathBuf {
        match path.strip_prefix('~') {
            Some(rest) => self.home.join(rest.trim_start_matches('/')),
            None => self.home.join(path),
        }
    }

    fn file_candidate(&self, filename: &str, full_path: Option<&str>) -> PathBuf {
        match full_path {
            Some(path) => self.expand(path),
            None => self.home.join(filename.replace("..", "")),
        }
    }

    /// Canonical form of `candidate`, provided it exists under `home`.
    fn sandboxed(&self, candidate: &Path) -> Result<PathBuf, Refused> {
        let resolved = candidate.canonicalize().map_err(|_| Refused::Missing)?;
        let home = self.home.canonicalize().map_err(|_| Refused::OutsideHome)?;
        if resolved.starts_with(&home) {
            Ok(resolved)
        } else {
            Err(Refused::OutsideHome)
        }
    }

    fn launch(&self, program: &str, args: &[&str]) -> std::io::Result<()> {
        let mut command = Command::new(program);
        command.args(args);
        spawn_detached(&mut command).map(|_| ())
    }
}

/// Start `command` with null stdio and reap it from a background thread,
/// so launched programs never linger as zombies.
pub fn spawn_detached(command: &mut Command) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();

    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => {
            debug!(pid, %status, "launched program exited");
            Some(status)
        }
        Err(e) => {
            warn!(pid, error = %e, "failed to reap launched program");
            None
        }
    }))
}

impl ActionBackend for SystemActions {
    fn dispatch(&self, action: &Action, interrupt: &InterruptSignal) -> ActionOutcome {
        if interrupt.is_triggered() {
            return ActionOutcome::failed("Action cancelled.");
        }

        info!(action = action.name(), "dispatching");
        match action {
            Action::OpenBrowser { url } => self.open_browser(url),
            Action::SearchWeb { query } => self.search_web(query),
            Action::OpenFileManager { path } => self.open_file_manager(path),
            Action::ListFiles { path } => self.list_files(path),
            Action::OpenFile {
                filename,
                full_path,
            } => self.open_file(filename, full_path.as_deref()),
            Action::OpenTerminal { command } => self.open_terminal(command),
            Action::ReadFile {
                filename,
                full_path,
            } => self.read_file(filename, full_path.as_deref()),
            Action::SaveNote { content } => self.notes.save(content),
            Action::ReadNotes { limit } => self.notes.recent(*limit),
        }
    }
}
