/// Events the driver loop feeds into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// External input (typed or transcribed text).
    Input(InputEvent),
    /// An out-of-band interrupt, e.g. Ctrl+C.
    Interrupt,
    /// Input closed.
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub source: String,
    pub content: InputContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputContent {
    Text(String),
}

impl InputEvent {
    pub fn text(source: &str, text: &str) -> Self {
        Self {
            source: source.to_string(),
            content: InputContent::Text(text.to_string()),
        }
    }
}
