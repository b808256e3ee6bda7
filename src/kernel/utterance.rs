/// One normalized utterance and its lowercase word tokens.
///
/// Tokens are whole words: anything that is not alphanumeric or an apostrophe
/// splits, so "unstoppable" never yields "stop" and "youtube, stop" yields
/// `["youtube", "stop"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    text: String,
    tokens: Vec<String>,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        let text = text.trim().to_string();
        let tokens = tokenize(&text);
        Self { text, tokens }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains_any_word(&self, words: &[&str]) -> bool {
        self.tokens.iter().any(|t| words.contains(&t.as_str()))
    }
}

pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        let ch = if ch == '\u{2019}' { '\'' } else { ch };
        if ch.is_alphanumeric() || ch == '\'' {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            push_token(&mut tokens, &mut current);
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, &mut current);
    }

    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    let token = current.trim_matches('\'');
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
    current.clear();
}
