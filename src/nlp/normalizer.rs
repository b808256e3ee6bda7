pub use crate::kernel::utterance::tokenize;

/// Lowercase, punctuation-free, single-spaced form of `raw`.
pub fn normalize_text(raw: &str) -> String {
    tokenize(raw).join(" ")
}

/// Turn dictated filenames into real ones: "notes dot txt" -> "notes.txt".
pub fn normalize_spoken_filename(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut join_next = false;

    for word in text.split_whitespace() {
        if word.eq_ignore_ascii_case("dot") {
            if let Some(last) = out.last_mut() {
                last.push('.');
                join_next = true;
                continue;
            }
        }
        match out.last_mut() {
            Some(last) if join_next => last.push_str(word),
            _ => out.push(word.to_string()),
        }
        join_next = false;
    }

    out.join(" ")
}
