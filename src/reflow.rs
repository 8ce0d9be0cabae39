//! Word-count line wrapping for note text.

/// Words per line when nothing else is configured
pub const DEFAULT_WORDS_PER_LINE: usize = 12;

/// Re-wrap `text` so every line holds at most `limit` words.
///
/// Whitespace runs (including existing line breaks) collapse to single
/// spaces before splitting, so reflowing already-wrapped text is a no-op.
/// A `limit` of zero behaves like one.
pub fn reflow(text: &str, limit: usize) -> String {
    let limit = limit.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::with_capacity(limit);

    for word in text.split_whitespace() {
        current.push(word);
        if current.len() >= limit {
            lines.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines.join("\n")
}

/// Reflow applied while the user types.
///
/// Returns the new text and cursor position (in characters) when reflowing
/// changed the text, `None` otherwise. The cursor lands on
/// `min(new_len, cursor + 1)`, which keeps it near the end of the edit
/// rather than tracking the exact word it was in.
pub fn reflow_live(text: &str, cursor: usize, limit: usize) -> Option<(String, usize)> {
    let wrapped = reflow(text, limit);
    if wrapped == text {
        return None;
    }
    let len = wrapped.chars().count();
    let cursor = len.min(cursor + 1);
    Some((wrapped, cursor))
}
