use super::*;

/// First `max_words` whitespace-separated tokens, joined by single spaces.
pub(super) fn leading_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn format_record(sample: &[&str], text: &str, label: &str, max_words: usize) -> String {
    // Plain substring removal so the answer never leaks into the prompt.
    let chunk = leading_words(text, max_words).replace(label, "");

    format!(
        "{HUMAN_PREFIX}{STRUCTURE_LEAD_IN} [{}] {TEXT_CHUNK_MARKER} {chunk} {BOT_MARKER} {label}",
        sample.join(", ")
    )
}
