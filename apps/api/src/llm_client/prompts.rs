// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose JSON arrays end up shown to users verbatim.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    IMPORTANT: In JSON arrays of sentences, provide plain text WITHOUT any markdown \
    formatting, asterisks, or special characters. Just simple clear sentences.";

/// Truncates `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
