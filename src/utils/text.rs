/// Discord's cap on embed field values.
pub const FIELD_LIMIT: usize = 1024;

/// Cut `text` to at most `max_chars` characters, ending with `…` when shortened.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
