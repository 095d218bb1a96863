//! Shared utility functions.

use std::collections::BTreeSet;

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// First sentence of a text, trimmed and capped at `max_bytes`.
pub fn first_sentence(s: &str, max_bytes: usize) -> &str {
    let trimmed = s.trim();
    let end = trimmed
        .find(['.', '\n', '!', '?'])
        .unwrap_or(trimmed.len());
    truncate_str(trimmed[..end].trim_end(), max_bytes)
}

/// Normalize a free-form string for equality comparison.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lower-case word tokens plus `a_b` joins of adjacent words.
///
/// The joins let multi-word terms such as "scale up" match table entries
/// written as `scale_up`.
pub fn term_set(s: &str) -> BTreeSet<String> {
    let lowered = s.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();

    let mut terms: BTreeSet<String> = words.iter().map(|w| w.to_string()).collect();
    for pair in words.windows(2) {
        terms.insert(format!("{}_{}", pair[0], pair[1]));
    }
    terms
}

/// Whether `text` contains `stem` at the start of a word.
///
/// Both are split on non-alphanumeric characters; a multi-word stem such as
/// "load balanc" must match consecutive words, each by prefix. Case-insensitive.
pub fn mentions_stem(text: &str, stem: &str) -> bool {
    let split = |s: &str| -> Vec<String> {
        s.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    };
    let words = split(text);
    let parts = split(stem);
    if parts.is_empty() || words.len() < parts.len() {
        return false;
    }
    words.windows(parts.len()).any(|window| {
        window
            .iter()
            .zip(&parts)
            .all(|(word, part)| word.starts_with(part.as_str()))
    })
}

/// Current timestamp in milliseconds since the Unix epoch
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Push `item` unless an equal (normalized) entry is already present.
pub fn push_unique(list: &mut Vec<String>, item: &str) -> bool {
    let key = normalize_text(item);
    if key.is_empty() || list.iter().any(|existing| normalize_text(existing) == key) {
        return false;
    }
    list.push(item.trim().to_string());
    true
}
