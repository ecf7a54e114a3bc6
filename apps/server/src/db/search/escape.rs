//! Helpers for turning caller text into bound LIKE patterns and value lists.

/// Split a comma-delimited list, trimming each element and dropping blanks.
///
/// Duplicates are removed, keeping the first occurrence, so the result is an
/// ordered set.
pub(crate) fn split_list(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in input.split(',') {
        let value = part.trim();
        if value.is_empty() || out.iter().any(|v| v == value) {
            continue;
        }
        out.push(value.to_string());
    }
    out
}

/// Escape LIKE meta-characters so user input is matched literally.
///
/// Patterns built from this are used with `ESCAPE '\'`.
pub(crate) fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like_pattern(term))
}

pub(crate) fn prefix_pattern(term: &str) -> String {
    format!("{}%", escape_like_pattern(term))
}

pub(crate) fn suffix_pattern(term: &str) -> String {
    format!("%{}", escape_like_pattern(term))
}

/// Lower-cased word runs of free text, first occurrence kept.
///
/// Splits where the `simple` text-search parser would, so every term is a
/// plain lexeme that can be quoted into a prefix tsquery.
pub(crate) fn text_search_terms(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        let word = word.to_lowercase();
        if !out.contains(&word) {
            out.push(word);
        }
    }
    out
}
