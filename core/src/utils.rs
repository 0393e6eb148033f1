//! String helpers shared by the spreadsheet conventions

use regex::Regex;

/// First parenthesized segment, non-greedy
static PARENTHESIZED: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\((.*?)\)").expect("Valid parenthesis regex pattern")
});

/// First bracketed segment
static BRACKETED: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]").expect("Valid bracket regex pattern")
});

/// Wrap a value in single quotes when it contains whitespace and is not
/// already quoted.
#[must_use]
pub fn quote_if_needed(value: &str) -> String {
    let already_quoted = value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'');
    if !already_quoted && value.chars().any(char::is_whitespace) {
        format!("'{value}'")
    } else {
        value.to_string()
    }
}

/// Every maximal, non-empty run of non-quote characters enclosed by single
/// quotes on both sides.
///
/// `REL 'part of' [BFO:0000050]` yields `["part of"]`, while `'a' 'b'` yields
/// `["a", " ", "b"]` because the space between the second and third quote is
/// itself enclosed.
#[must_use]
pub fn quoted_tokens(value: &str) -> Vec<&str> {
    let segments: Vec<&str> = value.split('\'').collect();
    if segments.len() < 3 {
        return Vec::new();
    }
    segments[1..segments.len() - 1]
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .collect()
}

/// Text of the first parenthesized segment, if any
#[must_use]
pub fn first_parenthesized(value: &str) -> Option<&str> {
    PARENTHESIZED
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Text between the first `[` and the following `]`
///
/// `"behaviour change technique [BCIO:007000]"` yields `BCIO:007000`.
#[must_use]
pub fn bracketed_id(value: &str) -> Option<&str> {
    BRACKETED
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Bracketed id when present, otherwise the trimmed input
#[must_use]
pub fn bracketed_id_or_value(value: &str) -> &str {
    bracketed_id(value).unwrap_or_else(|| value.trim())
}

/// Drop a trailing `(...)` qualifier: everything from the last `(` on.
#[must_use]
pub fn strip_trailing_qualifier(value: &str) -> &str {
    match value.rfind('(') {
        Some(pos) => value[..pos].trim(),
        None => value,
    }
}

/// Lookup key used by every name index: newlines become spaces, trimmed,
/// lower-cased.
#[must_use]
pub fn normalize_name(value: &str) -> String {
    value.replace('\n', " ").trim().to_lowercase()
}
