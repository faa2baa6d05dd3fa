//! Typed filter / sort / pagination over the listable entities.
//!
//! Every query is parsed leniently from raw query-string parameters: a value
//! that is absent or does not parse leaves the corresponding filter unset
//! instead of producing an error. Each query also knows how to apply itself
//! to an in-memory collection; the PostgreSQL repositories translate the same
//! typed query into SQL.

use std::collections::HashMap;

pub mod experience;
pub mod pagination;
pub mod project;
pub mod skill;

pub use experience::{ExperienceQuery, ExperienceSort};
pub use pagination::{Page, PageRequest, PaginationMeta};
pub use project::{ProjectQuery, ProjectSort};
pub use skill::SkillQuery;

/// Raw query-string parameters as received by a handler.
pub type Params = HashMap<String, String>;

/// Reads an integer the way a lenient "leading integer" parser does:
/// leading whitespace and an optional sign are accepted, parsing stops at the
/// first non-digit, and input without digits yields 0. Out-of-range values
/// saturate.
pub fn leading_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut previous_was_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => {
                let digit = i64::from(c as u8 - b'0');
                value = value.saturating_mul(10).saturating_add(digit);
                previous_was_digit = true;
            }
            '_' if previous_was_digit => previous_was_digit = false,
            _ => break,
        }
    }

    if negative { -value } else { value }
}

/// `true` only for the literal string "true".
pub(crate) fn flag(params: &Params, key: &str) -> bool {
    params.get(key).map(String::as_str) == Some("true")
}

/// Trimmed, non-blank text parameter.
pub(crate) fn text(params: &Params, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn parsed<T: std::str::FromStr>(params: &Params, key: &str) -> Option<T> {
    params.get(key).and_then(|v| v.parse().ok())
}

/// Case-insensitive substring test used by the in-memory backend.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Wraps `term` in `%` for ILIKE, escaping the pattern metacharacters so the
/// term matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
pub(crate) fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
