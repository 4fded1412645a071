//! Text-level scanning of formula strings
//!
//! These helpers work on raw formula text without parsing it, so they can
//! report on formulas that are half-typed or not parseable at all.

use std::borrow::Cow;

use lazy_regex::{regex, regex_is_match};

use crate::functions::CALCULATE_AGE;

/// Characters that are never allowed anywhere in a formula
pub const DISALLOWED_CHARS: [char; 3] = [';', '{', '}'];

/// Replace every quoted literal with an empty one
///
/// `"..."` and `'...'` are both literals. Text inside them is never a field
/// reference, so identifier scans run on the stripped text.
pub fn strip_literals(formula: &str) -> Cow<'_, str> {
    regex!(r#""[^"]*"|'[^']*'"#).replace_all(formula, |caps: &lazy_regex::Captures| {
        if caps[0].starts_with('"') {
            "\"\""
        } else {
            "''"
        }
    })
}

/// Iterate over the identifiers in `text`
///
/// An identifier is a maximal `[A-Za-z_][A-Za-z0-9_]*` run on word
/// boundaries, so the exponent in `1e5` is not one.
pub fn identifiers(text: &str) -> impl Iterator<Item = &str> {
    regex!(r"\b[A-Za-z_][A-Za-z0-9_]*\b")
        .find_iter(text)
        .map(|m| m.as_str())
}

/// Check that opening and closing parentheses occur equally often
pub fn parens_balanced(formula: &str) -> bool {
    let open = formula.chars().filter(|&c| c == '(').count();
    let close = formula.chars().filter(|&c| c == ')').count();
    open == close
}

/// Check for characters outside the formula language
pub fn has_disallowed_chars(formula: &str) -> bool {
    formula.contains(&DISALLOWED_CHARS[..])
}

/// Whether the formula mentions `calculateAge` at all
pub fn mentions_calculate_age(formula: &str) -> bool {
    formula.contains(CALCULATE_AGE)
}

/// Trimmed argument text of every `calculateAge(...)` call
///
/// Calls with nothing between the parentheses are skipped.
pub fn calculate_age_args(formula: &str) -> impl Iterator<Item = &str> {
    regex!(r"calculateAge\(([^)]+)\)")
        .captures_iter(formula)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|arg| !arg.is_empty())
}

/// Trimmed argument text of the first non-empty `calculateAge(...)` call
///
/// The text is used as a field id as-is, so `calculateAge('dob')` looks up
/// a field literally named `'dob'`.
pub fn calculate_age_target(formula: &str) -> Option<&str> {
    regex!(r"calculateAge\(([^)]+)\)")
        .captures(formula)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Whether `id` can be written in a formula as a bare identifier
pub fn is_identifier(id: &str) -> bool {
    regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_]*$", id)
}

/// Whether the formula works on text rather than numbers
///
/// Any quote character means a string literal is present, which also covers
/// a `+` next to a quoted literal.
pub fn is_string_mode(formula: &str) -> bool {
    formula.contains(['"', '\''])
}
