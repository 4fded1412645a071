//! Built-in formula functions
//!
//! The formula language has a single built-in, `calculateAge`. It is handled
//! before expression evaluation, so a call to it never reaches the tree
//! evaluator.

pub mod date;

/// Name of the age-from-date function
pub const CALCULATE_AGE: &str = "calculateAge";

/// Check whether an identifier names a built-in rather than a field
pub fn is_builtin(name: &str) -> bool {
    name == CALCULATE_AGE
}
