//! Static formula validation
//!
//! Checks formula text against the parent fields it may reference. The
//! result is advisory feedback for an editor: a formula that fails here is
//! still handed to [`compute_derived_value`](crate::compute_derived_value),
//! which shows a placeholder instead.

use ahash::AHashSet;
use formwright_core::Field;
use thiserror::Error;

use crate::functions::is_builtin;
use crate::scan;

/// Problem found in a formula, in user-facing form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaIssue {
    #[error("Formula is required")]
    Empty,

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("Unknown field reference: {0}")]
    UnknownField(String),

    #[error("Formula contains invalid characters (; {{ }})")]
    InvalidCharacters,

    #[error("calculateAge references unknown field: {0}")]
    UnknownAgeField(String),

    #[error("Parent field {0} is itself derived")]
    DerivedParent(String),
}

/// Validate a derivation formula
///
/// Checks run in a fixed order and the first problem is returned:
/// emptiness, parenthesis balance, identifiers outside quoted literals,
/// forbidden characters, `calculateAge` arguments, and finally that no parent
/// is itself a derived field of `all_fields`.
pub fn validate_formula<S: AsRef<str>>(
    formula: &str,
    parent_field_ids: &[S],
    all_fields: &[Field],
) -> Option<FormulaIssue> {
    let formula = formula.trim();
    if formula.is_empty() {
        return Some(FormulaIssue::Empty);
    }

    if !scan::parens_balanced(formula) {
        return Some(FormulaIssue::UnbalancedParentheses);
    }

    let parents: AHashSet<&str> = parent_field_ids.iter().map(AsRef::as_ref).collect();

    let stripped = scan::strip_literals(formula);
    if let Some(unknown) =
        scan::identifiers(&stripped).find(|id| !is_builtin(id) && !parents.contains(id))
    {
        return Some(FormulaIssue::UnknownField(unknown.to_string()));
    }

    if scan::has_disallowed_chars(formula) {
        return Some(FormulaIssue::InvalidCharacters);
    }

    if let Some(arg) = scan::calculate_age_args(formula).find(|arg| !parents.contains(arg)) {
        return Some(FormulaIssue::UnknownAgeField(arg.to_string()));
    }

    all_fields
        .iter()
        .find(|f| f.is_derived && parents.contains(f.id.as_str()))
        .map(|f| FormulaIssue::DerivedParent(f.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_core::FieldKind;
    use pretty_assertions::assert_eq;

    fn fields() -> Vec<Field> {
        vec![
            Field::new("a", FieldKind::Number, "A"),
            Field::new("b", FieldKind::Number, "B"),
            Field::new("dob", FieldKind::Date, "Birth date"),
            Field::new("sum", FieldKind::Number, "Sum").with_derivation(["a", "b"], "a + b"),
        ]
    }

    #[test]
    fn test_valid_formulas() {
        let fields = fields();
        assert_eq!(validate_formula("a + b", &["a", "b"], &fields), None);
        assert_eq!(validate_formula("(a + 1e3) * b / 2", &["a", "b"], &fields), None);
        assert_eq!(validate_formula("calculateAge(dob)", &["dob"], &fields), None);
        assert_eq!(validate_formula("a + ' apples'", &["a"], &fields), None);
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(validate_formula("   ", &["a"], &[]), Some(FormulaIssue::Empty));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(
            validate_formula("(a + b", &["a", "b"], &[]),
            Some(FormulaIssue::UnbalancedParentheses)
        );
    }

    #[test]
    fn test_unknown_field_reference() {
        let issue = validate_formula("a + b", &["a"], &fields()).unwrap();
        assert_eq!(issue, FormulaIssue::UnknownField("b".into()));
        assert_eq!(issue.to_string(), "Unknown field reference: b");
    }

    #[test]
    fn test_quoted_text_is_not_a_reference() {
        assert_eq!(validate_formula("a + \"b and c\"", &["a"], &[]), None);
        assert_eq!(validate_formula("a + 'b'", &["a"], &[]), None);
    }

    #[test]
    fn test_invalid_characters() {
        let issue = validate_formula("a; b", &["a", "b"], &fields()).unwrap();
        assert_eq!(issue, FormulaIssue::InvalidCharacters);
        assert_eq!(
            validate_formula("{a}", &["a"], &[]),
            Some(FormulaIssue::InvalidCharacters)
        );
    }

    #[test]
    fn test_identifier_check_comes_before_characters() {
        assert_eq!(
            validate_formula("a; x", &["a"], &[]),
            Some(FormulaIssue::UnknownField("x".into()))
        );
    }

    #[test]
    fn test_calculate_age_argument() {
        assert_eq!(
            validate_formula("calculateAge('dob')", &["dob"], &[]),
            Some(FormulaIssue::UnknownAgeField("'dob'".into()))
        );
    }

    #[test]
    fn test_empty_calculate_age_call_is_skipped() {
        assert_eq!(validate_formula("calculateAge()", &["dob"], &[]), None);
        assert_eq!(
            validate_formula("calculateAge() + calculateAge(x)", &["dob", "x"], &[]),
            None
        );
        assert_eq!(
            validate_formula("calculateAge() + calculateAge(dob)", &["a"], &[])
                .map(|issue| issue.to_string()),
            Some("Unknown field reference: dob".to_string())
        );
    }

    #[test]
    fn test_derived_parent_rejected() {
        assert_eq!(
            validate_formula("sum * 2", &["sum"], &fields()),
            Some(FormulaIssue::DerivedParent("sum".into()))
        );
        // Without the field list there is nothing to compare against
        assert_eq!(validate_formula("sum * 2", &["sum"], &[]), None);
    }
}
