//! Field value validation
//!
//! Each field carries an ordered list of [`ValidationRule`]s. Rules are
//! checked in declaration order and the first one that fails supplies the
//! error message; failures are never combined.
//!
//! ## Example
//!
//! ```rust
//! use formwright_core::{validate_field_value, Field, FieldKind, ValidationRule};
//!
//! let field = Field::new("username", FieldKind::Text, "Username")
//!     .with_rule(ValidationRule::min_length(5, "Too short"))
//!     .with_rule(ValidationRule::email("Not an email"));
//!
//! // MinLength is declared first, so it wins
//! assert_eq!(
//!     validate_field_value(&field, &"a@".into()),
//!     Some("Too short".to_string())
//! );
//! ```

use lazy_regex::regex_is_match;

use crate::field::Field;
use crate::value::{ErrorSnapshot, FieldValue, ValueSnapshot};
use crate::MIN_PASSWORD_LEN;

/// Kind of check a validation rule performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum RuleKind {
    /// Value must not be empty
    Required,
    /// Value length must be at least the bound
    MinLength,
    /// Value length must be at most the bound
    MaxLength,
    /// Value must look like an email address
    Email,
    /// Value must be at least 8 characters and contain a digit
    Password,
}

/// A single validation rule with its user-facing message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationRule {
    /// What the rule checks
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: RuleKind,
    /// Length bound for MinLength/MaxLength
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "value", skip_serializing_if = "Option::is_none")
    )]
    pub bound: Option<f64>,
    /// Message reported when the rule fails
    pub message: String,
}

impl ValidationRule {
    /// Create a rule of the given kind without a bound
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            bound: None,
            message: message.into(),
        }
    }

    /// Create a required rule
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    /// Create a minimum length rule
    pub fn min_length(bound: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MinLength, message).with_bound(bound as f64)
    }

    /// Create a maximum length rule
    pub fn max_length(bound: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MaxLength, message).with_bound(bound as f64)
    }

    /// Create an email rule
    pub fn email(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Email, message)
    }

    /// Create a password rule
    pub fn password(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Password, message)
    }

    /// Set the length bound
    pub fn with_bound(mut self, bound: f64) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Check whether `value` breaks this rule
    ///
    /// Length rules without a bound never fail. Email and password rules
    /// ignore values without content; that is the job of a required rule.
    /// Whitespace is content here, so `"  "` has length 2 and is not an
    /// email address.
    pub fn is_violated_by(&self, value: &FieldValue) -> bool {
        match self.kind {
            RuleKind::Required => value.is_empty(),
            RuleKind::MinLength => match (value.length(), self.bound) {
                (Some(len), Some(bound)) => (len as f64) < bound,
                _ => false,
            },
            RuleKind::MaxLength => match (value.length(), self.bound) {
                (Some(len), Some(bound)) => (len as f64) > bound,
                _ => false,
            },
            RuleKind::Email => {
                value.has_content()
                    && !regex_is_match!(r"\S+@\S+\.\S+", &value.to_display_string())
            }
            RuleKind::Password => {
                if !value.has_content() {
                    return false;
                }
                let text = value.to_display_string();
                text.chars().count() < MIN_PASSWORD_LEN
                    || !text.chars().any(|c| c.is_ascii_digit())
            }
        }
    }
}

/// Validate a field's current value
///
/// A required, non-derived field with an empty value fails with
/// `"<label> is required"` before any declared rule is looked at. Otherwise
/// the message of the first violated rule is returned.
pub fn validate_field_value(field: &Field, value: &FieldValue) -> Option<String> {
    if field.required && !field.is_derived && value.is_empty() {
        return Some(format!("{} is required", field.label));
    }

    field
        .validations
        .iter()
        .find(|rule| rule.is_violated_by(value))
        .map(|rule| rule.message.clone())
}

/// Validate every field against a value snapshot
///
/// The returned snapshot holds one message per failing field and is empty
/// when the whole form is valid.
pub fn validate_all_fields<'a, I>(fields: I, snapshot: &ValueSnapshot) -> ErrorSnapshot
where
    I: IntoIterator<Item = &'a Field>,
{
    let mut errors = ErrorSnapshot::new();
    for field in fields {
        errors.set(
            field.id.as_str(),
            validate_field_value(field, snapshot.value(&field.id)),
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use pretty_assertions::assert_eq;

    fn required_text(label: &str) -> Field {
        Field::new("f", FieldKind::Text, label).with_required(true)
    }

    #[test]
    fn test_required_rejects_empty_values() {
        let field = required_text("Name");
        for value in [
            FieldValue::Null,
            FieldValue::text(""),
            FieldValue::text("   "),
            FieldValue::List(vec![]),
        ] {
            assert_eq!(
                validate_field_value(&field, &value),
                Some("Name is required".to_string()),
                "value {:?} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_required_accepts_zero_and_false() {
        let field = required_text("Count");
        assert_eq!(validate_field_value(&field, &FieldValue::Number(0.0)), None);
        assert_eq!(validate_field_value(&field, &FieldValue::Bool(false)), None);
    }

    #[test]
    fn test_required_check_runs_before_rules() {
        let field = required_text("Name").with_rule(ValidationRule::required("custom"));
        assert_eq!(
            validate_field_value(&field, &FieldValue::Null),
            Some("Name is required".to_string())
        );
    }

    #[test]
    fn test_derived_field_required_flag_ignored() {
        let field = required_text("Total").with_derivation(["a"], "a * 2");
        assert_eq!(validate_field_value(&field, &FieldValue::Null), None);
    }

    #[test]
    fn test_required_rule_on_optional_field() {
        let field = Field::new("f", FieldKind::Text, "Name")
            .with_rule(ValidationRule::required("Please fill in"));
        assert_eq!(
            validate_field_value(&field, &FieldValue::text(" ")),
            Some("Please fill in".to_string())
        );
    }

    #[test]
    fn test_first_violated_rule_wins() {
        let field = Field::new("f", FieldKind::Text, "Email")
            .with_rule(ValidationRule::min_length(5, "min"))
            .with_rule(ValidationRule::email("email"));
        assert_eq!(
            validate_field_value(&field, &FieldValue::text("a@")),
            Some("min".to_string())
        );
        assert_eq!(
            validate_field_value(&field, &FieldValue::text("abcde@")),
            Some("email".to_string())
        );
        assert_eq!(
            validate_field_value(&field, &FieldValue::text("abc@d.io")),
            None
        );
    }

    #[test]
    fn test_length_rules() {
        let min = ValidationRule::min_length(3, "min");
        assert!(min.is_violated_by(&FieldValue::text("ab")));
        assert!(!min.is_violated_by(&FieldValue::text("abc")));
        assert!(!min.is_violated_by(&FieldValue::text("")));
        assert!(!min.is_violated_by(&FieldValue::Number(1.0)));
        assert!(min.is_violated_by(&FieldValue::List(vec!["a".into()])));

        let max = ValidationRule::max_length(3, "max");
        assert!(max.is_violated_by(&FieldValue::text("abcd")));
        assert!(!max.is_violated_by(&FieldValue::text("abc")));

        // Whitespace counts towards the length
        assert!(min.is_violated_by(&FieldValue::text("  ")));
        assert!(max.is_violated_by(&FieldValue::text("    ")));
        assert!(!max.is_violated_by(&FieldValue::text("   ")));

        let unbounded = ValidationRule::new(RuleKind::MinLength, "min");
        assert!(!unbounded.is_violated_by(&FieldValue::text("a")));
    }

    #[test]
    fn test_email_rule() {
        let rule = ValidationRule::email("bad");
        assert!(rule.is_violated_by(&FieldValue::text("nobody")));
        assert!(rule.is_violated_by(&FieldValue::text("a@b")));
        assert!(!rule.is_violated_by(&FieldValue::text("a@b.c")));
        assert!(!rule.is_violated_by(&FieldValue::text("")));
        assert!(!rule.is_violated_by(&FieldValue::Null));
        assert!(rule.is_violated_by(&FieldValue::text("   ")));
    }

    #[test]
    fn test_password_rule() {
        let rule = ValidationRule::password("weak");
        assert!(rule.is_violated_by(&FieldValue::text("short1")));
        assert!(rule.is_violated_by(&FieldValue::text("longenough")));
        assert!(!rule.is_violated_by(&FieldValue::text("longenough1")));
        assert!(!rule.is_violated_by(&FieldValue::text("")));
        assert!(rule.is_violated_by(&FieldValue::text(" ")));
    }

    #[test]
    fn test_validate_all_fields() {
        let fields = vec![
            Field::new("name", FieldKind::Text, "Name").with_required(true),
            Field::new("email", FieldKind::Text, "Email")
                .with_rule(ValidationRule::email("Invalid email")),
            Field::new("note", FieldKind::TextArea, "Note"),
        ];
        let snapshot = ValueSnapshot::new()
            .with("email", "not-an-email")
            .with("note", "hi");

        let errors = validate_all_fields(&fields, &snapshot);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(errors.get("note"), None);

        let snapshot = snapshot.with("name", "Ada").with("email", "ada@example.com");
        assert!(validate_all_fields(&fields, &snapshot).is_valid());
    }
}
