//! Form field definitions

use crate::validation::ValidationRule;
use crate::value::FieldValue;

/// Input kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldKind {
    /// Single-line text input
    #[default]
    Text,
    /// Numeric input
    Number,
    /// Multi-line text input
    TextArea,
    /// Dropdown with one selected option
    Select,
    /// Radio group with one selected option
    Radio,
    /// Checkbox group with any number of selected options
    Checkbox,
    /// Calendar date
    Date,
}

/// A single field of a form schema
///
/// A derived field's value is computed from its parent fields with
/// [`formula`](Field::formula); its `required` flag is not enforced.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Field {
    /// Identifier, unique within a schema
    pub id: String,
    /// Input kind
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: FieldKind,
    /// Label shown to the user
    pub label: String,
    /// Whether a value must be entered
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
    /// Value pre-filled when the form opens
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub default_value: Option<FieldValue>,
    /// Choices for select, radio and checkbox fields
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub options: Vec<String>,
    /// Rules checked in order; the first failure is reported
    #[cfg_attr(feature = "serde", serde(default))]
    pub validations: Vec<ValidationRule>,
    /// Whether the value is computed rather than entered
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_derived: bool,
    /// Ids of the fields the formula may reference
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "parentFields",
            skip_serializing_if = "Vec::is_empty"
        )
    )]
    pub parent_field_ids: Vec<String>,
    /// Derivation formula text
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "derivationFormula",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub formula: Option<String>,
}

impl Field {
    /// Create a new, optional, non-derived field
    pub fn new(id: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set whether a value is required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Append a validation rule
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validations.push(rule);
        self
    }

    /// Set the option list
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Make this a derived field
    ///
    /// Parent ids are kept in the given order; repeats are dropped.
    pub fn with_derivation<I, S>(mut self, parents: I, formula: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_derived = true;
        self.parent_field_ids.clear();
        for parent in parents {
            let parent = parent.into();
            if !self.parent_field_ids.contains(&parent) {
                self.parent_field_ids.push(parent);
            }
        }
        self.formula = Some(formula.into());
        self
    }

    /// Trimmed formula text, if the field has any
    pub fn formula_text(&self) -> Option<&str> {
        self.formula
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}
