//! Field value types
//!
//! Entered values are loosely typed in a form: a text box holds a string, a
//! number input may hold a number or its textual form, a checkbox group holds a
//! list of selected options. [`FieldValue`] tags each shape explicitly and
//! offers total conversions instead of implicit coercions.

use std::collections::BTreeMap;
use std::fmt;

use lazy_regex::regex_find;

/// The value currently held by a form field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    /// No value entered
    Null,
    /// Boolean value (single checkbox)
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text value (also numbers and dates in their textual form)
    Text(String),
    /// Selected options of a multi-select or checkbox group
    List(Vec<String>),
}

impl FieldValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        FieldValue::Text(s.into())
    }

    /// Check if the value counts as "not filled in"
    ///
    /// Null, whitespace-only text and empty lists are empty. The number `0`
    /// and `false` are real answers and are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    /// Check if anything at all was entered
    ///
    /// Unlike [`is_empty`](Self::is_empty), whitespace counts as content.
    /// Null, `""`, empty lists, `0`, NaN and `false` have no content.
    pub fn has_content(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(items) => !items.is_empty(),
        }
    }

    /// Length used by length rules
    ///
    /// Only text (in characters, whitespace included) and lists (in items)
    /// with content have a length.
    pub fn length(&self) -> Option<usize> {
        match self {
            FieldValue::Text(s) if !s.is_empty() => Some(s.chars().count()),
            FieldValue::List(items) if !items.is_empty() => Some(items.len()),
            _ => None,
        }
    }

    /// Try to read the value as a finite number
    ///
    /// Text is read up to the end of its leading number, so `"4kg"` is 4 and
    /// `"kg4"` is not a number.
    pub fn try_parse_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => leading_number(s)?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Text shown to the user for this value
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(","),
        }
    }

}

fn leading_number(text: &str) -> Option<f64> {
    regex_find!(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?", text)?
        .trim_start()
        .parse()
        .ok()
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Null
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Format a number for display
///
/// Integral values print without a fractional part, other values use the
/// shortest representation that round-trips. Negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{}", n)
}

static NULL_VALUE: FieldValue = FieldValue::Null;

/// Current values of one form instance, keyed by field id
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValueSnapshot {
    values: BTreeMap<String, FieldValue>,
}

impl ValueSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a field, if one was entered
    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// Get the value for a field, [`FieldValue::Null`] when absent
    pub fn value(&self, field_id: &str) -> &FieldValue {
        self.values.get(field_id).unwrap_or(&NULL_VALUE)
    }

    /// Set the value for a field, returning the previous one
    pub fn insert<K: Into<String>, V: Into<FieldValue>>(
        &mut self,
        field_id: K,
        value: V,
    ) -> Option<FieldValue> {
        self.values.insert(field_id.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with<K: Into<String>, V: Into<FieldValue>>(mut self, field_id: K, value: V) -> Self {
        self.insert(field_id, value);
        self
    }

    /// Number of fields with a value
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no values are present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Current error message per field; at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ErrorSnapshot {
    errors: BTreeMap<String, String>,
}

impl ErrorSnapshot {
    /// Create an empty error snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of validating one field
    ///
    /// `None` clears any previous error for the field.
    pub fn set<K: Into<String>>(&mut self, field_id: K, error: Option<String>) {
        let field_id = field_id.into();
        match error {
            Some(message) => {
                self.errors.insert(field_id, message);
            }
            None => {
                self.errors.remove(&field_id);
            }
        }
    }

    /// Get the error for a field
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    /// True when no field has an error
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with an error
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if no errors are recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over `(field id, message)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
