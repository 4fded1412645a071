//! # formwright
//!
//! A Rust library for forms whose fields can be derived from other fields.
//!
//! Formwright is the logic behind a form builder: field values are entered by
//! a user interface, and this library computes derived values and validates
//! what was entered. It holds no state, does no I/O and renders nothing.
//!
//! ## Features
//!
//! - Derivation formulas over parent fields (`+ - * /`, text concatenation)
//! - Built-in `calculateAge(field)` for date fields
//! - Advisory formula validation for formula editors
//! - Ordered per-field validation rules (required, length, email, password)
//! - Optional `serde` support for schema and value JSON
//!
//! ## Example
//!
//! ```rust
//! use formwright::prelude::*;
//!
//! let schema = FormSchema::new("signup", "Signup")
//!     .with_field(Field::new("first", FieldKind::Text, "First name").with_required(true))
//!     .with_field(Field::new("last", FieldKind::Text, "Last name"))
//!     .with_field(
//!         Field::new("full", FieldKind::Text, "Full name")
//!             .with_derivation(["first", "last"], "first + ' ' + last"),
//!     );
//!
//! let values = ValueSnapshot::new().with("first", "Ada").with("last", "Lovelace");
//! let result = schema.recalculate(&values);
//! assert_eq!(result.values.value("full").to_string(), "Ada Lovelace");
//! ```

pub mod prelude;
pub mod recalculation;

// Re-export recalculation types
pub use recalculation::{
    FormEvaluation, FormRecalculationExt, RecalculationOptions, RecalculationStats,
};

// Re-export core types
pub use formwright_core::{
    format_number,
    validate_all_fields,
    validate_field_value,
    // Error types
    Error,
    ErrorSnapshot,
    // Schema types
    Field,
    FieldKind,
    // Value types
    FieldValue,
    FormSchema,
    // Validation types
    RuleKind,
    ValidationRule,
    ValueSnapshot,
};

// Re-export formula types
pub use formwright_formula::{
    compute_derived_value, compute_derived_value_with, parse_formula, try_compute_derived_value,
    validate_formula,
    EvaluationContext, FormulaError, FormulaExpr, FormulaIssue, FormulaResult, FormulaValue,
    FORMULA_ERROR, INVALID_CALCULATION, INVALID_DATE, INVALID_FORMULA,
};

/// Extension trait for FormSchema to add formula checks
pub trait FormSchemaLintExt {
    /// Run the formula validator on every derived field with parents
    ///
    /// Fields without parent fields are skipped; there is nothing to check
    /// their formula against yet. Returns `(field id, issue)` pairs in
    /// display order.
    fn formula_issues(&self) -> Vec<(String, FormulaIssue)>;
}

impl FormSchemaLintExt for FormSchema {
    fn formula_issues(&self) -> Vec<(String, FormulaIssue)> {
        self.derived_fields()
            .filter(|field| !field.parent_field_ids.is_empty())
            .filter_map(|field| {
                validate_formula(
                    field.formula.as_deref().unwrap_or_default(),
                    &field.parent_field_ids,
                    &self.fields,
                )
                .map(|issue| (field.id.clone(), issue))
            })
            .collect()
    }
}
