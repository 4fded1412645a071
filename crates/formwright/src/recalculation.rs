//! Form-level recalculation
//!
//! Runs one full refresh of a form after a value changes: every derived field
//! is recomputed, then every field is validated against the refreshed values.
//!
//! # Example
//!
//! ```rust
//! use formwright::prelude::*;
//!
//! let schema = FormSchema::new("order", "Order")
//!     .with_field(Field::new("price", FieldKind::Number, "Price").with_required(true))
//!     .with_field(Field::new("qty", FieldKind::Number, "Quantity"))
//!     .with_field(
//!         Field::new("total", FieldKind::Number, "Total")
//!             .with_derivation(["price", "qty"], "price * qty"),
//!     );
//!
//! let values = ValueSnapshot::new().with("price", "2.5").with("qty", "4");
//! let result = schema.recalculate(&values);
//!
//! assert_eq!(result.values.value("total"), &FieldValue::text("10"));
//! assert!(result.errors.is_valid());
//! ```

use chrono::NaiveDate;

use crate::{
    try_compute_derived_value, validate_all_fields, ErrorSnapshot, EvaluationContext, FieldValue,
    FormSchema, ValueSnapshot,
};

/// Options for form recalculation
#[derive(Debug, Clone)]
pub struct RecalculationOptions {
    /// Date used by `calculateAge`; the local date when `None`
    pub today: Option<NaiveDate>,
    /// Validate every field after deriving values
    pub validate: bool,
}

impl Default for RecalculationOptions {
    fn default() -> Self {
        Self {
            today: None,
            validate: true,
        }
    }
}

/// Statistics from a recalculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecalculationStats {
    /// Number of derived fields in the schema
    pub derived_count: usize,
    /// Number of derived fields whose computation failed
    pub derivation_errors: usize,
    /// Number of fields that were validated
    pub fields_validated: usize,
    /// Number of fields with a validation error
    pub validation_errors: usize,
}

/// Result of recalculating a form
#[derive(Debug, Clone, Default)]
pub struct FormEvaluation {
    /// Entered values with every derived value filled in
    pub values: ValueSnapshot,
    /// Current error per field
    pub errors: ErrorSnapshot,
    /// Run statistics
    pub stats: RecalculationStats,
}

impl FormEvaluation {
    /// True when no field has a validation error
    pub fn is_valid(&self) -> bool {
        self.errors.is_valid()
    }
}

/// Extension trait for FormSchema to add recalculation methods
pub trait FormRecalculationExt {
    /// Recalculate derived values and validate with default options
    fn recalculate(&self, values: &ValueSnapshot) -> FormEvaluation;

    /// Recalculate with custom options
    fn recalculate_with_options(
        &self,
        values: &ValueSnapshot,
        options: &RecalculationOptions,
    ) -> FormEvaluation;
}

impl FormRecalculationExt for FormSchema {
    fn recalculate(&self, values: &ValueSnapshot) -> FormEvaluation {
        self.recalculate_with_options(values, &RecalculationOptions::default())
    }

    fn recalculate_with_options(
        &self,
        values: &ValueSnapshot,
        options: &RecalculationOptions,
    ) -> FormEvaluation {
        let mut stats = RecalculationStats::default();

        // Phase 1: derive every field from the incoming values only, so
        // derived fields never see each other's fresh results
        let mut ctx = EvaluationContext::new(values);
        if let Some(today) = options.today {
            ctx = ctx.with_today(today);
        }

        let mut refreshed = values.clone();
        for field in self.derived_fields() {
            let value = try_compute_derived_value(field, &ctx).unwrap_or_else(|e| {
                stats.derivation_errors += 1;
                e.sentinel().to_string()
            });
            stats.derived_count += 1;
            refreshed.insert(field.id.as_str(), FieldValue::Text(value));
        }

        // Phase 2: validate every field against the refreshed values
        let errors = if options.validate {
            let errors = validate_all_fields(&self.fields, &refreshed);
            stats.fields_validated = self.fields.len();
            stats.validation_errors = errors.len();
            errors
        } else {
            ErrorSnapshot::new()
        };

        tracing::debug!(
            schema = %self.id,
            derived = stats.derived_count,
            derivation_errors = stats.derivation_errors,
            validation_errors = stats.validation_errors,
            "recalculated form"
        );

        FormEvaluation {
            values: refreshed,
            errors,
            stats,
        }
    }
}
