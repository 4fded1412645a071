//! Prelude module - common imports for formwright users
//!
//! ```rust
//! use formwright::prelude::*;
//! ```

pub use crate::{
    // Formula entry points
    compute_derived_value,
    validate_field_value,
    validate_formula,

    ErrorSnapshot,
    // Main types
    Field,
    FieldKind,
    FieldValue,
    // Extension traits
    FormEvaluation,
    FormRecalculationExt,
    FormSchema,
    FormSchemaLintExt,
    FormulaIssue,

    // Recalculation types
    RecalculationOptions,
    RecalculationStats,

    ValidationRule,
    ValueSnapshot,
};
