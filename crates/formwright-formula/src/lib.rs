//! # formwright-formula
//!
//! Derivation formula parser, validator and evaluator for formwright.
//!
//! This crate provides:
//! - Formula scanning (literal stripping, identifier scan)
//! - Formula validation against declared parent fields
//! - Formula parsing (text → AST) and evaluation (AST → value)
//! - Derived value computation, including `calculateAge`
//!
//! ## Example
//!
//! ```rust
//! use formwright_core::{Field, FieldKind, ValueSnapshot};
//! use formwright_formula::{compute_derived_value, validate_formula};
//!
//! let total = Field::new("total", FieldKind::Number, "Total")
//!     .with_derivation(["price", "qty"], "price * qty");
//! assert_eq!(validate_formula("price * qty", &total.parent_field_ids, &[]), None);
//!
//! let snapshot = ValueSnapshot::new().with("price", "2.5").with("qty", "4");
//! assert_eq!(compute_derived_value(&total, &snapshot), "10");
//! ```

pub mod ast;
pub mod derive;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod scan;
pub mod validator;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use derive::{
    compute_derived_value, compute_derived_value_with, try_compute_derived_value,
    EvaluationContext, FormulaMode,
};
pub use error::{
    FormulaError, FormulaResult, FORMULA_ERROR, INVALID_CALCULATION, INVALID_DATE,
    INVALID_FORMULA,
};
pub use evaluator::{evaluate, Bindings, FormulaValue};
pub use parser::parse_formula;
pub use validator::{validate_formula, FormulaIssue};
