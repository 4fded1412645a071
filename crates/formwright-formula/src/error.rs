//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Display string for a `calculateAge` argument that is not a date
pub const INVALID_DATE: &str = "Invalid date";
/// Display string for a formula that cannot be parsed or evaluated
pub const INVALID_FORMULA: &str = "Invalid formula";
/// Display string for a numeric result that is not finite
pub const INVALID_CALCULATION: &str = "Invalid calculation";
/// Display string for any other failure
pub const FORMULA_ERROR: &str = "Formula error";

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Identifier that is not bound to a parent field
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Value that cannot be read as a calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Arithmetic produced infinity or NaN
    #[error("Result is not a finite number")]
    NonFinite,

    /// Parent field id that cannot be written in a formula
    #[error("Parent field id '{0}' is not a valid formula identifier")]
    InvalidParentId(String),
}

impl FormulaError {
    /// Display string shown in place of the derived value
    pub fn sentinel(&self) -> &'static str {
        match self {
            FormulaError::Parse(_)
            | FormulaError::UnknownFunction(_)
            | FormulaError::InvalidReference(_) => INVALID_FORMULA,
            FormulaError::InvalidDate(_) => INVALID_DATE,
            FormulaError::NonFinite => INVALID_CALCULATION,
            FormulaError::InvalidParentId(_) => FORMULA_ERROR,
        }
    }
}
