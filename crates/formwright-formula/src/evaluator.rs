//! Formula evaluator
//!
//! Evaluates formula ASTs to produce values. Values are either numbers or
//! text; `+` concatenates as soon as one side is text, the other operators
//! always work on numbers.

use ahash::AHashMap;
use formwright_core::format_number;

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    String(String),
}

impl FormulaValue {
    /// Convert to number for arithmetic
    ///
    /// Blank text is `0`, other text is parsed; text that is not a number
    /// becomes NaN and surfaces later as a non-finite result.
    pub fn to_number(&self) -> f64 {
        match self {
            FormulaValue::Number(n) => *n,
            FormulaValue::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Convert to string
    pub fn as_string(&self) -> String {
        match self {
            FormulaValue::Number(n) => format_number(*n),
            FormulaValue::String(s) => s.clone(),
        }
    }

    /// Check if this is text
    pub fn is_string(&self) -> bool {
        matches!(self, FormulaValue::String(_))
    }

    /// Final display form of an evaluation result
    ///
    /// Fails with [`FormulaError::NonFinite`] for infinity and NaN.
    pub fn into_display(self) -> FormulaResult<String> {
        match self {
            FormulaValue::Number(n) if !n.is_finite() => Err(FormulaError::NonFinite),
            FormulaValue::Number(n) => Ok(format_number(n)),
            FormulaValue::String(s) => Ok(s),
        }
    }
}

/// Values bound to field ids for one evaluation
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: AHashMap<String, FormulaValue>,
}

impl Bindings {
    /// Create an empty set of bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a field id to a value
    pub fn bind(&mut self, id: impl Into<String>, value: FormulaValue) {
        self.values.insert(id.into(), value);
    }

    /// Look up a bound value
    pub fn get(&self, id: &str) -> Option<&FormulaValue> {
        self.values.get(id)
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, bindings: &Bindings) -> FormulaResult<FormulaValue> {
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => Ok(FormulaValue::Number(*n)),
        FormulaExpr::String(s) => Ok(FormulaValue::String(s.clone())),

        // === References ===
        FormulaExpr::FieldRef(id) => bindings
            .get(id)
            .cloned()
            .ok_or_else(|| FormulaError::InvalidReference(id.clone())),

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => {
            evaluate_binary_op(*op, left, right, bindings)
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let n = evaluate(operand, bindings)?.to_number();
            Ok(FormulaValue::Number(match op {
                UnaryOperator::Negate => -n,
                UnaryOperator::Plus => n,
            }))
        }

        // Built-ins are resolved before evaluation
        FormulaExpr::Function { name, .. } => Err(FormulaError::UnknownFunction(name.clone())),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaExpr,
    right: &FormulaExpr,
    bindings: &Bindings,
) -> FormulaResult<FormulaValue> {
    // Evaluate operands first
    let left_val = evaluate(left, bindings)?;
    let right_val = evaluate(right, bindings)?;

    if op == BinaryOperator::Add && (left_val.is_string() || right_val.is_string()) {
        return Ok(FormulaValue::String(
            left_val.as_string() + &right_val.as_string(),
        ));
    }

    let l = left_val.to_number();
    let r = right_val.to_number();
    Ok(FormulaValue::Number(match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => l / r,
    }))
}
