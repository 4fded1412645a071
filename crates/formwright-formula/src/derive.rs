//! Derived field computation
//!
//! Computes the display value of a derived field from the current value
//! snapshot. Every failure is turned into a fixed display string, so a broken
//! formula only affects its own field.

use chrono::{Local, NaiveDate};
use formwright_core::{Field, FieldValue, ValueSnapshot};

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{evaluate, Bindings, FormulaValue};
use crate::functions::date::calculate_age;
use crate::parser::parse_formula;
use crate::scan;

/// Context for computing derived values
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Values entered so far
    pub snapshot: &'a ValueSnapshot,
    /// Date that ages are computed against
    pub today: NaiveDate,
}

impl<'a> EvaluationContext<'a> {
    /// Create a context that computes ages as of the local date
    pub fn new(snapshot: &'a ValueSnapshot) -> Self {
        Self {
            snapshot,
            today: Local::now().date_naive(),
        }
    }

    /// Pin the date used by `calculateAge`
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// How parent values are bound before evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaMode {
    /// Every parent value is bound as text
    String,
    /// Parent values are bound as numbers where they parse as one
    Numeric,
}

impl FormulaMode {
    /// Detect the mode of a formula from its text
    pub fn detect(formula: &str) -> Self {
        if scan::is_string_mode(formula) {
            FormulaMode::String
        } else {
            FormulaMode::Numeric
        }
    }

    /// Convert one parent value according to this mode
    ///
    /// In numeric mode a value is bound as its leading number (`"4kg"` is 4);
    /// a value without one is bound as text instead of failing the whole
    /// formula.
    pub fn bind_value(self, value: &FieldValue) -> FormulaValue {
        match self {
            FormulaMode::String => FormulaValue::String(value.to_display_string()),
            FormulaMode::Numeric => match value.try_parse_number() {
                Some(n) => FormulaValue::Number(n),
                None => FormulaValue::String(value.to_display_string()),
            },
        }
    }
}

/// Compute a derived field's display value, computing ages as of today
///
/// Returns an empty string for fields that are not derived, have no parent
/// fields or no formula. Failures become `"Invalid date"`,
/// `"Invalid calculation"`, `"Invalid formula"` or `"Formula error"`.
pub fn compute_derived_value(field: &Field, snapshot: &ValueSnapshot) -> String {
    compute_derived_value_with(field, &EvaluationContext::new(snapshot))
}

/// Compute a derived field's display value in an explicit context
pub fn compute_derived_value_with(field: &Field, ctx: &EvaluationContext<'_>) -> String {
    try_compute_derived_value(field, ctx).unwrap_or_else(|e| e.sentinel().to_string())
}

/// Compute a derived field's value, keeping the failure
///
/// [`compute_derived_value_with`] shows `Err` as its placeholder text; this
/// form lets callers tell a failure from a result that happens to read like
/// one.
pub fn try_compute_derived_value(
    field: &Field,
    ctx: &EvaluationContext<'_>,
) -> FormulaResult<String> {
    if !field.is_derived || field.parent_field_ids.is_empty() {
        return Ok(String::new());
    }
    let formula = match field.formula_text() {
        Some(f) => f,
        None => return Ok(String::new()),
    };

    derive(field, formula, ctx).map_err(|e| {
        tracing::debug!(field = %field.id, formula, error = %e, "derived value failed");
        e
    })
}

fn derive(field: &Field, formula: &str, ctx: &EvaluationContext<'_>) -> FormulaResult<String> {
    if scan::mentions_calculate_age(formula) {
        // Nothing to compute unless a call with an argument is present
        let age = match scan::calculate_age_target(formula) {
            Some(target) => calculate_age(ctx.snapshot.value(target), ctx.today)?,
            None => None,
        };
        return Ok(age.map(|a| a.to_string()).unwrap_or_default());
    }

    let mode = FormulaMode::detect(formula);
    tracing::trace!(field = %field.id, ?mode, "evaluating formula");

    let mut bindings = Bindings::new();
    for parent in &field.parent_field_ids {
        if !scan::is_identifier(parent) {
            return Err(FormulaError::InvalidParentId(parent.clone()));
        }
        bindings.bind(parent.as_str(), mode.bind_value(ctx.snapshot.value(parent)));
    }

    let ast = parse_formula(formula)?;
    evaluate(&ast, &bindings)?.into_display()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_core::FieldKind;
    use proptest::prelude::*;

    fn derived(parents: &[&str], formula: &str) -> Field {
        Field::new("out", FieldKind::Text, "Out").with_derivation(parents.iter().copied(), formula)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn compute(field: &Field, snapshot: &ValueSnapshot) -> String {
        let ctx = EvaluationContext::new(snapshot).with_today(ymd(2024, 6, 15));
        compute_derived_value_with(field, &ctx)
    }

    #[test]
    fn test_not_derived_or_incomplete() {
        let snapshot = ValueSnapshot::new().with("a", "1");
        let plain = Field::new("out", FieldKind::Text, "Out");
        assert_eq!(compute(&plain, &snapshot), "");

        let mut no_parents = derived(&["a"], "a + 1");
        no_parents.parent_field_ids.clear();
        assert_eq!(compute(&no_parents, &snapshot), "");

        assert_eq!(compute(&derived(&["a"], "   "), &snapshot), "");
    }

    #[test]
    fn test_numeric_sum() {
        let field = derived(&["p1", "p2"], "p1 + p2");
        let snapshot = ValueSnapshot::new().with("p1", "3").with("p2", "4");
        assert_eq!(compute(&field, &snapshot), "7");
    }

    #[test]
    fn test_non_numeric_parent_demoted_to_text() {
        let field = derived(&["p1", "p2"], "p1 + p2");
        let snapshot = ValueSnapshot::new().with("p1", "3").with("p2", "x");
        assert_eq!(compute(&field, &snapshot), "3x");
    }

    #[test]
    fn test_missing_parent_value_is_blank_text() {
        let field = derived(&["p1", "p2"], "p1 + p2");
        let snapshot = ValueSnapshot::new().with("p1", "3");
        assert_eq!(compute(&field, &snapshot), "3");
    }

    #[test]
    fn test_number_values() {
        let field = derived(&["price", "qty"], "price * qty / 2");
        let snapshot = ValueSnapshot::new().with("price", 2.5).with("qty", "4");
        assert_eq!(compute(&field, &snapshot), "5");
    }

    #[test]
    fn test_string_mode_binds_text() {
        let field = derived(&["a", "b"], "a + \"-\" + b");
        let snapshot = ValueSnapshot::new().with("a", "1").with("b", "2");
        assert_eq!(compute(&field, &snapshot), "1-2");

        let field = derived(&["first", "last"], "first + ' ' + last");
        let snapshot = ValueSnapshot::new().with("first", "Ada").with("last", "Lovelace");
        assert_eq!(compute(&field, &snapshot), "Ada Lovelace");
    }

    #[test]
    fn test_value_containing_quotes() {
        let field = derived(&["a"], "a + '!'");
        let snapshot = ValueSnapshot::new().with("a", "say \"hi\"");
        assert_eq!(compute(&field, &snapshot), "say \"hi\"!");
    }

    #[test]
    fn test_literal_text_is_not_substituted() {
        let field = derived(&["name"], "'name: ' + name");
        let snapshot = ValueSnapshot::new().with("name", "Ada");
        assert_eq!(compute(&field, &snapshot), "name: Ada");
    }

    #[test]
    fn test_sentinels() {
        let snapshot = ValueSnapshot::new().with("a", "1").with("b", "0");

        assert_eq!(compute(&derived(&["a", "b"], "a / b"), &snapshot), "Invalid calculation");
        assert_eq!(compute(&derived(&["a"], "a +"), &snapshot), "Invalid formula");
        assert_eq!(compute(&derived(&["a"], "a + zzz"), &snapshot), "Invalid formula");
        assert_eq!(compute(&derived(&["a"], "a; a"), &snapshot), "Invalid formula");
        assert_eq!(compute(&derived(&["a"], "max(a)"), &snapshot), "Invalid formula");
    }

    #[test]
    fn test_calculate_age() {
        let field = derived(&["dob"], "calculateAge(dob)");

        let snapshot = ValueSnapshot::new().with("dob", "2000-06-15");
        assert_eq!(compute(&field, &snapshot), "24");

        let ctx = EvaluationContext::new(&snapshot).with_today(ymd(2024, 6, 14));
        assert_eq!(compute_derived_value_with(&field, &ctx), "23");
    }

    #[test]
    fn test_calculate_age_empty_and_invalid() {
        let field = derived(&["dob"], "calculateAge(dob)");
        assert_eq!(compute(&field, &ValueSnapshot::new()), "");
        assert_eq!(compute(&field, &ValueSnapshot::new().with("dob", "")), "");
        assert_eq!(
            compute(&field, &ValueSnapshot::new().with("dob", "undefined")),
            ""
        );
        assert_eq!(
            compute(&field, &ValueSnapshot::new().with("dob", "not-a-date")),
            "Invalid date"
        );
    }

    #[test]
    fn test_calculate_age_short_circuits() {
        // The rest of the formula is never evaluated
        let field = derived(&["dob"], "calculateAge(dob) + 1000");
        let snapshot = ValueSnapshot::new().with("dob", "2000-06-15");
        assert_eq!(compute(&field, &snapshot), "24");
    }

    #[test]
    fn test_calculate_age_without_field_argument() {
        let snapshot = ValueSnapshot::new().with("dob", "2000-06-15");
        for formula in ["calculateAge()", "calculateAge('dob')", "calculateAge"] {
            assert_eq!(compute(&derived(&["dob"], formula), &snapshot), "", "{}", formula);
        }
        // The argument is trimmed before the lookup
        assert_eq!(compute(&derived(&["dob"], "calculateAge( dob )"), &snapshot), "24");
    }

    #[test]
    fn test_numeric_prefix_binding() {
        let field = derived(&["p1", "p2"], "p1 + p2");
        let snapshot = ValueSnapshot::new().with("p1", "3").with("p2", "4kg");
        assert_eq!(compute(&field, &snapshot), "7");

        let snapshot = ValueSnapshot::new().with("p1", "3").with("p2", "kg4");
        assert_eq!(compute(&field, &snapshot), "3kg4");
    }

    #[test]
    fn test_unusable_parent_id() {
        let field = derived(&["first name"], "1 + 1");
        let ctx_snapshot = ValueSnapshot::new().with("first name", "Ada");
        assert_eq!(compute(&field, &ctx_snapshot), "Formula error");

        let ctx = EvaluationContext::new(&ctx_snapshot).with_today(ymd(2024, 6, 15));
        assert_eq!(
            try_compute_derived_value(&field, &ctx),
            Err(FormulaError::InvalidParentId("first name".into()))
        );
    }

    #[test]
    fn test_deeply_nested_formula() {
        let snapshot = ValueSnapshot::new().with("a", "1");
        let nested = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(compute(&derived(&["a"], &nested), &snapshot), "Invalid formula");

        let negations = format!("{}a", "-".repeat(10_000));
        assert_eq!(compute(&derived(&["a"], &negations), &snapshot), "Invalid formula");

        let shallow = format!("{}a{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(compute(&derived(&["a"], &shallow), &snapshot), "1");
    }

    #[test]
    fn test_text_that_reads_like_a_placeholder() {
        let field = derived(&["a"], "'Formula error'");
        let snapshot = ValueSnapshot::new().with("a", "1");
        let ctx = EvaluationContext::new(&snapshot).with_today(ymd(2024, 6, 15));
        assert_eq!(
            try_compute_derived_value(&field, &ctx),
            Ok("Formula error".to_string())
        );
    }

    #[test]
    fn test_mode_detection() {
        assert_eq!(FormulaMode::detect("a + b"), FormulaMode::Numeric);
        assert_eq!(FormulaMode::detect("a + ''"), FormulaMode::String);
        assert_eq!(
            FormulaMode::Numeric.bind_value(&FieldValue::text("2")),
            FormulaValue::Number(2.0)
        );
        assert_eq!(
            FormulaMode::String.bind_value(&FieldValue::text("2")),
            FormulaValue::String("2".into())
        );
    }

    proptest! {
        #[test]
        fn numeric_parents_add_up(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let field = derived(&["a", "b"], "a + b");
            let snapshot = ValueSnapshot::new()
                .with("a", a.to_string())
                .with("b", b.to_string());
            prop_assert_eq!(compute(&field, &snapshot), (a + b).to_string());
        }

        #[test]
        fn computation_is_idempotent(a in ".{0,12}", b in ".{0,12}", formula in "[ab+*/() 0-9'-]{0,16}") {
            let field = derived(&["a", "b"], &formula);
            let snapshot = ValueSnapshot::new().with("a", a).with("b", b);
            prop_assert_eq!(compute(&field, &snapshot), compute(&field, &snapshot));
        }
    }
}
