//! Derived-field evaluation: placeholder substitution, age-from-DOB, and
//! recomputation passes over a value map.

use chrono::{DateTime, Datelike, Local, NaiveDate};

use formwork_core::field::{DerivedFieldConfig, FormField};
use formwork_core::schema::FormSchema;
use formwork_core::value::{FieldValue, ValueMap, format_number};

use crate::parser;
use crate::types::FormulaError;

/// Sentinel stored in a derived field whose formula failed to evaluate.
pub const ERROR_SENTINEL: &str = "Error";

/// Computes a derived field's value using today's local date.
///
/// Non-derived fields (or derived fields without a config) keep their current value.
pub fn evaluate_derived(field: &FormField, values: &ValueMap) -> FieldValue {
    evaluate_derived_at(field, values, Local::now().date_naive())
}

/// Computes a derived field's value relative to `today`.
pub fn evaluate_derived_at(field: &FormField, values: &ValueMap, today: NaiveDate) -> FieldValue {
    let current = values.get(&field.id).cloned().unwrap_or_default();
    let Some(config) = field.derivation() else {
        return current;
    };

    if config.is_age_formula() && config.parent_field_ids.len() == 1 {
        return age_from_dob(values.get(&config.parent_field_ids[0]), today);
    }

    match evaluate_arithmetic(config, values) {
        Ok(Some(n)) => FieldValue::Number(n),
        Ok(None) => FieldValue::Empty,
        Err(e) if e.is_rejection() => current,
        Err(_) => FieldValue::text(ERROR_SENTINEL),
    }
}

/// Whole years between a date of birth and `today`.
///
/// Missing, non-text or unparseable input, and birth dates in the future,
/// all yield an empty value.
pub fn age_from_dob(dob: Option<&FieldValue>, today: NaiveDate) -> FieldValue {
    let Some(birth) = dob.and_then(FieldValue::as_str).and_then(parse_date) else {
        return FieldValue::Empty;
    };

    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }

    if age >= 0 {
        FieldValue::Number(f64::from(age))
    } else {
        FieldValue::Empty
    }
}

/// Parses `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Substitutes parent values into the formula and evaluates it.
///
/// `Ok(None)` means a parent was missing or not numeric, so nothing was attempted.
fn evaluate_arithmetic(
    config: &DerivedFieldConfig,
    values: &ValueMap,
) -> Result<Option<f64>, FormulaError> {
    let mut text = config.formula.clone();
    for parent in &config.parent_field_ids {
        let Some(n) = values.get(parent).and_then(FieldValue::as_number) else {
            return Ok(None);
        };
        text = text.replace(&format!("{{{parent}}}"), &format_number(n));
    }
    parser::evaluate(&text).map(Some)
}

/// Runs one recomputation pass over every derived field, in schema order.
///
/// Later fields see values updated earlier in the same pass. Returns the new
/// map and whether any value changed.
pub fn recompute_derived_fields(schema: &FormSchema, values: &ValueMap) -> (ValueMap, bool) {
    recompute_derived_fields_at(schema, values, Local::now().date_naive())
}

/// [`recompute_derived_fields`] relative to an explicit date.
pub fn recompute_derived_fields_at(
    schema: &FormSchema,
    values: &ValueMap,
    today: NaiveDate,
) -> (ValueMap, bool) {
    let mut next = values.clone();
    let mut changed = false;
    for field in schema.derived_fields() {
        let value = evaluate_derived_at(field, &next, today);
        if next.get(&field.id) != Some(&value) {
            next.insert(field.id.clone(), value);
            changed = true;
        }
    }
    (next, changed)
}

/// Default bound on recomputation passes: one per field, plus the settling pass.
pub fn default_max_passes(schema: &FormSchema) -> usize {
    schema.fields.len() + 1
}

/// Repeats recomputation passes until nothing changes.
///
/// Returns the settled map and the number of passes run. Fails with
/// [`FormulaError::Unstable`] if the values have not settled after
/// `max_passes` passes.
pub fn recompute_to_fixed_point(
    schema: &FormSchema,
    values: &ValueMap,
    today: NaiveDate,
    max_passes: usize,
) -> Result<(ValueMap, usize), FormulaError> {
    let mut current = values.clone();
    for pass in 1..=max_passes.max(1) {
        let (next, changed) = recompute_derived_fields_at(schema, &current, today);
        if !changed {
            return Ok((next, pass));
        }
        current = next;
    }
    Err(FormulaError::Unstable {
        passes: max_passes.max(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_core::enums::FieldType;
    use formwork_core::field::FormFieldBuilder;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn derived(id: &str, parents: &[&str], formula: &str) -> FormField {
        FormFieldBuilder::new(id, FieldType::Number)
            .derived(DerivedFieldConfig::new(parents.iter().copied(), formula))
            .build()
    }

    fn values(pairs: &[(&str, FieldValue)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn schema(fields: Vec<FormField>) -> FormSchema {
        let mut s = FormSchema::new("form_t", "T", chrono::Utc::now());
        s.fields = fields;
        s
    }

    // -- age -------------------------------------------------------------

    #[test]
    fn age_before_and_on_birthday() {
        let field = derived("age", &["dob"], "AGE_FROM_DOB");
        let vals = values(&[("dob", FieldValue::text("2000-06-15"))]);
        assert_eq!(
            evaluate_derived_at(&field, &vals, date("2024-06-14")),
            FieldValue::Number(23.0)
        );
        assert_eq!(
            evaluate_derived_at(&field, &vals, date("2024-06-15")),
            FieldValue::Number(24.0)
        );
        assert_eq!(
            evaluate_derived_at(&field, &vals, date("2025-01-01")),
            FieldValue::Number(24.0)
        );
    }

    #[test]
    fn age_of_future_or_bad_dates_is_empty() {
        let today = date("2024-06-15");
        assert_eq!(
            age_from_dob(Some(&FieldValue::text("2030-01-01")), today),
            FieldValue::Empty
        );
        assert_eq!(
            age_from_dob(Some(&FieldValue::text("not a date")), today),
            FieldValue::Empty
        );
        assert_eq!(age_from_dob(Some(&FieldValue::text("")), today), FieldValue::Empty);
        assert_eq!(age_from_dob(Some(&FieldValue::Number(2000.0)), today), FieldValue::Empty);
        assert_eq!(age_from_dob(None, today), FieldValue::Empty);
    }

    #[test]
    fn age_born_today_is_zero() {
        let today = date("2024-06-15");
        assert_eq!(
            age_from_dob(Some(&FieldValue::text("2024-06-15")), today),
            FieldValue::Number(0.0)
        );
        assert_eq!(
            age_from_dob(Some(&FieldValue::text("1990-06-15T08:30:00Z")), today),
            FieldValue::Number(34.0)
        );
    }

    #[test]
    fn age_formula_with_two_parents_is_not_evaluated() {
        let field = derived("age", &["dob", "other"], "AGE_FROM_DOB");
        let vals = values(&[
            ("dob", FieldValue::text("1")),
            ("other", FieldValue::text("2")),
            ("age", FieldValue::text("prior")),
        ]);
        // "AGE_FROM_DOB" fails the arithmetic whitelist, so the prior value stays.
        assert_eq!(
            evaluate_derived_at(&field, &vals, date("2024-01-01")),
            FieldValue::text("prior")
        );
    }

    // -- arithmetic ------------------------------------------------------

    #[test]
    fn arithmetic_substitution() {
        let field = derived("total", &["a", "b"], "{a} + {b} * 2");
        let vals = values(&[("a", FieldValue::text("3")), ("b", FieldValue::text("4"))]);
        assert_eq!(evaluate_derived(&field, &vals), FieldValue::Number(11.0));
    }

    #[test]
    fn repeated_placeholders_and_number_values() {
        let field = derived("sq", &["x"], "{x} * {x}");
        let vals = values(&[("x", FieldValue::Number(1.5))]);
        assert_eq!(evaluate_derived(&field, &vals), FieldValue::Number(2.25));
    }

    #[test]
    fn negative_parent_values() {
        let field = derived("diff", &["a", "b"], "{a} - {b}");
        let vals = values(&[("a", FieldValue::text("5")), ("b", FieldValue::text("-3"))]);
        assert_eq!(evaluate_derived(&field, &vals), FieldValue::Number(8.0));
    }

    #[test]
    fn missing_or_non_numeric_parent_is_empty() {
        let field = derived("total", &["a", "b"], "{a} + {b} * 2");
        let missing = values(&[("a", FieldValue::text("3")), ("total", FieldValue::Number(1.0))]);
        assert_eq!(evaluate_derived(&field, &missing), FieldValue::Empty);

        let junk = values(&[("a", FieldValue::text("3")), ("b", FieldValue::text("four"))]);
        assert_eq!(evaluate_derived(&field, &junk), FieldValue::Empty);

        let blank = values(&[("a", FieldValue::text("3")), ("b", FieldValue::text(""))]);
        assert_eq!(evaluate_derived(&field, &blank), FieldValue::Empty);
    }

    #[test]
    fn disallowed_characters_keep_prior_value() {
        let field = derived("total", &["a"], "{a} + process.exit()");
        let vals = values(&[("a", FieldValue::text("1")), ("total", FieldValue::text("7"))]);
        assert_eq!(evaluate_derived(&field, &vals), FieldValue::text("7"));

        let undeclared = derived("total", &["a"], "{a} + {b}");
        assert_eq!(evaluate_derived(&undeclared, &vals), FieldValue::text("7"));
    }

    #[test]
    fn empty_formula_keeps_prior_value() {
        let prior = values(&[("a", FieldValue::text("1")), ("total", FieldValue::text(""))]);
        let no_parents = derived("total", &[], "");
        assert_eq!(evaluate_derived(&no_parents, &prior), FieldValue::text(""));

        let with_parent = derived("total", &["a"], "");
        let seeded = values(&[("a", FieldValue::text("1")), ("total", FieldValue::Number(4.0))]);
        assert_eq!(evaluate_derived(&with_parent, &seeded), FieldValue::Number(4.0));

        let blank = derived("total", &["a"], "   ");
        assert_eq!(evaluate_derived(&blank, &prior), FieldValue::text("Error"));
    }

    #[test]
    fn malformed_formula_yields_error_sentinel() {
        let field = derived("total", &["a"], "({a} + 1");
        let vals = values(&[("a", FieldValue::text("1"))]);
        assert_eq!(evaluate_derived(&field, &vals), FieldValue::text("Error"));
    }

    #[test]
    fn division_by_zero_is_infinite() {
        let field = derived("ratio", &["a", "b"], "{a} / {b}");
        let vals = values(&[("a", FieldValue::text("1")), ("b", FieldValue::text("0"))]);
        assert_eq!(
            evaluate_derived(&field, &vals),
            FieldValue::Number(f64::INFINITY)
        );
    }

    #[test]
    fn non_derived_field_is_untouched() {
        let field = FormFieldBuilder::new("name", FieldType::Text).build();
        let vals = values(&[("name", FieldValue::text("Ada"))]);
        assert_eq!(evaluate_derived(&field, &vals), FieldValue::text("Ada"));
    }

    // -- propagation -----------------------------------------------------

    #[test]
    fn single_pass_sees_earlier_updates() {
        let s = schema(vec![
            FormFieldBuilder::new("a", FieldType::Number).build(),
            derived("b", &["a"], "{a} * 2"),
            derived("c", &["b"], "{b} + 1"),
        ]);
        let vals = values(&[("a", FieldValue::text("5"))]);
        let (next, changed) = recompute_derived_fields(&s, &vals);
        assert!(changed);
        assert_eq!(next["b"], FieldValue::Number(10.0));
        assert_eq!(next["c"], FieldValue::Number(11.0));

        let (again, changed) = recompute_derived_fields(&s, &next);
        assert!(!changed);
        assert_eq!(again, next);
    }

    #[test]
    fn reverse_order_needs_more_passes() {
        let s = schema(vec![
            derived("c", &["b"], "{b} + 1"),
            derived("b", &["a"], "{a} * 2"),
            FormFieldBuilder::new("a", FieldType::Number).build(),
        ]);
        let vals = values(&[("a", FieldValue::text("5"))]);
        let today = date("2024-01-01");

        let (first, _) = recompute_derived_fields_at(&s, &vals, today);
        assert_eq!(first["c"], FieldValue::Empty);

        let (settled, passes) =
            recompute_to_fixed_point(&s, &vals, today, default_max_passes(&s)).unwrap();
        assert_eq!(settled["c"], FieldValue::Number(11.0));
        assert_eq!(passes, 3);
    }

    #[test]
    fn nan_results_settle() {
        let s = schema(vec![
            FormFieldBuilder::new("a", FieldType::Number).build(),
            derived("r", &["a"], "{a} / {a}"),
        ]);
        let vals = values(&[("a", FieldValue::text("0"))]);
        let (settled, passes) =
            recompute_to_fixed_point(&s, &vals, date("2024-01-01"), 5).unwrap();
        assert!(matches!(settled["r"], FieldValue::Number(n) if n.is_nan()));
        assert_eq!(passes, 2);
    }

    #[test]
    fn oscillating_cycle_is_reported() {
        // x = y + 1 and y = x + 1 never settle.
        let s = schema(vec![
            derived("x", &["y"], "{y} + 1"),
            derived("y", &["x"], "{x} + 1"),
        ]);
        let vals = values(&[("x", FieldValue::text("0")), ("y", FieldValue::text("0"))]);
        let err = recompute_to_fixed_point(&s, &vals, date("2024-01-01"), 10).unwrap_err();
        assert_eq!(err, FormulaError::Unstable { passes: 10 });
    }
}
