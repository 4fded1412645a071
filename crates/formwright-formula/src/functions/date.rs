//! Date functions
//!
//! Dates are calendar dates without a time zone. Timestamps are reduced to
//! the date they carry, ignoring any offset.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use formwright_core::FieldValue;

use crate::error::{FormulaError, FormulaResult};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a calendar date from user input
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`, RFC 3339 timestamps and
/// `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    None
}

/// Whole years between `birth` and `today`
///
/// One year is subtracted when this year's birthday has not been reached yet.
/// A birth date after `today` gives a negative age.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// calculateAge(date)
///
/// Returns `Ok(None)` when no date was entered: null, blank, or the literal
/// text `undefined`.
pub fn calculate_age(value: &FieldValue, today: NaiveDate) -> FormulaResult<Option<i32>> {
    let text = value.to_display_string();
    if text.trim().is_empty() || text == "undefined" {
        return Ok(None);
    }

    let birth = parse_date(&text).ok_or_else(|| FormulaError::InvalidDate(text.clone()))?;
    Ok(Some(age_in_years(birth, today)))
}
