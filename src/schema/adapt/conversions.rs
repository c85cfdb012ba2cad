//! Lenient conversions from the raw `Utf8` columns.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};

use crate::calendar;
use crate::error::{DashboardError, Result};

/// Downcast a column to a string array
pub fn as_string_array<'a>(array: &'a ArrayRef, column: &str) -> Result<&'a StringArray> {
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| DashboardError::schema(format!("Column '{column}' is not a string column")))
}

/// Parse a count cell
///
/// Integers and integral floats (`"12"`, `"12.0"`) are accepted. Fractional,
/// non-finite and out-of-range values are rejected.
#[must_use]
pub fn parse_count(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 => {
            Some(value as i64)
        }
        _ => None,
    }
}

/// Convert a string column to non-negative counts
///
/// Null, malformed, fractional and negative cells become `0`. Returns the converted
/// array and the number of cells that had to be coerced.
pub fn coerce_counts(array: &ArrayRef, column: &str) -> Result<(ArrayRef, usize)> {
    let strings = as_string_array(array, column)?;
    let mut coerced = 0usize;

    let values: Vec<i64> = (0..strings.len())
        .map(|i| {
            let parsed = if strings.is_null(i) {
                None
            } else {
                parse_count(strings.value(i))
            };
            match parsed {
                Some(value) if value >= 0 => value,
                _ => {
                    coerced += 1;
                    0
                }
            }
        })
        .collect();

    Ok((Arc::new(Int64Array::from(values)), coerced))
}

/// A count column of ones, for tables with one row per death
#[must_use]
pub fn unit_counts(len: usize) -> ArrayRef {
    Arc::new(Int64Array::from(vec![1i64; len]))
}

/// Trim every cell of a string column; empty cells become null
pub fn trim_strings(array: &ArrayRef, column: &str) -> Result<ArrayRef> {
    let strings = as_string_array(array, column)?;
    let trimmed: StringArray = strings
        .iter()
        .map(|cell| cell.map(str::trim).filter(|s| !s.is_empty()))
        .collect();
    Ok(Arc::new(trimmed))
}

/// Spanish month names from month codes or names; unknown values become null
pub fn derive_month_names(array: &ArrayRef, column: &str) -> Result<ArrayRef> {
    let strings = as_string_array(array, column)?;
    let names: StringArray = strings
        .iter()
        .map(|cell| cell.and_then(calendar::normalize_month))
        .collect();
    Ok(Arc::new(names))
}

/// Five-year age bins from `GRUPO_EDAD1` codes; codes outside `5..=22` become null
pub fn derive_age_bins(array: &ArrayRef, column: &str) -> Result<ArrayRef> {
    let strings = as_string_array(array, column)?;
    let bins: StringArray = strings
        .iter()
        .map(|cell| cell.and_then(parse_count).and_then(calendar::age_bin))
        .collect();
    Ok(Arc::new(bins))
}

/// Trim and uppercase a name, the key used to match boundary features
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalised copy of a string column
pub fn derive_normalized(array: &ArrayRef, column: &str) -> Result<ArrayRef> {
    let strings = as_string_array(array, column)?;
    let names: StringArray = strings
        .iter()
        .map(|cell| cell.map(normalize_name).filter(|s| !s.is_empty()))
        .collect();
    Ok(Arc::new(names))
}
