//! Cell value conversion for loosely typed CSV frames.
//!
//! The same logical column may be inferred as integer in one source file and
//! as float or string in another, so join keys and measurements are read
//! through these helpers rather than typed column accessors.

use polars::prelude::AnyValue;

/// Text form of a cell, used for join keys and labels.
///
/// Whole floats print without a fraction so that a province code read as
/// `110000.0` matches `110000` from another file. Null is empty.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        other => other.to_string(),
    }
}

/// Formats a float, dropping the fraction of whole values.
pub fn format_numeric(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Numeric value of a cell; text is parsed, NaN counts as missing.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let parsed = match value {
        AnyValue::Null => None,
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        other => other.extract::<f64>(),
    };
    parsed.filter(|v| !v.is_nan())
}

/// Parses trimmed text as f64; blank or malformed text is `None`.
pub fn parse_f64(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok()
}
