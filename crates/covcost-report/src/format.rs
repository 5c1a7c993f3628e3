//! Number and banner formatting.

/// Width of the report banners.
pub const REPORT_WIDTH: usize = 78;

/// Full-width line of `=`.
pub fn heavy_rule() -> String {
    "=".repeat(REPORT_WIDTH)
}

/// Full-width line of `-`.
pub fn light_rule() -> String {
    "-".repeat(REPORT_WIDTH)
}

/// `value` with `decimals` fractional digits and comma thousands separators.
pub fn with_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Fixed-point number for coefficient tables.
pub fn fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(with_thousands(0.0, 2), "0.00");
        assert_eq!(with_thousands(999.999, 2), "1,000.00");
        assert_eq!(with_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(with_thousands(-4321.5, 2), "-4,321.50");
        assert_eq!(with_thousands(-0.001, 2), "0.00");
        assert_eq!(with_thousands(12345.0, 0), "12,345");
    }

    #[test]
    fn fixed_handles_non_finite() {
        assert_eq!(fixed(1.23456, 4), "1.2346");
        assert_eq!(fixed(f64::INFINITY, 4), "inf");
        assert_eq!(fixed(f64::NAN, 4), "NaN");
    }
}
