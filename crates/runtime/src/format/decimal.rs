//! Locale-independent fixed-point formatting.

/// Formats `value` with at least `min_integer_digits` integer digits
/// (zero-padded) and exactly `fraction_digits` rounded fractional digits.
///
/// The decimal point is omitted when `fraction_digits` is zero. Returns
/// `None` for NaN and infinities.
pub fn format_decimal(value: f64, min_integer_digits: usize, fraction_digits: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let digits = format!("{:.*}", fraction_digits, value.abs());
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + min_integer_digits + 1);
    // No sign on values that round to zero.
    if value < 0.0 && digits.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    for _ in integer.len()..min_integer_digits {
        out.push('0');
    }
    out.push_str(integer);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    Some(out)
}
