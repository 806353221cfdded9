//! Money amounts in cents and the lenient float parsing used by money fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A signed amount of money in cents, as the backend stores it.
///
/// `Display` renders exactly two fraction digits without a currency symbol,
/// e.g. `Cents(-5)` renders as `-0.05`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    /// Convert the text of a money field to cents.
    ///
    /// The leading numeric prefix of `text` is scaled by 100 and rounded half
    /// up. Returns `None` when the text has no numeric prefix or the value
    /// does not fit.
    pub fn from_amount_text(text: &str) -> Option<Self> {
        let value = parse_leading_float(text)?;
        let scaled = (value * 100.0 + 0.5).floor();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Cents(scaled as i64))
    }

    /// Render with a trailing currency symbol, e.g. `1.50€`.
    pub fn with_symbol(self, symbol: &str) -> String {
        format!("{self}{symbol}")
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

/// Parse the longest numeric prefix of `text` as a float.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12.5€"`
/// parses as `12.5`. Accepts an optional sign, digits with an optional
/// fraction (`"5."` and `".5"` are both numbers) and an optional exponent.
/// Returns `None` when no digits are found or the value is not finite.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_digits = count_digits(end);
    end += integer_digits;

    let mut mantissa_digits = integer_digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction_digits = count_digits(end + 1);
        if mantissa_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
            mantissa_digits += fraction_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = count_digits(exponent_end);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    trimmed[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_two_fraction_digits() {
        assert_eq!(Cents(0).to_string(), "0.00");
        assert_eq!(Cents(5).to_string(), "0.05");
        assert_eq!(Cents(1234).to_string(), "12.34");
        assert_eq!(Cents(-50).to_string(), "-0.50");
        assert_eq!(Cents(-100_000).with_symbol("€"), "-1000.00€");
    }

    #[test]
    fn amount_text_rounds_half_up() {
        assert_eq!(Cents::from_amount_text("12.34"), Some(Cents(1234)));
        assert_eq!(Cents::from_amount_text("-0.50"), Some(Cents(-50)));
        assert_eq!(Cents::from_amount_text("0.005"), Some(Cents(1)));
        assert_eq!(Cents::from_amount_text("3"), Some(Cents(300)));
        assert_eq!(Cents::from_amount_text(""), None);
        assert_eq!(Cents::from_amount_text("abc"), None);
    }

    #[test]
    fn leading_float_accepts_numeric_prefixes() {
        assert_eq!(parse_leading_float("5.00"), Some(5.0));
        assert_eq!(parse_leading_float("  -1.5xyz"), Some(-1.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float(".25"), Some(0.25));
        assert_eq!(parse_leading_float("-.5"), Some(-0.5));
        assert_eq!(parse_leading_float("+7"), Some(7.0));
        assert_eq!(parse_leading_float("1e2"), Some(100.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("12.3.4"), Some(12.3));
    }

    #[test]
    fn leading_float_rejects_non_numbers() {
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("-."), None);
        assert_eq!(parse_leading_float("€5"), None);
        assert_eq!(parse_leading_float("1e400"), None);
    }

    #[test]
    fn cents_serialize_as_plain_integers() {
        let json = serde_json::to_string(&Cents(250)).unwrap();
        assert_eq!(json, "250");
        let back: Cents = serde_json::from_str("-75").unwrap();
        assert_eq!(back, Cents(-75));
    }
}
