//! Increment/decrement stepping for money fields.

use paydesk_types::StepKey;

/// Apply a step key to the parsed field value.
///
/// Whole-unit steps land on the next integer, tenth steps on the next tenth.
/// An unparsable value (`None`) resets to zero without stepping.
pub fn step_amount(current: Option<f64>, step: StepKey) -> f64 {
    let Some(value) = current else {
        return 0.0;
    };
    match step {
        StepKey::PageUp => value.floor() + 1.0,
        StepKey::PageDown => value.ceil() - 1.0,
        StepKey::ArrowUp => ((value * 10.0).floor() + 1.0) / 10.0,
        StepKey::ArrowDown => ((value * 10.0).ceil() - 1.0) / 10.0,
    }
}

/// Format a value with exactly two fraction digits.
///
/// Negative zero renders as `0.00`.
pub fn format_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_unit_steps() {
        assert_eq!(step_amount(Some(5.0), StepKey::PageUp), 6.0);
        assert_eq!(step_amount(Some(5.5), StepKey::PageUp), 6.0);
        assert_eq!(step_amount(Some(5.5), StepKey::PageDown), 5.0);
        assert_eq!(step_amount(Some(-0.5), StepKey::PageDown), -1.0);
    }

    #[test]
    fn tenth_steps() {
        assert_eq!(format_amount(step_amount(Some(5.0), StepKey::ArrowUp)), "5.10");
        assert_eq!(format_amount(step_amount(Some(5.0), StepKey::ArrowDown)), "4.90");
        assert_eq!(format_amount(step_amount(Some(0.0), StepKey::ArrowDown)), "-0.10");
        assert_eq!(format_amount(step_amount(Some(-0.05), StepKey::ArrowUp)), "0.00");
    }

    #[test]
    fn unparsable_value_resets_to_zero() {
        assert_eq!(step_amount(None, StepKey::PageUp), 0.0);
        assert_eq!(format_amount(step_amount(None, StepKey::ArrowDown)), "0.00");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(12.0), "12.00");
    }
}
