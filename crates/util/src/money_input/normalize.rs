//! Zero-normalization of money field text.
//!
//! Three independent passes, applied in order by [`normalize_zeros`]:
//! strip superfluous leading zeros, put a `0` in front of a bare point, and
//! cut the fraction after two digits.

use paydesk_types::FieldState;

/// Remove leading zeros from the integer part, keeping at least one digit.
///
/// Only applies when the integer digits are terminated by a decimal point,
/// so an in-progress entry such as `"05"` is left for the shift-in rule.
pub fn strip_leading_zeros(text: &str) -> String {
    let (sign, rest) = split_sign(text);
    let integer_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if integer_len < 2 || rest.as_bytes().get(integer_len) != Some(&b'.') {
        return text.to_string();
    }

    let trimmed = rest[..integer_len].trim_start_matches('0');
    let integer = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{sign}{integer}{}", &rest[integer_len..])
}

/// Insert a `0` before a decimal point that starts the number.
pub fn guard_bare_point(text: &str) -> String {
    let (sign, rest) = split_sign(text);
    if rest.starts_with('.') {
        format!("{sign}0{rest}")
    } else {
        text.to_string()
    }
}

/// Drop everything after the second digit following the first point that
/// has two digits after it.
pub fn truncate_fraction(text: &str) -> String {
    let bytes = text.as_bytes();
    let is_digit_at = |index: usize| bytes.get(index).is_some_and(u8::is_ascii_digit);
    text.match_indices('.')
        .map(|(index, _)| index)
        .find(|index| is_digit_at(index + 1) && is_digit_at(index + 2))
        .map(|index| text[..index + 3].to_string())
        .unwrap_or_else(|| text.to_string())
}

/// Run all three passes and shift the selection by the net length change.
pub fn normalize_zeros(state: FieldState) -> FieldState {
    let old_len = state.len();
    let text = truncate_fraction(&guard_bare_point(&strip_leading_zeros(&state.text)));
    let new_len = text.chars().count();
    let delta = new_len as isize - old_len as isize;
    FieldState {
        selection: state.selection.shifted(delta, new_len),
        text,
    }
}

fn split_sign(text: &str) -> (&str, &str) {
    match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paydesk_types::Selection;

    #[test]
    fn strips_zeros_before_point() {
        assert_eq!(strip_leading_zeros("007.50"), "7.50");
        assert_eq!(strip_leading_zeros("000.50"), "0.50");
        assert_eq!(strip_leading_zeros("-00.05"), "-0.05");
        assert_eq!(strip_leading_zeros("10.00"), "10.00");
    }

    #[test]
    fn leaves_unterminated_integers_alone() {
        assert_eq!(strip_leading_zeros("007"), "007");
        assert_eq!(strip_leading_zeros("0.5"), "0.5");
        assert_eq!(strip_leading_zeros(""), "");
    }

    #[test]
    fn guards_bare_point() {
        assert_eq!(guard_bare_point(".50"), "0.50");
        assert_eq!(guard_bare_point("-.5"), "-0.5");
        assert_eq!(guard_bare_point("1.50"), "1.50");
        assert_eq!(guard_bare_point("-"), "-");
    }

    #[test]
    fn truncates_to_two_fraction_digits() {
        assert_eq!(truncate_fraction("1.2345"), "1.23");
        assert_eq!(truncate_fraction("1.23"), "1.23");
        assert_eq!(truncate_fraction("1.2"), "1.2");
        assert_eq!(truncate_fraction("1.2.345"), "1.2.34");
        assert_eq!(truncate_fraction("12"), "12");
    }

    #[test]
    fn shifts_selection_by_net_delta() {
        let state = FieldState::with_caret("00.125", 6);
        let normalized = normalize_zeros(state);
        assert_eq!(normalized.text, "0.12");
        assert_eq!(normalized.selection, Selection::caret(4));

        let state = FieldState::with_caret(".5", 0);
        let normalized = normalize_zeros(state);
        assert_eq!(normalized.text, "0.5");
        assert_eq!(normalized.selection, Selection::caret(1));
    }

    #[test]
    fn normalization_is_idempotent_on_samples() {
        for sample in ["", "-", ".", "-.", "000.000", "-0009.9", "1.2.345", "05", ".1234", "12.34"] {
            let once = normalize_zeros(FieldState::with_caret(sample, 0)).text;
            let twice = normalize_zeros(FieldState::with_caret(once.clone(), 0)).text;
            assert_eq!(once, twice, "sample {sample:?}");
        }
    }
}
