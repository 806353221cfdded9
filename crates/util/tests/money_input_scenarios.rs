use paydesk_types::{FieldState, KeyInput, MoneyKey, Selection, StepKey};
use paydesk_util::money_input::{Transition, normalize_zeros, transition};
use proptest::prelude::*;

fn press(state: &FieldState, key: MoneyKey) -> FieldState {
    match transition(state, KeyInput::plain(key)) {
        Transition::Edited(next) => next,
        Transition::Suppressed => state.clone(),
        Transition::PassThrough => panic!("{key:?} must not pass through"),
    }
}

fn is_amount(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    match unsigned.split_once('.') {
        Some((integer, fraction)) => {
            !integer.is_empty()
                && integer.bytes().all(|b| b.is_ascii_digit())
                && fraction.len() == 2
                && fraction.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

#[test]
fn typing_into_an_empty_field_shifts_digits_in() {
    let empty = FieldState::with_caret("", 0);

    let first = press(&empty, MoneyKey::Digit(5));
    assert_eq!(first, FieldState::with_caret("5", 1));

    let second = press(&first, MoneyKey::Digit(0));
    assert_eq!(second, FieldState::with_caret("0.50", 4));

    let third = press(&second, MoneyKey::Digit(0));
    assert_eq!(third, FieldState::with_caret("5.00", 4));
}

#[test]
fn digit_at_end_of_amount_shifts_in() {
    let next = press(&FieldState::with_caret("12.34", 5), MoneyKey::Digit(6));
    assert_eq!(next.text, "123.46");
    assert_eq!(next.selection, Selection::caret(6));
}

#[test]
fn digit_in_fraction_overwrites() {
    let next = press(&FieldState::with_caret("12.34", 3), MoneyKey::Digit(6));
    assert_eq!(next.text, "12.64");
    assert_eq!(next.selection, Selection::caret(4));
}

#[test]
fn arrow_up_adds_a_tenth() {
    let next = press(&FieldState::with_caret("5.00", 4), MoneyKey::Step(StepKey::ArrowUp));
    assert_eq!(next.text, "5.10");
}

#[test]
fn page_keys_move_whole_units() {
    let up = press(&FieldState::with_caret("5.25", 0), MoneyKey::Step(StepKey::PageUp));
    assert_eq!(up.text, "6.00");
    let down = press(&up, MoneyKey::Step(StepKey::PageDown));
    assert_eq!(down.text, "5.00");
}

#[test]
fn minus_prefixes_sign_and_shifts_caret() {
    let next = press(&FieldState::with_caret("5.00", 1), MoneyKey::Minus);
    assert_eq!(next.text, "-5.00");
    assert_eq!(next.selection, Selection::caret(2));
}

#[test]
fn plus_clears_sign() {
    let next = press(&FieldState::with_caret("-0.00", 0), MoneyKey::Plus);
    assert_eq!(next.text, "0.00");
    assert_eq!(next.selection, Selection::caret(0));
}

#[test]
fn comma_behaves_like_point() {
    let next = press(&FieldState::with_caret("250", 1), MoneyKey::DecimalSeparator);
    assert_eq!(next.text, "2.50");
    assert_eq!(next.selection, Selection::caret(2));
    assert_eq!(MoneyKey::from_char(','), MoneyKey::DecimalSeparator);
}

fn valid_amount() -> impl Strategy<Value = String> {
    (any::<bool>(), 0u32..100_000, 0u32..100).prop_map(|(negative, integer, fraction)| {
        let sign = if negative { "-" } else { "" };
        format!("{sign}{integer}.{fraction:02}")
    })
}

fn editor_key() -> impl Strategy<Value = MoneyKey> {
    prop_oneof![
        (0u8..10).prop_map(MoneyKey::Digit),
        Just(MoneyKey::Minus),
        Just(MoneyKey::Plus),
        Just(MoneyKey::DecimalSeparator),
        Just(MoneyKey::Step(StepKey::PageUp)),
        Just(MoneyKey::Step(StepKey::PageDown)),
        Just(MoneyKey::Step(StepKey::ArrowUp)),
        Just(MoneyKey::Step(StepKey::ArrowDown)),
    ]
}

proptest! {
    /// Property: a valid amount stays valid under any collapsed-caret key sequence.
    #[test]
    fn prop_amount_stays_valid(
        start in valid_amount(),
        keys in prop::collection::vec((editor_key(), any::<usize>()), 1..24)
    ) {
        let mut state = FieldState::with_caret(start, 0);
        for (key, caret_seed) in keys {
            state.selection = Selection::caret(caret_seed % (state.len() + 1));
            state = press(&state, key);
            prop_assert!(is_amount(&state.text), "{:?} produced {:?}", key, state.text);
        }
    }

    /// Property: the caret stays collapsed and inside the text.
    #[test]
    fn prop_caret_is_contained(
        text in "[-0-9.,x]{0,10}",
        key in editor_key(),
        caret_seed in any::<usize>()
    ) {
        let len = text.chars().count();
        let state = FieldState::with_caret(text, caret_seed % (len + 1));
        let next = press(&state, key);
        prop_assert!(next.selection.is_collapsed());
        prop_assert!(next.selection.end <= next.len());
    }

    /// Property: selections stay ordered and inside the text.
    #[test]
    fn prop_selection_is_contained(
        text in "[-0-9.]{0,10}",
        key in editor_key(),
        a in any::<usize>(),
        b in any::<usize>()
    ) {
        let len = text.chars().count();
        let state = FieldState::with_selection(text, a % (len + 1), b % (len + 1));
        let next = press(&state, key);
        prop_assert!(next.selection.start <= next.selection.end);
        prop_assert!(next.selection.end <= next.len());
    }

    /// Property: zero-normalization is idempotent.
    #[test]
    fn prop_normalization_is_idempotent(text in "[-0-9.x]{0,12}", caret_seed in any::<usize>()) {
        let len = text.chars().count();
        let once = normalize_zeros(FieldState::with_caret(text, caret_seed % (len + 1)));
        let twice = normalize_zeros(once.clone());
        prop_assert_eq!(once, twice);
    }
}
