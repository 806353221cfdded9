//! Masked money input editor.
//!
//! The editor keeps a text field holding a two-decimal amount (`-?\d+\.\d{2}`)
//! while the user types. Every keystroke is a pure transition from one
//! [`FieldState`] to the next; nothing is remembered between keys except what
//! the field itself displays.
//!
//! Key handling, in order of precedence:
//!
//! - keys with Control or Alt held are left to the host
//! - PageUp/PageDown step by whole units, ArrowUp/ArrowDown by tenths
//! - digits replace a selection, shift in at the end, overwrite one of the
//!   two fraction slots, or are inserted at the caret
//! - `-` toggles the sign and `+` clears it
//! - `.` and `,` move the decimal point to the caret
//! - any other printable key is swallowed
//!
//! Digit, sign and decimal-point edits are followed by [`normalize_zeros`].
//!
//! Hosts bind a field through [`TextField`] and drive it with
//! [`MoneyInput::on_focus`] and [`MoneyInput::on_key_down`].

mod normalize;
mod step;

use paydesk_types::{FieldState, KeyDisposition, KeyInput, MoneyKey, Selection, StepKey, parse_leading_float};
use tracing::{debug, trace};

pub use normalize::{guard_bare_point, normalize_zeros, strip_leading_zeros, truncate_fraction};
pub use step::{format_amount, step_amount};

/// The capabilities a host field must expose for the editor to drive it.
///
/// Offsets in [`Selection`] are character offsets into [`TextField::text`].
pub trait TextField {
    fn text(&self) -> &str;
    fn set_text(&mut self, text: String);
    fn selection(&self) -> Selection;
    fn set_selection(&mut self, selection: Selection);

    /// Read-only fields are never bound to the editor.
    fn is_read_only(&self) -> bool {
        false
    }
}

/// Result of feeding one keystroke to [`transition`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The key was handled and the field must show the new state.
    Edited(FieldState),
    /// The key was swallowed without changing the field.
    Suppressed,
    /// The key is not the editor's business; the host default runs.
    PassThrough,
}

/// Compute the field state that follows `state` after `input`.
pub fn transition(state: &FieldState, input: KeyInput) -> Transition {
    if input.has_modifier() {
        return Transition::PassThrough;
    }

    let edited = match input.key {
        MoneyKey::Step(step) => return Transition::Edited(apply_step(state, step)),
        MoneyKey::Digit(_) => match input.key.digit_char() {
            Some(digit) => insert_digit(state, digit),
            None => return Transition::Suppressed,
        },
        MoneyKey::Minus => toggle_minus(state),
        MoneyKey::Plus => clear_minus(state),
        MoneyKey::DecimalSeparator => move_point(state),
        MoneyKey::Other(_) => return Transition::Suppressed,
        MoneyKey::Control => return Transition::PassThrough,
    };

    Transition::Edited(normalize_zeros(edited))
}

/// A money editor bound to a host field.
#[derive(Debug)]
pub struct MoneyInput<F: TextField> {
    field: F,
}

impl<F: TextField> MoneyInput<F> {
    /// Bind the editor to `field`, or return `None` for read-only fields.
    pub fn attach(field: F) -> Option<Self> {
        if field.is_read_only() {
            debug!(target: "paydesk_money_input", "skipping read-only money field");
            return None;
        }
        Some(Self { field })
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    pub fn into_inner(self) -> F {
        self.field
    }

    /// Select the whole content so the next digit replaces it.
    pub fn on_focus(&mut self) {
        let len = self.field.text().chars().count();
        self.field.set_selection(Selection::new(0, len));
    }

    /// Apply one keystroke to the bound field.
    pub fn on_key_down(&mut self, input: KeyInput) -> KeyDisposition {
        let state = FieldState {
            text: self.field.text().to_string(),
            selection: self.field.selection(),
        };
        match transition(&state, input) {
            Transition::Edited(next) => {
                trace!(
                    target: "paydesk_money_input",
                    key = ?input.key,
                    before = %state.text,
                    after = %next.text,
                    caret = next.selection.start,
                    "money field edited"
                );
                self.field.set_text(next.text);
                self.field.set_selection(next.selection);
                KeyDisposition::Consumed
            }
            Transition::Suppressed => KeyDisposition::Consumed,
            Transition::PassThrough => KeyDisposition::PassThrough,
        }
    }
}

fn apply_step(state: &FieldState, step: StepKey) -> FieldState {
    let value = step_amount(parse_leading_float(&state.text), step);
    // Replacing the value puts the caret at the end, as a host field would.
    FieldState::with_caret(format_amount(value), usize::MAX)
}

fn insert_digit(state: &FieldState, digit: char) -> FieldState {
    let chars: Vec<char> = state.text.chars().collect();
    let len = chars.len();
    let Selection { start, end } = state.selection.clamp(len);

    if start != end {
        let mut next = chars[..start].to_vec();
        next.push(digit);
        next.extend_from_slice(&chars[end..]);
        return collect_with_caret(next, start + 1);
    }

    let caret = after_sign(&chars, start);
    if caret == len && shifts_in(&chars, digit) {
        let mut next = without_first_point(&chars);
        next.push(digit);
        next.insert(next.len() - 2, '.');
        let caret = next.len();
        return collect_with_caret(next, caret);
    }

    let mut next = chars[..caret].to_vec();
    next.push(digit);
    if chars.contains(&'.') && caret + 2 >= len {
        // Overwrite one of the two fraction slots.
        next.extend_from_slice(&chars[(caret + 1).min(len)..]);
    } else {
        next.extend_from_slice(&chars[caret..]);
    }
    collect_with_caret(next, caret + 1)
}

fn toggle_minus(state: &FieldState) -> FieldState {
    if state.text.starts_with('-') {
        remove_minus(state)
    } else {
        let text = format!("-{}", state.text);
        let len = text.chars().count();
        FieldState {
            selection: state.selection.shifted(1, len),
            text,
        }
    }
}

fn clear_minus(state: &FieldState) -> FieldState {
    if state.text.starts_with('-') {
        remove_minus(state)
    } else {
        state.clone()
    }
}

fn remove_minus(state: &FieldState) -> FieldState {
    let text = state.text[1..].to_string();
    let len = text.chars().count();
    FieldState {
        selection: state.selection.shifted(-1, len),
        text,
    }
}

fn move_point(state: &FieldState) -> FieldState {
    let mut chars: Vec<char> = state.text.chars().collect();
    let mut caret = state.selection.start.min(chars.len());

    let mut index = 0;
    while index < chars.len() {
        if chars[index] == '.' {
            if caret > index {
                caret -= 1;
            }
            chars.remove(index);
        } else {
            index += 1;
        }
    }

    let caret = after_sign(&chars, caret);
    chars.insert(caret, '.');
    while chars.len() < caret + 3 {
        chars.push('0');
    }
    collect_with_caret(chars, caret + 1)
}

/// Whether appending `digit` at the end should shift it in as the new
/// least-significant digit: true once the point-less text would hold two
/// adjacent digits.
fn shifts_in(chars: &[char], digit: char) -> bool {
    let mut candidate = without_first_point(chars);
    candidate.push(digit);
    candidate
        .windows(2)
        .any(|pair| pair[0].is_ascii_digit() && pair[1].is_ascii_digit())
}

fn without_first_point(chars: &[char]) -> Vec<char> {
    let mut out = chars.to_vec();
    if let Some(index) = out.iter().position(|c| *c == '.') {
        out.remove(index);
    }
    out
}

/// Insertions never land in front of a leading minus.
fn after_sign(chars: &[char], caret: usize) -> usize {
    if caret == 0 && chars.first() == Some(&'-') { 1 } else { caret }
}

fn collect_with_caret(chars: Vec<char>, caret: usize) -> FieldState {
    FieldState::with_caret(chars.into_iter().collect::<String>(), caret)
}
