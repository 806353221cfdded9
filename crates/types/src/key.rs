//! Keystroke classification for money fields.

/// One of the stepping keys that nudge the amount up or down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKey {
    /// Increase by one whole unit.
    PageUp,
    /// Decrease by one whole unit.
    PageDown,
    /// Increase by one tenth.
    ArrowUp,
    /// Decrease by one tenth.
    ArrowDown,
}

/// A single logical keystroke as seen by the money editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoneyKey {
    /// `0`..=`9`, stored as the digit value.
    Digit(u8),
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `.` or `,`
    DecimalSeparator,
    Step(StepKey),
    /// Any other printable character.
    Other(char),
    /// A key without a printable character (Backspace, Tab, Left, ...).
    Control,
}

impl MoneyKey {
    /// Classify a printable character.
    pub fn from_char(c: char) -> Self {
        match c {
            '0'..='9' => Self::Digit(c as u8 - b'0'),
            '-' => Self::Minus,
            '+' => Self::Plus,
            '.' | ',' => Self::DecimalSeparator,
            other => Self::Other(other),
        }
    }

    /// The character a digit key inserts.
    pub fn digit_char(&self) -> Option<char> {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(*d), 10),
            _ => None,
        }
    }
}

/// A classified key together with the modifier state that matters to the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: MoneyKey,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyInput {
    /// A key pressed without modifiers.
    pub fn plain(key: MoneyKey) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
        }
    }

    pub fn has_modifier(&self) -> bool {
        self.ctrl || self.alt
    }
}

impl From<MoneyKey> for KeyInput {
    fn from(key: MoneyKey) -> Self {
        Self::plain(key)
    }
}

/// What the host should do with a keystroke after the editor saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The editor handled the key; the host's default action must not run.
    Consumed,
    /// The editor ignored the key; the host's default action runs.
    PassThrough,
}

impl KeyDisposition {
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_printable_characters() {
        assert_eq!(MoneyKey::from_char('7'), MoneyKey::Digit(7));
        assert_eq!(MoneyKey::from_char('-'), MoneyKey::Minus);
        assert_eq!(MoneyKey::from_char('+'), MoneyKey::Plus);
        assert_eq!(MoneyKey::from_char(','), MoneyKey::DecimalSeparator);
        assert_eq!(MoneyKey::from_char('.'), MoneyKey::DecimalSeparator);
        assert_eq!(MoneyKey::from_char('x'), MoneyKey::Other('x'));
    }

    #[test]
    fn digit_char_round_trips_digit_keys() {
        assert_eq!(MoneyKey::Digit(0).digit_char(), Some('0'));
        assert_eq!(MoneyKey::Digit(9).digit_char(), Some('9'));
        assert_eq!(MoneyKey::Minus.digit_char(), None);
    }
}
