//! Text and caret state of an editable field.

/// A selection range over a field's text, in character offsets.
///
/// The range is always normalized such that `start <= end`. A collapsed
/// selection (`start == end`) is a plain caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Selection {
    /// Create a selection, normalizing so that `start <= end`.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// Shift both ends by `delta`, saturating at zero and clamping to `len`.
    pub fn shifted(self, delta: isize, len: usize) -> Self {
        let shift = |offset: usize| offset.saturating_add_signed(delta).min(len);
        Self::new(shift(self.start), shift(self.end))
    }
}

/// The observable state of a money field: its text and selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldState {
    pub text: String,
    pub selection: Selection,
}

impl FieldState {
    /// Build a state with the caret collapsed at `caret` (clamped to the text).
    pub fn with_caret<S: Into<String>>(text: S, caret: usize) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            selection: Selection::caret(caret.min(len)),
            text,
        }
    }

    /// Build a state with an explicit selection (clamped to the text).
    pub fn with_selection<S: Into<String>>(text: S, start: usize, end: usize) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            selection: Selection::new(start, end).clamp(len),
            text,
        }
    }

    /// Length of the text in characters, the unit selection offsets use.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
