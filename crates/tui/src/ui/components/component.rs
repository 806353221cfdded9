//! The component abstraction shared by every part of the screen.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Effect};
use crate::ui::theme::Theme;

/// A UI element that renders itself into a `Rect` and may react to keys.
///
/// Components keep only local presentation state. Anything other parts of
/// the screen care about lives in [`App`]; side effects are returned as
/// [`Effect`]s for the runtime to execute.
pub trait Component {
    /// Handle a key while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw into `rect`. Rendering must not change application state.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App, theme: &dyn Theme);
}
