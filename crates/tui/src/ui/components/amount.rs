//! The amount input.
//!
//! Keys first go to the money editor. Keys the editor passes through get the
//! usual text-field behavior (caret movement, deletion, select all); anything
//! left over is reported back so the screen can treat it as a command.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use paydesk_types::{KeyDisposition, KeyInput, MoneyKey, StepKey};
use paydesk_util::TextField;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use super::Component;
use crate::app::App;
use crate::ui::theme::Theme;

/// Classify a terminal key for the money editor.
pub fn key_input(key: &KeyEvent) -> KeyInput {
    let money_key = match key.code {
        KeyCode::Char(c) => MoneyKey::from_char(c),
        KeyCode::PageUp => MoneyKey::Step(StepKey::PageUp),
        KeyCode::PageDown => MoneyKey::Step(StepKey::PageDown),
        KeyCode::Up => MoneyKey::Step(StepKey::ArrowUp),
        KeyCode::Down => MoneyKey::Step(StepKey::ArrowDown),
        _ => MoneyKey::Control,
    };
    KeyInput {
        key: money_key,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
    }
}

#[derive(Debug, Default)]
pub struct AmountComponent;

impl AmountComponent {
    /// Feed `key` to the amount field. `PassThrough` means the key is not an
    /// editing key at all.
    pub fn handle_key(&mut self, app: &mut App, key: KeyEvent) -> KeyDisposition {
        if app.amount.on_key_down(key_input(&key)).is_consumed() {
            return KeyDisposition::Consumed;
        }

        let field = app.amount.field_mut();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Char('a') if ctrl => field.select_all(),
            _ => return KeyDisposition::PassThrough,
        }
        KeyDisposition::Consumed
    }
}

impl Component for AmountComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App, theme: &dyn Theme) {
        let block = theme.panel(Some("Amount"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let field = app.amount.field();
        let chars: Vec<char> = field.text().chars().collect();
        let selection = field.selection().clamp(chars.len());
        let before: String = chars[..selection.start].iter().collect();
        let selected: String = chars[selection.start..selection.end].iter().collect();
        let after: String = chars[selection.end..].iter().collect();

        let caret_x = inner.x.saturating_add(before.width() as u16);
        let line = Line::from(vec![
            Span::styled(before, theme.amount_style()),
            Span::styled(selected, theme.selection_style()),
            Span::styled(after, theme.amount_style()),
            Span::styled(format!(" {}", app.config.currency_symbol), theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(line), inner);

        if selection.is_collapsed() && inner.height > 0 && caret_x < inner.right() {
            frame.set_cursor_position(Position::new(caret_x, inner.y));
        }
    }
}
