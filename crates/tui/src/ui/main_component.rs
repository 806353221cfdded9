//! The payment terminal screen: layout and key routing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::app::{App, Effect};
use crate::ui::components::{AmountComponent, CardComponent, Component, HintBarComponent, PayButtonComponent};
use crate::ui::theme::Theme;

/// Root view composing every component of the screen.
#[derive(Debug, Default)]
pub struct MainView {
    amount: AmountComponent,
    pay_button: PayButtonComponent,
    card: CardComponent,
    hint_bar: HintBarComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for MainView {
    /// Routing order: quit keys, then the amount field, then screen commands.
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            app.should_quit = true;
            return Vec::new();
        }

        if self.amount.handle_key(app, key).is_consumed() {
            return Vec::new();
        }

        match key.code {
            KeyCode::Enter => app.press_pay(),
            KeyCode::Esc => {
                app.dismiss_toast();
                Vec::new()
            }
            KeyCode::Char('o') if ctrl => {
                app.take_toast_action();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App, theme: &dyn Theme) {
        frame.render_widget(Block::new().style(theme.surface_style()), rect);

        let [title, amount, pay, card, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .areas(rect);

        let title_line = Line::from(vec![
            Span::styled("Paydesk terminal", theme.amount_style()),
            Span::styled(format!("  {}", app.base_url), theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(title_line), title);

        self.amount.render(frame, amount, app, theme);
        self.pay_button.render(frame, pay, app, theme);
        self.card.render(frame, card, app, theme);
        self.hint_bar.render(frame, hints, app, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paydesk_types::{Cents, PushEvent};
    use paydesk_util::{PaydeskConfig, TextField};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::app::{Card, Msg};
    use crate::ui::theme::AnsiTheme;

    fn app() -> App {
        App::new(PaydeskConfig::default(), "http://localhost:8080").unwrap()
    }

    fn press(view: &mut MainView, app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Vec<Effect> {
        view.handle_key_events(app, KeyEvent::new(code, modifiers))
    }

    #[test]
    fn typing_then_enter_requests_payment() {
        let mut app = app();
        let mut view = MainView::new();
        for c in "1250".chars() {
            press(&mut view, &mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert_eq!(app.amount.field().text(), "12.50");

        let effects = press(&mut view, &mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(effects, vec![Effect::RequestPaymentToken(Cents(1250))]);
    }

    #[test]
    fn quit_and_toast_keys() {
        let mut app = app();
        let mut view = MainView::new();

        app.update(Msg::Push(PushEvent::QrCode { code: "4006".into() }));
        app.card = None;
        press(&mut view, &mut app, KeyCode::Char('o'), KeyModifiers::CONTROL);
        assert_eq!(app.card, Some(Card::QrCode("4006".into())));

        app.update(Msg::Push(PushEvent::QrCode { code: "4007".into() }));
        press(&mut view, &mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.toast.is_none());

        press(&mut view, &mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn renders_amount_and_card() {
        let mut app = app();
        app.update(Msg::Push(PushEvent::QrCode { code: "4006381333931".into() }));

        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        let mut view = MainView::new();
        let theme = AnsiTheme::new();
        terminal
            .draw(|frame| view.render(frame, frame.area(), &app, &theme))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains("Paydesk terminal"));
        assert!(screen.contains("0.00 €"));
        assert!(screen.contains("Pay 0.00€"));
        assert!(screen.contains("4006381333931"));
        assert!(screen.contains("New barcode scanned"));
    }
}
