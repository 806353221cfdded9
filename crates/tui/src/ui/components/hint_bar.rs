//! Bottom line: the current toast, or the key hints when there is none.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::Component;
use crate::app::App;
use crate::toast::ACTION_LABEL;
use crate::ui::theme::Theme;

const HINTS: &[(&str, &str)] = &[
    ("Enter", "pay"),
    ("↑/↓", "±0.10"),
    ("PgUp/PgDn", "±1.00"),
    ("-/+", "sign"),
    ("Ctrl+Q", "quit"),
];

#[derive(Debug, Default)]
pub struct HintBarComponent;

impl Component for HintBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App, theme: &dyn Theme) {
        let line = match &app.toast {
            Some(toast) => Line::from(vec![
                Span::styled(toast.message.clone(), theme.amount_style()),
                Span::raw("  "),
                Span::styled("Ctrl+O ", theme.label_style()),
                Span::styled(ACTION_LABEL, theme.body_style()),
                Span::raw("  "),
                Span::styled("Esc ", theme.label_style()),
                Span::styled("dismiss", theme.muted_style()),
            ]),
            None => Line::from(
                HINTS
                    .iter()
                    .flat_map(|(key, action)| {
                        [
                            Span::styled(format!("{key} "), theme.label_style()),
                            Span::styled(format!("{action}  "), theme.muted_style()),
                        ]
                    })
                    .collect::<Vec<_>>(),
            ),
        };
        frame.render_widget(Paragraph::new(line), rect);
    }
}
