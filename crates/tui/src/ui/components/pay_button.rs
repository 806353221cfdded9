//! The pay button: idle, waiting for the reader, or flashing an outcome.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::Component;
use crate::app::{App, FlashKind};
use crate::ui::theme::{Theme, Tone};

const THROBBER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

#[derive(Debug, Default)]
pub struct PayButtonComponent;

/// The button caption for the current state.
pub fn caption(app: &App) -> String {
    let button = &app.pay_button;
    match button.flash.map(|flash| flash.kind) {
        Some(FlashKind::Success) => return "✔ Payment booked".to_string(),
        Some(FlashKind::Error) => return "✘ Payment failed".to_string(),
        None => {}
    }
    if button.loading {
        let frame = THROBBER[app.throbber_idx % THROBBER.len()];
        return format!("{frame} Waiting for card (Enter to cancel)");
    }
    match app.current_amount() {
        Some(amount) => format!("Pay {}", amount.with_symbol(&app.config.currency_symbol)),
        None => "Pay".to_string(),
    }
}

impl Component for PayButtonComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App, theme: &dyn Theme) {
        let tone = match app.pay_button.flash.map(|flash| flash.kind) {
            Some(FlashKind::Success) => Tone::Success,
            Some(FlashKind::Error) => Tone::Failure,
            None if app.pay_button.loading => Tone::Pending,
            None => Tone::Neutral,
        };
        let style = theme.tone_style(tone);
        let block = theme.panel(None, false).border_style(style);
        let paragraph = Paragraph::new(Line::from(caption(app)))
            .style(Style::default().patch(style).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, rect);
    }
}
