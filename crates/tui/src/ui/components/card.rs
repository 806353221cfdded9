//! Card panel showing the last record the scanner or reader reported.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::Component;
use crate::app::{App, Card};
use crate::ui::theme::Theme;

#[derive(Debug, Default)]
pub struct CardComponent;

/// Label/value rows for a card.
pub fn card_rows(card: &Card, currency_symbol: &str) -> Vec<(&'static str, String)> {
    match card {
        Card::Account(account) => {
            let mut rows = vec![
                ("Name", account.name.clone()),
                ("Credit", account.credit.with_symbol(currency_symbol)),
            ];
            if let Some(mail) = account.mail.as_deref().filter(|mail| !mail.is_empty()) {
                rows.push(("Mail", mail.to_string()));
            }
            if let Some(permission) = account.permission.as_deref().filter(|p| *p != "DEFAULT") {
                rows.push(("Permission", permission.to_string()));
            }
            rows
        }
        Card::Product(product) => {
            let price = product
                .current_price
                .map(|price| price.with_symbol(currency_symbol))
                .unwrap_or_else(|| "-".to_string());
            let mut rows = vec![("Name", product.name.clone()), ("Price", price)];
            if let Some(category) = &product.category {
                rows.push(("Category", category.clone()));
            }
            rows
        }
        Card::QrCode(code) => vec![("Code", code.clone())],
        Card::NfcCard { id, name, writeable } => vec![
            ("Id", id.clone()),
            ("Name", name.clone()),
            ("Writeable", if *writeable { "yes" } else { "no" }.to_string()),
        ],
    }
}

impl Component for CardComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &App, theme: &dyn Theme) {
        let Some(card) = &app.card else {
            let hint = Paragraph::new(Line::styled("Scan a card, a product or a barcode", theme.muted_style()))
                .block(theme.panel(Some("Card"), false));
            frame.render_widget(hint, rect);
            return;
        };

        let rows = card_rows(card, &app.config.currency_symbol);
        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<label_width$}  "), theme.label_style()),
                    Span::styled(value, theme.body_style()),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(theme.panel(Some(card.title()), false));
        frame.render_widget(paragraph, rect);
    }
}
