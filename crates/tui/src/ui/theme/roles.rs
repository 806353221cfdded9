use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};

/// Semantic color roles used by the terminal screen.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub surface: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,
}

/// Outcome coloring for the pay button and flashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Pending,
    Success,
    Failure,
}

/// Styles for the terminal screen, derived from a set of [`ThemeRoles`].
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    /// Background of the whole screen.
    fn surface_style(&self) -> Style {
        Style::new().bg(self.roles().surface)
    }

    fn body_style(&self) -> Style {
        Style::new().fg(self.roles().text)
    }

    /// Field labels and key names in hints.
    fn label_style(&self) -> Style {
        Style::new().fg(self.roles().text_secondary)
    }

    fn muted_style(&self) -> Style {
        Style::new().fg(self.roles().text_muted)
    }

    /// Amounts and other values the operator must not misread.
    fn amount_style(&self) -> Style {
        Style::new().fg(self.roles().accent).add_modifier(Modifier::BOLD)
    }

    fn selection_style(&self) -> Style {
        Style::new().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn tone_style(&self, tone: Tone) -> Style {
        let roles = self.roles();
        let color = match tone {
            Tone::Neutral => roles.text,
            Tone::Pending => roles.warning,
            Tone::Success => roles.success,
            Tone::Failure => roles.error,
        };
        Style::new().fg(color)
    }

    /// A rounded panel; the frame uses the focus color when `focused`.
    fn panel<'a>(&self, title: Option<&'a str>, focused: bool) -> Block<'a> {
        let roles = self.roles();
        let frame = if focused { roles.focus } else { roles.border };
        let panel = Block::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(frame))
            .style(self.surface_style().fg(roles.text));
        match title {
            Some(title) => panel.title(Span::styled(
                format!(" {title} "),
                self.label_style().add_modifier(Modifier::BOLD),
            )),
            None => panel,
        }
    }
}
