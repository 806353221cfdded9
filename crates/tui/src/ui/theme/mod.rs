//! Colors for the terminal screen.
//!
//! Widgets ask a [`Theme`] for semantic styles instead of hard-coding colors.
//! Truecolor terminals get the Nord palette; everything else gets a palette
//! built from the 16 basic ANSI colors.

use std::env;

use tracing::debug;

pub mod nord;
pub mod roles;

pub use nord::{AnsiTheme, NordTheme};
pub use roles::{Theme, ThemeRoles, Tone};

/// Pick a theme for the current terminal.
///
/// `PAYDESK_COLOR_MODE=truecolor|ansi` overrides detection from
/// `COLORTERM`/`TERM`.
pub fn load() -> Box<dyn Theme> {
    if supports_truecolor() {
        Box::new(NordTheme::new())
    } else {
        debug!("truecolor not detected; using the ANSI palette");
        Box::new(AnsiTheme::new())
    }
}

fn supports_truecolor() -> bool {
    if let Ok(mode) = env::var("PAYDESK_COLOR_MODE") {
        match mode.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" => return true,
            "ansi" | "ansi256" | "256" => return false,
            _ => {}
        }
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    color_term.contains("truecolor") || color_term.contains("24bit") || term.contains("truecolor")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_override_wins() {
        temp_env::with_vars(
            [("PAYDESK_COLOR_MODE", Some("ansi")), ("COLORTERM", Some("truecolor"))],
            || assert!(!supports_truecolor()),
        );
        temp_env::with_vars(
            [("PAYDESK_COLOR_MODE", Some("truecolor")), ("COLORTERM", None)],
            || assert!(supports_truecolor()),
        );
    }

    #[test]
    fn detects_truecolor_from_colorterm() {
        temp_env::with_vars(
            [("PAYDESK_COLOR_MODE", None), ("COLORTERM", Some("24bit")), ("TERM", Some("xterm"))],
            || assert!(supports_truecolor()),
        );
        temp_env::with_vars(
            [("PAYDESK_COLOR_MODE", None::<&str>), ("COLORTERM", None), ("TERM", Some("xterm-256color"))],
            || assert!(!supports_truecolor()),
        );
    }
}
