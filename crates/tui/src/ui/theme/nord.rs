//! Nord palette for truecolor terminals and a basic ANSI fallback.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Polar Night
const N0: Color = Color::Rgb(0x2E, 0x34, 0x40);
const N1: Color = Color::Rgb(0x3B, 0x42, 0x52);
const N3: Color = Color::Rgb(0x4C, 0x56, 0x6A);

// Snow Storm
const S0: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
const S1: Color = Color::Rgb(0xE5, 0xE9, 0xF0);
const S2: Color = Color::Rgb(0xEC, 0xEF, 0xF4);

// Frost
const F1: Color = Color::Rgb(0x88, 0xC0, 0xD0);

// Aurora
const A_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A);
const A_YELLOW: Color = Color::Rgb(0xEB, 0xCB, 0x8B);
const A_GREEN: Color = Color::Rgb(0xA3, 0xBE, 0x8C);

const TEXT_MUTED: Color = Color::Rgb(0x61, 0x6E, 0x88);

/// Default theme for dark truecolor terminals.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                surface: N0,
                border: N3,
                text: S0,
                text_secondary: S1,
                text_muted: TEXT_MUTED,
                accent: F1,
                success: A_GREEN,
                warning: A_YELLOW,
                error: A_RED,
                selection_bg: N1,
                selection_fg: S2,
                focus: F1,
            },
        }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Fallback built from the basic ANSI colors so it follows the terminal's scheme.
#[derive(Debug, Clone)]
pub struct AnsiTheme {
    roles: ThemeRoles,
}

impl AnsiTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                surface: Color::Reset,
                border: Color::DarkGray,
                text: Color::Reset,
                text_secondary: Color::White,
                text_muted: Color::DarkGray,
                accent: Color::Cyan,
                success: Color::Green,
                warning: Color::Yellow,
                error: Color::Red,
                selection_bg: Color::Blue,
                selection_fg: Color::White,
                focus: Color::Cyan,
            },
        }
    }
}

impl Default for AnsiTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for AnsiTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
