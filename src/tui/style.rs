//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::Reset;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Cyan;
    pub const KEY: Color = Color::Yellow;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Description line under the heading.
    pub fn description() -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    /// Column headings and totals.
    pub fn bold() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn help_border() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    pub fn help_section() -> Style {
        Style::default().fg(Theme::KEY).add_modifier(Modifier::BOLD)
    }

    pub fn help_key() -> Style {
        Style::default().fg(Theme::KEY)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }
}
