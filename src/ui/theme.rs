//! Theme and styling configuration.

use std::sync::OnceLock;

use ratatui::style::Color;

/// Color theme for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Secondary text (hints, names next to symbols).
    pub dim: Color,
    /// Accent color for focused titles and typed text.
    pub accent: Color,
    /// Unfocused border color.
    pub border: Color,
    /// Focused border color.
    pub border_focused: Color,
    /// Text color inside inputs.
    pub input_fg: Color,
    /// Placeholder text color.
    pub input_placeholder: Color,
    /// Background of the highlighted dropdown row.
    pub highlight_bg: Color,
    /// Tag chip background.
    pub tag_bg: Color,
    /// Tag chip foreground.
    pub tag_fg: Color,
    /// Positive values and checked boxes.
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Yellow,
            input_fg: Color::White,
            input_placeholder: Color::DarkGray,
            highlight_bg: Color::Blue,
            tag_bg: Color::Blue,
            tag_fg: Color::White,
            success: Color::Green,
        }
    }
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme used for the rest of the session.
///
/// Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

/// The active theme, or the default if none was installed.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
