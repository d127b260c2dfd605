//! Centralized theme and styling for the storefront wizard
//!
//! Single source of truth for the colors and styles used by the terminal
//! renderer.
//!
//! # Usage
//! ```rust
//! use bundle_builder::theme::{Colors, Styles};
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! ```

use ratatui::style::{Color, Modifier, Style};

/// Core color palette
pub struct Colors;

impl Colors {
    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Primary accent color - borders, titles, highlights
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent color - badges, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    /// Success/positive feedback (selected products, savings)
    pub const SUCCESS: Color = Color::Green;

    /// Warning feedback (blocked navigation)
    pub const WARNING: Color = Color::Yellow;

    /// Error feedback (negative totals)
    pub const ERROR: Color = Color::Red;

    /// Cursor row highlight
    pub const SELECTED_BG: Color = Color::Yellow;

    /// Cursor row text (for contrast on yellow bg)
    pub const SELECTED_FG: Color = Color::Black;

    /// Progress bar fill
    pub const PROGRESS: Color = Color::Green;

    /// Navigation hint color
    pub const NAV_HINT: Color = Color::DarkGray;
}

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Muted/secondary text
    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Bold accent title
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Cursor row in a list
    pub fn highlight() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Picked product
    pub fn picked() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    /// Step badge ("Optional", "Recommended")
    pub fn badge() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::ITALIC)
    }

    /// Key hint in the navigation bar
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Status line feedback
    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR).add_modifier(Modifier::BOLD)
    }
}
