//! Terminal styling utilities
//!
//! Semantic styling shared by CLI output and the TUI: green/yellow/red for
//! status, cyan for headers and technical values, dim for secondary text.

use crossterm::style::Stylize;

/// Extension trait for consistent tickerd styling.
///
/// Use these methods instead of direct color calls so CLI output stays
/// visually consistent.
pub trait TickerStyle: Stylize {
    /// Style for section headers (cyan bold)
    fn header(self) -> <<Self as Stylize>::Styled as Stylize>::Styled
    where
        Self: Sized,
        <Self as Stylize>::Styled: Stylize,
    {
        self.cyan().bold()
    }

    /// Style for success/active status (green)
    fn success(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.green()
    }

    /// Style for error/missing status (red)
    fn error(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.red()
    }

    /// Style for warning/paused status (yellow)
    fn warning(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.yellow()
    }

    /// Style for technical terms and identifiers (cyan)
    fn technical(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.cyan()
    }
}

// Implement for all types that implement Stylize (String, &str, etc.)
impl<T: Stylize> TickerStyle for T {}

/// Semantic color palette for TUI use with ratatui
#[cfg(feature = "tui")]
pub mod colors {
    use ratatui::style::Color;

    /// Color for active/live UI borders (green)
    pub const UI_BORDER_ACTIVE: Color = Color::Green;

    /// Color for inactive/stopped UI borders (gray)
    pub const UI_BORDER_INACTIVE: Color = Color::Gray;

    /// Color for selected UI elements (cyan, use with bold)
    pub const UI_SELECTED: Color = Color::Cyan;

    /// Background color for selected UI elements (dark gray)
    pub const UI_SELECTED_BG: Color = Color::DarkGray;

    /// Color for UI highlights (cyan)
    pub const UI_HIGHLIGHT: Color = Color::Cyan;

    /// Color for statistics/counts (yellow, use with bold)
    pub const UI_STAT: Color = Color::Yellow;

    /// Color for success states (green)
    pub const UI_SUCCESS: Color = Color::Green;

    /// Color for error states (red)
    pub const UI_ERROR: Color = Color::Red;

    /// Color for warning states (yellow)
    pub const UI_WARNING: Color = Color::Yellow;

    /// Color for secondary/dimmed text (gray)
    pub const UI_SECONDARY: Color = Color::Gray;

    /// Color for normal UI text (white)
    pub const UI_TEXT: Color = Color::White;

    /// Color for the breaking-news accent (light red)
    pub const UI_BREAKING: Color = Color::LightRed;
}
