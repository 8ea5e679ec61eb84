//! Color palette: dark background, green highlight for the active line.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_dim: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
}

impl Palette {
    pub const DEFAULT: Self = Self {
        fg_primary: Color::Rgb(255, 255, 255),
        fg_secondary: Color::Rgb(156, 163, 175), // gray-400
        fg_dim: Color::Rgb(75, 85, 99),          // gray-600
        accent: Color::Rgb(74, 222, 128),        // green-400
        border: Color::Rgb(55, 65, 81),          // gray-700
        error: Color::Rgb(248, 113, 113),        // red-400
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::DEFAULT
    }
}
