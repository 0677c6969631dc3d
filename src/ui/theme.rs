use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::schedule::entry::Category;
use crate::yut::setup::PlayerColor;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
    pub board_cell: String,
    pub board_prime: String,
    pub category_study: String,
    pub category_leisure: String,
    pub category_daily: String,
    pub category_etc: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("kidlessons")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => warn!(path = %user_theme_path.display(), %err, "ignoring broken theme"),
                }
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        if let Some(file) = ThemeAssets::get(&filename) {
            if let Ok(content) = std::str::from_utf8(file.data.as_ref()) {
                if let Ok(theme) = toml::from_str::<Theme>(content) {
                    return Some(theme);
                }
            }
        }

        None
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("classroom").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#fdf6e3".to_string(),
            fg: "#3b3a36".to_string(),
            text_muted: "#8a8778".to_string(),
            accent: "#2563eb".to_string(),
            accent_dim: "#c7d2fe".to_string(),
            border: "#b8b2a0".to_string(),
            border_focused: "#2563eb".to_string(),
            header_bg: "#e8dfc8".to_string(),
            header_fg: "#3b3a36".to_string(),
            bar_filled: "#2563eb".to_string(),
            bar_empty: "#e8dfc8".to_string(),
            error: "#dc2626".to_string(),
            warning: "#d97706".to_string(),
            success: "#16a34a".to_string(),
            board_cell: "#dbeafe".to_string(),
            board_prime: "#fef3c7".to_string(),
            category_study: "#3b82f6".to_string(),
            category_leisure: "#22c55e".to_string(),
            category_daily: "#eab308".to_string(),
            category_etc: "#a855f7".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_muted(&self) -> Color { Self::parse_color(&self.text_muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn board_cell(&self) -> Color { Self::parse_color(&self.board_cell) }
    pub fn board_prime(&self) -> Color { Self::parse_color(&self.board_prime) }

    pub fn category(&self, category: Category) -> Color {
        let hex = match category {
            Category::Study => &self.category_study,
            Category::Leisure => &self.category_leisure,
            Category::Daily => &self.category_daily,
            Category::Etc => &self.category_etc,
        };
        Self::parse_color(hex)
    }

    /// Player pieces use fixed terminal colors so they read on any theme.
    pub fn player(color: PlayerColor) -> Color {
        match color {
            PlayerColor::Red => Color::Rgb(239, 68, 68),
            PlayerColor::Blue => Color::Rgb(59, 130, 246),
            PlayerColor::Green => Color::Rgb(34, 197, 94),
            PlayerColor::Yellow => Color::Rgb(234, 179, 8),
            PlayerColor::Purple => Color::Rgb(168, 85, 247),
            PlayerColor::Orange => Color::Rgb(249, 115, 22),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"classroom".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "{name} failed to parse");
        }
    }
}
