use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_training_delay_ms")]
    pub training_delay_ms: u64,
    #[serde(default = "default_trick_reveal_delay_ms")]
    pub trick_reveal_delay_ms: u64,
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,
    #[serde(default = "default_player_count")]
    pub default_player_count: usize,
}

fn default_theme() -> String {
    "classroom".to_string()
}
fn default_tick_rate_ms() -> u64 {
    33
}
fn default_training_delay_ms() -> u64 {
    4000
}
fn default_trick_reveal_delay_ms() -> u64 {
    1000
}
fn default_analysis_delay_ms() -> u64 {
    1500
}
fn default_player_count() -> usize {
    MIN_PLAYERS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
            training_delay_ms: default_training_delay_ms(),
            trick_reveal_delay_ms: default_trick_reveal_delay_ms(),
            analysis_delay_ms: default_analysis_delay_ms(),
            default_player_count: default_player_count(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kidlessons")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        self.default_player_count = self.default_player_count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.tick_rate_ms = self.tick_rate_ms.clamp(10, 500);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.training_delay_ms, 4000);
        assert_eq!(config.trick_reveal_delay_ms, 1000);
        assert_eq!(config.analysis_delay_ms, 1500);
        assert_eq!(config.default_player_count, 2);
        assert_eq!(config.theme, "classroom");
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "night"
training_delay_ms = 500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "night");
        assert_eq!(config.training_delay_ms, 500);
        assert_eq!(config.trick_reveal_delay_ms, 1000);
        assert_eq!(config.tick_rate_ms, 33);
    }

    #[test]
    fn test_normalize_clamps_player_count() {
        let mut config = Config::default();
        config.default_player_count = 9;
        config.normalize();
        assert_eq!(config.default_player_count, MAX_PLAYERS);

        config.default_player_count = 0;
        config.normalize();
        assert_eq!(config.default_player_count, MIN_PLAYERS);
    }

    #[test]
    fn test_normalize_resets_blank_theme() {
        let mut config = Config::default();
        config.theme = "  ".to_string();
        config.normalize();
        assert_eq!(config.theme, "classroom");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.training_delay_ms, 4000);
    }

    #[test]
    fn test_save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.default_player_count = 3;
        config.analysis_delay_ms = 200;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_player_count, 3);
        assert_eq!(loaded.analysis_delay_ms, 200);
    }

    #[test]
    fn test_load_normalizes_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_player_count = 12\ntick_rate_ms = 1\n").unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_player_count, MAX_PLAYERS);
        assert_eq!(loaded.tick_rate_ms, 10);
    }
}
