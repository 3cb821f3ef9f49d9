//! Runtime settings.
//!
//! Settings are read from `still_life.json` in the working directory, falling back to
//! `still-life/config.json` under the platform config directory. Every field is optional and
//! missing files simply yield the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "still_life.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    /// Directory the scene textures are loaded from.
    pub asset_dir: PathBuf,
    pub log_level: String,
    pub camera_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "Still Life".to_string(),
            window_width: 800,
            window_height: 600,
            vsync: true,
            asset_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            camera_speed: 2.5,
            mouse_sensitivity: 0.1,
        }
    }
}

impl Config {
    /// Parses a config from JSON text.
    pub fn parse(s: &str) -> Result<Self, String> {
        let config: Config = serde_json::from_str(s).map_err(|e| e.to_string())?;
        if config.window_width == 0 || config.window_height == 0 {
            return Err("window size must be non-zero".to_string());
        }
        Ok(config)
    }

    /// Reads the config at `path`.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&text).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Returns the first config file that exists, if any.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("still-life").join("config.json"))
            .filter(|path| path.is_file())
    }

    /// Loads the config from its usual locations, or the defaults if there is none.
    pub fn load() -> Result<Self, String> {
        match Self::locate() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// The configured log level, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        assert_eq!(Config::parse("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::parse(r#"{ "window_width": 1024, "asset_dir": "textures", "log_level": "debug" }"#)
            .unwrap();
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.asset_dir, PathBuf::from("textures"));
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Config::parse("{ not json").is_err());
        assert!(Config::parse(r#"{ "window_width": "wide" }"#).is_err());
        assert!(Config::parse(r#"{ "window_height": 0 }"#).is_err());
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }
}
