use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::reflow::DEFAULT_WORDS_PER_LINE;
use crate::utils;
use crate::week::Locale;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_words_per_line")]
    pub words_per_line: usize,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_search")]
    pub search: String,
    #[serde(default = "default_toggle_complete")]
    pub toggle_complete: String,
    #[serde(default = "default_prev_week")]
    pub prev_week: String,
    #[serde(default = "default_next_week")]
    pub next_week: String,
    #[serde(default = "default_today")]
    pub today: String,
    #[serde(default = "default_jump_to_date")]
    pub jump_to_date: String,
    #[serde(default = "default_new_block")]
    pub new_block: String,
    #[serde(default = "default_rename_block")]
    pub rename_block: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_tab_1")]
    pub tab_1: String,
    #[serde(default = "default_tab_2")]
    pub tab_2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_danger")]
    pub danger: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_path: default_log_path(),
            words_per_line: default_words_per_line(),
            locale: default_locale(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            edit: default_edit(),
            save: default_save(),
            delete: default_delete(),
            search: default_search(),
            toggle_complete: default_toggle_complete(),
            prev_week: default_prev_week(),
            next_week: default_next_week(),
            today: default_today(),
            jump_to_date: default_jump_to_date(),
            new_block: default_new_block(),
            rename_block: default_rename_block(),
            help: default_help(),
            tab_1: default_tab_1(),
            tab_2: default_tab_2(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
            accent: default_accent(),
            danger: default_danger(),
        }
    }
}

impl Theme {
    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            highlight_fg: "white".to_string(),
            tab_bg: "gray".to_string(),
            accent: "blue".to_string(),
            danger: "red".to_string(),
        });

        themes.insert("green".to_string(), Theme {
            fg: "green".to_string(),
            bg: "black".to_string(),
            highlight_bg: "yellow".to_string(),
            highlight_fg: "black".to_string(),
            tab_bg: "gray".to_string(),
            accent: "lightgreen".to_string(),
            danger: "lightred".to_string(),
        });

        themes.insert("monochrome".to_string(), Theme {
            fg: "white".to_string(),
            bg: "black".to_string(),
            highlight_bg: "white".to_string(),
            highlight_fg: "black".to_string(),
            tab_bg: "gray".to_string(),
            accent: "white".to_string(),
            danger: "white".to_string(),
        });

        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    default_data_file(utils::Profile::Prod, "planner.db")
}

fn default_log_path() -> String {
    default_data_file(utils::Profile::Prod, "planner.log")
}

fn default_words_per_line() -> usize {
    DEFAULT_WORDS_PER_LINE
}

fn default_locale() -> String {
    Locale::default().to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_search() -> String {
    "/".to_string()
}

fn default_toggle_complete() -> String {
    "Space".to_string()
}

fn default_prev_week() -> String {
    "[".to_string()
}

fn default_next_week() -> String {
    "]".to_string()
}

fn default_today() -> String {
    "t".to_string()
}

fn default_jump_to_date() -> String {
    "g".to_string()
}

fn default_new_block() -> String {
    "b".to_string()
}

fn default_rename_block() -> String {
    "r".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_tab_1() -> String {
    "1".to_string()
}

fn default_tab_2() -> String {
    "2".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

fn default_accent() -> String {
    "cyan".to_string()
}

fn default_danger() -> String {
    "red".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

fn default_data_file(profile: utils::Profile, file_name: &str) -> String {
    if let Some(data_dir) = utils::get_data_dir(profile) {
        data_dir.join(file_name).to_string_lossy().to_string()
    } else {
        let dir = match profile {
            utils::Profile::Dev => "planner-dev",
            utils::Profile::Prod => "planner",
        };
        format!("~/.local/share/{}/{}", dir, file_name)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),
}

impl Config {
    /// Load configuration from file, or create default if missing.
    /// Data paths follow the profile so dev and prod never share a database.
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;

        if config_path.exists() {
            let mut config = Self::load_from_path(&config_path)?;
            config.database_path = default_data_file(profile, "planner.db");
            config.log_path = default_data_file(profile, "planner.log");
            Ok(config)
        } else {
            let mut config = Config::default();
            config.database_path = default_data_file(profile, "planner.db");
            config.log_path = default_data_file(profile, "planner.log");
            config.save_to_path(&config_path)?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit file; paths inside it are honoured as written
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_with_profile(&mut self, profile: utils::Profile) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    pub fn get_log_path(&self) -> PathBuf {
        utils::expand_path(&self.log_path)
    }

    /// Configured locale, falling back to pt-BR for unknown values
    pub fn locale(&self) -> Locale {
        match self.locale.parse() {
            Ok(locale) => locale,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default locale");
                Locale::default()
            }
        }
    }

    /// Get the currently active theme
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::default()
        }
    }

    /// Set the active theme by name
    pub fn set_theme(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.themes.contains_key(name) && !Theme::get_preset_themes().contains_key(name) {
            return Err(ConfigError::ThemeNotFound(name.to_string()));
        }
        self.current_theme = name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.words_per_line, 12);
        assert_eq!(config.locale, "pt-BR");
        assert_eq!(config.key_bindings.prev_week, "[");
        assert_eq!(config.current_theme, "default");
    }

    #[test]
    fn partial_key_bindings_keep_other_defaults() {
        let config: Config = toml::from_str(
            "words_per_line = 8\nlocale = \"en-US\"\n[key_bindings]\nquit = \"x\"\n",
        )
        .unwrap();
        assert_eq!(config.words_per_line, 8);
        assert_eq!(config.locale(), Locale::EnUs);
        assert_eq!(config.key_bindings.quit, "x");
        assert_eq!(config.key_bindings.new, "n");
    }

    #[test]
    fn unknown_locale_falls_back() {
        let config = Config { locale: "xx".to_string(), ..Config::default() };
        assert_eq!(config.locale(), Locale::PtBr);
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config { words_per_line: 5, ..Config::default() };
        config.set_theme("light").unwrap();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.words_per_line, 5);
        assert_eq!(loaded.current_theme, "light");
        assert_eq!(loaded.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let mut config = Config::default();
        assert!(matches!(config.set_theme("neon"), Err(ConfigError::ThemeNotFound(_))));
        assert_eq!(config.get_active_theme().fg, "white");
    }
}
