//! Application configuration.
//!
//! Centralizes the constants used throughout the application and the
//! user-editable [`AppConfig`], read from a JSON file at startup.

use std::fs;
use std::path::{Path, PathBuf};

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::ConfigError;

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name, used for the window title and data directories.
pub const APP_NAME: &str = "fmsh";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Defaults
// =============================================================================

/// Page shown when none is given (or `0` is given).
pub const DEFAULT_PAGE: usize = 1;

pub const DEFAULT_FILES_PER_PAGE: usize = 20;

pub const DEFAULT_BORDER_SYMBOL: char = '=';

pub const DEFAULT_BACKGROUND: &str = "Black";

pub const DEFAULT_FOREGROUND: &str = "Gray";

/// Blank lines reserved for the notification window when there is nothing to show.
pub const DEFAULT_EMPTY_INFO_HEIGHT: usize = 5;

// =============================================================================
// File Locations
// =============================================================================

pub const CONFIG_FILE: &str = "config.json";

pub const STATE_FILE: &str = "last_state.txt";

pub const LOG_FILE: &str = "fmsh.log";

pub const LOG_DIR: &str = "logs";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "fmsh=info";

/// `<config dir>/fmsh/config.json`, falling back to the working directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_default()
        .join(CONFIG_FILE)
}

/// `<local data dir>/fmsh/last_state.txt`, falling back to the working directory.
pub fn default_state_path() -> PathBuf {
    data_dir().join(STATE_FILE)
}

/// `<local data dir>/fmsh/logs`, falling back to the working directory.
pub fn default_log_dir() -> PathBuf {
    data_dir().join(LOG_DIR)
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_default()
}

// =============================================================================
// User Configuration
// =============================================================================

/// Settings read from the JSON configuration file.
///
/// Field names follow the file format (`FilesPerPage`, `WindowBorderSymbol`,
/// ...). Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppConfig {
    pub files_per_page: i64,
    pub window_border_symbol: String,
    pub background_color: String,
    pub foreground_color: String,
    pub empty_info_window_height: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            files_per_page: DEFAULT_FILES_PER_PAGE as i64,
            window_border_symbol: DEFAULT_BORDER_SYMBOL.to_string(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            foreground_color: DEFAULT_FOREGROUND.to_string(),
            empty_info_window_height: DEFAULT_EMPTY_INFO_HEIGHT as i64,
        }
    }
}

impl AppConfig {
    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a configuration file, using defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        Self::from_file(path).unwrap_or_else(|err| {
            warn!(error = %err, "using default configuration");
            Self::default()
        })
    }

    /// Clamp every setting into its valid range.
    pub fn settings(&self) -> Settings {
        let files_per_page = usize::try_from(self.files_per_page)
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_FILES_PER_PAGE);
        let empty_info_height = usize::try_from(self.empty_info_window_height)
            .unwrap_or(DEFAULT_EMPTY_INFO_HEIGHT);
        let border_symbol = self
            .window_border_symbol
            .chars()
            .next()
            .unwrap_or(DEFAULT_BORDER_SYMBOL);

        Settings {
            files_per_page,
            border_symbol,
            background: parse_color(&self.background_color)
                .or_else(|| parse_color(DEFAULT_BACKGROUND))
                .unwrap_or(Color::Black),
            foreground: parse_color(&self.foreground_color)
                .or_else(|| parse_color(DEFAULT_FOREGROUND))
                .unwrap_or(Color::Grey),
            empty_info_height,
        }
    }
}

/// Validated configuration used at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub files_per_page: usize,
    pub border_symbol: char,
    pub background: Color,
    pub foreground: Color,
    pub empty_info_height: usize,
}

impl Default for Settings {
    fn default() -> Self {
        AppConfig::default().settings()
    }
}

/// Map a console color name (case-insensitive) to a terminal color.
pub fn parse_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "darkblue" => Color::DarkBlue,
        "darkgreen" => Color::DarkGreen,
        "darkcyan" => Color::DarkCyan,
        "darkred" => Color::DarkRed,
        "darkmagenta" => Color::DarkMagenta,
        "darkyellow" => Color::DarkYellow,
        "gray" | "grey" => Color::Grey,
        "darkgray" | "darkgrey" => Color::DarkGrey,
        "blue" => Color::Blue,
        "green" => Color::Green,
        "cyan" => Color::Cyan,
        "red" => Color::Red,
        "magenta" => Color::Magenta,
        "yellow" => Color::Yellow,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let json = r##"{
            "FilesPerPage": 10,
            "WindowBorderSymbol": "#",
            "BackgroundColor": "DarkBlue",
            "ForegroundColor": "white",
            "EmptyInfoWindowHeight": 3
        }"##;
        let settings = serde_json::from_str::<AppConfig>(json).unwrap().settings();
        assert_eq!(settings.files_per_page, 10);
        assert_eq!(settings.border_symbol, '#');
        assert_eq!(settings.background, Color::DarkBlue);
        assert_eq!(settings.foreground, Color::White);
        assert_eq!(settings.empty_info_height, 3);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"FilesPerPage": 7}"#).unwrap();
        assert_eq!(config.files_per_page, 7);
        assert_eq!(config.window_border_symbol, "=");
    }

    #[test]
    fn test_invalid_values_are_corrected() {
        let config = AppConfig {
            files_per_page: -3,
            window_border_symbol: "*-*".to_string(),
            background_color: "Chartreuse".to_string(),
            foreground_color: String::new(),
            empty_info_window_height: -1,
        };
        let settings = config.settings();
        assert_eq!(settings.files_per_page, DEFAULT_FILES_PER_PAGE);
        assert_eq!(settings.border_symbol, '*');
        assert_eq!(settings.background, Color::Black);
        assert_eq!(settings.foreground, Color::Grey);
        assert_eq!(settings.empty_info_height, DEFAULT_EMPTY_INFO_HEIGHT);

        let empty_border = AppConfig {
            window_border_symbol: String::new(),
            ..AppConfig::default()
        };
        assert_eq!(empty_border.settings().border_symbol, DEFAULT_BORDER_SYMBOL);
    }

    #[test]
    fn test_load_or_default() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.json");
        assert_eq!(AppConfig::load_or_default(&missing), AppConfig::default());

        let broken = tmp.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(AppConfig::from_file(&broken), Err(ConfigError::Parse { .. })));
        assert_eq!(AppConfig::load_or_default(&broken), AppConfig::default());
    }
}
