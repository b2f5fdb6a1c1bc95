use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub interface: InterfaceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Value passed to libmpv's `hwdec` option
    #[serde(default = "default_hwdec")]
    pub hwdec: String,

    #[serde(default = "default_volume")]
    pub initial_volume: u8,

    /// Raise libmpv's own log level and mirror it to the terminal
    #[serde(default)]
    pub verbose_logging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    #[serde(default = "default_controls_hide_delay")]
    pub controls_hide_delay_ms: u64,

    #[serde(default = "default_cursor_hide_delay")]
    pub cursor_hide_delay_ms: u64,

    #[serde(default = "default_fade_in")]
    pub fade_in_ms: u32,

    #[serde(default = "default_fade_out")]
    pub fade_out_ms: u32,

    #[serde(default = "default_window_width")]
    pub window_width: i32,

    #[serde(default = "default_window_height")]
    pub window_height: i32,
}

impl Config {
    /// Load the user config file, falling back to defaults when none exists.
    /// The file is only ever read; nothing is written back.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                info!("No config directory available, using defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        info!("Config loaded successfully");
        Ok(config.normalized())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    fn normalized(mut self) -> Self {
        self.playback.initial_volume = self.playback.initial_volume.min(VOLUME_SLIDER_MAX as u8);
        if self.interface.window_width <= 0 {
            self.interface.window_width = DEFAULT_WINDOW_WIDTH;
        }
        if self.interface.window_height <= 0 {
            self.interface.window_height = DEFAULT_WINDOW_HEIGHT;
        }
        self
    }
}

impl InterfaceConfig {
    pub fn controls_hide_delay(&self) -> Duration {
        Duration::from_millis(self.controls_hide_delay_ms)
    }

    pub fn cursor_hide_delay(&self) -> Duration {
        Duration::from_millis(self.cursor_hide_delay_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            hwdec: default_hwdec(),
            initial_volume: default_volume(),
            verbose_logging: false,
        }
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            controls_hide_delay_ms: default_controls_hide_delay(),
            cursor_hide_delay_ms: default_cursor_hide_delay(),
            fade_in_ms: default_fade_in(),
            fade_out_ms: default_fade_out(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

// Default value functions
fn default_hwdec() -> String { DEFAULT_HWDEC.to_string() }
fn default_volume() -> u8 { DEFAULT_VOLUME }
fn default_controls_hide_delay() -> u64 { CONTROLS_HIDE_DELAY_MS }
fn default_cursor_hide_delay() -> u64 { CURSOR_HIDE_DELAY_MS }
fn default_fade_in() -> u32 { CONTROLS_FADE_IN_MS }
fn default_fade_out() -> u32 { CONTROLS_FADE_OUT_MS }
fn default_window_width() -> i32 { DEFAULT_WINDOW_WIDTH }
fn default_window_height() -> i32 { DEFAULT_WINDOW_HEIGHT }

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.playback.hwdec, "auto-safe");
        assert_eq!(config.playback.initial_volume, 50);
        assert_eq!(config.interface.controls_hide_delay_ms, 2000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[interface]\ncontrols_hide_delay_ms = 3500").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.interface.controls_hide_delay_ms, 3500);
        assert_eq!(config.interface.fade_out_ms, 300);
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn test_out_of_range_values_are_normalized() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[playback]\ninitial_volume = 180\n\n[interface]\nwindow_width = 0"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.playback.initial_volume, 100);
        assert_eq!(config.interface.window_width, 1280);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[playback\nhwdec = ").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }
}
