//! User configuration.
//!
//! Loaded from `<config dir>/termsvg/config.toml`, or from the path in
//! `TERMSVG_CONFIG` when set. A missing file means defaults; every key is
//! optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::render::{FrameOptions, Geometry, RenderOptions};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TERMSVG_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Built-in theme name, or `auto` to ask the display environment
    pub theme: String,
    pub render: RenderConfig,
    pub record: RecordConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "auto".to_string(),
            render: RenderConfig::default(),
            record: RecordConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font_family: String,
    pub font_size: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub last_frame_hold_ms: u64,
    pub min_frame_duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_frame_duration_ms: Option<u64>,
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let geometry = Geometry::default();
        let frames = FrameOptions::default();
        Self {
            font_family: geometry.font_family,
            font_size: geometry.font_size,
            cell_width: geometry.cell_width,
            cell_height: geometry.cell_height,
            last_frame_hold_ms: frames.last_frame_hold.as_millis() as u64,
            min_frame_duration_ms: frames.min_frame_duration.as_millis() as u64,
            max_frame_duration_ms: None,
            looping: false,
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            frames: FrameOptions {
                min_frame_duration: Duration::from_millis(self.min_frame_duration_ms),
                max_frame_duration: self.max_frame_duration_ms.map(Duration::from_millis),
                last_frame_hold: Duration::from_millis(self.last_frame_hold_ms),
            },
            geometry: Geometry {
                cell_width: self.cell_width.max(1),
                cell_height: self.cell_height.max(1),
                font_size: self.font_size,
                font_family: self.font_family.clone(),
            },
            looping: self.looping,
            theme: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Program to record; `$SHELL` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub record_input: bool,
    /// Stored in the cast header, seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_time_limit: Option<f64>,
}

impl Config {
    /// Location of the config file.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("termsvg").join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "theme = \"dracula\"\n[render]\nfont_size = 20\nloop = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.theme, "dracula");
        assert_eq!(config.render.font_size, 20);
        assert!(config.render.looping);
        assert_eq!(config.render.cell_width, RenderConfig::default().cell_width);
        assert!(!config.record.record_input);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let mut config = Config::default();
        config.record.command = Some("bash -l".to_string());
        config.record.idle_time_limit = Some(2.5);
        config.render.max_frame_duration_ms = Some(3000);
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn render_options_follow_config() {
        let mut render = RenderConfig::default();
        render.last_frame_hold_ms = 250;
        render.max_frame_duration_ms = Some(500);
        let options = render.options();
        assert_eq!(options.frames.last_frame_hold, Duration::from_millis(250));
        assert_eq!(options.frames.max_frame_duration, Some(Duration::from_millis(500)));
        assert_eq!(options.frames.min_frame_duration, Duration::from_millis(1));
        assert!(!options.looping);
    }
}
