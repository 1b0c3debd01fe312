use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    compose::{GridLayout, ThemeKind},
    error::{ConfigError, Result},
};

/// Main configuration for Snapbooth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Capture sequence settings
    pub capture: CaptureSettings,

    /// Strip composition settings
    pub strip: StripConfig,

    /// Processing settings
    pub processing: ProcessingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureSettings::default(),
            strip: StripConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.capture.validate()?;
        self.processing.validate()?;
        Ok(())
    }
}

/// Capture sequence settings, owned by the UI layer and passed in as plain
/// values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Photos per session (1-9)
    pub photo_count: u32,

    /// Countdown before the first photo, in seconds (1-10)
    pub countdown_seconds: u32,

    /// Pause between photos, in seconds (1-10)
    pub interval_seconds: u32,

    /// Append a timestamp to the strip's footer signature
    pub show_timestamp: bool,

    /// Mirror the live preview horizontally (stored pixels are unaffected)
    pub mirror_mode: bool,

    /// Grid arrangement of the composed strip
    pub grid_layout: GridLayout,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            photo_count: 3,
            countdown_seconds: 3,
            interval_seconds: 3,
            show_timestamp: true,
            mirror_mode: true,
            grid_layout: GridLayout::OneByThree,
        }
    }
}

impl CaptureSettings {
    fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.photo_count) {
            return Err(ConfigError::InvalidValue {
                key: "capture.photo_count".to_string(),
                value: self.photo_count.to_string(),
            }
            .into());
        }

        if !(1..=10).contains(&self.countdown_seconds) {
            return Err(ConfigError::InvalidValue {
                key: "capture.countdown_seconds".to_string(),
                value: self.countdown_seconds.to_string(),
            }
            .into());
        }

        if !(1..=10).contains(&self.interval_seconds) {
            return Err(ConfigError::InvalidValue {
                key: "capture.interval_seconds".to_string(),
                value: self.interval_seconds.to_string(),
            }
            .into());
        }

        if self.grid_layout.capacity() < self.photo_count {
            return Err(ConfigError::InvalidValue {
                key: "capture.grid_layout".to_string(),
                value: format!(
                    "{} holds {} photos, {} requested",
                    self.grid_layout,
                    self.grid_layout.capacity(),
                    self.photo_count
                ),
            }
            .into());
        }

        Ok(())
    }
}

/// Strip composition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripConfig {
    /// Color theme of the composed strip
    pub theme: ThemeKind,

    /// Header text; empty means no header band
    pub header_text: String,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            theme: ThemeKind::Dark,
            header_text: String::new(),
        }
    }
}

/// Processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of parallel photo-processing threads
    pub threads: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

impl ProcessingConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "processing.threads".to_string(),
                value: self.threads.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
