//! Overlay configuration: screen metrics and element sizes

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Largest pixel value accepted for the screen or any converted size
pub const MAX_PIXELS: i32 = 1 << 24;

/// Screen metrics plus the density-independent sizes of the overlay elements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub density: f32,
    pub bubble_size_dp: i32,
    pub edge_margin_dp: i32,
    pub delete_zone_height_dp: i32,
    pub delete_button_size_dp: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            screen_width: 1080,
            screen_height: 2000,
            density: 2.0,
            bubble_size_dp: 60,
            edge_margin_dp: 8,
            delete_zone_height_dp: 120,
            delete_button_size_dp: 100,
        }
    }
}

impl OverlayConfig {
    /// Read a JSON config file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: OverlayConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or fall back to the platform config
    /// directory, or to defaults when neither exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.screen_width > MAX_PIXELS || self.screen_height > MAX_PIXELS {
            return Err(ConfigError::Invalid(format!(
                "screen size must not exceed {}px, got {}x{}",
                MAX_PIXELS, self.screen_width, self.screen_height
            )));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        let sizes = [
            ("bubble_size_dp", self.bubble_size_dp),
            ("edge_margin_dp", self.edge_margin_dp),
            ("delete_zone_height_dp", self.delete_zone_height_dp),
            ("delete_button_size_dp", self.delete_button_size_dp),
        ];
        for (name, value) in sizes {
            if value < 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
            let px = value as f64 * self.density as f64;
            if px > MAX_PIXELS as f64 {
                return Err(ConfigError::Invalid(format!(
                    "{} of {} at density {} exceeds {}px",
                    name, value, self.density, MAX_PIXELS
                )));
            }
        }
        Ok(())
    }

    /// Convert density-independent pixels to screen pixels (truncating)
    pub fn dp_to_px(&self, dp: i32) -> i32 {
        (dp as f32 * self.density) as i32
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "floatmate", "floatmate")
        .map(|dirs| dirs.config_dir().join("config.json"))
}
