//! Mod settings with persistence
//!
//! Settings are saved to `~/.config/bikecam/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikecam_capture::CaptureConfig;
use bikecam_rig::{CameraConfig, InputConfig, PhotoModeConfig, RigConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All mod settings, one table per category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModSettings {
    pub camera: CameraConfig,
    pub photo: PhotoModeConfig,
    pub input: InputConfig,
    pub capture: CaptureConfig,
}

impl ModSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bikecam"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from `path`. Missing or broken files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    /// Save settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Problems across every category, for display to the user
    pub fn validate(&self) -> Vec<String> {
        let mut problems = self.camera.validate();
        problems.extend(self.photo.validate());
        problems.extend(self.input.validate());
        problems.extend(self.capture.validate());
        problems
    }

    pub fn rig_config(&self) -> RigConfig {
        RigConfig {
            camera: self.camera.clone(),
            photo: self.photo.clone(),
            input: self.input.clone(),
            capture: self.capture.clone(),
        }
    }
}
