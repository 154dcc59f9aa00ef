use crate::effect::Effect;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const BANANA_RANGE: RangeInclusive<usize> = 1..=1000;
pub const PIXEL_RATIO_RANGE: RangeInclusive<f32> = 1.0..=16.0;
pub const FRAME_MILLIS_RANGE: RangeInclusive<u64> = 8..=100;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Number of bananas in the swarm
    pub banana_count: usize,
    /// World pixels per Braille dot
    pub pixel_ratio: f32,
    /// Target frame period
    pub frame_millis: u64,
    /// Sprite image; the builtin banana when absent
    pub sprite_path: Option<PathBuf>,
    /// RNG seed; random when absent
    pub seed: Option<u64>,
    /// Effect shown on the first trigger
    pub start_effect: Effect,
    /// Hide the sidebar
    pub fullscreen: bool,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Per-user config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("banana-swarm").join("config.json"))
    }

    /// Load `path`, or the defaults when no file exists there
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            let config = Self::load_from_file(path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Pull every numeric setting into its supported range
    pub fn clamped(mut self) -> Self {
        self.banana_count = self
            .banana_count
            .clamp(*BANANA_RANGE.start(), *BANANA_RANGE.end());
        self.pixel_ratio = if self.pixel_ratio.is_finite() {
            self.pixel_ratio
                .clamp(*PIXEL_RATIO_RANGE.start(), *PIXEL_RATIO_RANGE.end())
        } else {
            Self::default().pixel_ratio
        };
        self.frame_millis = self
            .frame_millis
            .clamp(*FRAME_MILLIS_RANGE.start(), *FRAME_MILLIS_RANGE.end());
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            banana_count: 60,
            pixel_ratio: 4.0,
            frame_millis: 16,
            sprite_path: None,
            seed: None,
            start_effect: Effect::Drift,
            fullscreen: false,
        }
    }
}
