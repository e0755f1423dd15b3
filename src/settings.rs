//! Player settings and preferences
//!
//! Stored as JSON next to the app. Unlike session state, these survive
//! restarts: a new game never touches them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tuning::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Fragment pool capacity for this preset
    pub fn max_fragments(&self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 256,
            QualityPreset::High => 512,
        }
    }

    /// Trail segments drawn per blade, as a stride over the ring buffer
    pub fn trail_stride(&self) -> usize {
        match self {
            QualityPreset::Low => 3,
            QualityPreset::Medium => 2,
            QualityPreset::High => 1,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Feedback ===
    /// Controller vibration on hits and misses
    pub haptics: bool,
    /// Scales every haptic amplitude (0.0 - 1.0)
    pub haptic_intensity: f32,

    // === Input ===
    /// Allow tracked hands to stand in for controllers
    pub hand_tracking: bool,

    // === Visual Effects ===
    /// Blade trails
    pub trails: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            haptics: true,
            haptic_intensity: 1.0,
            hand_tracking: true,
            trails: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective fragment pool capacity
    pub fn max_fragments(&self) -> usize {
        self.quality.max_fragments()
    }

    /// Final amplitude for a requested haptic pulse, `None` when muted
    pub fn haptic_amplitude(&self, requested: f32) -> Option<f32> {
        if !self.haptics {
            return None;
        }
        let amplitude = (requested * self.haptic_intensity).clamp(0.0, 1.0);
        (amplitude > 0.0).then_some(amplitude)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
