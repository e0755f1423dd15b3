//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the
//! shipped feel; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while loading tuning or settings files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Blade ===
    /// Distance from hand to projected blade tip (meters)
    pub blade_length: f32,

    // === Gestures ===
    /// Max distance from target center to blade segment for a hit
    pub hit_distance: f32,
    /// Blade speed at or above which a hit slices (m/s)
    pub slice_threshold: f32,
    /// Lower bound of the flip band (m/s, inclusive)
    pub flip_speed_min: f32,
    /// Upper bound of the flip band (m/s, exclusive)
    pub flip_speed_max: f32,
    /// Vertical speed given to a flipped target
    pub flip_launch_speed: f32,
    /// Lateral pull back toward the origin per meter of offset
    pub flip_center_pull: f32,
    /// Flash duration after a flip (seconds)
    pub flip_flash_time: f32,
    /// Re-detection lockout after a flip (seconds)
    pub hit_cooldown: f32,
    /// Angular speed multiplier applied on flip
    pub flip_spin_multiplier: f32,

    // === Scoring ===
    /// Points for slicing an unflipped target
    pub base_score: u32,
    /// Combo survives this long after the last slice (seconds)
    pub combo_window: f32,
    /// Lives at game start
    pub max_lives: u8,
    /// Minimum time on the game-over screen before confirm restarts
    pub restart_delay: f32,

    // === Physics ===
    /// Downward acceleration on targets (m/s^2)
    pub gravity: f32,
    /// Gravity multiplier for fragments
    pub fragment_gravity_scale: f32,
    /// Per-frame shrink factor for fragment size
    pub fragment_shrink: f32,
    /// Targets below this height are missed (meters)
    pub miss_height: f32,
    /// Fragments below this height are culled
    pub fragment_floor: f32,

    // === Spawning ===
    /// Delay before the first spawn of a game
    pub first_spawn_delay: f32,
    /// Spawn interval at t = 0
    pub spawn_interval_start: f32,
    /// Spawn interval once the ramp completes
    pub spawn_interval_min: f32,
    /// Seconds of play until the ramp completes
    pub ramp_duration: f32,
    /// Ramp progress beyond which a second spawn may fire
    pub double_spawn_after: f32,
    /// Double-spawn probability per unit of ramp progress
    pub double_spawn_chance: f32,
    /// Half-angle of the spawn cone around the facing (radians)
    pub spawn_cone: f32,
    /// Horizontal distance band from the origin
    pub spawn_radius_min: f32,
    pub spawn_radius_max: f32,
    /// Spawn height above the floor
    pub spawn_height: f32,
    /// Upward launch speed band
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    /// Lateral velocity toward the origin per meter of offset
    pub spawn_center_pull: f32,
    /// Max angular speed at spawn (rad/s)
    pub spin_max: f32,

    // === Fragments ===
    /// Fraction of blade velocity carried into slice debris
    pub blade_momentum: f32,
    /// Outward scatter speed of slice debris
    pub scatter_speed: f32,
    /// Random jitter added per axis
    pub scatter_jitter: f32,
    /// Debris lifetime band (seconds)
    pub fragment_life_min: f32,
    pub fragment_life_max: f32,
    /// Golden score-effect pieces per slice before flip bonus
    pub score_effect_base: u32,
    /// Extra score-effect pieces per flip
    pub score_effect_per_flip: u32,
    /// Cap on score-effect pieces
    pub score_effect_max: u32,

    // === Haptics ===
    pub slice_haptic_min: f32,
    pub slice_haptic_duration: f32,
    pub flip_haptic_amplitude: f32,
    pub flip_haptic_duration: f32,
    pub miss_haptic_amplitude: f32,
    pub miss_haptic_duration: f32,

    // === Pools ===
    /// Target pool capacity
    pub max_targets: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            blade_length: 0.4,

            hit_distance: 0.30,
            slice_threshold: 1.5,
            flip_speed_min: 0.3,
            flip_speed_max: 1.5,
            flip_launch_speed: 2.0,
            flip_center_pull: 1.0,
            flip_flash_time: 0.15,
            hit_cooldown: 0.25,
            flip_spin_multiplier: 1.5,

            base_score: 100,
            combo_window: 1.5,
            max_lives: 5,
            restart_delay: 2.0,

            gravity: 6.0,
            fragment_gravity_scale: 1.5,
            fragment_shrink: 0.97,
            miss_height: 0.3,
            fragment_floor: -1.0,

            first_spawn_delay: 1.0,
            spawn_interval_start: 1.2,
            spawn_interval_min: 0.45,
            ramp_duration: 90.0,
            double_spawn_after: 0.3,
            double_spawn_chance: 0.5,
            spawn_cone: 0.6,
            spawn_radius_min: 0.6,
            spawn_radius_max: 1.0,
            spawn_height: 0.5,
            launch_speed_min: 3.5,
            launch_speed_max: 4.5,
            spawn_center_pull: 0.4,
            spin_max: 3.0,

            blade_momentum: 0.3,
            scatter_speed: 1.5,
            scatter_jitter: 0.3,
            fragment_life_min: 1.0,
            fragment_life_max: 1.5,
            score_effect_base: 4,
            score_effect_per_flip: 2,
            score_effect_max: 12,

            slice_haptic_min: 0.5,
            slice_haptic_duration: 0.1,
            flip_haptic_amplitude: 0.25,
            flip_haptic_duration: 0.05,
            miss_haptic_amplitude: 0.6,
            miss_haptic_duration: 0.2,

            max_targets: 32,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Reject combinations the simulation cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flip_speed_min > self.flip_speed_max {
            return Err(ConfigError::Invalid(format!(
                "flip_speed_min {} exceeds flip_speed_max {}",
                self.flip_speed_min, self.flip_speed_max
            )));
        }
        if self.flip_speed_max > self.slice_threshold {
            return Err(ConfigError::Invalid(format!(
                "flip band overlaps slice threshold ({} > {})",
                self.flip_speed_max, self.slice_threshold
            )));
        }
        if self.max_targets == 0 {
            return Err(ConfigError::Invalid("max_targets must be > 0".into()));
        }
        if self.max_lives == 0 {
            return Err(ConfigError::Invalid("max_lives must be > 0".into()));
        }
        if self.spawn_interval_start <= 0.0 || self.spawn_interval_min <= 0.0 {
            return Err(ConfigError::Invalid("spawn intervals must be > 0".into()));
        }
        if self.spawn_radius_min > self.spawn_radius_max
            || self.launch_speed_min > self.launch_speed_max
            || self.fragment_life_min > self.fragment_life_max
        {
            return Err(ConfigError::Invalid("range minimum exceeds maximum".into()));
        }
        let amplitudes = [
            ("slice_haptic_min", self.slice_haptic_min),
            ("flip_haptic_amplitude", self.flip_haptic_amplitude),
            ("miss_haptic_amplitude", self.miss_haptic_amplitude),
        ];
        for (name, value) in amplitudes {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} {value} outside [0, 1]")));
            }
        }
        Ok(())
    }

    /// Spawn interval after `elapsed` seconds of play
    pub fn spawn_interval(&self, elapsed: f32) -> f32 {
        let progress = self.ramp_progress(elapsed);
        self.spawn_interval_start + (self.spawn_interval_min - self.spawn_interval_start) * progress
    }

    /// Difficulty ramp progress in [0, 1]
    pub fn ramp_progress(&self, elapsed: f32) -> f32 {
        if self.ramp_duration <= 0.0 {
            return 1.0;
        }
        (elapsed / self.ramp_duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_score": 250, "gravity": 4.5 }"#).unwrap();
        assert_eq!(tuning.base_score, 250);
        assert_eq!(tuning.gravity, 4.5);
        assert_eq!(tuning.hit_distance, Tuning::default().hit_distance);
    }

    #[test]
    fn test_invalid_flip_band_rejected() {
        let err = Tuning::from_json(r#"{ "flip_speed_min": 2.0, "flip_speed_max": 1.0 }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_haptic_amplitudes_must_be_unit_range() {
        for json in [
            r#"{ "slice_haptic_min": 1.2 }"#,
            r#"{ "flip_haptic_amplitude": -0.1 }"#,
            r#"{ "miss_haptic_amplitude": 3.0 }"#,
        ] {
            assert!(matches!(Tuning::from_json(json), Err(ConfigError::Invalid(_))), "{json}");
        }
        assert!(Tuning::from_json(r#"{ "slice_haptic_min": 1.0 }"#).is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/definitely/not/here.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_spawn_interval_ramp() {
        let t = Tuning::default();
        assert!((t.spawn_interval(0.0) - t.spawn_interval_start).abs() < 1e-6);
        assert!((t.spawn_interval(t.ramp_duration) - t.spawn_interval_min).abs() < 1e-6);
        assert!((t.spawn_interval(10_000.0) - t.spawn_interval_min).abs() < 1e-6);
        let mid = t.spawn_interval(t.ramp_duration / 2.0);
        assert!((mid - (t.spawn_interval_start + t.spawn_interval_min) / 2.0).abs() < 1e-5);
    }
}
