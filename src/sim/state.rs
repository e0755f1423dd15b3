//! Game state and core simulation types
//!
//! The whole session lives in one [`GameState`] owned by the frame driver and
//! passed by `&mut` into every subsystem.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::blade::Blade;
use super::input::{Hand, HeadsetPose};
use super::pool::Pool;
use super::rng::Lcg;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::forward_yaw;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Out of lives, waiting for confirm
    GameOver,
}

/// A slice-able cube, in flight while it holds a pool slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Rotation about world Y (radians)
    pub yaw: f32,
    /// Rotation about local X (radians)
    pub pitch: f32,
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    /// Times flipped since spawn (score multiplier)
    pub flips: u32,
    /// Seconds since spawn
    pub age: f32,
    /// White flash after a flip (cosmetic)
    pub flash_timer: f32,
    /// Blocks re-detection right after a flip
    pub hit_cooldown: f32,
    pub color: Vec3,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            yaw_speed: 0.0,
            pitch_speed: 0.0,
            flips: 0,
            age: 0.0,
            flash_timer: 0.0,
            hit_cooldown: 0.0,
            color: Vec3::ONE,
        }
    }
}

impl Target {
    /// A freshly launched target
    pub fn flying(pos: Vec3, vel: Vec3, color: Vec3) -> Self {
        Self {
            pos,
            vel,
            color,
            ..Self::default()
        }
    }

    /// Eligible for blade collision this frame
    #[inline]
    pub fn is_hittable(&self) -> bool {
        self.hit_cooldown <= 0.0
    }

    /// Full orientation (yaw then pitch)
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }
}

/// Offsets of the visible sub-blocks of a target, in target-local space
///
/// The grid is `TARGET_GRID`^3 with the hidden core cell left out, so a
/// 3x3x3 target yields 26 offsets.
pub fn sub_block_offsets() -> impl Iterator<Item = Vec3> {
    let n = TARGET_GRID as i32;
    let half = (n - 1) as f32 / 2.0;
    (0..n).flat_map(move |x| {
        (0..n).flat_map(move |y| {
            (0..n).filter_map(move |z| {
                let interior = [x, y, z].iter().all(|c| *c > 0 && *c < n - 1);
                (!interior).then(|| {
                    Vec3::new(x as f32 - half, y as f32 - half, z as f32 - half) * SUB_BLOCK_SIZE
                })
            })
        })
    })
}

/// A debris particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Edge length, shrinks every frame
    pub size: f32,
    pub color: Vec3,
    /// Seconds left
    pub life: f32,
}

/// Captured player position and facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayOrigin {
    /// Headset position at capture (floor-relative height kept)
    pub center: Vec3,
    /// Facing yaw at capture
    pub yaw: f32,
    /// Latched; never recaptured until a full new session
    pub valid: bool,
}

impl Default for PlayOrigin {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, DEFAULT_EYE_HEIGHT, 0.0),
            yaw: 0.0,
            valid: false,
        }
    }
}

/// Headset poses closer than this to the tracking origin are treated as
/// placeholders from a runtime that has not settled yet
const DEGENERATE_POSITION: f32 = 0.01;
/// A headset above this height is always a real pose
const MIN_REAL_ELEVATION: f32 = 0.5;

impl PlayOrigin {
    /// Whether a headset sample looks like a real pose
    pub fn plausible(headset: &HeadsetPose) -> bool {
        headset.tracked
            && headset.position.is_finite()
            && (headset.position.length() > DEGENERATE_POSITION
                || headset.position.y > MIN_REAL_ELEVATION)
    }

    /// Latch from `headset` if not yet valid; returns true on capture
    pub fn try_capture(&mut self, headset: &HeadsetPose) -> bool {
        if self.valid || !Self::plausible(headset) {
            return false;
        }
        self.center = headset.position;
        self.yaw = forward_yaw(headset.orientation);
        self.valid = true;
        true
    }
}

/// Haptic pulse request for the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticRequest {
    pub hand: Hand,
    /// 0 - 1
    pub amplitude: f32,
    /// Seconds
    pub duration: f32,
}

/// Gameplay events emitted during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    OriginCaptured { center: Vec3, yaw: f32 },
    Spawned { slot: usize },
    Sliced { slot: usize, hand: Hand, points: u64, flips: u32 },
    Flipped { slot: usize, hand: Hand, flips: u32 },
    Missed { slot: usize, lives_left: u8 },
    ComboLost { combo: u32 },
    GameOver { score: u64 },
    Restarted,
}

/// Snapshot of session counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub combo: u32,
    pub best_combo: u32,
    pub total_sliced: u32,
    pub total_missed: u32,
    pub elapsed: f32,
    pub active_targets: usize,
    pub active_fragments: usize,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed applied at every (re)start
    pub seed: u32,
    pub rng: Lcg,
    pub tuning: Tuning,
    /// Preferences that survive restarts
    pub settings: Settings,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Running slice streak
    pub combo: u32,
    pub best_combo: u32,
    /// Streak expires when this reaches zero
    pub combo_timer: f32,
    pub total_sliced: u32,
    pub total_missed: u32,
    /// Countdown to next spawn
    pub spawn_timer: f32,
    /// Seconds of play since (re)start
    pub elapsed: f32,
    /// Seconds since entering GameOver
    pub game_over_timer: f32,
    pub origin: PlayOrigin,
    pub targets: Pool<Target>,
    pub fragments: Pool<Fragment>,
    pub blades: [Blade; 2],
    /// Frames processed since construction
    pub frame: u64,
}

impl GameState {
    /// New session with default tuning and settings
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default())
    }

    pub fn with_config(seed: u32, tuning: Tuning, settings: Settings) -> Self {
        let targets = Pool::new(tuning.max_targets);
        let fragments = Pool::new(settings.max_fragments());
        Self {
            seed,
            rng: Lcg::new(seed),
            phase: GamePhase::Playing,
            score: 0,
            lives: tuning.max_lives,
            combo: 0,
            best_combo: 0,
            combo_timer: 0.0,
            total_sliced: 0,
            total_missed: 0,
            spawn_timer: tuning.first_spawn_delay,
            elapsed: 0.0,
            game_over_timer: 0.0,
            origin: PlayOrigin::default(),
            targets,
            fragments,
            blades: [Blade::default(), Blade::default()],
            frame: 0,
            tuning,
            settings,
        }
    }

    /// Start a new game: counters, pools, timers and RNG back to their
    /// start values. The captured origin and settings are kept.
    pub fn restart(&mut self) {
        self.rng = Lcg::new(self.seed);
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = self.tuning.max_lives;
        self.combo = 0;
        self.best_combo = 0;
        self.combo_timer = 0.0;
        self.total_sliced = 0;
        self.total_missed = 0;
        self.spawn_timer = self.tuning.first_spawn_delay;
        self.elapsed = 0.0;
        self.game_over_timer = 0.0;
        self.targets.clear();
        self.fragments.clear();
        for blade in &mut self.blades {
            blade.reset();
        }
        log::info!("New game started (seed {})", self.seed);
    }

    pub fn blade(&self, hand: Hand) -> &Blade {
        &self.blades[hand.index()]
    }

    /// Register a slice in the streak
    pub fn bump_combo(&mut self) {
        self.combo += 1;
        self.combo_timer = self.tuning.combo_window;
        if self.combo > self.best_combo {
            self.best_combo = self.combo;
        }
    }

    /// Run the combo countdown; returns the lost streak when it expires
    pub fn decay_combo(&mut self, dt: f32) -> Option<u32> {
        if self.combo_timer <= 0.0 {
            return None;
        }
        self.combo_timer = (self.combo_timer - dt).max(0.0);
        if self.combo_timer > 0.0 {
            return None;
        }
        let lost = self.combo;
        self.combo = 0;
        (lost > 0).then_some(lost)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            phase: self.phase,
            score: self.score,
            lives: self.lives,
            combo: self.combo,
            best_combo: self.best_combo,
            total_sliced: self.total_sliced,
            total_missed: self.total_missed,
            elapsed: self.elapsed,
            active_targets: self.targets.active_count(),
            active_fragments: self.fragments.active_count(),
        }
    }
}
