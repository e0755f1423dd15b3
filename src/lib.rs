//! Blade Arcade - gesture-driven cube slicing for head-mounted VR
//!
//! Core modules:
//! - `sim`: Deterministic simulation (blades, gestures, spawning, physics, scoring)
//! - `render`: Draw-command list built from simulation state
//! - `autopilot`: Scripted pose source for headless runs
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//!
//! Pose acquisition, frame presentation and haptic actuation belong to the
//! host runtime. The core consumes one [`sim::FrameInput`] per displayed frame
//! and hands back draw commands and haptic requests.

pub mod autopilot;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{ConfigError, Tuning};

use glam::{Quat, Vec3};

/// Game configuration constants
pub mod consts {
    /// Refresh rate assumed when the runtime reports none
    pub const FALLBACK_REFRESH_RATE: f32 = 72.0;

    /// Blade trail ring buffer size (tip samples per hand)
    pub const TRAIL_LENGTH: usize = 12;

    /// Sub-blocks per target edge (3x3x3 grid)
    pub const TARGET_GRID: usize = 3;
    /// Edge length of a whole target cube (meters)
    pub const TARGET_SIZE: f32 = 0.24;
    /// Edge length of one sub-block
    pub const SUB_BLOCK_SIZE: f32 = TARGET_SIZE / TARGET_GRID as f32;

    /// Seed used at every game (re)start
    pub const DEFAULT_SEED: u32 = 12345;

    /// Standing eye height used before the origin latches (meters)
    pub const DEFAULT_EYE_HEIGHT: f32 = 1.6;

    /// Bright target palette (linear RGB)
    pub const PALETTE: [[f32; 3]; 8] = [
        [1.0, 0.2, 0.2],  // red
        [1.0, 0.6, 0.1],  // orange
        [1.0, 0.95, 0.2], // yellow
        [0.3, 1.0, 0.3],  // green
        [0.2, 0.9, 1.0],  // cyan
        [0.3, 0.45, 1.0], // blue
        [0.8, 0.35, 1.0], // purple
        [1.0, 0.35, 0.8], // pink
    ];

    /// Score-effect fragment color
    pub const GOLD: [f32; 3] = [1.0, 0.8, 0.1];
}

/// Unit vector along the horizontal facing `yaw` (yaw 0 looks down -Z)
#[inline]
pub fn yaw_to_forward(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Horizontal yaw of an orientation's forward (-Z) axis
#[inline]
pub fn forward_yaw(orientation: Quat) -> f32 {
    let forward = orientation * Vec3::NEG_Z;
    (-forward.x).atan2(-forward.z)
}

/// Drop the vertical component
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Minimum distance from `point` to the segment `a`-`b`
///
/// Projects onto the segment and clamps the parameter to [0, 1]. A degenerate
/// segment falls back to the distance to `a`.
pub fn point_segment_distance(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}
