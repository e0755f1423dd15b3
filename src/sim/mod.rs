//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per displayed frame, `dt` from the refresh rate
//! - Seeded LCG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod blade;
pub mod effects;
pub mod gesture;
pub mod input;
pub mod physics;
pub mod pool;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use blade::{Blade, blade_tip};
pub use gesture::{Gesture, classify, resolve_hits, slice_points};
pub use input::{FrameInput, Hand, HandPose, HeadsetPose, PoseSource, delta_time};
pub use pool::Pool;
pub use rng::Lcg;
pub use spawner::{spawn_target, update_spawner};
pub use state::{
    Fragment, GameEvent, GamePhase, GameState, HapticRequest, PlayOrigin, SessionStats, Target,
    sub_block_offsets,
};
pub use tick::{FrameOutput, tick, tick_with_dt};
