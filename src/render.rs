//! Draw-command generation
//!
//! Turns the post-update session state into a flat list of cube and line
//! draws for the host renderer. No batching; one command per visible
//! sub-block, fragment, blade or trail segment.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::SUB_BLOCK_SIZE;
use crate::settings::Settings;
use crate::sim::{Blade, GameState, Gesture, Target, classify, sub_block_offsets};
use crate::tuning::Tuning;
use crate::yaw_to_forward;

/// One draw request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Cube {
        position: Vec3,
        size: Vec3,
        rotation: Quat,
        color: Vec3,
    },
    Line {
        from: Vec3,
        to: Vec3,
        color: Vec3,
    },
}

/// Colors for scene elements
pub mod colors {
    use glam::Vec3;

    pub const FLASH: Vec3 = Vec3::ONE;
    pub const BLADE_IDLE: Vec3 = Vec3::new(0.3, 0.5, 1.0);
    pub const BLADE_FLIP: Vec3 = Vec3::new(0.3, 1.0, 0.5);
    pub const BLADE_SLICE: Vec3 = Vec3::new(1.0, 0.4, 0.2);
    pub const LIFE: Vec3 = Vec3::new(1.0, 0.2, 0.3);
    pub const LIFE_LOST: Vec3 = Vec3::new(0.25, 0.25, 0.3);
}

/// Gap between sub-blocks so the grid reads as pieces
const SUB_BLOCK_FILL: f32 = 0.92;
/// Life markers: distance ahead of and height above the origin
const LIVES_DISTANCE: f32 = 1.5;
const LIVES_RISE: f32 = 0.6;
const LIFE_MARKER_SIZE: f32 = 0.05;
const LIFE_MARKER_SPACING: f32 = 0.08;
/// Trail brightness at its oldest sample
const TRAIL_FADE_FLOOR: f32 = 0.15;

/// Blade color by what a hit would do at its current speed
pub fn blade_color(speed: f32, tuning: &Tuning) -> Vec3 {
    match classify(speed, tuning) {
        Gesture::Slice => colors::BLADE_SLICE,
        Gesture::Flip => colors::BLADE_FLIP,
        Gesture::Ignore => colors::BLADE_IDLE,
    }
}

/// Cubes for one target's visible sub-blocks
pub fn target_cubes(target: &Target, out: &mut Vec<DrawCommand>) {
    let rotation = target.rotation();
    let color = if target.flash_timer > 0.0 {
        colors::FLASH
    } else {
        target.color
    };
    let size = Vec3::splat(SUB_BLOCK_SIZE * SUB_BLOCK_FILL);
    for offset in sub_block_offsets() {
        out.push(DrawCommand::Cube {
            position: target.pos + rotation * offset,
            size,
            rotation,
            color,
        });
    }
}

/// Blade line plus trail segments, oldest to newest
pub fn blade_lines(blade: &Blade, tuning: &Tuning, settings: &Settings, out: &mut Vec<DrawCommand>) {
    if !blade.tracking {
        return;
    }
    let color = blade_color(blade.speed, tuning);
    out.push(DrawCommand::Line {
        from: blade.base,
        to: blade.tip,
        color,
    });

    if !settings.trails {
        return;
    }
    let stride = settings.quality.trail_stride();
    let points: Vec<Vec3> = blade.trail().step_by(stride).collect();
    let segments = points.len().saturating_sub(1);
    for (i, pair) in points.windows(2).enumerate() {
        let t = (i + 1) as f32 / segments as f32;
        let fade = TRAIL_FADE_FLOOR + (1.0 - TRAIL_FADE_FLOOR) * t;
        out.push(DrawCommand::Line {
            from: pair[0],
            to: pair[1],
            color: color * fade,
        });
    }
}

/// Row of life markers floating ahead of the player
pub fn life_markers(state: &GameState, out: &mut Vec<DrawCommand>) {
    let forward = yaw_to_forward(state.origin.yaw);
    let right = Vec3::new(-forward.z, 0.0, forward.x);
    let anchor = state.origin.center + forward * LIVES_DISTANCE + Vec3::Y * LIVES_RISE;
    let max = state.tuning.max_lives as usize;
    let start = -(max.saturating_sub(1) as f32) * LIFE_MARKER_SPACING / 2.0;
    let rotation = Quat::from_rotation_y(state.origin.yaw);

    for i in 0..max {
        let color = if i < state.lives as usize {
            colors::LIFE
        } else {
            colors::LIFE_LOST
        };
        out.push(DrawCommand::Cube {
            position: anchor + right * (start + i as f32 * LIFE_MARKER_SPACING),
            size: Vec3::splat(LIFE_MARKER_SIZE),
            rotation,
            color,
        });
    }
}

/// Every draw for the current frame
pub fn build_draw_list(state: &GameState) -> Vec<DrawCommand> {
    let per_target = sub_block_offsets().count();
    let mut out = Vec::with_capacity(
        state.targets.active_count() * per_target + state.fragments.active_count() + 64,
    );

    for (_, target) in state.targets.iter() {
        target_cubes(target, &mut out);
    }

    for (_, fragment) in state.fragments.iter() {
        out.push(DrawCommand::Cube {
            position: fragment.pos,
            size: Vec3::splat(fragment.size),
            rotation: Quat::IDENTITY,
            color: fragment.color,
        });
    }

    for blade in &state.blades {
        blade_lines(blade, &state.tuning, &state.settings, &mut out);
    }

    life_markers(state, &mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{Fragment, Hand, HandPose};

    fn count_cubes(cmds: &[DrawCommand]) -> usize {
        cmds.iter().filter(|c| matches!(c, DrawCommand::Cube { .. })).count()
    }

    #[test]
    fn test_target_draws_26_blocks() {
        let mut state = GameState::new(1);
        state
            .targets
            .acquire(Target::flying(Vec3::new(0.0, 1.0, -1.0), Vec3::ZERO, Vec3::X))
            .unwrap();
        let cmds = build_draw_list(&state);
        let lives = state.tuning.max_lives as usize;
        assert_eq!(count_cubes(&cmds), 26 + lives);
    }

    #[test]
    fn test_flash_tints_white() {
        let mut target = Target::flying(Vec3::ZERO, Vec3::ZERO, Vec3::X);
        target.flash_timer = 0.1;
        let mut cmds = Vec::new();
        target_cubes(&target, &mut cmds);
        assert!(cmds.iter().all(|c| matches!(c, DrawCommand::Cube { color, .. } if *color == colors::FLASH)));
    }

    #[test]
    fn test_blade_and_trail_lines() {
        let mut state = GameState::with_config(1, Tuning::default(), Settings::from_preset(QualityPreset::High));
        for i in 0..5 {
            let pose = HandPose::tracked_at(Vec3::new(i as f32 * 0.01, 1.0, 0.0), Quat::IDENTITY);
            state.blades[Hand::Left.index()].update(&pose, true, 0.4, 1.0 / 72.0);
        }
        let mut cmds = Vec::new();
        blade_lines(state.blade(Hand::Left), &state.tuning, &state.settings, &mut cmds);
        // Blade plus 4 trail segments
        assert_eq!(cmds.len(), 5);

        state.settings.trails = false;
        cmds.clear();
        blade_lines(state.blade(Hand::Left), &state.tuning, &state.settings, &mut cmds);
        assert_eq!(cmds.len(), 1);

        // Untracked blade draws nothing
        cmds.clear();
        blade_lines(state.blade(Hand::Right), &state.tuning, &state.settings, &mut cmds);
        assert!(cmds.is_empty());
    }

    #[test]
    fn test_blade_color_by_speed() {
        let tuning = Tuning::default();
        assert_eq!(blade_color(0.0, &tuning), colors::BLADE_IDLE);
        assert_eq!(blade_color(0.8, &tuning), colors::BLADE_FLIP);
        assert_eq!(blade_color(3.0, &tuning), colors::BLADE_SLICE);
    }

    #[test]
    fn test_life_markers_reflect_lives() {
        let mut state = GameState::new(1);
        state.lives = 2;
        let mut cmds = Vec::new();
        life_markers(&state, &mut cmds);
        let live = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Cube { color, .. } if *color == colors::LIFE))
            .count();
        assert_eq!(live, 2);
        assert_eq!(cmds.len(), state.tuning.max_lives as usize);
    }

    #[test]
    fn test_fragments_drawn() {
        let mut state = GameState::new(1);
        state.fragments.acquire(Fragment {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            size: 0.05,
            color: Vec3::Y,
            life: 1.0,
        });
        let cmds = build_draw_list(&state);
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Cube { size, color, .. }
            if *size == Vec3::splat(0.05) && *color == Vec3::Y)));
    }
}
