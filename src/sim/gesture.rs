//! Blade-versus-target gesture classification
//!
//! A hit is any eligible target whose center lies within `hit_distance` of
//! the segment from hand to blade tip. Blade speed then decides the outcome:
//!
//! ```text
//!   0 ── flip_speed_min ──[ FLIP )── flip_speed_max ── dead zone ── slice_threshold ──[ SLICE ...
//! ```
//!
//! Speeds below the flip band and inside the dead zone leave the target alone.

use glam::Vec3;

use super::effects::{score_effect, score_effect_count, slice_burst};
use super::input::Hand;
use super::state::{GameEvent, GameState, HapticRequest};
use crate::tuning::Tuning;
use crate::{horizontal, point_segment_distance};

/// Outcome of a blade contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Too slow, or in the dead zone between flip and slice
    Ignore,
    /// Gentle tap: launch the target back up
    Flip,
    /// Fast swing: destroy the target for points
    Slice,
}

/// Classify a blade speed; faster outcomes are checked first
pub fn classify(speed: f32, tuning: &Tuning) -> Gesture {
    if speed >= tuning.slice_threshold {
        Gesture::Slice
    } else if speed >= tuning.flip_speed_min && speed < tuning.flip_speed_max {
        Gesture::Flip
    } else {
        Gesture::Ignore
    }
}

/// Points for slicing a target flipped `flips` times
#[inline]
pub fn slice_points(base_score: u32, flips: u32) -> u64 {
    base_score as u64 * (1 + flips as u64)
}

/// Test both blades against every eligible target and apply the results
///
/// Targets are visited in slot order. A target sliced by the left blade is
/// gone before the right blade is tested; one flipped by the left blade is
/// in hit cooldown.
pub fn resolve_hits(state: &mut GameState, events: &mut Vec<GameEvent>, haptics: &mut Vec<HapticRequest>) {
    for hand in Hand::BOTH {
        let blade = state.blade(hand);
        if !blade.tracking {
            continue;
        }
        let (base, tip, velocity, speed) = (blade.base, blade.tip, blade.velocity, blade.speed);

        let gesture = classify(speed, &state.tuning);
        if gesture == Gesture::Ignore {
            continue;
        }

        let hit_distance = state.tuning.hit_distance;
        let hits: Vec<usize> = state
            .targets
            .iter()
            .filter(|(_, t)| t.is_hittable())
            .filter(|(_, t)| point_segment_distance(t.pos, base, tip) <= hit_distance)
            .map(|(slot, _)| slot)
            .collect();

        for slot in hits {
            match gesture {
                Gesture::Slice => slice_target(state, slot, hand, velocity, speed, events, haptics),
                Gesture::Flip => flip_target(state, slot, hand, events, haptics),
                Gesture::Ignore => {}
            }
        }
    }
}

/// Destroy a target for points, spawning debris
pub fn slice_target(
    state: &mut GameState,
    slot: usize,
    hand: Hand,
    blade_velocity: Vec3,
    blade_speed: f32,
    events: &mut Vec<GameEvent>,
    haptics: &mut Vec<HapticRequest>,
) {
    let Some(target) = state.targets.release(slot) else {
        return;
    };

    let points = slice_points(state.tuning.base_score, target.flips);
    state.score += points;
    state.total_sliced += 1;
    state.bump_combo();

    slice_burst(&mut state.fragments, &mut state.rng, &state.tuning, &target, blade_velocity);
    let sparks = score_effect_count(&state.tuning, target.flips);
    score_effect(&mut state.fragments, &mut state.rng, target.pos, sparks);

    let tuning = &state.tuning;
    let amplitude = (blade_speed / (tuning.slice_threshold * 2.0))
        .max(tuning.slice_haptic_min)
        .min(1.0);
    haptics.push(HapticRequest {
        hand,
        amplitude,
        duration: tuning.slice_haptic_duration,
    });

    log::debug!(
        "Slice: target {} (+{} pts, {} flips, combo {})",
        slot,
        points,
        target.flips,
        state.combo
    );
    events.push(GameEvent::Sliced {
        slot,
        hand,
        points,
        flips: target.flips,
    });
}

/// Tap a target back up, raising its score multiplier
pub fn flip_target(
    state: &mut GameState,
    slot: usize,
    hand: Hand,
    events: &mut Vec<GameEvent>,
    haptics: &mut Vec<HapticRequest>,
) {
    let center = state.origin.center;
    let tuning = &state.tuning;
    let Some(target) = state.targets.get_mut(slot) else {
        return;
    };

    target.flips += 1;
    let pull = -horizontal(target.pos - center) * tuning.flip_center_pull;
    target.vel = Vec3::new(pull.x, tuning.flip_launch_speed, pull.z);
    target.flash_timer = tuning.flip_flash_time;
    target.hit_cooldown = tuning.hit_cooldown;
    target.yaw_speed *= tuning.flip_spin_multiplier;
    target.pitch_speed *= tuning.flip_spin_multiplier;
    target.color = state.rng.bright_color();

    let flips = target.flips;
    let pos = target.pos;
    haptics.push(HapticRequest {
        hand,
        amplitude: tuning.flip_haptic_amplitude,
        duration: tuning.flip_haptic_duration,
    });
    let sparks = tuning.score_effect_per_flip;
    score_effect(&mut state.fragments, &mut state.rng, pos, sparks);

    log::debug!("Flip: target {} now x{}", slot, flips + 1);
    events.push(GameEvent::Flipped { slot, hand, flips });
}
