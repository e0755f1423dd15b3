//! Target spawning
//!
//! Targets launch from waist height inside a cone around the captured facing
//! and drift back toward the player so their arc peaks within reach. The
//! spawn interval shrinks linearly over the difficulty ramp; late in the ramp
//! a second target may launch on the same tick.

use glam::Vec3;

use super::state::{GameEvent, GamePhase, GameState, Target};
use crate::yaw_to_forward;

/// Slowest spin a target launches with (rad/s)
const SPIN_MIN: f32 = 0.5;

/// Launch one target into the lowest free slot
///
/// No-op (and no RNG draws) when the pool is full.
pub fn spawn_target(state: &mut GameState) -> Option<usize> {
    if state.targets.is_full() {
        log::debug!("Target pool full, spawn skipped");
        return None;
    }

    let tuning = &state.tuning;
    let rng = &mut state.rng;
    let origin = state.origin;

    let angle = origin.yaw + rng.range(-tuning.spawn_cone, tuning.spawn_cone);
    let radius = rng.range(tuning.spawn_radius_min, tuning.spawn_radius_max);
    let outward = yaw_to_forward(angle) * radius;
    let pos = Vec3::new(origin.center.x, tuning.spawn_height, origin.center.z) + outward;

    let launch = rng.range(tuning.launch_speed_min, tuning.launch_speed_max);
    // Pull back toward the origin in proportion to the outward offset
    let vel = Vec3::Y * launch - outward * tuning.spawn_center_pull;

    let mut target = Target::flying(pos, vel, Vec3::ONE);
    target.yaw = rng.range(0.0, std::f32::consts::TAU);
    target.pitch = rng.range(0.0, std::f32::consts::TAU);
    target.yaw_speed = rng.range(SPIN_MIN, tuning.spin_max) * rng.sign();
    target.pitch_speed = rng.range(SPIN_MIN, tuning.spin_max) * rng.sign();
    target.color = rng.bright_color();

    let slot = state.targets.acquire(target)?;
    log::debug!("Spawned target {} at ({:.2}, {:.2}, {:.2})", slot, pos.x, pos.y, pos.z);
    Some(slot)
}

/// Run the spawn countdown for one frame
pub fn update_spawner(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 {
        return;
    }

    if let Some(slot) = spawn_target(state) {
        events.push(GameEvent::Spawned { slot });
    }
    state.spawn_timer = state.tuning.spawn_interval(state.elapsed);

    let progress = state.tuning.ramp_progress(state.elapsed);
    if progress > state.tuning.double_spawn_after
        && state.rng.chance(progress * state.tuning.double_spawn_chance)
    {
        if let Some(slot) = spawn_target(state) {
            events.push(GameEvent::Spawned { slot });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PALETTE;
    use crate::horizontal;
    use crate::sim::state::PlayOrigin;
    use crate::tuning::Tuning;

    #[test]
    fn test_spawn_inside_cone_and_band() {
        let mut state = GameState::new(7);
        state.origin = PlayOrigin { center: Vec3::new(1.0, 1.6, 2.0), yaw: 0.8, valid: true };
        let tuning = state.tuning.clone();

        for _ in 0..20 {
            let slot = spawn_target(&mut state).unwrap();
            let t = state.targets.get(slot).unwrap();
            assert_eq!(t.flips, 0);
            assert_eq!(t.pos.y, tuning.spawn_height);

            let offset = horizontal(t.pos - state.origin.center);
            let dist = offset.length();
            assert!(dist >= tuning.spawn_radius_min - 1e-4 && dist <= tuning.spawn_radius_max + 1e-4);

            let facing = crate::yaw_to_forward(0.8);
            let angle = offset.normalize().dot(facing).clamp(-1.0, 1.0).acos();
            assert!(angle <= tuning.spawn_cone + 1e-3);

            // Launched upward and drifting back toward the origin
            assert!(t.vel.y >= tuning.launch_speed_min && t.vel.y <= tuning.launch_speed_max);
            assert!(horizontal(t.vel).dot(offset) < 0.0);
            assert!(PALETTE.iter().any(|p| Vec3::from_array(*p) == t.color));
            state.targets.release(slot);
        }
    }

    #[test]
    fn test_spawn_full_pool_noop() {
        let tuning = Tuning { max_targets: 2, ..Tuning::default() };
        let mut state = GameState::with_config(1, tuning, Default::default());
        assert!(spawn_target(&mut state).is_some());
        assert!(spawn_target(&mut state).is_some());
        let before = state.rng.clone();
        assert!(spawn_target(&mut state).is_none());
        assert_eq!(state.rng, before);
        assert_eq!(state.targets.active_count(), 2);
    }

    #[test]
    fn test_spawner_timer_and_ramp() {
        let mut state = GameState::new(5);
        let mut events = Vec::new();
        let first = state.tuning.first_spawn_delay;

        update_spawner(&mut state, first * 0.5, &mut events);
        assert!(events.is_empty());

        update_spawner(&mut state, first * 0.5, &mut events);
        assert_eq!(events.len(), 1);
        assert!((state.spawn_timer - state.tuning.spawn_interval_start).abs() < 1e-6);

        // Late in the ramp the interval sits at its floor
        state.elapsed = state.tuning.ramp_duration * 2.0;
        state.spawn_timer = 0.0;
        update_spawner(&mut state, 0.01, &mut events);
        assert!((state.spawn_timer - state.tuning.spawn_interval_min).abs() < 1e-6);
    }

    #[test]
    fn test_double_spawn_only_late() {
        // Early in the ramp a tick never launches two targets
        let mut state = GameState::new(11);
        for _ in 0..200 {
            let mut events = Vec::new();
            state.spawn_timer = 0.0;
            state.elapsed = 0.0;
            update_spawner(&mut state, 0.01, &mut events);
            assert!(events.len() <= 1);
            state.targets.clear();
        }

        // At full ramp some ticks launch two
        let mut doubles = 0;
        for _ in 0..200 {
            let mut events = Vec::new();
            state.spawn_timer = 0.0;
            state.elapsed = state.tuning.ramp_duration;
            update_spawner(&mut state, 0.01, &mut events);
            if events.len() == 2 {
                doubles += 1;
            }
            state.targets.clear();
        }
        assert!(doubles > 40 && doubles < 160, "doubles {doubles}");
    }

    #[test]
    fn test_no_spawns_after_game_over() {
        let mut state = GameState::new(5);
        state.phase = GamePhase::GameOver;
        state.spawn_timer = 0.0;
        let mut events = Vec::new();
        update_spawner(&mut state, 1.0, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.targets.active_count(), 0);
    }
}
