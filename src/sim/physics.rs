//! Semi-implicit Euler integration for targets and fragments
//!
//! Velocity is updated before position. Targets that drop below the miss
//! height cost a life while the game is running; fragments just expire.

use glam::Vec3;

use super::input::Hand;
use super::state::{GameEvent, GamePhase, GameState, HapticRequest};

/// Advance every flying target and apply misses
pub fn integrate_targets(
    state: &mut GameState,
    dt: f32,
    events: &mut Vec<GameEvent>,
    haptics: &mut Vec<HapticRequest>,
) {
    let gravity = state.tuning.gravity;
    let miss_height = state.tuning.miss_height;
    let mut missed = Vec::new();

    for (slot, target) in state.targets.iter_mut() {
        target.vel.y -= gravity * dt;
        target.pos += target.vel * dt;
        target.yaw += target.yaw_speed * dt;
        target.pitch += target.pitch_speed * dt;
        target.age += dt;

        if target.flash_timer > 0.0 {
            target.flash_timer = (target.flash_timer - dt).max(0.0);
        }
        if target.hit_cooldown > 0.0 {
            target.hit_cooldown = (target.hit_cooldown - dt).max(0.0);
        }

        if target.pos.y < miss_height {
            missed.push(slot);
        }
    }

    for slot in missed {
        state.targets.release(slot);
        if state.phase == GamePhase::Playing {
            register_miss(state, slot, events, haptics);
        }
    }
}

/// Cost a life for a dropped target; may end the game
fn register_miss(
    state: &mut GameState,
    slot: usize,
    events: &mut Vec<GameEvent>,
    haptics: &mut Vec<HapticRequest>,
) {
    state.lives = state.lives.saturating_sub(1);
    state.total_missed += 1;
    state.combo = 0;
    state.combo_timer = 0.0;

    for hand in Hand::BOTH {
        haptics.push(HapticRequest {
            hand,
            amplitude: state.tuning.miss_haptic_amplitude,
            duration: state.tuning.miss_haptic_duration,
        });
    }

    log::debug!("Miss: target {} dropped, {} lives left", slot, state.lives);
    events.push(GameEvent::Missed {
        slot,
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.game_over_timer = 0.0;
        log::info!(
            "Game over: score {}, best combo {}, {} sliced",
            state.score,
            state.best_combo,
            state.total_sliced
        );
        events.push(GameEvent::GameOver { score: state.score });
    }
}

/// Advance fragments, culling expired and fallen ones
pub fn integrate_fragments(state: &mut GameState, dt: f32) {
    let gravity = state.tuning.gravity * state.tuning.fragment_gravity_scale;
    let shrink = state.tuning.fragment_shrink;
    let floor = state.tuning.fragment_floor;

    state.fragments.retain(|_, fragment| {
        fragment.vel -= Vec3::Y * gravity * dt;
        fragment.pos += fragment.vel * dt;
        fragment.size *= shrink;
        fragment.life -= dt;
        fragment.life > 0.0 && fragment.pos.y >= floor
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Fragment, Target};

    const DT: f32 = 1.0 / 72.0;

    fn falling_target(state: &mut GameState) -> usize {
        let y = state.tuning.miss_height + 0.001;
        state
            .targets
            .acquire(Target::flying(Vec3::new(0.0, y, -0.5), Vec3::new(0.0, -1.0, 0.0), Vec3::ONE))
            .unwrap()
    }

    #[test]
    fn test_semi_implicit_step() {
        let mut state = GameState::new(1);
        let slot = state
            .targets
            .acquire(Target::flying(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 0.0), Vec3::ONE))
            .unwrap();
        {
            let t = state.targets.get_mut(slot).unwrap();
            t.yaw_speed = 2.0;
            t.flash_timer = 0.001;
        }
        let mut events = Vec::new();
        let mut haptics = Vec::new();
        integrate_targets(&mut state, 0.1, &mut events, &mut haptics);

        let t = state.targets.get(slot).unwrap();
        let vy = 2.0 - state.tuning.gravity * 0.1;
        assert!((t.vel.y - vy).abs() < 1e-5);
        // Position uses the updated velocity
        assert!((t.pos.y - (1.0 + vy * 0.1)).abs() < 1e-5);
        assert!((t.pos.x - 0.1).abs() < 1e-6);
        assert!((t.yaw - 0.2).abs() < 1e-6);
        assert_eq!(t.flash_timer, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_only_pooled_targets_move() {
        let mut state = GameState::new(1);
        let kept = state
            .targets
            .acquire(Target::flying(Vec3::new(0.0, 1.0, 0.0), Vec3::X, Vec3::ONE))
            .unwrap();
        let gone = state
            .targets
            .acquire(Target::flying(Vec3::new(0.0, 1.0, 0.0), Vec3::X, Vec3::ONE))
            .unwrap();
        let released = state.targets.release(gone).unwrap();

        integrate_targets(&mut state, DT, &mut Vec::new(), &mut Vec::new());
        assert!(state.targets.get(kept).unwrap().pos.x > 0.0);
        assert!(state.targets.get(gone).is_none());
        assert_eq!(released.pos, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(state.targets.active_count(), 1);
    }

    #[test]
    fn test_miss_costs_life_and_combo() {
        let mut state = GameState::new(1);
        state.combo = 7;
        state.best_combo = 9;
        state.combo_timer = 1.0;
        let lives = state.lives;
        let slot = falling_target(&mut state);

        let mut events = Vec::new();
        let mut haptics = Vec::new();
        integrate_targets(&mut state, DT, &mut events, &mut haptics);

        assert!(state.targets.get(slot).is_none());
        assert_eq!(state.lives, lives - 1);
        assert_eq!(state.total_missed, 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.combo_timer, 0.0);
        assert_eq!(state.best_combo, 9);
        assert_eq!(haptics.len(), 2);
        assert!(matches!(events[0], GameEvent::Missed { .. }));
    }

    #[test]
    fn test_game_over_exactly_once() {
        let mut state = GameState::new(1);
        state.lives = 1;
        falling_target(&mut state);
        falling_target(&mut state);

        let mut events = Vec::new();
        let mut haptics = Vec::new();
        integrate_targets(&mut state, DT, &mut events, &mut haptics);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.total_missed, 1);
        let overs = events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count();
        assert_eq!(overs, 1);

        // Further misses while over change nothing
        falling_target(&mut state);
        events.clear();
        integrate_targets(&mut state, DT, &mut events, &mut haptics);
        assert_eq!(state.lives, 0);
        assert_eq!(state.total_missed, 1);
        assert!(events.is_empty());
        assert_eq!(state.targets.active_count(), 0);
    }

    #[test]
    fn test_fragments_expire_and_shrink() {
        let mut state = GameState::new(1);
        let frag = |life: f32, y: f32| Fragment {
            pos: Vec3::new(0.0, y, 0.0),
            vel: Vec3::ZERO,
            size: 0.1,
            color: Vec3::ONE,
            life,
        };
        let alive = state.fragments.acquire(frag(1.0, 1.0)).unwrap();
        state.fragments.acquire(frag(DT * 0.5, 1.0)).unwrap();
        state.fragments.acquire(frag(1.0, state.tuning.fragment_floor - 0.1)).unwrap();

        integrate_fragments(&mut state, DT);
        assert_eq!(state.fragments.active_count(), 1);
        let f = state.fragments.get(alive).unwrap();
        assert!(f.size < 0.1);
        // Steeper gravity than targets
        let expected = -state.tuning.gravity * state.tuning.fragment_gravity_scale * DT;
        assert!((f.vel.y - expected).abs() < 1e-5);
    }
}
