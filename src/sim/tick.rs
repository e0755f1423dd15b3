//! Per-frame simulation step
//!
//! One call per displayed frame, in a fixed order:
//! origin latch, blades, spawning, gestures, combo decay, physics.
//! Rendering reads the state afterwards; nothing here draws.

use super::gesture::resolve_hits;
use super::input::{FrameInput, Hand, PoseSource};
use super::physics::{integrate_fragments, integrate_targets};
use super::spawner::update_spawner;
use super::state::{GameEvent, GamePhase, GameState, HapticRequest};

/// What a frame produced besides state changes
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Pulses for the host to play, already scaled by settings
    pub haptics: Vec<HapticRequest>,
    pub events: Vec<GameEvent>,
}

/// Advance the session by one frame, deriving `dt` from the refresh rate
pub fn tick(state: &mut GameState, input: &FrameInput) -> FrameOutput {
    tick_with_dt(state, input, input.delta_time())
}

/// Advance the session by one frame of `dt` seconds
pub fn tick_with_dt(state: &mut GameState, input: &FrameInput, dt: f32) -> FrameOutput {
    let mut events = Vec::new();
    let mut raw_haptics = Vec::new();
    state.frame += 1;

    if state.origin.try_capture(&input.headset) {
        log::info!(
            "Play-space origin captured at ({:.2}, {:.2}, {:.2}), yaw {:.2}",
            state.origin.center.x,
            state.origin.center.y,
            state.origin.center.z,
            state.origin.yaw
        );
        events.push(GameEvent::OriginCaptured {
            center: state.origin.center,
            yaw: state.origin.yaw,
        });
    }

    let hand_tracking = state.settings.hand_tracking;
    let blade_length = state.tuning.blade_length;
    for hand in Hand::BOTH {
        let pose = input.hand(hand);
        let usable = pose.usable(hand_tracking);
        state.blades[hand.index()].update(pose, usable, blade_length, dt);
    }

    match state.phase {
        GamePhase::Playing => {
            state.elapsed += dt;
            update_spawner(state, dt, &mut events);
            resolve_hits(state, &mut events, &mut raw_haptics);
            if let Some(combo) = state.decay_combo(dt) {
                log::debug!("Combo of {} expired", combo);
                events.push(GameEvent::ComboLost { combo });
            }
        }
        GamePhase::GameOver => {
            state.game_over_timer += dt;
            let confirmed = Hand::BOTH
                .iter()
                .any(|h| input.hand(*h).confirm_pressed(hand_tracking));
            if confirmed && state.game_over_timer >= state.tuning.restart_delay {
                state.restart();
                events.push(GameEvent::Restarted);
                return FrameOutput {
                    haptics: Vec::new(),
                    events,
                };
            }
        }
    }

    integrate_targets(state, dt, &mut events, &mut raw_haptics);
    integrate_fragments(state, dt);

    let haptics = raw_haptics
        .into_iter()
        .filter(|h| input.hand(h.hand).source == PoseSource::Controller)
        .filter_map(|h| {
            state
                .settings
                .haptic_amplitude(h.amplitude)
                .map(|amplitude| HapticRequest { amplitude, ..h })
        })
        .collect();

    FrameOutput { haptics, events }
}
