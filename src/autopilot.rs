//! Scripted player
//!
//! Produces plausible pose streams without a headset: the right hand sweeps
//! its blade across the lowest falling target, the left hand idles. A seeded
//! PCG stream adds hand jitter and deliberately ignores some targets so runs
//! end eventually. Used by the headless driver and by soak tests.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_EYE_HEIGHT, FALLBACK_REFRESH_RATE};
use crate::sim::{
    FrameInput, FrameOutput, GameEvent, GamePhase, GameState, Hand, HandPose, HeadsetPose,
    SessionStats, delta_time, tick,
};

/// Sweep speed across a target (m/s), well above the slice threshold
const SWEEP_SPEED: f32 = 3.0;
/// Half-width of the sweep around the target center
const SWEEP_HALF_WIDTH: f32 = 0.15;
/// Vertical hand jitter amplitude
const JITTER: f32 = 0.03;
/// Targets above this are left to rise/fall further
const ENGAGE_HEIGHT: f32 = 1.5;
/// Margin above the miss height below which a target is given up
const ENGAGE_FLOOR_MARGIN: f32 = 0.1;

const LEFT_REST: Vec3 = Vec3::new(-0.25, 1.1, -0.2);
const RIGHT_REST: Vec3 = Vec3::new(0.25, 1.1, -0.2);

/// Pose generator state
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Probability of ignoring a newly seen target
    miss_rate: f32,
    refresh_rate: f32,
    sweep_x: f32,
    sweep_dir: f32,
    /// (slot, target age when ignored)
    ignored: Vec<(usize, f32)>,
    /// (slot, target age when judged)
    judged: Vec<(usize, f32)>,
    press: bool,
}

impl Autopilot {
    pub fn new(seed: u64, miss_rate: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            miss_rate: miss_rate.clamp(0.0, 1.0),
            refresh_rate: FALLBACK_REFRESH_RATE,
            sweep_x: -SWEEP_HALF_WIDTH,
            sweep_dir: 1.0,
            ignored: Vec::new(),
            judged: Vec::new(),
            press: false,
        }
    }

    /// Refresh rate reported through the headset pose
    pub fn with_refresh_rate(mut self, refresh_rate: f32) -> Self {
        self.refresh_rate = refresh_rate;
        self
    }

    /// Frames needed to simulate `seconds` at the reported refresh rate
    pub fn frames_for(&self, seconds: f32) -> u64 {
        (seconds.max(0.0) / delta_time(self.refresh_rate)).round() as u64
    }

    /// Headset standing at the room origin, looking down -Z
    fn headset(&self) -> HeadsetPose {
        HeadsetPose {
            position: Vec3::new(0.0, DEFAULT_EYE_HEIGHT, 0.0),
            orientation: Quat::IDENTITY,
            refresh_rate: self.refresh_rate,
            tracked: true,
        }
    }

    /// Forget decisions about slots that now hold a different target
    fn prune(&mut self, state: &GameState) {
        let live = |&(slot, age): &(usize, f32)| state.targets.get(slot).is_some_and(|t| t.age >= age);
        self.ignored.retain(live);
        self.judged.retain(live);
    }

    fn is_ignored(&self, slot: usize) -> bool {
        self.ignored.iter().any(|(s, _)| *s == slot)
    }

    /// Lowest falling target we intend to hit
    fn pick_target(&mut self, state: &GameState) -> Option<Vec3> {
        let floor = state.tuning.miss_height + ENGAGE_FLOOR_MARGIN;
        let candidates: Vec<(usize, f32)> = state
            .targets
            .iter()
            .filter(|(_, t)| t.is_hittable() && t.vel.y < 0.0)
            .map(|(slot, t)| (slot, t.age))
            .collect();

        for (slot, age) in candidates {
            if !self.judged.iter().any(|(s, _)| *s == slot) {
                self.judged.push((slot, age));
                if self.rng.random_bool(self.miss_rate as f64) {
                    self.ignored.push((slot, age));
                }
            }
        }

        state
            .targets
            .iter()
            .filter(|(slot, t)| {
                t.is_hittable()
                    && t.vel.y < 0.0
                    && t.pos.y < ENGAGE_HEIGHT
                    && t.pos.y > floor
                    && !self.is_ignored(*slot)
            })
            .min_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
            .map(|(_, t)| t.pos)
    }

    /// Poses for the next frame given the state after the previous one
    pub fn next_input(&mut self, state: &GameState) -> FrameInput {
        self.prune(state);
        let dt = delta_time(self.refresh_rate);
        let blade_length = state.tuning.blade_length;

        let mut input = FrameInput {
            headset: self.headset(),
            ..FrameInput::default()
        };
        input.hands[Hand::Left.index()] = HandPose::tracked_at(LEFT_REST, Quat::IDENTITY);

        let right = match (state.phase, self.pick_target(state)) {
            (GamePhase::Playing, Some(target)) => {
                self.sweep_x += self.sweep_dir * SWEEP_SPEED * dt;
                if self.sweep_x.abs() >= SWEEP_HALF_WIDTH {
                    self.sweep_x = self.sweep_x.clamp(-SWEEP_HALF_WIDTH, SWEEP_HALF_WIDTH);
                    self.sweep_dir = -self.sweep_dir;
                }
                let jitter = self.rng.random_range(-JITTER..JITTER);
                // Blade runs along +Z; center it on the target's depth
                target + Vec3::new(self.sweep_x, jitter, -blade_length / 2.0)
            }
            _ => RIGHT_REST,
        };
        let mut right_pose = HandPose::tracked_at(right, Quat::IDENTITY);

        let restart_ready = state.game_over_timer >= state.tuning.restart_delay;
        if state.phase == GamePhase::GameOver && restart_ready {
            // Alternate so the press has edges
            self.press = !self.press;
            right_pose.primary = self.press;
        }
        input.hands[Hand::Right.index()] = right_pose;
        input
    }
}

/// Outcome of an autopilot run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub frames: u64,
    pub games_finished: u32,
    pub best_score: u64,
    pub total_sliced: u64,
    pub total_flipped: u64,
    pub total_missed: u64,
    pub haptic_pulses: u64,
    pub final_stats: SessionStats,
}

/// Drive `state` with `pilot` for `frames` frames
pub fn run(state: &mut GameState, pilot: &mut Autopilot, frames: u64) -> RunReport {
    run_with(state, pilot, frames, |_, _| {})
}

/// Like [`run`], calling `observe` after every frame's update
pub fn run_with(
    state: &mut GameState,
    pilot: &mut Autopilot,
    frames: u64,
    mut observe: impl FnMut(&GameState, &FrameOutput),
) -> RunReport {
    let mut report = RunReport {
        frames,
        games_finished: 0,
        best_score: 0,
        total_sliced: 0,
        total_flipped: 0,
        total_missed: 0,
        haptic_pulses: 0,
        final_stats: state.stats(),
    };

    for _ in 0..frames {
        let input = pilot.next_input(state);
        let output = tick(state, &input);
        report.haptic_pulses += output.haptics.len() as u64;
        for event in &output.events {
            match event {
                GameEvent::Sliced { .. } => report.total_sliced += 1,
                GameEvent::Flipped { .. } => report.total_flipped += 1,
                GameEvent::Missed { .. } => report.total_missed += 1,
                GameEvent::GameOver { score } => {
                    report.games_finished += 1;
                    report.best_score = report.best_score.max(*score);
                }
                _ => {}
            }
        }
        observe(state, &output);
    }

    report.best_score = report.best_score.max(state.score);
    report.final_stats = state.stats();
    report
}
