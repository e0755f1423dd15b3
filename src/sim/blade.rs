//! Blade tracking
//!
//! Each hand carries a virtual blade projected along its local +Z axis. The
//! tracker turns the raw pose stream into a tip position, a finite-difference
//! tip velocity and a short ring buffer of recent tips for trail rendering.

use glam::Vec3;

use super::input::HandPose;
use crate::consts::TRAIL_LENGTH;

/// Per-hand blade state
#[derive(Debug, Clone)]
pub struct Blade {
    /// Hand (blade base) position this frame
    pub base: Vec3,
    /// Projected tip position this frame
    pub tip: Vec3,
    /// Tip position last frame, if the hand was tracked then
    pub prev_tip: Option<Vec3>,
    /// Tip velocity (m/s)
    pub velocity: Vec3,
    /// |velocity|
    pub speed: f32,
    /// Recent tips, written at `cursor`
    trail: [Vec3; TRAIL_LENGTH],
    cursor: usize,
    filled: usize,
    /// Hand tracked this frame
    pub tracking: bool,
}

impl Default for Blade {
    fn default() -> Self {
        Self {
            base: Vec3::ZERO,
            tip: Vec3::ZERO,
            prev_tip: None,
            velocity: Vec3::ZERO,
            speed: 0.0,
            trail: [Vec3::ZERO; TRAIL_LENGTH],
            cursor: 0,
            filled: 0,
            tracking: false,
        }
    }
}

/// Tip of a blade of `length` held in `pose`
pub fn blade_tip(pose: &HandPose, length: f32) -> Vec3 {
    pose.position + pose.orientation * Vec3::Z * length
}

impl Blade {
    /// Advance one frame from a raw hand pose
    ///
    /// `usable` is false when the hand is untracked (or its source is
    /// disabled); the blade then reports zero speed and forgets its previous
    /// tip, so the first frame after re-acquisition also reads zero speed.
    pub fn update(&mut self, pose: &HandPose, usable: bool, blade_length: f32, dt: f32) {
        if !usable {
            self.tracking = false;
            self.prev_tip = None;
            self.velocity = Vec3::ZERO;
            self.speed = 0.0;
            return;
        }

        self.tracking = true;
        self.base = pose.position;
        self.tip = blade_tip(pose, blade_length);

        match self.prev_tip {
            Some(prev) if dt > 0.0 => {
                self.velocity = (self.tip - prev) / dt;
                self.speed = self.velocity.length();
            }
            _ => {
                self.velocity = Vec3::ZERO;
                self.speed = 0.0;
            }
        }
        self.prev_tip = Some(self.tip);

        self.trail[self.cursor] = self.tip;
        self.cursor = (self.cursor + 1) % TRAIL_LENGTH;
        self.filled = (self.filled + 1).min(TRAIL_LENGTH);
    }

    /// Trail samples, oldest first
    pub fn trail(&self) -> impl Iterator<Item = Vec3> + '_ {
        let start = (self.cursor + TRAIL_LENGTH - self.filled) % TRAIL_LENGTH;
        (0..self.filled).map(move |i| self.trail[(start + i) % TRAIL_LENGTH])
    }

    /// Next ring buffer write position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Forget trail history (new game)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const DT: f32 = 1.0 / 72.0;

    fn pose(x: f32) -> HandPose {
        HandPose::tracked_at(Vec3::new(x, 1.0, 0.0), Quat::IDENTITY)
    }

    #[test]
    fn test_tip_projection() {
        let tip = blade_tip(&pose(0.0), 0.5);
        assert!((tip - Vec3::new(0.0, 1.0, 0.5)).length() < 1e-6);

        // Yaw 90 degrees: local +Z maps to world +X
        let turned = HandPose::tracked_at(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let tip = blade_tip(&turned, 1.0);
        assert!((tip - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_first_frame_has_no_speed() {
        let mut blade = Blade::default();
        blade.update(&pose(0.0), true, 0.4, DT);
        assert!(blade.tracking);
        assert_eq!(blade.speed, 0.0);

        blade.update(&pose(0.02), true, 0.4, DT);
        assert!((blade.speed - 0.02 / DT).abs() < 1e-3);
        assert!(blade.velocity.x > 0.0);
    }

    #[test]
    fn test_tracking_loss_resets_speed() {
        let mut blade = Blade::default();
        blade.update(&pose(0.0), true, 0.4, DT);
        blade.update(&pose(0.05), true, 0.4, DT);
        assert!(blade.speed > 0.0);

        blade.update(&HandPose::default(), false, 0.4, DT);
        assert!(!blade.tracking);
        assert_eq!(blade.speed, 0.0);
        assert!(blade.prev_tip.is_none());

        // Re-acquired far away: still zero on the first frame back
        blade.update(&pose(1.0), true, 0.4, DT);
        assert_eq!(blade.speed, 0.0);
    }

    #[test]
    fn test_trail_ring_wraps() {
        let mut blade = Blade::default();
        for i in 0..(TRAIL_LENGTH + 3) {
            blade.update(&pose(i as f32), true, 0.4, DT);
        }
        assert_eq!(blade.cursor(), 3);
        let xs: Vec<f32> = blade.trail().map(|p| p.x).collect();
        assert_eq!(xs.len(), TRAIL_LENGTH);
        // Oldest surviving sample is #3, newest is the last written
        assert_eq!(xs[0], 3.0);
        assert_eq!(*xs.last().unwrap(), (TRAIL_LENGTH + 2) as f32);
    }
}
