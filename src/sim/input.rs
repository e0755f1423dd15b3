//! Per-frame pose input
//!
//! Snapshot of everything the host runtime tracked this frame. The core never
//! polls devices; the driver fills one `FrameInput` and passes it to `tick`.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::FALLBACK_REFRESH_RATE;

/// Pinch strength at which a tracked hand counts as pressing confirm
pub const PINCH_CONFIRM: f32 = 0.9;

/// Which hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left = 0,
    Right = 1,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Device producing a hand pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PoseSource {
    #[default]
    Controller,
    HandTracking,
}

/// One hand's tracked state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    pub position: Vec3,
    pub orientation: Quat,
    /// Index trigger (0 - 1)
    pub trigger: f32,
    /// Grip/squeeze (0 - 1)
    pub grip: f32,
    /// Thumbstick axes (-1 - 1)
    pub thumbstick: [f32; 2],
    /// A / X button
    pub primary: bool,
    /// B / Y button
    pub secondary: bool,
    pub menu: bool,
    pub tracked: bool,
    pub source: PoseSource,
    /// Thumb-index pinch (hand tracking only)
    pub pinch_strength: f32,
}

impl Default for HandPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            trigger: 0.0,
            grip: 0.0,
            thumbstick: [0.0; 2],
            primary: false,
            secondary: false,
            menu: false,
            tracked: false,
            source: PoseSource::Controller,
            pinch_strength: 0.0,
        }
    }
}

impl HandPose {
    /// Tracked controller pose at `position`
    pub fn tracked_at(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            tracked: true,
            ..Self::default()
        }
    }

    /// Confirm press: primary button, or a firm pinch from a tracked hand
    pub fn confirm_pressed(&self, hand_tracking_enabled: bool) -> bool {
        if !self.tracked {
            return false;
        }
        match self.source {
            PoseSource::Controller => self.primary,
            PoseSource::HandTracking => {
                hand_tracking_enabled && self.pinch_strength >= PINCH_CONFIRM
            }
        }
    }

    /// Whether this pose can drive a blade under the current settings
    pub fn usable(&self, hand_tracking_enabled: bool) -> bool {
        self.tracked && (self.source == PoseSource::Controller || hand_tracking_enabled)
    }
}

/// Headset state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadsetPose {
    pub position: Vec3,
    pub orientation: Quat,
    /// Display refresh rate reported by the runtime (Hz, 0 if unknown)
    pub refresh_rate: f32,
    pub tracked: bool,
}

impl Default for HeadsetPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            refresh_rate: 0.0,
            tracked: false,
        }
    }
}

/// Everything the core consumes for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameInput {
    pub hands: [HandPose; 2],
    pub headset: HeadsetPose,
}

impl FrameInput {
    pub fn hand(&self, hand: Hand) -> &HandPose {
        &self.hands[hand.index()]
    }

    /// Frame duration derived from the refresh rate
    pub fn delta_time(&self) -> f32 {
        delta_time(self.headset.refresh_rate)
    }
}

/// `1 / refresh_rate`, or the fallback rate when the runtime reports none
pub fn delta_time(refresh_rate: f32) -> f32 {
    if refresh_rate > 0.0 && refresh_rate.is_finite() {
        1.0 / refresh_rate
    } else {
        1.0 / FALLBACK_REFRESH_RATE
    }
}
