//! Deterministic linear-congruential generator
//!
//! Every random choice in the simulation (spawn placement, colors, debris
//! scatter) draws from one `Lcg` owned by the game state. Same seed plus the
//! same call sequence gives a bit-identical run on every platform.

use glam::Vec3;
use rand::RngCore;
use rand::SeedableRng;
use rand::rand_core::impls;
use serde::{Deserialize, Serialize};

use crate::consts::PALETTE;

const MULTIPLIER: u32 = 1_103_515_245;
const INCREMENT: u32 = 12_345;
/// Resolution of `next01` (15 high-order bits)
const UNIT_STEPS: u32 = 32_768;

/// 32-bit LCG: `state = state * A + C` (wrapping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform float in [0, 1)
    pub fn next01(&mut self) -> f32 {
        // Low bits of an LCG have short periods; use the high half.
        let bits = (self.step() >> 16) % UNIT_STEPS;
        bits as f32 / UNIT_STEPS as f32
    }

    /// Uniform float in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next01()
    }

    /// -1.0 or +1.0 with equal probability
    pub fn sign(&mut self) -> f32 {
        if self.next01() < 0.5 { -1.0 } else { 1.0 }
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next01() < p
    }

    /// Random entry of the bright palette
    pub fn bright_color(&mut self) -> Vec3 {
        let index = ((self.next01() * PALETTE.len() as f32) as usize).min(PALETTE.len() - 1);
        Vec3::from_array(PALETTE[index])
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
