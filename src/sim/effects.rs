//! Fragment bursts
//!
//! Visual debris only; nothing here affects scoring. Bursts stop early when
//! the fragment pool runs out of slots.

use glam::{Quat, Vec3};

use super::pool::Pool;
use super::rng::Lcg;
use super::state::{Fragment, Target, sub_block_offsets};
use crate::consts::{GOLD, SUB_BLOCK_SIZE};
use crate::tuning::Tuning;

/// Score-effect particle size relative to a sub-block
const SPARK_SCALE: f32 = 0.5;
const SPARK_RISE_MIN: f32 = 1.5;
const SPARK_RISE_MAX: f32 = 2.5;
const SPARK_SPREAD: f32 = 0.5;
const SPARK_LIFE_MIN: f32 = 0.6;
const SPARK_LIFE_MAX: f32 = 0.9;

fn jitter(rng: &mut Lcg, amount: f32) -> Vec3 {
    Vec3::new(
        rng.range(-amount, amount),
        rng.range(-amount, amount),
        rng.range(-amount, amount),
    )
}

/// Break a sliced target into one fragment per visible sub-block
///
/// Pieces sit on the target's sub-block grid (turned by its yaw) and inherit
/// the target's momentum plus a share of the blade's. Returns how many
/// fragments were spawned.
pub fn slice_burst(
    fragments: &mut Pool<Fragment>,
    rng: &mut Lcg,
    tuning: &Tuning,
    target: &Target,
    blade_velocity: Vec3,
) -> usize {
    let turn = Quat::from_rotation_y(target.yaw);
    let carried = target.vel + blade_velocity * tuning.blade_momentum;
    let mut spawned = 0;

    for offset in sub_block_offsets() {
        let local = turn * offset;
        let outward = local.normalize_or_zero();
        let fragment = Fragment {
            pos: target.pos + local,
            vel: carried + outward * tuning.scatter_speed + jitter(rng, tuning.scatter_jitter),
            size: SUB_BLOCK_SIZE,
            color: target.color,
            life: rng.range(tuning.fragment_life_min, tuning.fragment_life_max),
        };
        if fragments.acquire(fragment).is_none() {
            log::debug!("Fragment pool full after {} slice pieces", spawned);
            break;
        }
        spawned += 1;
    }
    spawned
}

/// Number of golden pieces for slicing a target flipped `flips` times
pub fn score_effect_count(tuning: &Tuning, flips: u32) -> u32 {
    tuning
        .score_effect_base
        .saturating_add(tuning.score_effect_per_flip.saturating_mul(flips))
        .min(tuning.score_effect_max)
}

/// Small golden fountain marking points earned at `pos`
pub fn score_effect(
    fragments: &mut Pool<Fragment>,
    rng: &mut Lcg,
    pos: Vec3,
    count: u32,
) -> usize {
    let mut spawned = 0;
    for _ in 0..count {
        let vel = Vec3::new(
            rng.range(-SPARK_SPREAD, SPARK_SPREAD),
            rng.range(SPARK_RISE_MIN, SPARK_RISE_MAX),
            rng.range(-SPARK_SPREAD, SPARK_SPREAD),
        );
        let fragment = Fragment {
            pos,
            vel,
            size: SUB_BLOCK_SIZE * SPARK_SCALE,
            color: Vec3::from_array(GOLD),
            life: rng.range(SPARK_LIFE_MIN, SPARK_LIFE_MAX),
        };
        if fragments.acquire(fragment).is_none() {
            break;
        }
        spawned += 1;
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target::flying(Vec3::new(0.0, 1.2, -0.6), Vec3::new(0.0, -1.0, 0.0), Vec3::X)
    }

    #[test]
    fn test_slice_burst_count_and_momentum() {
        let tuning = Tuning::default();
        let mut pool = Pool::new(64);
        let mut rng = Lcg::new(1);
        let n = slice_burst(&mut pool, &mut rng, &tuning, &target(), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(n, 26);
        assert_eq!(pool.active_count(), 26);

        // Mean velocity carries target momentum plus 30% of the blade
        let mean = pool.iter().map(|(_, f)| f.vel).sum::<Vec3>() / 26.0;
        assert!((mean.x - 1.2).abs() < 0.2, "mean {mean}");
        assert!((mean.y + 1.0).abs() < 0.2, "mean {mean}");
        assert!(pool.iter().all(|(_, f)| f.color == Vec3::X));
    }

    #[test]
    fn test_slice_burst_respects_capacity() {
        let tuning = Tuning::default();
        let mut pool = Pool::new(10);
        let mut rng = Lcg::new(1);
        let n = slice_burst(&mut pool, &mut rng, &tuning, &target(), Vec3::ZERO);
        assert_eq!(n, 10);
        assert!(pool.is_full());
    }

    #[test]
    fn test_score_effect_scales_with_flips() {
        let tuning = Tuning::default();
        assert_eq!(score_effect_count(&tuning, 0), 4);
        assert_eq!(score_effect_count(&tuning, 2), 8);
        assert_eq!(score_effect_count(&tuning, 50), tuning.score_effect_max);

        let mut pool = Pool::new(32);
        let mut rng = Lcg::new(9);
        assert_eq!(score_effect(&mut pool, &mut rng, Vec3::Y, 6), 6);
        assert!(pool.iter().all(|(_, f)| f.vel.y > 0.0 && f.color == Vec3::from_array(GOLD)));
    }
}
