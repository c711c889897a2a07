use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seed used when the host does not provide one. Any fixed seed keeps the
/// simulation reproducible run to run.
pub const DEFAULT_SEED: u64 = 0x1a57_1167;

/// Single source of randomness for the simulation. Every system that needs
/// a random draw goes through this resource so that a given seed always
/// produces the same run.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl Default for SimRng {
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED)
    }
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Uniform f32 in `[lo, hi)`; returns `lo` for an empty range.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            self.0.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform index into a slice of the given length.
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            0
        } else {
            self.0.gen_range(0..len)
        }
    }

    pub fn coin(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }

    /// Random unit vector, used as the last-resort stuck escape direction.
    pub fn unit_vec(&mut self) -> Vec2 {
        let angle = self.0.gen_range(0.0..std::f32::consts::TAU);
        Vec2::from_angle(angle)
    }
}
