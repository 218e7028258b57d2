//! Deterministic per-agent RNG.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent ChaCha8 stream seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! ChaCha8 is specified bit-for-bit, unlike `SmallRng` whose algorithm may
//! differ between platforms and `rand` releases.  All sampling below is on
//! integers; the results are turned into [`Fixed`] raw values, so no float
//! ever enters a trajectory.

use orca_fixed::{Fixed, FixedAngle, FixedVector2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Uniform [`Fixed`] in `[lo, hi]`, sampled on raw integers.
fn fixed_in<R: Rng>(rng: &mut R, lo: Fixed, hi: Fixed) -> Fixed {
    if hi <= lo {
        return lo;
    }
    Fixed::from_raw(rng.gen_range(lo.raw()..=hi.raw()))
}

/// Random vector of length up to `magnitude` in a uniform direction.
fn perturbation_from<R: Rng>(rng: &mut R, magnitude: Fixed) -> FixedVector2 {
    let angle = Fixed::from_raw(rng.gen_range(0..Fixed::TWO_PI.raw()));
    let length = fixed_in(rng, Fixed::ZERO, magnitude.abs());
    FixedVector2::from_angle(FixedAngle::radians(angle)) * length
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
pub struct AgentRng(ChaCha8Rng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Uniform [`Fixed`] in `[lo, hi]`.
    #[inline]
    pub fn fixed_in(&mut self, lo: Fixed, hi: Fixed) -> Fixed {
        fixed_in(&mut self.0, lo, hi)
    }

    /// Small random nudge used to break perfect symmetry (agents placed
    /// exactly head-on never pick a side otherwise).
    #[inline]
    pub fn perturbation(&mut self, magnitude: Fixed) -> FixedVector2 {
        perturbation_from(&mut self.0, magnitude)
    }
}
