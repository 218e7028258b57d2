//! Simulation time model.
//!
//! # Design
//!
//! Time advances in fixed steps.  The canonical counter is the integer
//! `Tick`; simulated time is kept alongside it as a [`Fixed`] sum of step
//! sizes so it stays bit-identical across machines:
//!
//!   global_time = Σ time_step over all completed steps
//!
//! The step size may be changed between steps, which is why the time is
//! accumulated rather than derived as `tick · time_step`.

use std::fmt;

use orca_fixed::Fixed;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Number of completed simulation steps.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Step counter plus accumulated simulated time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per step (`dt`).  Always positive.
    pub time_step: Fixed,
    /// Completed steps.
    pub current_tick: Tick,
    /// Simulated seconds since tick 0.
    pub global_time: Fixed,
}

impl SimClock {
    pub fn new(time_step: Fixed) -> Self {
        Self { time_step, current_tick: Tick::ZERO, global_time: Fixed::ZERO }
    }

    /// Advance by one step of the current `time_step`.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.global_time += self.time_step;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.3}s)", self.current_tick, self.global_time)
    }
}
