//! Run configuration and per-agent parameters.
//!
//! Both structs are plain data.  With the `serde` feature they load from
//! JSON; `Fixed` fields are written as their raw scaled integers
//! (`65536` = 1.0) so a config file round-trips bit for bit.

use orca_fixed::Fixed;

use crate::{OrcaError, OrcaResult, SimClock, Tick};

/// Hard upper bound on `max_neighbors`.  The agent-neighbour list is a
/// fixed-capacity array of this size.
pub const AGENT_NEIGHBOR_CAPACITY: usize = 32;

// ── AgentParams ───────────────────────────────────────────────────────────────

/// Per-agent avoidance parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentParams {
    /// Body radius.  Must be positive.
    pub radius: Fixed,
    /// Speed bound for the chosen velocity.  Must be non-negative.
    pub max_speed: Fixed,
    /// Other agents farther than this are ignored.
    pub neighbor_dist: Fixed,
    /// At most this many agents are considered, nearest first.
    pub max_neighbors: usize,
    /// Look-ahead for agent-agent avoidance.  Must be positive.
    pub time_horizon: Fixed,
    /// Look-ahead for agent-obstacle avoidance.  Must be positive.
    pub time_horizon_obst: Fixed,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            radius: Fixed::from_f64(1.5),
            max_speed: Fixed::TWO,
            neighbor_dist: Fixed::from_int(15),
            max_neighbors: 10,
            time_horizon: Fixed::from_int(10),
            time_horizon_obst: Fixed::from_int(10),
        }
    }
}

impl AgentParams {
    /// Reject parameters that would make the solver divide by zero or take
    /// the square root of a negative number.
    pub fn validate(&self) -> OrcaResult<()> {
        if !self.radius.is_positive() {
            return Err(invalid("radius", format!("must be > 0, got {}", self.radius)));
        }
        if !self.max_speed.is_positive() {
            return Err(invalid("max_speed", format!("must be > 0, got {}", self.max_speed)));
        }
        if self.neighbor_dist.is_negative() {
            return Err(invalid("neighbor_dist", format!("must be >= 0, got {}", self.neighbor_dist)));
        }
        if self.max_neighbors > AGENT_NEIGHBOR_CAPACITY {
            return Err(invalid(
                "max_neighbors",
                format!("must be <= {AGENT_NEIGHBOR_CAPACITY}, got {}", self.max_neighbors),
            ));
        }
        if !self.time_horizon.is_positive() {
            return Err(invalid("time_horizon", format!("must be > 0, got {}", self.time_horizon)));
        }
        if !self.time_horizon_obst.is_positive() {
            return Err(invalid(
                "time_horizon_obst",
                format!("must be > 0, got {}", self.time_horizon_obst),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> OrcaError {
    OrcaError::InvalidParameter { name, reason }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per step.  Default: 0.25.
    pub time_step: Fixed,

    /// Steps executed by `Sim::run`.
    pub total_steps: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for the parallel compute phase.  `None` uses the
    /// global Rayon pool.
    pub num_threads: Option<usize>,

    /// Report snapshots every N steps.  1 = every step.
    pub output_interval_steps: u64,

    /// Parameters given to agents added without explicit ones.
    pub agent_defaults: AgentParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step: Fixed::from_f64(0.25),
            total_steps: 1_000,
            seed: 0,
            num_threads: None,
            output_interval_steps: 1,
            agent_defaults: AgentParams::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> OrcaResult<()> {
        if !self.time_step.is_positive() {
            return Err(OrcaError::Config(format!("time_step must be > 0, got {}", self.time_step)));
        }
        if self.output_interval_steps == 0 {
            return Err(OrcaError::Config("output_interval_steps must be >= 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(OrcaError::Config("num_threads must be >= 1 when set".into()));
        }
        self.agent_defaults.validate()
    }

    /// The tick at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_steps)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.time_step)
    }
}
