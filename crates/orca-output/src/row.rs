//! Plain data row types written by output backends.

use orca_fixed::Fixed;

/// One agent's state after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectoryRow {
    /// Completed steps.
    pub tick:     u64,
    /// Simulated seconds at `tick`.
    pub time:     Fixed,
    pub agent_id: u32,
    pub x:        Fixed,
    pub y:        Fixed,
    pub vx:       Fixed,
    pub vy:       Fixed,
}

/// Summary of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    /// Index of the step (the tick it started at).
    pub tick:        u64,
    pub live_agents: u64,
    pub fallbacks:   u64,
    pub reclaimed:   u64,
}
