//! Read-only simulation state shared by every agent during one step.

use orca_core::{AgentId, ObstacleStore, OrcaError};
use orca_fixed::{Fixed, FixedResult};
use orca_spatial::{AgentTree, ObstacleTree};

use crate::{AgentResult, AgentSnapshot};

/// Everything an agent may read while computing its new velocity.
///
/// Built once per step by the simulator after the agent tree has been
/// rebuilt, and shared immutably across the compute phase.  Agents never see
/// each other's live state, only the `snapshots` taken before the phase
/// started, so the order in which agents are processed cannot change the
/// result.
pub struct StepContext<'a> {
    /// Start-of-step state, indexed by `AgentId`.  `None` for removed slots.
    pub snapshots: &'a [Option<AgentSnapshot>],

    pub agent_tree: &'a AgentTree,

    pub obstacles: &'a ObstacleStore,

    pub obstacle_tree: &'a ObstacleTree,

    /// Seconds per step.
    pub time_step: Fixed,

    /// `1 / time_step`, used for the overlap cutoff.
    pub inv_time_step: Fixed,
}

impl<'a> StepContext<'a> {
    /// Build a new context for a single step.  Fails if `time_step` is zero.
    pub fn new(
        snapshots:     &'a [Option<AgentSnapshot>],
        agent_tree:    &'a AgentTree,
        obstacles:     &'a ObstacleStore,
        obstacle_tree: &'a ObstacleTree,
        time_step:     Fixed,
    ) -> FixedResult<Self> {
        Ok(Self { snapshots, agent_tree, obstacles, obstacle_tree, time_step, inv_time_step: time_step.recip()? })
    }

    /// Start-of-step state of agent `id`.
    #[inline]
    pub fn agent(&self, id: AgentId) -> AgentResult<&AgentSnapshot> {
        self.snapshots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| OrcaError::AgentNotFound(id).into())
    }
}
