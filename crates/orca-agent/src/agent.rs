//! Agent state and the per-step neighbour / velocity computation.

use tracing::trace;

use orca_core::{AgentId, AgentParams, ObstacleId, OrcaResult};
use orca_fixed::{Fixed, FixedVector2};
use orca_spatial::{AgentNeighbors, ObstacleNeighbors};

use crate::linear_program::{solve, solve_all};
use crate::orca::{Subject, push_obstacle_lines, reciprocal_line};
use crate::{AgentResult, Line, StepContext};

/// What other agents may know about an agent during a step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: FixedVector2,
    pub velocity: FixedVector2,
    pub radius: Fixed,
}

/// One simulated agent.
///
/// `position`, `velocity` and `pref_velocity` are public inputs/outputs.  The
/// neighbour lists, ORCA lines and `new_velocity` are scratch owned by this
/// agent and rewritten every step.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub position: FixedVector2,
    pub velocity: FixedVector2,
    pub pref_velocity: FixedVector2,
    params: AgentParams,

    agent_neighbors: AgentNeighbors,
    obstacle_neighbors: ObstacleNeighbors,
    orca_lines: Vec<Line>,
    num_obstacle_lines: usize,
    new_velocity: FixedVector2,
    used_fallback: bool,
    removed: bool,
}

impl Agent {
    /// Create an agent at rest.  `params` are validated first.
    pub fn new(id: AgentId, position: FixedVector2, params: AgentParams) -> OrcaResult<Self> {
        params.validate()?;
        Ok(Self {
            id,
            position,
            velocity: FixedVector2::ZERO,
            pref_velocity: FixedVector2::ZERO,
            params,
            agent_neighbors: AgentNeighbors::new(params.max_neighbors),
            obstacle_neighbors: ObstacleNeighbors::new(),
            orca_lines: Vec::new(),
            num_obstacle_lines: 0,
            new_velocity: FixedVector2::ZERO,
            used_fallback: false,
            removed: false,
        })
    }

    // ── Parameters ────────────────────────────────────────────────────────

    #[inline]
    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    /// Replace all parameters.  Rejected parameters leave the agent unchanged.
    pub fn set_params(&mut self, params: AgentParams) -> OrcaResult<()> {
        params.validate()?;
        self.params = params;
        self.agent_neighbors.set_limit(params.max_neighbors);
        Ok(())
    }

    // ── Removal ───────────────────────────────────────────────────────────

    /// Exclude this agent from every later step.
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    // ── Read-back ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot { id: self.id, position: self.position, velocity: self.velocity, radius: self.params.radius }
    }

    pub fn agent_neighbors(&self) -> &[(Fixed, AgentId)] {
        self.agent_neighbors.as_slice()
    }

    pub fn obstacle_neighbors(&self) -> &[(Fixed, ObstacleId)] {
        &self.obstacle_neighbors
    }

    /// Lines from the last step: obstacle lines first, then agent lines.
    pub fn orca_lines(&self) -> &[Line] {
        &self.orca_lines
    }

    pub fn num_obstacle_lines(&self) -> usize {
        self.num_obstacle_lines
    }

    /// Velocity chosen in the last compute phase, not yet committed.
    pub fn new_velocity(&self) -> FixedVector2 {
        self.new_velocity
    }

    /// The last compute phase needed the least-violation fallback.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    fn subject(&self) -> Subject {
        Subject { id: self.id, position: self.position, velocity: self.velocity, radius: self.params.radius }
    }

    // ── Step phases ───────────────────────────────────────────────────────

    /// Refill both neighbour lists from the step's indices.
    pub fn compute_neighbors(&mut self, ctx: &StepContext<'_>) -> AgentResult<()> {
        let p = &self.params;

        self.obstacle_neighbors.clear();
        let obstacle_range = p.time_horizon_obst * p.max_speed + p.radius;
        ctx.obstacle_tree.query(ctx.obstacles, self.position, obstacle_range, &mut self.obstacle_neighbors)?;

        self.agent_neighbors.clear();
        if p.max_neighbors > 0 {
            let mut range_sq = p.neighbor_dist * p.neighbor_dist;
            ctx.agent_tree.query(self.position, self.id, &mut range_sq, &mut self.agent_neighbors);
        }
        Ok(())
    }

    /// Build the ORCA lines and solve for `new_velocity`.
    pub fn compute_new_velocity(&mut self, ctx: &StepContext<'_>) -> AgentResult<()> {
        let subject = self.subject();
        self.orca_lines.clear();

        let inv_time_horizon_obst = self.params.time_horizon_obst.recip()?;
        push_obstacle_lines(&subject, inv_time_horizon_obst, &self.obstacle_neighbors, ctx.obstacles, &mut self.orca_lines)?;
        self.num_obstacle_lines = self.orca_lines.len();

        let inv_time_horizon = self.params.time_horizon.recip()?;
        for &(_, other_id) in self.agent_neighbors.as_slice() {
            let other = ctx.agent(other_id)?;
            let (line, _) = reciprocal_line(&subject, other, inv_time_horizon, ctx.inv_time_step)?;
            self.orca_lines.push(line);
        }

        let max_speed = self.params.max_speed;
        let outcome = solve(&self.orca_lines, max_speed, self.pref_velocity, false)?;
        self.used_fallback = outcome.failed_at.is_some();
        self.new_velocity = match outcome.failed_at {
            None => outcome.result,
            Some(failed_at) => {
                trace!(agent = %self.id, failed_at, lines = self.orca_lines.len(), "2D program infeasible, minimising violation");
                solve_all(&self.orca_lines, self.num_obstacle_lines, failed_at, max_speed, outcome.result)?
            }
        };
        Ok(())
    }

    /// Commit the computed velocity and move.
    pub fn update(&mut self, time_step: Fixed) {
        self.velocity = self.new_velocity;
        self.position += self.velocity * time_step;
    }
}
