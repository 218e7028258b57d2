//! The `Sim` struct and its step loop.

use tracing::{debug, info};

use orca_agent::{Agent, AgentResult, AgentSnapshot, Line, StepContext};
use orca_core::{AgentId, AgentParams, Obstacle, ObstacleId, ObstacleStore, OrcaError, OrcaResult, SimClock, SimConfig, Tick};
use orca_fixed::{Fixed, FixedVector2};
use orca_spatial::{AgentTree, ObstacleTree};

use crate::{SimObserver, SimResult, StepStats};

/// The simulation context.
///
/// Owns every agent, the obstacle rings and both spatial indices.  All
/// mutation goes through `&mut self` between steps; during a step agents see
/// only the [`StepContext`] built from the start-of-step snapshot.
///
/// Agents live in a slot arena indexed by [`AgentId`].  Removal is logical
/// first (the agent disappears from queries and from the next snapshot) and
/// the slot is cleared at the start of the next step.  Handles are never
/// reused.
///
/// Create via [`Sim::new`] or [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    config: SimConfig,
    clock: SimClock,

    agents: Vec<Option<Agent>>,
    /// Agents flagged by `remove_agent`, reclaimed at the next step.
    pending_removal: Vec<AgentId>,

    obstacles: ObstacleStore,
    obstacle_tree: ObstacleTree,
    /// Obstacles were added since `obstacle_tree` was built.
    obstacles_dirty: bool,

    agent_tree: AgentTree,
    /// Start-of-step state, indexed by `AgentId`.  Reused between steps.
    snapshots: Vec<Option<AgentSnapshot>>,

    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl Sim {
    /// Create an empty simulation.  `config` is validated first.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            clock: config.make_clock(),
            agents: Vec::new(),
            pending_removal: Vec::new(),
            obstacles: ObstacleStore::new(),
            obstacle_tree: ObstacleTree::default(),
            obstacles_dirty: false,
            agent_tree: AgentTree::new(),
            snapshots: Vec::new(),
            #[cfg(feature = "parallel")]
            pool: build_pool(config.num_threads)?,
            config,
        })
    }

    // ── Configuration ─────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Change the step size used by later steps.
    pub fn set_time_step(&mut self, time_step: Fixed) -> OrcaResult<()> {
        if !time_step.is_positive() {
            return Err(OrcaError::InvalidParameter { name: "time_step", reason: format!("must be > 0, got {time_step}") });
        }
        self.config.time_step = time_step;
        self.clock.time_step = time_step;
        Ok(())
    }

    /// Parameters for agents added later with [`add_agent`](Self::add_agent).
    pub fn set_agent_defaults(&mut self, params: AgentParams) -> OrcaResult<()> {
        params.validate()?;
        self.config.agent_defaults = params;
        Ok(())
    }

    pub fn agent_defaults(&self) -> &AgentParams {
        &self.config.agent_defaults
    }

    // ── Obstacles ─────────────────────────────────────────────────────────

    /// Register a closed polygon (counter-clockwise keeps agents outside) or
    /// a two-vertex segment.  Returns the id of its first vertex.
    pub fn add_obstacle(&mut self, vertices: &[FixedVector2]) -> OrcaResult<ObstacleId> {
        let id = self.obstacles.add_polygon(vertices)?;
        self.obstacles_dirty = true;
        Ok(id)
    }

    /// Rebuild the obstacle tree now instead of at the next step.
    pub fn process_obstacles(&mut self) -> SimResult<()> {
        if self.obstacles_dirty {
            self.obstacle_tree = ObstacleTree::build(&self.obstacles)?;
            self.obstacles_dirty = false;
            info!(edges = self.obstacle_tree.len(), polygons = self.obstacles.polygon_count(), "obstacle tree rebuilt");
        }
        Ok(())
    }

    pub fn obstacle(&self, id: ObstacleId) -> OrcaResult<&Obstacle> {
        self.obstacles.obstacle(id)
    }

    /// Number of obstacle vertices (and edges).
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn next_obstacle(&self, id: ObstacleId) -> OrcaResult<ObstacleId> {
        Ok(self.obstacles.obstacle(id)?.next)
    }

    pub fn prev_obstacle(&self, id: ObstacleId) -> OrcaResult<ObstacleId> {
        Ok(self.obstacles.obstacle(id)?.previous)
    }

    pub fn obstacles(&self) -> &ObstacleStore {
        &self.obstacles
    }

    /// `true` if a disc of `radius` can move from `q1` to `q2` without
    /// touching an obstacle.  Rebuilds the obstacle tree first if needed.
    pub fn query_visibility(&mut self, q1: FixedVector2, q2: FixedVector2, radius: Fixed) -> SimResult<bool> {
        self.process_obstacles()?;
        Ok(self.obstacle_tree.query_visibility(&self.obstacles, q1, q2, radius)?)
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Add an agent at rest with the default parameters.
    pub fn add_agent(&mut self, position: FixedVector2) -> OrcaResult<AgentId> {
        let params = self.config.agent_defaults;
        self.add_agent_with(position, params)
    }

    /// Add an agent at rest with explicit parameters.
    pub fn add_agent_with(&mut self, position: FixedVector2, params: AgentParams) -> OrcaResult<AgentId> {
        let id = AgentId::try_from(self.agents.len())
            .map_err(|_| OrcaError::Config(format!("agent count exceeds {}", u32::MAX)))?;
        self.agents.push(Some(Agent::new(id, position, params)?));
        Ok(id)
    }

    /// Remove an agent.  It no longer answers queries and is excluded from
    /// every later step.
    pub fn remove_agent(&mut self, id: AgentId) -> OrcaResult<()> {
        self.agent_mut(id)?.mark_removed();
        self.pending_removal.push(id);
        Ok(())
    }

    pub fn set_preferred_velocity(&mut self, id: AgentId, velocity: FixedVector2) -> OrcaResult<()> {
        self.agent_mut(id)?.pref_velocity = velocity;
        Ok(())
    }

    pub fn set_agent_position(&mut self, id: AgentId, position: FixedVector2) -> OrcaResult<()> {
        self.agent_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_agent_velocity(&mut self, id: AgentId, velocity: FixedVector2) -> OrcaResult<()> {
        self.agent_mut(id)?.velocity = velocity;
        Ok(())
    }

    pub fn set_agent_params(&mut self, id: AgentId, params: AgentParams) -> OrcaResult<()> {
        self.agent_mut(id)?.set_params(params)
    }

    /// A live agent.
    pub fn agent(&self, id: AgentId) -> OrcaResult<&Agent> {
        self.agents
            .get(id.index())
            .and_then(Option::as_ref)
            .filter(|a| !a.is_removed())
            .ok_or(OrcaError::AgentNotFound(id))
    }

    fn agent_mut(&mut self, id: AgentId) -> OrcaResult<&mut Agent> {
        self.agents
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .filter(|a| !a.is_removed())
            .ok_or(OrcaError::AgentNotFound(id))
    }

    /// Live agents in ascending id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().flatten().filter(|a| !a.is_removed())
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents().map(|a| a.id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents().count()
    }

    pub fn position(&self, id: AgentId) -> OrcaResult<FixedVector2> {
        Ok(self.agent(id)?.position)
    }

    pub fn velocity(&self, id: AgentId) -> OrcaResult<FixedVector2> {
        Ok(self.agent(id)?.velocity)
    }

    pub fn preferred_velocity(&self, id: AgentId) -> OrcaResult<FixedVector2> {
        Ok(self.agent(id)?.pref_velocity)
    }

    pub fn agent_params(&self, id: AgentId) -> OrcaResult<&AgentParams> {
        Ok(self.agent(id)?.params())
    }

    /// Neighbours found in the last step, nearest first.
    pub fn agent_neighbors(&self, id: AgentId) -> OrcaResult<&[(Fixed, AgentId)]> {
        Ok(self.agent(id)?.agent_neighbors())
    }

    pub fn obstacle_neighbors(&self, id: AgentId) -> OrcaResult<&[(Fixed, ObstacleId)]> {
        Ok(self.agent(id)?.obstacle_neighbors())
    }

    pub fn orca_lines(&self, id: AgentId) -> OrcaResult<&[Line]> {
        Ok(self.agent(id)?.orca_lines())
    }

    // ── Time ──────────────────────────────────────────────────────────────

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn global_time(&self) -> Fixed {
        self.clock.global_time
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn time_step(&self) -> Fixed {
        self.clock.time_step
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Advance by one step of the configured `time_step`.
    ///
    /// On error nothing is committed: positions, velocities and the clock are
    /// those from before the call.
    pub fn step(&mut self) -> SimResult<StepStats> {
        let reclaimed = self.reclaim_removed();
        self.process_obstacles()?;
        self.take_snapshot();
        let fallbacks = self.compute_velocities()?;

        let time_step = self.clock.time_step;
        let mut live_agents = 0;
        for agent in self.agents.iter_mut().flatten() {
            agent.update(time_step);
            live_agents += 1;
        }
        self.clock.advance();

        let stats = StepStats { live_agents, fallbacks, reclaimed };
        debug!(tick = %self.clock.current_tick, agents = live_agents, fallbacks, "step complete");
        Ok(stats)
    }

    /// Set the step size to `time_step`, then step.
    pub fn step_by(&mut self, time_step: Fixed) -> SimResult<StepStats> {
        self.set_time_step(time_step)?;
        self.step()
    }

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.observed_step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores `end_tick`).
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_step(observer)?;
        }
        Ok(())
    }

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_step_start(now);
        let stats = self.step()?;
        observer.on_step_end(now, &stats);

        let done = self.clock.current_tick;
        if done.0.is_multiple_of(self.config.output_interval_steps) {
            observer.on_snapshot(done, self);
        }
        Ok(())
    }

    // ── Step phases ───────────────────────────────────────────────────────

    /// Clear the slots of agents removed since the last step.
    fn reclaim_removed(&mut self) -> usize {
        let reclaimed = self.pending_removal.len();
        if reclaimed == 0 {
            return 0;
        }
        for id in self.pending_removal.drain(..) {
            if let Some(slot) = self.agents.get_mut(id.index()) {
                *slot = None;
            }
        }
        info!(reclaimed, live = self.agents.iter().flatten().count(), "removed agents reclaimed");
        reclaimed
    }

    fn take_snapshot(&mut self) {
        self.snapshots.clear();
        self.snapshots
            .extend(self.agents.iter().map(|slot| slot.as_ref().filter(|a| !a.is_removed()).map(Agent::snapshot)));
        self.agent_tree.rebuild(self.snapshots.iter().flatten().map(|s| (s.id, s.position)));
    }

    /// Compute phase.  Returns the number of agents that needed the fallback.
    fn compute_velocities(&mut self) -> SimResult<usize> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let ctx = StepContext::new(
            &self.snapshots,
            &self.agent_tree,
            &self.obstacles,
            &self.obstacle_tree,
            self.clock.time_step,
        )?;
        let agents = &mut self.agents;

        #[cfg(not(feature = "parallel"))]
        {
            for agent in agents.iter_mut().flatten() {
                compute_agent(agent, &ctx)?;
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut compute = || agents.par_iter_mut().flatten().try_for_each(|agent| compute_agent(agent, &ctx));
            match &self.pool {
                Some(pool) => pool.install(compute)?,
                None => compute()?,
            }
        }

        Ok(agents.iter().flatten().filter(|a| a.used_fallback()).count())
    }
}

fn compute_agent(agent: &mut Agent, ctx: &StepContext<'_>) -> AgentResult<()> {
    agent.compute_neighbors(ctx)?;
    agent.compute_new_velocity(ctx)
}

#[cfg(feature = "parallel")]
fn build_pool(num_threads: Option<usize>) -> SimResult<Option<rayon::ThreadPool>> {
    num_threads
        .map(|n| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| crate::SimError::Config(format!("cannot build thread pool: {e}")))
        })
        .transpose()
}

impl std::fmt::Debug for Sim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("clock", &self.clock)
            .field("agents", &self.agent_count())
            .field("obstacles", &self.obstacles.len())
            .finish()
    }
}
