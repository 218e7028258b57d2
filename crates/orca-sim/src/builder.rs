//! Fluent builder for constructing a [`Sim`].

use orca_core::{AgentParams, SimConfig};
use orca_fixed::FixedVector2;

use crate::{Sim, SimResult};

/// Initial state of one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AgentSpec {
    pub position: FixedVector2,
    pub velocity: FixedVector2,
    pub pref_velocity: FixedVector2,
    /// `None` uses `SimConfig::agent_defaults`.
    pub params: Option<AgentParams>,
}

impl AgentSpec {
    /// An agent at rest at `position` with default parameters.
    pub fn at(position: FixedVector2) -> Self {
        Self { position, velocity: FixedVector2::ZERO, pref_velocity: FixedVector2::ZERO, params: None }
    }

    pub fn with_params(mut self, params: AgentParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_velocity(mut self, velocity: FixedVector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_pref_velocity(mut self, pref_velocity: FixedVector2) -> Self {
        self.pref_velocity = pref_velocity;
        self
    }
}

/// Fluent builder for [`Sim`].
///
/// Agents receive ids in the order they were given, starting at 0; obstacle
/// vertices likewise, polygon after polygon.  The obstacle tree is built
/// before `build` returns.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .obstacle(square)
///     .agents(specs)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    obstacles: Vec<Vec<FixedVector2>>,
    agents:    Vec<AgentSpec>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, obstacles: Vec::new(), agents: Vec::new() }
    }

    /// Add one polygon or segment.
    pub fn obstacle(mut self, vertices: Vec<FixedVector2>) -> Self {
        self.obstacles.push(vertices);
        self
    }

    pub fn obstacles<I: IntoIterator<Item = Vec<FixedVector2>>>(mut self, polygons: I) -> Self {
        self.obstacles.extend(polygons);
        self
    }

    pub fn agent(mut self, spec: AgentSpec) -> Self {
        self.agents.push(spec);
        self
    }

    pub fn agents<I: IntoIterator<Item = AgentSpec>>(mut self, specs: I) -> Self {
        self.agents.extend(specs);
        self
    }

    /// Validate everything and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        let mut sim = Sim::new(self.config)?;

        for polygon in &self.obstacles {
            sim.add_obstacle(polygon)?;
        }
        sim.process_obstacles()?;

        for spec in self.agents {
            let id = match spec.params {
                Some(params) => sim.add_agent_with(spec.position, params)?,
                None => sim.add_agent(spec.position)?,
            };
            sim.set_agent_velocity(id, spec.velocity)?;
            sim.set_preferred_velocity(id, spec.pref_velocity)?;
        }
        Ok(sim)
    }
}
