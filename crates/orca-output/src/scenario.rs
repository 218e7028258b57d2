//! CSV scenario loader.
//!
//! A scenario is two CSV files: agents and obstacle vertices.  Numbers are
//! decimal strings parsed straight into [`Fixed`] with integer arithmetic,
//! so a scenario file yields the same raw values on every machine.
//!
//! # `agents.csv`
//!
//! One row per agent, in id order.  The parameter columns are optional; an
//! empty cell falls back to `SimConfig::agent_defaults`, field by field.
//!
//! ```csv
//! x,y,vx,vy,pref_x,pref_y,radius,max_speed,neighbor_dist,max_neighbors,time_horizon,time_horizon_obst
//! -10,0,0,0,1,0,,,,,,
//! 10,0,0,0,-1,0,0.5,1.5,15,10,5,5
//! ```
//!
//! # `obstacles.csv`
//!
//! One row per vertex.  Consecutive rows with the same `polygon` form one
//! polygon, counter-clockwise; a polygon of two vertices is a segment.
//!
//! ```csv
//! polygon,x,y
//! 0,-1,-1
//! 0,1,-1
//! 0,1,1
//! 0,-1,1
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use orca_core::{AgentParams, SimConfig};
use orca_fixed::{Fixed, FixedVector2};
use orca_sim::{AgentSpec, SimBuilder};

use crate::{OutputError, OutputResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AgentRecord {
    x:                 String,
    y:                 String,
    #[serde(default)]
    vx:                Option<String>,
    #[serde(default)]
    vy:                Option<String>,
    #[serde(default)]
    pref_x:            Option<String>,
    #[serde(default)]
    pref_y:            Option<String>,
    #[serde(default)]
    radius:            Option<String>,
    #[serde(default)]
    max_speed:         Option<String>,
    #[serde(default)]
    neighbor_dist:     Option<String>,
    #[serde(default)]
    max_neighbors:     Option<usize>,
    #[serde(default)]
    time_horizon:      Option<String>,
    #[serde(default)]
    time_horizon_obst: Option<String>,
}

#[derive(Deserialize)]
struct VertexRecord {
    polygon: u32,
    x:       String,
    y:       String,
}

/// Agents with per-field parameter overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScenarioAgent {
    pub position:      FixedVector2,
    pub velocity:      FixedVector2,
    pub pref_velocity: FixedVector2,
    pub overrides:     ParamOverrides,
}

/// Parameter cells present in the file.  Missing cells take the default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamOverrides {
    pub radius:            Option<Fixed>,
    pub max_speed:         Option<Fixed>,
    pub neighbor_dist:     Option<Fixed>,
    pub max_neighbors:     Option<usize>,
    pub time_horizon:      Option<Fixed>,
    pub time_horizon_obst: Option<Fixed>,
}

impl ParamOverrides {
    pub fn is_empty(&self) -> bool {
        *self == ParamOverrides::default()
    }

    /// `defaults` with every present cell replaced.
    pub fn apply(&self, defaults: &AgentParams) -> AgentParams {
        AgentParams {
            radius:            self.radius.unwrap_or(defaults.radius),
            max_speed:         self.max_speed.unwrap_or(defaults.max_speed),
            neighbor_dist:     self.neighbor_dist.unwrap_or(defaults.neighbor_dist),
            max_neighbors:     self.max_neighbors.unwrap_or(defaults.max_neighbors),
            time_horizon:      self.time_horizon.unwrap_or(defaults.time_horizon),
            time_horizon_obst: self.time_horizon_obst.unwrap_or(defaults.time_horizon_obst),
        }
    }
}

/// Agents and obstacles loaded from CSV.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scenario {
    pub agents:    Vec<ScenarioAgent>,
    pub obstacles: Vec<Vec<FixedVector2>>,
}

// ── Public API ────────────────────────────────────────────────────────────────

impl Scenario {
    /// Load `agents.csv` and, if present, `obstacles.csv` from `dir`.
    pub fn load_dir(dir: &Path) -> OutputResult<Self> {
        let agents = load_agents_reader(std::fs::File::open(dir.join("agents.csv"))?)?;
        let obstacle_path = dir.join("obstacles.csv");
        let obstacles = if obstacle_path.exists() {
            load_obstacles_reader(std::fs::File::open(obstacle_path)?)?
        } else {
            Vec::new()
        };
        info!(agents = agents.len(), polygons = obstacles.len(), dir = %dir.display(), "scenario loaded");
        Ok(Self { agents, obstacles })
    }

    /// Like [`load_dir`](Self::load_dir) but from any two `Read` sources.
    pub fn from_readers<A: Read, O: Read>(agents: A, obstacles: O) -> OutputResult<Self> {
        Ok(Self { agents: load_agents_reader(agents)?, obstacles: load_obstacles_reader(obstacles)? })
    }

    /// A builder holding this scenario.  Parameter overrides are resolved
    /// against `config.agent_defaults`.
    pub fn into_builder(self, config: SimConfig) -> SimBuilder {
        let defaults = config.agent_defaults;
        let specs: Vec<AgentSpec> = self
            .agents
            .into_iter()
            .map(|a| {
                let spec = AgentSpec::at(a.position).with_velocity(a.velocity).with_pref_velocity(a.pref_velocity);
                if a.overrides.is_empty() { spec } else { spec.with_params(a.overrides.apply(&defaults)) }
            })
            .collect();
        SimBuilder::new(config).obstacles(self.obstacles).agents(specs)
    }
}

/// Parse agent rows from any `Read` source.
pub fn load_agents_reader<R: Read>(reader: R) -> OutputResult<Vec<ScenarioAgent>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut agents = Vec::new();
    for (line, result) in csv_reader.deserialize::<AgentRecord>().enumerate() {
        let r = result.map_err(|e| OutputError::Parse(format!("agents row {}: {e}", line + 1)))?;
        agents.push(ScenarioAgent {
            position:      vector(&r.x, &r.y)?,
            velocity:      optional_vector(&r.vx, &r.vy)?,
            pref_velocity: optional_vector(&r.pref_x, &r.pref_y)?,
            overrides:     ParamOverrides {
                radius:            optional(&r.radius)?,
                max_speed:         optional(&r.max_speed)?,
                neighbor_dist:     optional(&r.neighbor_dist)?,
                max_neighbors:     r.max_neighbors,
                time_horizon:      optional(&r.time_horizon)?,
                time_horizon_obst: optional(&r.time_horizon_obst)?,
            },
        });
    }
    Ok(agents)
}

/// Parse obstacle vertex rows from any `Read` source.  A polygon id may not
/// reappear after another polygon has started.
pub fn load_obstacles_reader<R: Read>(reader: R) -> OutputResult<Vec<Vec<FixedVector2>>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut polygons: Vec<(u32, Vec<FixedVector2>)> = Vec::new();
    for (line, result) in csv_reader.deserialize::<VertexRecord>().enumerate() {
        let r = result.map_err(|e| OutputError::Parse(format!("obstacles row {}: {e}", line + 1)))?;
        let vertex = vector(&r.x, &r.y)?;
        match polygons.last_mut() {
            Some((id, vertices)) if *id == r.polygon => vertices.push(vertex),
            _ => {
                if polygons.iter().any(|(id, _)| *id == r.polygon) {
                    return Err(OutputError::Parse(format!(
                        "obstacles row {}: polygon {} is not contiguous",
                        line + 1,
                        r.polygon
                    )));
                }
                polygons.push((r.polygon, vec![vertex]));
            }
        }
    }
    Ok(polygons.into_iter().map(|(_, vertices)| vertices).collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn number(s: &str) -> OutputResult<Fixed> {
    s.parse::<Fixed>().map_err(|e| OutputError::Parse(e.to_string()))
}

fn optional(s: &Option<String>) -> OutputResult<Option<Fixed>> {
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => number(v).map(Some),
    }
}

fn vector(x: &str, y: &str) -> OutputResult<FixedVector2> {
    Ok(FixedVector2::new(number(x)?, number(y)?))
}

fn optional_vector(x: &Option<String>, y: &Option<String>) -> OutputResult<FixedVector2> {
    Ok(FixedVector2::new(optional(x)?.unwrap_or(Fixed::ZERO), optional(y)?.unwrap_or(Fixed::ZERO)))
}
