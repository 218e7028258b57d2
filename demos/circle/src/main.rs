//! circle: agents evenly spaced on a circle each walk to the point opposite.
//!
//! Every agent's straight path crosses the centre at the same moment, so the
//! whole crowd has to negotiate at once.  Run with an optional JSON
//! `SimConfig` path to override the defaults below:
//!
//! ```text
//! cargo run -p circle --release -- config.json
//! RUST_LOG=orca_sim=debug cargo run -p circle
//! ```

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use orca_core::{AgentId, AgentParams, SimConfig};
use orca_fixed::{Fixed, FixedAngle, FixedVector2};
use orca_output::{CsvWriter, SimOutputObserver};
use orca_sim::{AgentSpec, Sim, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:     i64 = 250;
const CIRCLE_RADIUS:   i64 = 200;
const SEED:            u64 = 42;
const MAX_STEPS:       u64 = 4_000;
const OUTPUT_INTERVAL: u64 = 10;
const OUTPUT_DIR:      &str = "output/circle";

fn default_config() -> SimConfig {
    SimConfig {
        time_step: Fixed::from_f64(0.25),
        total_steps: MAX_STEPS,
        seed: SEED,
        num_threads: None,
        output_interval_steps: OUTPUT_INTERVAL,
        agent_defaults: AgentParams {
            radius: Fixed::from_f64(1.5),
            max_speed: Fixed::TWO,
            neighbor_dist: Fixed::from_int(15),
            max_neighbors: 10,
            time_horizon: Fixed::from_int(10),
            time_horizon_obst: Fixed::from_int(10),
        },
    }
}

/// Defaults, or the JSON file named by the first argument.
fn load_config() -> Result<SimConfig> {
    let config = match std::env::args().nth(1) {
        None => default_config(),
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
    };
    config.validate()?;
    Ok(config)
}

// ── Scenario ──────────────────────────────────────────────────────────────────

fn build(config: SimConfig) -> Result<(Sim, Vec<(AgentId, FixedVector2)>)> {
    let radius = Fixed::from_int(CIRCLE_RADIUS);
    let starts: Vec<FixedVector2> = (0..AGENT_COUNT)
        .map(|i| {
            let angle = Fixed::from_raw(Fixed::TWO_PI.raw() * i / AGENT_COUNT);
            FixedVector2::from_angle(FixedAngle::radians(angle)) * radius
        })
        .collect();

    let mut builder = SimBuilder::new(config);
    for &start in &starts {
        builder = builder.agent(AgentSpec::at(start));
    }
    let sim = builder.build()?;
    let goals = sim.agent_ids().zip(starts.iter().map(|&s| -s)).collect();
    Ok((sim, goals))
}

/// Head straight for the goal, slowing down inside the last unit.
fn set_preferred_velocities(sim: &mut Sim, goals: &[(AgentId, FixedVector2)]) -> Result<()> {
    for &(id, goal) in goals {
        let mut to_goal = goal - sim.position(id)?;
        if to_goal.abs_sq() > Fixed::ONE {
            to_goal = to_goal.normalize()?;
        }
        sim.set_preferred_velocity(id, to_goal)?;
    }
    Ok(())
}

fn reached_goal(sim: &Sim, goals: &[(AgentId, FixedVector2)]) -> Result<bool> {
    for &(id, goal) in goals {
        let radius = sim.agent_params(id)?.radius;
        if (sim.position(id)? - goal).abs_sq() > radius * radius {
            return Ok(false);
        }
    }
    Ok(true)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orca_sim=info,circle=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let config = load_config()?;
    let max_steps = config.total_steps;
    let (mut sim, goals) = build(config)?;
    info!(agents = sim.agent_count(), radius = CIRCLE_RADIUS, "circle scenario ready");

    let mut obs = SimOutputObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);
    obs.record_initial(&sim);

    let t0 = Instant::now();
    let mut fallback_steps = 0u64;
    while sim.current_tick().0 < max_steps && !reached_goal(&sim, &goals)? {
        set_preferred_velocities(&mut sim, &goals)?;
        sim.run_steps(1, &mut obs)?;
        if sim.current_tick().0.is_multiple_of(100) {
            info!(tick = %sim.current_tick(), time = %sim.global_time(), "progress");
        }
        if sim.agents().any(|a| a.used_fallback()) {
            fallback_steps += 1;
        }
    }
    obs.on_sim_end(sim.current_tick());
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    info!(
        steps = sim.current_tick().0,
        simulated_secs = %sim.global_time(),
        wall_secs = t0.elapsed().as_secs_f64(),
        fallback_steps,
        reached = reached_goal(&sim, &goals)?,
        "circle finished"
    );
    println!("trajectories written to {OUTPUT_DIR}/trajectories.csv");
    Ok(())
}
