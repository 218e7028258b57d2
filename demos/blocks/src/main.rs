//! blocks: four groups of agents cross to the opposite corner between four
//! square blocks.
//!
//! Each group of 5 × 5 agents starts in one corner of the world and heads for
//! the diagonally opposite one, squeezing through the cross-shaped corridor
//! left between the blocks.  A tiny seeded nudge on every preferred velocity
//! keeps symmetric agents from locking up.
//!
//! ```text
//! cargo run -p blocks --release
//! RUST_LOG=orca_sim=debug,blocks=debug cargo run -p blocks
//! ```

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use orca_core::{AgentId, AgentParams, AgentRng, SimConfig};
use orca_fixed::{Fixed, FixedVector2};
use orca_output::{CsvWriter, SimOutputObserver};
use orca_sim::{AgentSpec, Sim, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const GROUP_SIDE:      i64 = 5;
const GROUP_OFFSET:    i64 = 55;
const GROUP_SPACING:   i64 = 10;
const GOAL_CORNER:     i64 = 75;
const SEED:            u64 = 7;
const MAX_STEPS:       u64 = 6_000;
const OUTPUT_INTERVAL: u64 = 10;
const OUTPUT_DIR:      &str = "output/blocks";

/// Raw Q16.16 magnitude of the symmetry-breaking nudge (about 1e-4).
const NUDGE_RAW: i64 = 7;

/// The four blocks, counter-clockwise.
const BLOCKS: [[(i64, i64); 4]; 4] = [
    [(-10, 40), (-40, 40), (-40, 10), (-10, 10)],
    [(10, 40), (10, 10), (40, 10), (40, 40)],
    [(10, -40), (40, -40), (40, -10), (10, -10)],
    [(-10, -40), (-10, -10), (-40, -10), (-40, -40)],
];

fn default_config() -> SimConfig {
    SimConfig {
        time_step: Fixed::from_f64(0.25),
        total_steps: MAX_STEPS,
        seed: SEED,
        num_threads: None,
        output_interval_steps: OUTPUT_INTERVAL,
        agent_defaults: AgentParams {
            radius: Fixed::TWO,
            max_speed: Fixed::TWO,
            neighbor_dist: Fixed::from_int(15),
            max_neighbors: 10,
            time_horizon: Fixed::from_int(5),
            time_horizon_obst: Fixed::from_int(5),
        },
    }
}

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

struct Walker {
    id:   AgentId,
    goal: FixedVector2,
    rng:  AgentRng,
}

fn build(config: SimConfig) -> Result<(Sim, Vec<Walker>)> {
    let seed = config.seed;
    let mut starts = Vec::new();
    for i in 0..GROUP_SIDE {
        for j in 0..GROUP_SIDE {
            let (a, b) = (GROUP_OFFSET + i * GROUP_SPACING, GROUP_OFFSET + j * GROUP_SPACING);
            starts.push((FixedVector2::from_ints(a, b), FixedVector2::from_ints(-GOAL_CORNER, -GOAL_CORNER)));
            starts.push((FixedVector2::from_ints(-a, b), FixedVector2::from_ints(GOAL_CORNER, -GOAL_CORNER)));
            starts.push((FixedVector2::from_ints(a, -b), FixedVector2::from_ints(-GOAL_CORNER, GOAL_CORNER)));
            starts.push((FixedVector2::from_ints(-a, -b), FixedVector2::from_ints(GOAL_CORNER, GOAL_CORNER)));
        }
    }

    let sim = SimBuilder::new(config)
        .obstacles(BLOCKS.iter().map(|block| block.iter().map(|&(x, y)| FixedVector2::from_ints(x, y)).collect()))
        .agents(starts.iter().map(|&(start, _)| AgentSpec::at(start)))
        .build()?;

    let walkers = sim
        .agent_ids()
        .zip(starts.iter().map(|&(_, goal)| goal))
        .map(|(id, goal)| Walker { id, goal, rng: AgentRng::new(seed, id) })
        .collect();
    Ok((sim, walkers))
}

fn set_preferred_velocities(sim: &mut Sim, walkers: &mut [Walker]) -> Result<()> {
    let nudge = Fixed::from_raw(NUDGE_RAW);
    for w in walkers.iter_mut() {
        let mut to_goal = w.goal - sim.position(w.id)?;
        if to_goal.abs_sq() > Fixed::ONE {
            to_goal = to_goal.normalize()?;
        }
        sim.set_preferred_velocity(w.id, to_goal + w.rng.perturbation(nudge))?;
    }
    Ok(())
}

/// Agents within 20 units of their goal.
fn arrived(sim: &Sim, walkers: &[Walker]) -> Result<usize> {
    let reach_sq = Fixed::from_int(20 * 20);
    let mut n = 0;
    for w in walkers {
        if (sim.position(w.id)? - w.goal).abs_sq() <= reach_sq {
            n += 1;
        }
    }
    Ok(n)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orca_sim=info,blocks=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let config = load_config()?;
    let max_steps = config.total_steps;
    let (mut sim, mut walkers) = build(config)?;
    info!(
        agents = sim.agent_count(),
        obstacle_edges = sim.obstacle_count(),
        "blocks scenario ready"
    );

    let mut obs = SimOutputObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);
    obs.record_initial(&sim);

    let t0 = Instant::now();
    let total = walkers.len();
    let mut done = arrived(&sim, &walkers)?;
    while sim.current_tick().0 < max_steps && done < total {
        set_preferred_velocities(&mut sim, &mut walkers)?;
        sim.run_steps(1, &mut obs)?;
        done = arrived(&sim, &walkers)?;
        if sim.current_tick().0.is_multiple_of(100) {
            debug!(tick = %sim.current_tick(), arrived = done, "progress");
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
        arrived = done,
        total,
        "blocks finished"
    );
    println!("trajectories written to {OUTPUT_DIR}/trajectories.csv");
    Ok(())
}
