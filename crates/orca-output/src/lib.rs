//! `orca-output`: trajectory recording and scenario loading.
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`csv`]        | `CsvWriter`: `trajectories.csv`, `step_summaries.csv`     |
//! | [`observer`]   | `SimOutputObserver`: `SimObserver` → `OutputWriter`       |
//! | [`scenario`]   | `Scenario`: agents and obstacle polygons from CSV         |
//!
//! Trajectory rows carry every coordinate twice: as a decimal for reading
//! and as the raw Q16.16 integer, so two runs can be compared bit for bit
//! with nothing more than `diff`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use orca_output::{CsvWriter, Scenario, SimOutputObserver};
//!
//! let scenario = Scenario::load_dir(Path::new("./scenario"))?;
//! let mut sim = scenario.into_builder(config).build()?;
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! obs.record_initial(&sim);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod scenario;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{StepSummaryRow, TrajectoryRow};
pub use scenario::{ParamOverrides, Scenario, ScenarioAgent, load_agents_reader, load_obstacles_reader};
pub use writer::OutputWriter;
