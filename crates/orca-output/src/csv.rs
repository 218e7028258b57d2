//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trajectories.csv`: one row per agent per snapshot
//! - `step_summaries.csv`: one row per step

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, StepSummaryRow, TrajectoryRow};

pub const TRAJECTORY_HEADER: [&str; 12] =
    ["tick", "time", "agent_id", "x", "y", "vx", "vy", "time_raw", "x_raw", "y_raw", "vx_raw", "vy_raw"];

pub const SUMMARY_HEADER: [&str; 4] = ["tick", "live_agents", "fallbacks", "reclaimed"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    trajectories: Writer<File>,
    summaries:    Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut trajectories = Writer::from_path(dir.join("trajectories.csv"))?;
        trajectories.write_record(TRAJECTORY_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { trajectories, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        for row in rows {
            self.trajectories.write_record(&[
                row.tick.to_string(),
                row.time.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.vx.to_string(),
                row.vy.to_string(),
                row.time.raw().to_string(),
                row.x.raw().to_string(),
                row.y.raw().to_string(),
                row.vx.raw().to_string(),
                row.vy.raw().to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.live_agents.to_string(),
            row.fallbacks.to_string(),
            row.reclaimed.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trajectories.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
