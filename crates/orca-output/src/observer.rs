//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use orca_core::Tick;
use orca_sim::{Sim, SimObserver, StepStats};

use crate::row::{StepSummaryRow, TrajectoryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent trajectories and step summaries to
/// any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Write the state before the first step as a snapshot of the current
    /// tick.
    pub fn record_initial(&mut self, sim: &Sim) {
        let result = self.write_snapshot(sim.current_tick(), sim);
        self.store_err(result);
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_snapshot(&mut self, tick: Tick, sim: &Sim) -> OutputResult<()> {
        let time = sim.global_time();
        let rows: Vec<TrajectoryRow> = sim
            .agents()
            .map(|a| TrajectoryRow {
                tick: tick.0,
                time,
                agent_id: a.id.0,
                x: a.position.x,
                y: a.position.y,
                vx: a.velocity.x,
                vy: a.velocity.y,
            })
            .collect();
        if rows.is_empty() {
            return Ok(());
        }
        self.writer.write_trajectories(&rows)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, tick: Tick, stats: &StepStats) {
        let row = StepSummaryRow {
            tick:        tick.0,
            live_agents: stats.live_agents as u64,
            fallbacks:   stats.fallbacks as u64,
            reclaimed:   stats.reclaimed as u64,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, sim: &Sim) {
        let result = self.write_snapshot(tick, sim);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
