//! Simulation observer trait for progress reporting and data collection.

use orca_core::Tick;

use crate::Sim;

/// Summary of one completed step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Agents that took part in the step.
    pub live_agents: usize,
    /// Agents whose constraints were infeasible and fell back to the
    /// least-violation program.
    pub fallbacks: usize,
    /// Agents reclaimed at the start of the step.
    pub reclaimed: usize,
}

/// Callbacks invoked by [`Sim::run`] and [`Sim::run_steps`] at step
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, tick: Tick, stats: &StepStats) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} agents, {} fallbacks", stats.live_agents, stats.fallbacks);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before step `tick` starts.
    fn on_step_start(&mut self, _tick: Tick) {}

    /// Called after step `tick` has been committed.
    fn on_step_end(&mut self, _tick: Tick, _stats: &StepStats) {}

    /// Called every `config.output_interval_steps` steps, after the commit.
    /// `tick` is the number of completed steps, so positions read from `sim`
    /// are those at `sim.global_time()`.
    fn on_snapshot(&mut self, _tick: Tick, _sim: &Sim) {}

    /// Called once when [`Sim::run`] reaches `config.end_tick()`.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
