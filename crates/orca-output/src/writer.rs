//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, StepSummaryRow, TrajectoryRow};

/// Sink for simulation output.
///
/// Errors are returned to [`SimOutputObserver`](crate::SimOutputObserver),
/// which keeps the first one for [`take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write one batch of agent states (one snapshot).
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
