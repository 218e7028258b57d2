//! `orca-agent`: per-agent avoidance logic.
//!
//! Each step an agent gathers its neighbours from the two spatial indices,
//! turns every neighbour into one half-plane constraint on its velocity (an
//! ORCA line), and picks the velocity closest to its preferred one that
//! satisfies them all.  When the constraints have no common solution the 3D
//! linear program finds the velocity that violates them least.
//!
//! # Crate layout
//!
//! | Module               | Contents                                          |
//! |----------------------|---------------------------------------------------|
//! | [`line`]             | `Line` (directed half-plane boundary)             |
//! | [`linear_program`]   | `solve_line`, `solve`, `solve_all`, `LpOutcome`   |
//! | [`orca`]             | obstacle and agent ORCA-line construction         |
//! | [`agent`]            | `Agent`, `AgentSnapshot`                          |
//! | [`context`]          | `StepContext` (read-only state for one step)      |
//! | [`error`]            | `AgentError`, `AgentResult<T>`                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Line` and snapshots.   |

pub mod agent;
pub mod context;
pub mod error;
pub mod line;
pub mod linear_program;
pub mod orca;

#[cfg(test)]
mod tests;

pub use agent::{Agent, AgentSnapshot};
pub use context::StepContext;
pub use error::{AgentError, AgentResult};
pub use line::Line;
pub use linear_program::{LpOutcome, solve, solve_all, solve_line};
