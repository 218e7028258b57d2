//! `orca-core`: foundational types for the orca crowd solver.
//!
//! Every other `orca-*` crate except `orca-fixed` depends on this one.  It
//! has no solver logic of its own: identifiers, the step clock, run
//! configuration, deterministic RNG, and the obstacle ring arena.
//!
//! # What lives here
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`ids`]        | `AgentId`, `ObstacleId`                                |
//! | [`time`]       | `Tick`, `SimClock`                                     |
//! | [`config`]     | `SimConfig`, `AgentParams`                             |
//! | [`rng`]        | `AgentRng`: per-agent ChaCha8 stream                   |
//! | [`obstacle`]   | `Obstacle`, `ObstacleStore`                            |
//! | [`error`]      | `OrcaError`, `OrcaResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//! |         | Needed to load `SimConfig` from JSON.                      |

pub mod config;
pub mod error;
pub mod ids;
pub mod obstacle;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AGENT_NEIGHBOR_CAPACITY, AgentParams, SimConfig};
pub use error::{OrcaError, OrcaResult};
pub use ids::{AgentId, ObstacleId};
pub use obstacle::{Obstacle, ObstacleStore};
pub use rng::AgentRng;
pub use time::{SimClock, Tick};
