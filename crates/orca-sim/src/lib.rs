//! `orca-sim`: the step loop of the orca crowd solver.
//!
//! # One step
//!
//! ```text
//! step():
//!   ① Reclaim : drop agents removed since the last step; rebuild the
//!                obstacle tree if obstacles were added.
//!   ② Snapshot: copy position/velocity/radius of every live agent and
//!                rebuild the agent k-d tree from it.
//!   ③ Compute : every agent finds its neighbours, builds ORCA lines and
//!                solves for a new velocity, reading only the snapshot
//!                (parallel with the `parallel` feature).
//!   ④ Commit  : every agent takes its new velocity and moves by it;
//!                the clock advances by `time_step`.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase on Rayon's thread pool.         |
//! | `serde`    | Propagates serde derives from the lower crates.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use orca_core::SimConfig;
//! use orca_fixed::FixedVector2;
//! use orca_sim::{AgentSpec, NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default())
//!     .obstacle(vec![FixedVector2::from_ints(-1, -1), FixedVector2::from_ints(1, -1),
//!                    FixedVector2::from_ints(1, 1), FixedVector2::from_ints(-1, 1)])
//!     .agent(AgentSpec::at(FixedVector2::from_ints(-10, 0)))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::{AgentSpec, SimBuilder};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, StepStats};
pub use sim::Sim;
