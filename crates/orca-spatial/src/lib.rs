//! `orca-spatial`: neighbour queries for the orca solver.
//!
//! Two independent indices, both answering "what is near this agent, nearest
//! first":
//!
//! * the **agent tree**, a k-d tree rebuilt from a position snapshot at the
//!   start of every step, returning at most `max_neighbors` agents;
//! * the **obstacle tree**, an R-tree over obstacle edges built only when the
//!   obstacle set changes, returning every edge in range.
//!
//! # Crate layout
//!
//! | Module            | Contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | [`neighbors`]     | `NeighborList` (fixed capacity, insertion sorted)     |
//! | [`kd_tree`]       | `AgentTree`                                           |
//! | [`obstacle_tree`] | `ObstacleTree`, visibility query                      |
//! | [`geometry`]      | point/segment distance and intersection predicates    |
//! | [`error`]         | `SpatialError`, `SpatialResult<T>`                    |
//!
//! # Ordering
//!
//! Equal squared distances keep the order in which the traversal found them.
//! Because the order of neighbours decides which ORCA lines are built first,
//! this tie rule is part of the simulation's observable behaviour.

pub mod error;
pub mod geometry;
pub mod kd_tree;
pub mod neighbors;
pub mod obstacle_tree;


pub use error::{SpatialError, SpatialResult};
pub use kd_tree::{AgentTree, MAX_LEAF_SIZE};
pub use neighbors::{AgentNeighbors, NeighborList, ObstacleNeighbors, insert_obstacle_neighbor};
pub use obstacle_tree::ObstacleTree;
