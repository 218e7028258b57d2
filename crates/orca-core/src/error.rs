//! Core error type.
//!
//! Higher crates wrap `OrcaError` as one variant of their own enum via
//! `#[from]`.

use orca_fixed::ArithmeticError;
use thiserror::Error;

use crate::{AgentId, ObstacleId};

#[derive(Debug, Error)]
pub enum OrcaError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("obstacle {0} not found")]
    ObstacleNotFound(ObstacleId),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("degenerate obstacle: {0}")]
    DegenerateObstacle(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Shorthand result type for `orca-core` and the crates built on it.
pub type OrcaResult<T> = Result<T, OrcaError>;
