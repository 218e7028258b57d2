//! Agent-subsystem error type.
//!
//! An infeasible set of constraints is not an error.  Everything here is a
//! broken invariant: an unknown handle, or arithmetic that has no result.

use thiserror::Error;

use orca_core::OrcaError;
use orca_fixed::ArithmeticError;
use orca_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Core(#[from] OrcaError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

pub type AgentResult<T> = Result<T, AgentError>;
