//! Spatial-subsystem error type.

use thiserror::Error;

use orca_core::OrcaError;
use orca_fixed::ArithmeticError;

/// Errors produced by `orca-spatial`.
///
/// Queries only fail on broken invariants: a dangling obstacle link or an
/// edge too short to project onto.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error(transparent)]
    Core(#[from] OrcaError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
