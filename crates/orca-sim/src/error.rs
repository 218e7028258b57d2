use orca_agent::AgentError;
use orca_core::OrcaError;
use orca_fixed::ArithmeticError;
use orca_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] OrcaError),

    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("agent step failed: {0}")]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

pub type SimResult<T> = Result<T, SimError>;
