//! Top-level error type for the command line driver

use thiserror::Error;

use crate::crossing::CrossingError;
use crate::formulation::SolveError;
use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Crossing(#[from] CrossingError),
    #[error("invalid configuration: {0}")]
    Config(String),
}
