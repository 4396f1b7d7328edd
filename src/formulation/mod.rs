//! Constraint formulation of the thrown-trajectory problem and its Z3 driver

pub mod config;
pub mod model;
pub mod number;
pub mod solve;

// Re-export main functionality
pub use config::{FormulationConfig, NumericDomain, SolverConfig};
pub use solve::{SolveError, solve_with_config};
