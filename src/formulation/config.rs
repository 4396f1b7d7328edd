//! Configuration types for the constraint formulation

use std::time::Duration;

use z3::{Params, Solver};

use crate::hailstone::Hailstone;

/// Number of hailstones the reference input was solved with
pub const DEFAULT_MAX_PARTICLES: usize = 9;

/// Numeric domain the unknowns are declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericDomain {
    /// Real-valued unknowns (fast; integral solutions come out exact)
    #[default]
    Real,
    /// Integer-valued unknowns
    Integer,
}

impl std::fmt::Display for NumericDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericDomain::Real => write!(f, "real"),
            NumericDomain::Integer => write!(f, "integer"),
        }
    }
}

impl std::str::FromStr for NumericDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "real" | "reals" | "r" => Ok(NumericDomain::Real),
            "integer" | "int" | "i" => Ok(NumericDomain::Integer),
            _ => Err(format!(
                "Unknown numeric domain: '{}'. Valid options: real, integer",
                s
            )),
        }
    }
}

/// Configuration for the SMT solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Timeout for a single check (None means no timeout)
    pub timeout: Option<Duration>,
}

impl SolverConfig {
    /// Create a config with no timeout
    pub fn no_timeout() -> Self {
        Self { timeout: None }
    }

    /// Create a config with a specific timeout in seconds
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(secs)),
        }
    }
}

/// Create a Z3 solver with the given configuration
pub fn create_solver_with_config(cfg: &SolverConfig) -> Solver {
    let solver = Solver::new();
    if let Some(timeout) = cfg.timeout {
        let mut params = Params::new();
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        params.set_u32("timeout", millis);
        solver.set_params(&params);
    }
    solver
}

/// Configuration for building and solving the thrown-trajectory model
#[derive(Debug, Clone)]
pub struct FormulationConfig {
    pub domain: NumericDomain,
    /// Only the first N hailstones are constrained (None = all of them)
    pub max_particles: Option<usize>,
    /// Emit the quotient sign hints (None = only in the integer domain)
    pub quotient_hints: Option<bool>,
    pub solver: SolverConfig,
    /// Run a second check proving no other thrown trajectory fits
    pub require_unique: bool,
}

impl Default for FormulationConfig {
    fn default() -> Self {
        Self {
            domain: NumericDomain::Real,
            max_particles: Some(DEFAULT_MAX_PARTICLES),
            quotient_hints: None,
            solver: SolverConfig::no_timeout(),
            require_unique: false,
        }
    }
}

impl FormulationConfig {
    pub fn with_domain(mut self, domain: NumericDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = Some(max);
        self
    }

    pub fn with_all_particles(mut self) -> Self {
        self.max_particles = None;
        self
    }

    pub fn with_quotient_hints(mut self, enabled: bool) -> Self {
        self.quotient_hints = Some(enabled);
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_require_unique(mut self, require: bool) -> Self {
        self.require_unique = require;
        self
    }

    /// Whether the quotient hints are emitted for this configuration
    pub fn hints_enabled(&self) -> bool {
        self.quotient_hints
            .unwrap_or(self.domain == NumericDomain::Integer)
    }

    /// The prefix of `hailstones` that is actually constrained
    pub fn considered<'a>(&self, hailstones: &'a [Hailstone]) -> &'a [Hailstone] {
        match self.max_particles {
            Some(max) => &hailstones[..hailstones.len().min(max)],
            None => hailstones,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.max_particles == Some(0) {
            return Err("max_particles must be at least 1".to_string());
        }
        if self.solver.timeout == Some(Duration::ZERO) {
            return Err("solver timeout must be positive".to_string());
        }
        Ok(())
    }
}
