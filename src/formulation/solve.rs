//! Solver driver: build the model, check it once, read the thrown trajectory

use std::fmt;

use log::{debug, info, warn};
use thiserror::Error;
use z3::ast::{Bool, Int, Real};
use z3::{Model, SatResult, Solver};

use super::config::{FormulationConfig, NumericDomain, create_solver_with_config};
use super::model::{ConstraintBuilder, ConstraintModel};
use super::number::{Numeral, SymbolicNumber};
use crate::hailstone::Hailstone;

/// Hailstones needed before the six shared unknowns can be pinned down
pub const MIN_DETERMINING_PARTICLES: usize = 3;

/// Why no thrown trajectory could be reported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Nothing but the `answer` definition was asserted
    #[error("constraint model has no unique solution: no hailstones to constrain the throw")]
    Underconstrained,
    #[error("no consistent thrown trajectory for given particles")]
    Unsatisfiable,
    #[error("solver could not decide the constraint model: {0}")]
    SolverUnknown(String),
    #[error("constraint model has no unique solution: another thrown trajectory also fits")]
    NotUnique,
    #[error("solver model has no exact value for '{0}'")]
    MissingValue(String),
}

/// The thrown particle as read back from the solver model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub position: [Numeral; 3],
    pub velocity: [Numeral; 3],
    /// `x0 + y0 + z0`
    pub answer: Numeral,
}

impl fmt::Display for Solution {
    /// The four output lines: x0, y0, z0, then their sum
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = &self.position;
        write!(f, "{}\n{}\n{}\n{}", x, y, z, self.answer)
    }
}

/// Solve with the default configuration (real domain, first nine hailstones)
#[cfg(test)]
pub fn solve(hailstones: &[Hailstone]) -> Result<Solution, SolveError> {
    solve_with_config(hailstones, &FormulationConfig::default())
}

/// Solve in the domain selected by `config`
pub fn solve_with_config(
    hailstones: &[Hailstone],
    config: &FormulationConfig,
) -> Result<Solution, SolveError> {
    match config.domain {
        NumericDomain::Real => solve_in::<Real>(hailstones, config),
        NumericDomain::Integer => solve_in::<Int>(hailstones, config),
    }
}

fn solve_in<T: SymbolicNumber>(
    hailstones: &[Hailstone],
    config: &FormulationConfig,
) -> Result<Solution, SolveError> {
    let considered = config.considered(hailstones).len();
    if considered == 0 {
        return Err(SolveError::Underconstrained);
    }
    if considered < MIN_DETERMINING_PARTICLES {
        warn!(
            "only {} hailstone(s) constrained; the thrown trajectory is not determined",
            considered
        );
    }

    let model: ConstraintModel<T> = ConstraintBuilder::new(config).build(hailstones);
    let solver = create_solver_with_config(&config.solver);
    for assertion in model.assertions() {
        solver.assert(assertion);
    }

    let result = solver.check();
    info!("{} model with {} hailstones: {:?}", T::DOMAIN, considered, result);
    let solved = match result {
        SatResult::Sat => solver
            .get_model()
            .ok_or_else(|| SolveError::SolverUnknown("no model after sat".to_string()))?,
        SatResult::Unsat => return Err(SolveError::Unsatisfiable),
        SatResult::Unknown => return Err(unknown(&solver)),
    };

    let solution = read_solution(&model, &solved)?;
    debug!(
        "thrown velocity: {}, {}, {}",
        solution.velocity[0], solution.velocity[1], solution.velocity[2]
    );

    if config.require_unique {
        check_uniqueness(&model, &solution, &solver)?;
    }
    Ok(solution)
}

fn unknown(solver: &Solver) -> SolveError {
    SolveError::SolverUnknown(
        solver
            .get_reason_unknown()
            .unwrap_or_else(|| "unknown".to_string()),
    )
}

fn read_value<T: SymbolicNumber>(
    name: &str,
    term: &T,
    model: &Model,
) -> Result<Numeral, SolveError> {
    term.read(model)
        .ok_or_else(|| SolveError::MissingValue(name.to_string()))
}

fn read_solution<T: SymbolicNumber>(
    model: &ConstraintModel<T>,
    solved: &Model,
) -> Result<Solution, SolveError> {
    let unknowns = model.unknowns();
    let mut values = Vec::with_capacity(6);
    for (name, term) in unknowns.free() {
        values.push(read_value(name, term, solved)?);
    }
    let answer = read_value("answer", &unknowns.answer, solved)?;

    Ok(Solution {
        position: [values[0], values[1], values[2]],
        velocity: [values[3], values[4], values[5]],
        answer,
    })
}

/// Ask the solver for a second assignment of the six shared unknowns
///
/// Any `Sat` answer means the reported trajectory is one of several.
fn check_uniqueness<T: SymbolicNumber>(
    model: &ConstraintModel<T>,
    solution: &Solution,
    solver: &Solver,
) -> Result<(), SolveError> {
    let values = solution.position.iter().chain(solution.velocity.iter());
    let mut differs = Vec::with_capacity(6);
    for ((_, term), value) in model.unknowns().free().zip(values) {
        // denominator * term != numerator
        let scaled = T::product(&T::literal(value.denominator()), term);
        differs.push(scaled.equals(&T::literal(value.numerator())).not());
    }

    let refs: Vec<&Bool> = differs.iter().collect();
    solver.assert(&Bool::or(refs.as_slice()));

    match solver.check() {
        SatResult::Unsat => {
            debug!("uniqueness check: no other trajectory");
            Ok(())
        }
        SatResult::Sat => Err(SolveError::NotUnique),
        SatResult::Unknown => Err(unknown(solver)),
    }
}
