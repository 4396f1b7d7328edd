//! Constraint model for the thrown trajectory
//!
//! Unknowns: the thrown position `(x0, y0, z0)`, the thrown velocity
//! `(a0, b0, c0)`, the derived `answer = x0 + y0 + z0` and one time `t_i` per
//! constrained hailstone. For hailstone `i` the model asserts, per axis,
//! `p0 + t_i * v0 = p_i + t_i * v_i` together with `t_i >= 0`.

use log::{debug, trace};
use z3::ast::Bool;

use super::config::FormulationConfig;
use super::number::SymbolicNumber;
use crate::hailstone::Hailstone;

const POSITION_NAMES: [&str; 3] = ["x0", "y0", "z0"];
const VELOCITY_NAMES: [&str; 3] = ["a0", "b0", "c0"];

/// The shared unknowns of the thrown particle
#[derive(Clone)]
pub struct ThrownUnknowns<T> {
    pub position: [T; 3],
    pub velocity: [T; 3],
    /// Derived `x0 + y0 + z0`
    pub answer: T,
}

impl<T: SymbolicNumber> ThrownUnknowns<T> {
    pub fn declare() -> Self {
        Self {
            position: POSITION_NAMES.map(T::declare),
            velocity: VELOCITY_NAMES.map(T::declare),
            answer: T::declare("answer"),
        }
    }

    /// The six unknowns that carry degrees of freedom, with their names
    pub fn free(&self) -> impl Iterator<Item = (&'static str, &T)> + '_ {
        POSITION_NAMES
            .into_iter()
            .zip(self.position.iter())
            .chain(VELOCITY_NAMES.into_iter().zip(self.velocity.iter()))
    }
}

/// Append-only set of assertions over the registered unknowns
pub struct ConstraintModel<T> {
    unknowns: ThrownUnknowns<T>,
    times: Vec<T>,
    assertions: Vec<Bool>,
    hints: usize,
}

impl<T: SymbolicNumber> ConstraintModel<T> {
    /// An empty model with the thrown unknowns registered
    pub fn new() -> Self {
        Self {
            unknowns: ThrownUnknowns::declare(),
            times: Vec::new(),
            assertions: Vec::new(),
            hints: 0,
        }
    }

    pub fn unknowns(&self) -> &ThrownUnknowns<T> {
        &self.unknowns
    }

    #[cfg(test)]
    pub fn times(&self) -> &[T] {
        &self.times
    }

    pub fn assertions(&self) -> &[Bool] {
        &self.assertions
    }

    /// Number of hailstones constrained so far
    pub fn particle_count(&self) -> usize {
        self.times.len()
    }

    /// Number of quotient hints among the assertions
    pub fn hint_count(&self) -> usize {
        self.hints
    }

    pub fn assert(&mut self, assertion: Bool) {
        self.assertions.push(assertion);
    }

    /// Register a fresh time unknown for the next hailstone
    pub fn declare_time(&mut self) -> T {
        let time = T::declare(&format!("t{}", self.times.len()));
        self.times.push(time.clone());
        time
    }

    fn assert_hint(&mut self, hint: Bool) {
        self.hints += 1;
        self.assert(hint);
    }
}

impl<T: SymbolicNumber> Default for ConstraintModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// `answer = x0 + y0 + z0`
pub fn answer_definition<T: SymbolicNumber>(unknowns: &ThrownUnknowns<T>) -> Bool {
    let [x0, y0, z0] = &unknowns.position;
    unknowns.answer.equals(&T::sum(&T::sum(x0, y0), z0))
}

/// `thrown_position + t * thrown_velocity = position + t * velocity` on one axis
pub fn motion_equation<T: SymbolicNumber>(
    thrown_position: &T,
    thrown_velocity: &T,
    time: &T,
    position: i64,
    velocity: i64,
) -> Bool {
    let thrown = T::sum(thrown_position, &T::product(time, thrown_velocity));
    let stone = T::sum(
        &T::literal(position),
        &T::product(time, &T::literal(velocity)),
    );
    thrown.equals(&stone)
}

/// Solver hint `(p0 - p_i) / (v_i - v0) > 0` on one axis
///
/// The quotient is the collision time, so the hint adds no new restriction.
/// It is guarded so it only speaks when both the offset and the relative
/// velocity are non-zero; a zero divisor never reaches the division.
pub fn quotient_hint<T: SymbolicNumber>(
    thrown_position: &T,
    thrown_velocity: &T,
    position: i64,
    velocity: i64,
) -> Bool {
    let zero = T::literal(0);
    let offset = T::difference(thrown_position, &T::literal(position));
    let divisor = T::difference(&T::literal(velocity), thrown_velocity);

    let guard = Bool::and(&[&offset.equals(&zero).not(), &divisor.equals(&zero).not()]);
    let positive = T::quotient(&offset, &divisor).greater_than(&zero);
    guard.implies(&positive)
}

/// Builds the thrown-trajectory model from parsed hailstones
pub struct ConstraintBuilder<'a> {
    config: &'a FormulationConfig,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(config: &'a FormulationConfig) -> Self {
        Self { config }
    }

    /// Build a fresh model over the considered prefix of `hailstones`
    pub fn build<T: SymbolicNumber>(&self, hailstones: &[Hailstone]) -> ConstraintModel<T> {
        let mut model = ConstraintModel::new();
        let definition = answer_definition(model.unknowns());
        model.assert(definition);

        for hailstone in self.config.considered(hailstones) {
            self.add_hailstone(&mut model, hailstone);
        }

        debug!(
            "built {} model: {} of {} hailstones, {} assertions ({} hints)",
            T::DOMAIN,
            model.particle_count(),
            hailstones.len(),
            model.assertions().len(),
            model.hint_count()
        );
        model
    }

    /// Constrain one hailstone: three motion equations, a non-negative time and,
    /// when enabled, the per-axis quotient hints
    pub fn add_hailstone<T: SymbolicNumber>(
        &self,
        model: &mut ConstraintModel<T>,
        hailstone: &Hailstone,
    ) {
        let time = model.declare_time();
        let unknowns = model.unknowns().clone();
        let position = hailstone.position.components();
        let velocity = hailstone.velocity.components();

        for axis in 0..3 {
            model.assert(motion_equation(
                &unknowns.position[axis],
                &unknowns.velocity[axis],
                &time,
                position[axis],
                velocity[axis],
            ));
        }
        model.assert(time.at_least(&T::literal(0)));

        if self.config.hints_enabled() {
            for axis in 0..3 {
                model.assert_hint(quotient_hint(
                    &unknowns.position[axis],
                    &unknowns.velocity[axis],
                    position[axis],
                    velocity[axis],
                ));
            }
        }
        trace!("constrained hailstone {}: {}", model.particle_count() - 1, hailstone);
    }
}
