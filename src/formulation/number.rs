//! Numeric values and the symbolic-number seam over Z3 sorts
//!
//! The builder is written once against [`SymbolicNumber`]; `Real` and `Int`
//! implement it, which is how the numeric domain becomes a parameter.

use std::fmt;

use z3::Model;
use z3::ast::{Bool, Int, Real};

use super::config::NumericDomain;

/// An exact rational value read back from a solver model
///
/// Always reduced, with a positive denominator. Z3 hands back `i64` parts, so
/// that is the width kept here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Numeral {
    numerator: i64,
    denominator: i64,
}

fn gcd(a: i64, b: i64) -> u64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

impl Numeral {
    pub const fn integer(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    /// Build `numerator / denominator` in lowest terms
    ///
    /// None for a zero denominator, or when the reduced value has no `i64`
    /// form with a positive denominator (e.g. `1 / i64::MIN`).
    pub fn ratio(numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        // Reduce in i128: the gcd of two i64 values can be 2^63
        let g = i128::from(gcd(numerator, denominator));
        let sign = if denominator < 0 { -1 } else { 1 };
        Some(Self {
            numerator: i64::try_from(sign * i128::from(numerator) / g).ok()?,
            denominator: i64::try_from(sign * i128::from(denominator) / g).ok()?,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        let numerator = self
            .numerator
            .checked_mul(other.denominator)?
            .checked_add(other.numerator.checked_mul(self.denominator)?)?;
        let denominator = self.denominator.checked_mul(other.denominator)?;
        Self::ratio(numerator, denominator)
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Operations the constraint builder needs from a Z3 numeric sort
pub trait SymbolicNumber: Clone {
    /// Domain this sort represents
    const DOMAIN: NumericDomain;

    /// Declare a named unknown
    fn declare(name: &str) -> Self;

    /// An integer literal of this sort
    fn literal(value: i64) -> Self;

    fn sum(lhs: &Self, rhs: &Self) -> Self;

    fn difference(lhs: &Self, rhs: &Self) -> Self;

    fn product(lhs: &Self, rhs: &Self) -> Self;

    /// Division; the caller must guard against a zero divisor
    fn quotient(lhs: &Self, rhs: &Self) -> Self;

    fn equals(&self, other: &Self) -> Bool;

    fn at_least(&self, other: &Self) -> Bool;

    fn greater_than(&self, other: &Self) -> Bool;

    /// Read this term's value out of a model
    fn read(&self, model: &Model) -> Option<Numeral>;
}

impl SymbolicNumber for Real {
    const DOMAIN: NumericDomain = NumericDomain::Real;

    fn declare(name: &str) -> Self {
        Real::new_const(name)
    }

    fn literal(value: i64) -> Self {
        Real::from_int(&Int::from_i64(value))
    }

    fn sum(lhs: &Self, rhs: &Self) -> Self {
        Real::add(&[lhs, rhs])
    }

    fn difference(lhs: &Self, rhs: &Self) -> Self {
        Real::sub(&[lhs, rhs])
    }

    fn product(lhs: &Self, rhs: &Self) -> Self {
        Real::mul(&[lhs, rhs])
    }

    fn quotient(lhs: &Self, rhs: &Self) -> Self {
        lhs.div(rhs)
    }

    fn equals(&self, other: &Self) -> Bool {
        self.eq(other)
    }

    fn at_least(&self, other: &Self) -> Bool {
        self.ge(other)
    }

    fn greater_than(&self, other: &Self) -> Bool {
        self.gt(other)
    }

    fn read(&self, model: &Model) -> Option<Numeral> {
        let (numerator, denominator) = model.eval(self, true)?.as_real()?;
        Numeral::ratio(
            i64::try_from(numerator).ok()?,
            i64::try_from(denominator).ok()?,
        )
    }
}

impl SymbolicNumber for Int {
    const DOMAIN: NumericDomain = NumericDomain::Integer;

    fn declare(name: &str) -> Self {
        Int::new_const(name)
    }

    fn literal(value: i64) -> Self {
        Int::from_i64(value)
    }

    fn sum(lhs: &Self, rhs: &Self) -> Self {
        Int::add(&[lhs, rhs])
    }

    fn difference(lhs: &Self, rhs: &Self) -> Self {
        Int::sub(&[lhs, rhs])
    }

    fn product(lhs: &Self, rhs: &Self) -> Self {
        Int::mul(&[lhs, rhs])
    }

    fn quotient(lhs: &Self, rhs: &Self) -> Self {
        lhs.div(rhs)
    }

    fn equals(&self, other: &Self) -> Bool {
        self.eq(other)
    }

    fn at_least(&self, other: &Self) -> Bool {
        self.ge(other)
    }

    fn greater_than(&self, other: &Self) -> Bool {
        self.gt(other)
    }

    fn read(&self, model: &Model) -> Option<Numeral> {
        let value = model.eval(self, true)?.as_i64()?;
        Some(Numeral::integer(value))
    }
}
