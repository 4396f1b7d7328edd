//! Hailstone data model
//!
//! A hailstone moves in a straight line at constant velocity. Both vectors are
//! integral and fixed once parsed.

use std::fmt;

/// Integer 3-D vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Vec3 {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Components in axis order (x, y, z)
    pub fn components(&self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// A particle with an initial position and a constant velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hailstone {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Hailstone {
    pub const fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// Position after `t` time units
    #[cfg(test)]
    pub fn position_at(&self, t: i64) -> Vec3 {
        Vec3 {
            x: self.position.x + t * self.velocity.x,
            y: self.position.y + t * self.velocity.y,
            z: self.position.z + t * self.velocity.z,
        }
    }
}

impl fmt::Display for Hailstone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.position, self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at() {
        let stone = Hailstone::new(Vec3::new(19, 13, 30), Vec3::new(-2, 1, -2));
        assert_eq!(stone.position_at(0), stone.position);
        assert_eq!(stone.position_at(5), Vec3::new(9, 18, 20));
    }

    #[test]
    fn test_display_matches_input_shape() {
        let stone = Hailstone::new(Vec3::new(20, 19, 15), Vec3::new(1, -5, -3));
        assert_eq!(stone.to_string(), "20, 19, 15 @ 1, -5, -3");
    }
}
