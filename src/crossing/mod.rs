//! Pairwise path crossings in the X/Y plane
//!
//! Ignores Z and asks, for every unordered pair of hailstones, whether their
//! future paths cross inside a square test area. Everything is exact checked
//! `i128` arithmetic: the crossing point is kept as a fraction over the velocity
//! cross product, and a pair whose products leave `i128` is an error.

use log::debug;
use thiserror::Error;

use crate::hailstone::Hailstone;

/// Lower edge of the puzzle's test area
pub const DEFAULT_AREA_MIN: i64 = 200_000_000_000_000;
/// Upper edge of the puzzle's test area
pub const DEFAULT_AREA_MAX: i64 = 400_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossingError {
    #[error("crossing of '{first}' and '{second}' overflows exact arithmetic")]
    Overflow { first: Hailstone, second: Hailstone },
}

/// Where two paths cross, as `numerator / denominator` with a positive denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub x_numerator: i128,
    pub y_numerator: i128,
    pub denominator: i128,
}

impl Crossing {
    /// None when scaling the window edges by the denominator overflows
    fn within(&self, min: i64, max: i64) -> Option<bool> {
        let lo = i128::from(min).checked_mul(self.denominator)?;
        let hi = i128::from(max).checked_mul(self.denominator)?;
        Some((lo..=hi).contains(&self.x_numerator) && (lo..=hi).contains(&self.y_numerator))
    }
}

fn cross(ax: i128, ay: i128, bx: i128, by: i128) -> Option<i128> {
    ax.checked_mul(by)?.checked_sub(ay.checked_mul(bx)?)
}

fn crossing_parts(a: &Hailstone, b: &Hailstone) -> Option<Option<Crossing>> {
    let (apx, apy) = (i128::from(a.position.x), i128::from(a.position.y));
    let (avx, avy) = (i128::from(a.velocity.x), i128::from(a.velocity.y));
    let (bpx, bpy) = (i128::from(b.position.x), i128::from(b.position.y));
    let (bvx, bvy) = (i128::from(b.velocity.x), i128::from(b.velocity.y));

    let mut det = cross(avx, avy, bvx, bvy)?;
    if det == 0 {
        return Some(None);
    }

    let (dx, dy) = (bpx - apx, bpy - apy);
    // Times at the crossing are t_a = ta / det and t_b = tb / det
    let mut ta = cross(dx, dy, bvx, bvy)?;
    let mut tb = cross(dx, dy, avx, avy)?;
    if det < 0 {
        det = det.checked_neg()?;
        ta = ta.checked_neg()?;
        tb = tb.checked_neg()?;
    }
    if ta < 0 || tb < 0 {
        return Some(None);
    }

    Some(Some(Crossing {
        x_numerator: apx.checked_mul(det)?.checked_add(ta.checked_mul(avx)?)?,
        y_numerator: apy.checked_mul(det)?.checked_add(ta.checked_mul(avy)?)?,
        denominator: det,
    }))
}

fn overflow(a: &Hailstone, b: &Hailstone) -> CrossingError {
    CrossingError::Overflow {
        first: *a,
        second: *b,
    }
}

/// The crossing of two future X/Y paths, if they cross at non-negative times
///
/// Parallel paths (collinear ones included) never count as a crossing.
pub fn crossing_2d(a: &Hailstone, b: &Hailstone) -> Result<Option<Crossing>, CrossingError> {
    crossing_parts(a, b).ok_or_else(|| overflow(a, b))
}

/// Count pairs whose future X/Y paths cross inside `[min, max]` on both axes
pub fn count_crossings_2d(
    hailstones: &[Hailstone],
    min: i64,
    max: i64,
) -> Result<usize, CrossingError> {
    let mut count = 0;
    for (i, a) in hailstones.iter().enumerate() {
        for b in &hailstones[i + 1..] {
            let Some(crossing) = crossing_2d(a, b)? else {
                continue;
            };
            if crossing.within(min, max).ok_or_else(|| overflow(a, b))? {
                count += 1;
            }
        }
    }
    debug!(
        "{} of {} pairs cross inside [{}, {}]",
        count,
        hailstones.len() * hailstones.len().saturating_sub(1) / 2,
        min,
        max
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hailstone::Vec3;
    use crate::parser::parse_hailstones;

    fn stone(p: [i64; 3], v: [i64; 3]) -> Hailstone {
        Hailstone::new(Vec3::new(p[0], p[1], p[2]), Vec3::new(v[0], v[1], v[2]))
    }

    #[test]
    fn test_example_window() {
        let stones = parse_hailstones(include_str!("../../demos/example.txt")).unwrap();
        assert_eq!(count_crossings_2d(&stones, 7, 27), Ok(2));
    }

    #[test]
    fn test_crossing_point() {
        // 19, 13 @ -2, 1 and 18, 19 @ -1, -1 cross at (14.333, 15.333)
        let a = stone([19, 13, 30], [-2, 1, -2]);
        let b = stone([18, 19, 22], [-1, -1, -2]);
        let c = crossing_2d(&a, &b).unwrap().unwrap();
        assert_eq!(c.x_numerator * 3, 43 * c.denominator);
        assert_eq!(c.y_numerator * 3, 46 * c.denominator);
    }

    #[test]
    fn test_crossing_in_the_past() {
        // 19, 13 @ -2, 1 and 20, 19 @ 1, -5 crossed before t = 0 for the first stone
        let a = stone([19, 13, 30], [-2, 1, -2]);
        let b = stone([20, 19, 15], [1, -5, -3]);
        assert_eq!(crossing_2d(&a, &b), Ok(None));
    }

    #[test]
    fn test_parallel_paths() {
        // 18, 19 @ -1, -1 and 20, 25 @ -2, -2 never cross
        let a = stone([18, 19, 22], [-1, -1, -2]);
        let b = stone([20, 25, 34], [-2, -2, -4]);
        assert_eq!(crossing_2d(&a, &b), Ok(None));
    }

    #[test]
    fn test_crossing_outside_window() {
        // 19, 13 @ -2, 1 and 12, 31 @ -1, -2 cross at (6.2, 19.4)
        let a = stone([19, 13, 30], [-2, 1, -2]);
        let b = stone([12, 31, 28], [-1, -2, -1]);
        let c = crossing_2d(&a, &b).unwrap().unwrap();
        assert_eq!(c.within(7, 27), Some(false));
        assert_eq!(c.within(6, 27), Some(true));
    }

    #[test]
    fn test_large_coordinates_do_not_overflow() {
        let a = stone([200_000_000_000_000, 200_000_000_000_000, 0], [300, 300, 0]);
        let b = stone([400_000_000_000_000, 200_000_000_000_000, 0], [-300, 300, 0]);
        let c = crossing_2d(&a, &b).unwrap().unwrap();
        assert_eq!(c.within(DEFAULT_AREA_MIN, DEFAULT_AREA_MAX), Some(true));
        assert_eq!(
            count_crossings_2d(&[a, b], DEFAULT_AREA_MIN, DEFAULT_AREA_MAX),
            Ok(1)
        );
    }

    #[test]
    fn test_extreme_coordinates_report_overflow() {
        let a = stone([i64::MAX, 0, 0], [-i64::MAX, i64::MAX, 0]);
        let b = stone([i64::MIN, 0, 0], [i64::MAX, i64::MAX, 0]);
        assert_eq!(
            crossing_2d(&a, &b),
            Err(CrossingError::Overflow {
                first: a,
                second: b
            })
        );
        assert!(count_crossings_2d(&[a, b], i64::MIN, i64::MAX).is_err());
    }

    #[test]
    fn test_window_scaling_overflow_is_reported() {
        // The paths meet at (1, 1) over a denominator of 2 * (2^62)^2 = 2^125
        let big = 1_i64 << 62;
        let a = stone([0, 0, 0], [big, big, 0]);
        let b = stone([2, 0, 0], [-big, big, 0]);
        let c = crossing_2d(&a, &b).unwrap().unwrap();
        assert_eq!(c.denominator, 1_i128 << 125);
        assert_eq!(c.within(0, 1), Some(true));
        assert_eq!(c.within(i64::MIN, i64::MAX), None);
        assert!(count_crossings_2d(&[a, b], i64::MIN, i64::MAX).is_err());
    }
}
