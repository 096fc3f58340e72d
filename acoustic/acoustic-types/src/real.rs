//! Scalar precision selection and position hashing.

use nalgebra::Point3;

/// Geometric scalar used throughout the workspace.
///
/// 32-bit when the `f32` feature is enabled.
#[cfg(feature = "f32")]
pub type Real = f32;

/// Geometric scalar used throughout the workspace.
///
/// 64-bit by default; enable the `f32` feature to narrow it.
#[cfg(not(feature = "f32"))]
pub type Real = f64;

/// Machine epsilon of [`Real`].
pub const EPS: Real = Real::EPSILON;

/// Bit-exact hash key for a position.
///
/// Two positions produce the same key iff their coordinates are bitwise
/// equal. Widening to `f64` is exact for both scalar widths, so the key
/// layout does not depend on the `f32` feature.
///
/// # Example
///
/// ```
/// use acoustic_types::{position_key, Point3};
///
/// let a = Point3::new(1.0, 2.0, 3.0);
/// let b = Point3::new(1.0, 2.0, 3.0);
/// assert_eq!(position_key(&a), position_key(&b));
/// assert_ne!(position_key(&a), position_key(&Point3::new(3.0, 2.0, 1.0)));
/// ```
#[must_use]
pub fn position_key(point: &Point3<Real>) -> [u64; 3] {
    [
        f64::from(point.x).to_bits(),
        f64::from(point.y).to_bits(),
        f64::from(point.z).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_key_distinguishes_signed_zero() {
        let pos = Point3::new(0.0, 0.0, 0.0);
        let neg = Point3::new(-0.0, 0.0, 0.0);
        assert_ne!(position_key(&pos), position_key(&neg));
    }

    #[test]
    fn position_key_equal_for_equal_points() {
        let a = Point3::new(0.25, -7.5, 1e-9);
        let b = Point3::new(0.25, -7.5, 1e-9);
        assert_eq!(position_key(&a), position_key(&b));
    }
}
