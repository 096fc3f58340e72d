//! Attributed mesh primitives.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, Attribute, Real};

/// A mesh vertex: a position with its acoustic attribute.
///
/// # Example
///
/// ```
/// use acoustic_types::{Attribute, Point3, Vertex};
///
/// let v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Attribute::AIR);
/// assert_eq!(v.attr, Attribute::AIR);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<Real>,
    /// Acoustic attribute.
    pub attr: Attribute,
}

impl Vertex {
    /// Create a vertex from a position and an attribute.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<Real>, attr: Attribute) -> Self {
        Self { position, attr }
    }

    /// Create a vertex from raw coordinates with the default (solid)
    /// attribute.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: Real, y: Real, z: Real) -> Self {
        Self::new(Point3::new(x, y, z), Attribute::SOLID)
    }
}

/// A triangular mesh face with resolved, attributed vertices.
///
/// Winding is counter-clockwise when viewed from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// The three vertices of the triangle.
    pub vertices: [Vertex; 3],
}

impl Face {
    /// Create a face from three vertices.
    #[inline]
    #[must_use]
    pub const fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// The three vertex positions.
    #[inline]
    #[must_use]
    pub const fn positions(&self) -> [Point3<Real>; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }

    /// Bounding box of the triangle.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        let [a, b, c] = self.positions();
        let mut aabb = Aabb::from_point(a);
        aabb.expand_to_include(&b);
        aabb.expand_to_include(&c);
        aabb
    }

    /// Check whether the triangle has exactly zero area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.positions();
        let n = (b - a).cross(&(c - a));
        n.norm_squared() == 0.0
    }

    /// Interpolate the vertex attributes at a point via barycentric
    /// coordinates.
    ///
    /// The point is projected onto the triangle's plane first; the weights
    /// are not clamped, so points outside the triangle extrapolate.
    /// Returns `None` for degenerate triangles.
    ///
    /// # Example
    ///
    /// ```
    /// use acoustic_types::{Attribute, Face, Point3, Vertex};
    ///
    /// let face = Face::new(
    ///     Vertex::new(Point3::new(0.0, 0.0, 0.0), Attribute::SOLID),
    ///     Vertex::new(Point3::new(1.0, 0.0, 0.0), Attribute::SOLID),
    ///     Vertex::new(Point3::new(0.0, 1.0, 0.0), Attribute::SOLID),
    /// );
    ///
    /// // At a vertex the interpolation reproduces that vertex's attribute
    /// let attr = face.attribute_at(&Point3::new(0.0, 0.0, 0.0)).unwrap();
    /// assert_eq!(attr, Attribute::SOLID);
    /// ```
    #[must_use]
    pub fn attribute_at(&self, point: &Point3<Real>) -> Option<Attribute> {
        let [p0, p1, p2] = self.positions();
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let ep = point - p0;

        let d11 = e1.dot(&e1);
        let d12 = e1.dot(&e2);
        let d22 = e2.dot(&e2);
        let dp1 = ep.dot(&e1);
        let dp2 = ep.dot(&e2);

        let denom = d11 * d22 - d12 * d12;
        if denom == 0.0 {
            return None;
        }

        let v = (d22 * dp1 - d12 * dp2) / denom;
        let w = (d11 * dp2 - d12 * dp1) / denom;
        let u = 1.0 - v - w;

        let [a0, a1, a2] = [
            self.vertices[0].attr,
            self.vertices[1].attr,
            self.vertices[2].attr,
        ];
        Some(Attribute::new(
            u * a0.reflection + v * a1.reflection + w * a2.reflection,
            u * a0.transmission + v * a1.transmission + w * a2.transmission,
            u * a0.absorption + v * a1.absorption + w * a2.absorption,
        ))
    }
}
