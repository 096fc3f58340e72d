//! Pure intersection kernels.
//!
//! All kernels treat boundaries as inclusive: shared-face or shared-edge
//! contact counts as intersecting. None of them allocate except
//! [`face_aabb`], which returns its points inline in a [`SmallVec`].

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use acoustic_types::{Aabb, Face, Real};

/// Intersection points of a triangle clipped to a box, at most two per
/// triangle edge.
pub type IntersectionPoints = SmallVec<[Point3<Real>; 6]>;

/// Projection of the three triangle vertices onto an axis, against the box
/// projection radius. Separated only when strictly outside, so boundary
/// contact intersects.
#[inline]
fn separated_on_axis(
    axis: &Vector3<Real>,
    t0: &Vector3<Real>,
    t1: &Vector3<Real>,
    t2: &Vector3<Real>,
    half: &Vector3<Real>,
) -> bool {
    let p0 = axis.dot(t0);
    let p1 = axis.dot(t1);
    let p2 = axis.dot(t2);
    let r = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
    p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r
}

/// Test a triangle against an AABB with the separating axis theorem.
///
/// Thirteen axes are tested: the three box face normals, the triangle
/// normal, and the nine cross products of box edges with triangle edges.
/// Triangles with exactly zero area never intersect.
///
/// # Example
///
/// ```
/// use acoustic_spatial::triangle_aabb;
/// use acoustic_types::{Aabb, Point3};
///
/// let cell = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
///
/// // A triangle lying in the z = 1 plane grazes the cell's top face
/// let a = Point3::new(0.2, 0.2, 1.0);
/// let b = Point3::new(0.8, 0.2, 1.0);
/// let c = Point3::new(0.2, 0.8, 1.0);
/// assert!(triangle_aabb(&a, &b, &c, &cell));
/// ```
#[must_use]
pub fn triangle_aabb(
    v0: &Point3<Real>,
    v1: &Point3<Real>,
    v2: &Point3<Real>,
    aabb: &Aabb,
) -> bool {
    let center = aabb.center();
    let half = aabb.size() * 0.5;

    // Work in the box's frame
    let t0 = v0 - center;
    let t1 = v1 - center;
    let t2 = v2 - center;

    let e0 = t1 - t0;
    let e1 = t2 - t1;
    let e2 = t0 - t2;

    let normal = e0.cross(&e1);
    if normal.norm_squared() == 0.0 {
        return false;
    }

    // Box face normals
    if t0.x.min(t1.x).min(t2.x) > half.x || t0.x.max(t1.x).max(t2.x) < -half.x {
        return false;
    }
    if t0.y.min(t1.y).min(t2.y) > half.y || t0.y.max(t1.y).max(t2.y) < -half.y {
        return false;
    }
    if t0.z.min(t1.z).min(t2.z) > half.z || t0.z.max(t1.z).max(t2.z) < -half.z {
        return false;
    }

    // Cross products of box edges (the unit axes) with triangle edges
    for e in [&e0, &e1, &e2] {
        let ax = Vector3::new(0.0, -e.z, e.y);
        let ay = Vector3::new(e.z, 0.0, -e.x);
        let az = Vector3::new(-e.y, e.x, 0.0);
        if separated_on_axis(&ax, &t0, &t1, &t2, &half)
            || separated_on_axis(&ay, &t0, &t1, &t2, &half)
            || separated_on_axis(&az, &t0, &t1, &t2, &half)
        {
            return false;
        }
    }

    // Triangle plane against the box
    let r = half.x * normal.x.abs() + half.y * normal.y.abs() + half.z * normal.z.abs();
    normal.dot(&t0).abs() <= r
}

/// Clip a segment to an AABB with the slab method.
///
/// Returns the segment parameters `(t_enter, t_exit)` of the clipped span,
/// both within `[0, 1]`, or `None` when the segment misses the box. A
/// segment grazing a face yields `t_enter == t_exit`.
///
/// # Example
///
/// ```
/// use acoustic_spatial::segment_aabb;
/// use acoustic_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
///
/// let hit = segment_aabb(
///     &Point3::new(-1.0, 0.5, 0.5),
///     &Point3::new(3.0, 0.5, 0.5),
///     &aabb,
/// );
/// assert_eq!(hit, Some((0.25, 0.5)));
/// ```
#[must_use]
pub fn segment_aabb(p0: &Point3<Real>, p1: &Point3<Real>, aabb: &Aabb) -> Option<(Real, Real)> {
    let dir = p1 - p0;
    let mut t_enter: Real = 0.0;
    let mut t_exit: Real = 1.0;

    for axis in 0..3 {
        if dir[axis] == 0.0 {
            // Parallel to this slab; inside or miss
            if p0[axis] < aabb.min[axis] || p0[axis] > aabb.max[axis] {
                return None;
            }
        } else {
            let inv = 1.0 / dir[axis];
            let mut t0 = (aabb.min[axis] - p0[axis]) * inv;
            let mut t1 = (aabb.max[axis] - p0[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }
    }

    Some((t_enter, t_exit))
}

/// Clip a triangle's edges to a box.
///
/// Returns the entry and exit points of each edge span inside the box, up
/// to six points in total. This supports the auxiliary barycentric
/// attribute path; the decomposer itself only needs the boolean
/// [`triangle_aabb`] test.
#[must_use]
pub fn face_aabb(face: &Face, aabb: &Aabb) -> IntersectionPoints {
    let [p0, p1, p2] = face.positions();
    let mut points = IntersectionPoints::new();

    for (a, b) in [(p0, p1), (p1, p2), (p2, p0)] {
        if let Some((t_enter, t_exit)) = segment_aabb(&a, &b, aabb) {
            let dir = b - a;
            points.push(a + dir * t_enter);
            if t_exit > t_enter {
                points.push(a + dir * t_exit);
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use acoustic_types::{Attribute, Vertex};
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn triangle_inside_box_intersects() {
        let aabb = unit_box();
        assert!(triangle_aabb(
            &Point3::new(0.2, 0.2, 0.2),
            &Point3::new(0.8, 0.2, 0.2),
            &Point3::new(0.2, 0.8, 0.2),
            &aabb,
        ));
    }

    #[test]
    fn triangle_far_away_misses() {
        let aabb = unit_box();
        assert!(!triangle_aabb(
            &Point3::new(5.0, 5.0, 5.0),
            &Point3::new(6.0, 5.0, 5.0),
            &Point3::new(5.0, 6.0, 5.0),
            &aabb,
        ));
    }

    #[test]
    fn triangle_piercing_box_intersects() {
        // Large triangle cutting diagonally through the box, with all
        // vertices outside it
        let aabb = unit_box();
        assert!(triangle_aabb(
            &Point3::new(-1.0, 0.5, -1.0),
            &Point3::new(2.0, 0.5, -1.0),
            &Point3::new(0.5, 0.5, 3.0),
            &aabb,
        ));
    }

    #[test]
    fn triangle_grazing_face_plane_intersects() {
        // Shared-plane contact at z = 1 counts as intersecting
        let aabb = unit_box();
        assert!(triangle_aabb(
            &Point3::new(0.2, 0.2, 1.0),
            &Point3::new(0.8, 0.2, 1.0),
            &Point3::new(0.2, 0.8, 1.0),
            &aabb,
        ));
    }

    #[test]
    fn triangle_touching_corner_intersects() {
        let aabb = unit_box();
        assert!(triangle_aabb(
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 1.0, 1.0),
            &Point3::new(1.0, 2.0, 1.0),
            &aabb,
        ));
    }

    #[test]
    fn triangle_separated_by_edge_axis_misses() {
        // AABB of the triangle overlaps the box, but an edge cross-product
        // axis separates them
        let aabb = unit_box();
        assert!(!triangle_aabb(
            &Point3::new(2.8, -0.5, 0.5),
            &Point3::new(-0.5, 2.8, 0.5),
            &Point3::new(2.8, 2.8, 0.5),
            &aabb,
        ));
    }

    #[test]
    fn degenerate_triangle_never_intersects() {
        let aabb = unit_box();
        assert!(!triangle_aabb(
            &Point3::new(0.2, 0.5, 0.5),
            &Point3::new(0.5, 0.5, 0.5),
            &Point3::new(0.8, 0.5, 0.5),
            &aabb,
        ));
    }

    #[test]
    fn segment_through_box_clips_both_ends() {
        let aabb = unit_box();
        let hit = segment_aabb(
            &Point3::new(-1.0, 0.5, 0.5),
            &Point3::new(3.0, 0.5, 0.5),
            &aabb,
        );
        let (enter, exit) = hit.unwrap();
        assert_relative_eq!(enter, 0.25);
        assert_relative_eq!(exit, 0.5);
    }

    #[test]
    fn segment_inside_box_keeps_full_span() {
        let aabb = unit_box();
        let hit = segment_aabb(
            &Point3::new(0.2, 0.2, 0.2),
            &Point3::new(0.8, 0.8, 0.8),
            &aabb,
        );
        assert_eq!(hit, Some((0.0, 1.0)));
    }

    #[test]
    fn segment_missing_box_is_none() {
        let aabb = unit_box();
        assert!(segment_aabb(
            &Point3::new(2.0, 2.0, 2.0),
            &Point3::new(3.0, 2.0, 2.0),
            &aabb,
        )
        .is_none());
    }

    #[test]
    fn segment_grazing_face_hits() {
        // Runs along the x = 1 face
        let aabb = unit_box();
        let hit = segment_aabb(
            &Point3::new(1.0, 0.2, 0.5),
            &Point3::new(1.0, 0.8, 0.5),
            &aabb,
        );
        assert_eq!(hit, Some((0.0, 1.0)));
    }

    #[test]
    fn face_aabb_clips_crossing_triangle() {
        // Only the long edge crosses the box; it is clipped to x = 0 and
        // x = 1 (power-of-two coordinates keep the clip arithmetic exact)
        let aabb = unit_box();
        let face = Face::new(
            Vertex::new(Point3::new(-1.0, 0.5, 0.5), Attribute::SOLID),
            Vertex::new(Point3::new(3.0, 0.5, 0.5), Attribute::SOLID),
            Vertex::new(Point3::new(0.5, 0.5, 2.0), Attribute::SOLID),
        );
        let points = face_aabb(&face, &aabb);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], Point3::new(0.0, 0.5, 0.5));
        assert_eq!(points[1], Point3::new(1.0, 0.5, 0.5));
        for p in &points {
            assert!(aabb.contains(p), "clipped point {p:?} escaped the box");
        }
    }

    #[test]
    fn face_aabb_of_distant_triangle_is_empty() {
        let aabb = unit_box();
        let face = Face::new(
            Vertex::from_coords(5.0, 5.0, 5.0),
            Vertex::from_coords(6.0, 5.0, 5.0),
            Vertex::from_coords(5.0, 6.0, 5.0),
        );
        assert!(face_aabb(&face, &aabb).is_empty());
    }

    #[test]
    fn face_aabb_interior_triangle_keeps_edge_endpoints() {
        let aabb = unit_box();
        let face = Face::new(
            Vertex::from_coords(0.2, 0.2, 0.2),
            Vertex::from_coords(0.8, 0.2, 0.2),
            Vertex::from_coords(0.2, 0.8, 0.2),
        );
        let points = face_aabb(&face, &aabb);
        assert_eq!(points.len(), 6);
    }
}
