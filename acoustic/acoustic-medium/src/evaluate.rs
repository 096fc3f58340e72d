//! Cell-attribute evaluation.

use acoustic_spatial::{triangle_aabb, Octree};
use acoustic_types::{Aabb, Attribute};

/// Compute the interpolated acoustic attribute of a grid cell.
///
/// Candidate faces come from the octree and are filtered with the precise
/// triangle test. The attributes of the surviving triangles' vertices are
/// then blended with Shepard's method (inverse-distance weighting, p = 2)
/// against the cell center: smooth where several faces meet, and exact on
/// top of a vertex, which short-circuits to that vertex's attribute.
///
/// A cell no face intersects is assumed to be [`Attribute::AIR`], so holes
/// in a mesh stay navigable for the wave front.
///
/// # Example
///
/// ```
/// use acoustic_medium::evaluate_cell;
/// use acoustic_spatial::Octree;
/// use acoustic_types::{unit_cube, Aabb, Attribute, Point3, Vector3};
///
/// let mesh = unit_cube();
/// let octree = Octree::build(&mesh, Vector3::new(0.5, 0.5, 0.5)).unwrap();
///
/// // A cell on the cube surface picks up the solid vertex attributes
/// let cell = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.5, 0.5, 0.5));
/// assert_eq!(evaluate_cell(&octree, &cell), Attribute::SOLID);
///
/// // A cell away from the mesh is air
/// let far = Aabb::new(Point3::new(3.0, 3.0, 3.0), Point3::new(3.5, 3.5, 3.5));
/// assert_eq!(evaluate_cell(&octree, &far), Attribute::AIR);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Candidate indices are validated mesh indices
pub fn evaluate_cell(octree: &Octree<'_>, cell: &Aabb) -> Attribute {
    let mesh = octree.mesh();
    let candidates = octree.query_potential_faces(cell);
    let center = cell.center();

    let mut accumulated = Attribute::ZERO;
    let mut weight_sum = 0.0;

    for triple in candidates.chunks_exact(3) {
        let v0 = mesh.vertex(triple[0] as usize);
        let v1 = mesh.vertex(triple[1] as usize);
        let v2 = mesh.vertex(triple[2] as usize);

        // The octree only promises a superset; test the face for real
        if !triangle_aabb(&v0.position, &v1.position, &v2.position, cell) {
            continue;
        }

        for vertex in [&v0, &v1, &v2] {
            let distance_sq = (vertex.position - center).norm_squared();
            if distance_sq == 0.0 {
                // Cell center sits on the vertex: its attribute wins outright
                return vertex.attr;
            }
            let weight = 1.0 / distance_sq;
            accumulated.reflection += vertex.attr.reflection * weight;
            accumulated.transmission += vertex.attr.transmission * weight;
            accumulated.absorption += vertex.attr.absorption * weight;
            weight_sum += weight;
        }
    }

    if weight_sum == 0.0 {
        return Attribute::AIR;
    }

    Attribute::new(
        accumulated.reflection / weight_sum,
        accumulated.transmission / weight_sum,
        accumulated.absorption / weight_sum,
    )
    .normalized()
}
