//! Grid-cell lattice iterator.

use nalgebra::Vector3;

use acoustic_types::{Aabb, Real, EPS};

/// Relative slack applied when counting cells along an axis, so an extent
/// that is an exact multiple of the cell size up to rounding still yields
/// the full count.
const COUNT_SLACK: Real = 4.0 * EPS;

/// Iterate the axis-aligned lattice of cells tiling `extents`.
///
/// Cells are emitted in raster order with z innermost, then y, then x.
/// Each axis holds `floor(extent / size)` cells (with numerical slack), so
/// a trailing fraction of a cell is not emitted. Every emitted cell
/// satisfies `cell.min >= extents.min` and `cell.min + size <= extents.max`
/// up to rounding.
///
/// Empty extents or a non-positive cell size yield an empty iterator.
///
/// # Example
///
/// ```
/// use acoustic_medium::cells;
/// use acoustic_types::{Aabb, Point3, Vector3};
///
/// let extents = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// let grid = Vector3::new(0.5, 0.5, 0.5);
///
/// let all: Vec<_> = cells(&extents, grid).collect();
/// assert_eq!(all.len(), 8);
/// assert_eq!(all[0].min, Point3::new(0.0, 0.0, 0.0));
/// // z advances first
/// assert_eq!(all[1].min, Point3::new(0.0, 0.0, 0.5));
/// ```
#[must_use]
pub fn cells(extents: &Aabb, cell_size: Vector3<Real>) -> CellIter {
    let counts = if extents.is_empty()
        || !(cell_size.x > 0.0 && cell_size.y > 0.0 && cell_size.z > 0.0)
    {
        [0, 0, 0]
    } else {
        let size = extents.size();
        [
            axis_count(size.x, cell_size.x),
            axis_count(size.y, cell_size.y),
            axis_count(size.z, cell_size.z),
        ]
    };

    CellIter {
        origin: *extents,
        cell_size,
        counts,
        cursor: [0, 0, 0],
        done: counts.iter().any(|&c| c == 0),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// The ratio is non-negative and a cell count that overflows usize is
// unreachable before memory does
fn axis_count(extent: Real, size: Real) -> usize {
    let ratio = extent / size;
    (ratio * (1.0 + COUNT_SLACK)).floor() as usize
}

/// Iterator over the cells of a grid lattice. Created by [`cells`].
#[derive(Debug, Clone)]
pub struct CellIter {
    origin: Aabb,
    cell_size: Vector3<Real>,
    counts: [usize; 3],
    cursor: [usize; 3],
    done: bool,
}

impl CellIter {
    #[allow(clippy::cast_precision_loss)]
    // Cell counts stay far below the mantissa width
    fn cell_at(&self, cursor: [usize; 3]) -> Aabb {
        let min = nalgebra::Point3::new(
            self.origin.min.x + cursor[0] as Real * self.cell_size.x,
            self.origin.min.y + cursor[1] as Real * self.cell_size.y,
            self.origin.min.z + cursor[2] as Real * self.cell_size.z,
        );
        Aabb::new(min, min + self.cell_size)
    }
}

impl Iterator for CellIter {
    type Item = Aabb;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.cursor;

        // Advance z, then y, then x
        self.cursor[2] += 1;
        if self.cursor[2] == self.counts[2] {
            self.cursor[2] = 0;
            self.cursor[1] += 1;
            if self.cursor[1] == self.counts[1] {
                self.cursor[1] = 0;
                self.cursor[0] += 1;
                if self.cursor[0] == self.counts[0] {
                    self.done = true;
                }
            }
        }

        Some(self.cell_at(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.done {
            0
        } else {
            let per_x = self.counts[1] * self.counts[2];
            (self.counts[0] - self.cursor[0]) * per_x
                - self.cursor[1] * self.counts[2]
                - self.cursor[2]
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn extents(max: (Real, Real, Real)) -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(max.0, max.1, max.2))
    }

    #[test]
    fn unit_extent_single_cell() {
        let all: Vec<_> = cells(&extents((1.0, 1.0, 1.0)), Vector3::new(1.0, 1.0, 1.0)).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(all[0].max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn raster_order_z_innermost() {
        let all: Vec<_> = cells(&extents((1.0, 1.0, 1.0)), Vector3::new(0.5, 0.5, 0.5)).collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0].min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(all[1].min, Point3::new(0.0, 0.0, 0.5));
        assert_eq!(all[2].min, Point3::new(0.0, 0.5, 0.0));
        assert_eq!(all[4].min, Point3::new(0.5, 0.0, 0.0));
        assert_eq!(all[7].min, Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn trailing_fraction_is_dropped() {
        // 1.25 / 0.5 = 2.5 cells: only two whole cells fit
        let all: Vec<_> =
            cells(&extents((1.25, 0.5, 0.5)), Vector3::new(0.5, 0.5, 0.5)).collect();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn non_power_of_two_grid_keeps_full_count() {
        // 0.3 / 0.1 lands just under 3 in binary; the slack keeps the
        // third cell
        let all: Vec<_> = cells(&extents((0.3, 0.1, 0.1)), Vector3::new(0.1, 0.1, 0.1)).collect();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn extent_smaller_than_cell_is_empty() {
        let all: Vec<_> = cells(&extents((0.4, 1.0, 1.0)), Vector3::new(0.5, 0.5, 0.5)).collect();
        assert!(all.is_empty());
    }

    #[test]
    fn empty_extents_yield_nothing() {
        let mut iter = cells(&Aabb::empty(), Vector3::new(0.5, 0.5, 0.5));
        assert!(iter.next().is_none());
    }

    #[test]
    fn non_positive_cell_size_yields_nothing() {
        let e = extents((1.0, 1.0, 1.0));
        assert_eq!(cells(&e, Vector3::new(0.0, 0.5, 0.5)).count(), 0);
        assert_eq!(cells(&e, Vector3::new(0.5, -0.5, 0.5)).count(), 0);
    }

    #[test]
    fn exact_size_iterator_tracks_remaining() {
        let mut iter = cells(&extents((1.0, 1.0, 1.0)), Vector3::new(0.5, 0.5, 0.5));
        assert_eq!(iter.len(), 8);
        iter.next();
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.by_ref().count(), 5);
    }

    #[test]
    fn cells_stay_within_extents() {
        let e = extents((2.0, 1.5, 1.0));
        for cell in cells(&e, Vector3::new(0.5, 0.5, 0.5)) {
            assert!(cell.min.x >= e.min.x && cell.max.x <= e.max.x + 1e-9);
            assert!(cell.min.y >= e.min.y && cell.max.y <= e.max.y + 1e-9);
            assert!(cell.min.z >= e.min.z && cell.max.z <= e.max.z + 1e-9);
        }
    }
}
