//! Region-growing decomposition strategies.

use nalgebra::Vector3;

use acoustic_spatial::Octree;
use acoustic_types::{Aabb, Real};

use crate::{cells, evaluate_cell, Medium, MediumDefinition, MediumError};

/// A medium decomposition algorithm.
///
/// Strategies turn the grid cells inside the medium boundary into
/// partitions. Implementations must keep partitions interior-disjoint and
/// inside the boundary; the systematic strategy additionally guarantees
/// full cell coverage.
pub trait DecompositionStrategy {
    /// Decompose the medium's boundary volume against the given octree.
    ///
    /// # Errors
    ///
    /// Returns [`MediumError::OutOfMemory`] when the partition set or the
    /// internal work lists cannot grow.
    fn decompose(
        &self,
        medium: &mut Medium,
        octree: &Octree<'_>,
        definition: Option<&MediumDefinition>,
    ) -> Result<(), MediumError>;
}

/// The six axis directions a seed can grow in.
///
/// Up/Down step along y, Left/Right along x, Front/Back along z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
    Front,
    Back,
}

impl Direction {
    const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Front,
        Self::Back,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

const ALL_DIRECTIONS: u8 = 0x3f;

/// The one-grid-layer-thick box adjacent to `seed` in `direction`.
fn adjacent_slice(seed: &Aabb, grid: &Vector3<Real>, direction: Direction) -> Aabb {
    let mut slice = *seed;
    match direction {
        Direction::Up => {
            slice.min.y = seed.max.y;
            slice.max.y = seed.max.y + grid.y;
        }
        Direction::Down => {
            slice.min.y = seed.min.y - grid.y;
            slice.max.y = seed.min.y;
        }
        Direction::Left => {
            slice.min.x = seed.min.x - grid.x;
            slice.max.x = seed.min.x;
        }
        Direction::Right => {
            slice.min.x = seed.max.x;
            slice.max.x = seed.max.x + grid.x;
        }
        Direction::Front => {
            slice.min.z = seed.min.z - grid.z;
            slice.max.z = seed.min.z;
        }
        Direction::Back => {
            slice.min.z = seed.max.z;
            slice.max.z = seed.max.z + grid.z;
        }
    }
    slice
}

/// Region growing from the boundary's minimum corner.
///
/// Each seed cell expands one grid layer at a time in all six directions
/// until every direction is blocked by the boundary, an existing partition
/// or a cell of different attribute; the expanded box is committed as a
/// partition, and the differing cells seen along the way become the seeds
/// of new partitions linked to it. Termination is bounded by the total
/// cell count: every committed partition exclusively covers at least its
/// own seed cell, and covered candidates are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystematicDecomposition;

impl DecompositionStrategy for SystematicDecomposition {
    fn decompose(
        &self,
        medium: &mut Medium,
        octree: &Octree<'_>,
        _definition: Option<&MediumDefinition>,
    ) -> Result<(), MediumError> {
        // Start at the bottom, left, front corner
        let boundary = *medium.boundary();
        let seed = Aabb::new(boundary.min, boundary.min + medium.grid_size());

        // LIFO work stack; candidates are pushed in reverse so they pop in
        // recorded order, reproducing depth-first spawning
        let mut pending: Vec<(Aabb, Option<usize>)> = vec![(seed, None)];
        while let Some((seed, parent)) = pending.pop() {
            // A sibling committed earlier may have covered this candidate
            if parent.is_some() && medium.is_occupied(&seed) {
                continue;
            }
            grow_seed(medium, octree, seed, parent, &mut pending)?;
        }
        Ok(())
    }
}

/// Expand one seed to a maximal box, commit it and queue the differing
/// cells found on its perimeter.
fn grow_seed(
    medium: &mut Medium,
    octree: &Octree<'_>,
    mut seed: Aabb,
    parent: Option<usize>,
    pending: &mut Vec<(Aabb, Option<usize>)>,
) -> Result<(), MediumError> {
    let grid = medium.grid_size();
    let seed_attr = evaluate_cell(octree, &seed);
    let mut candidates: Vec<Aabb> = Vec::new();

    // Fixed point over the six directions. Flags reset every pass, so a
    // direction blocked by differing cells is retested once the seed has
    // grown along another axis and its perimeter there widened; the loop
    // ends on a pass that blocks all six without merging anything.
    loop {
        let mut occupied: u8 = 0;
        for direction in Direction::ALL {
            let slice = adjacent_slice(&seed, &grid, direction);
            if medium.is_occupied(&slice) {
                occupied |= direction.bit();
                continue;
            }

            // The slice merges only if every cell in it matches the seed;
            // each differing cell is a potential new seed
            let mut matches_seed = true;
            for cell in cells(&slice, grid) {
                if evaluate_cell(octree, &cell) != seed_attr {
                    candidates
                        .try_reserve(1)
                        .map_err(|_| MediumError::OutOfMemory)?;
                    candidates.push(cell);
                    matches_seed = false;
                }
            }

            if matches_seed {
                seed.expand_to_include_aabb(&slice);
            } else {
                occupied |= direction.bit();
            }
        }
        if occupied == ALL_DIRECTIONS {
            break;
        }
    }

    debug_assert!(
        medium
            .partitions()
            .iter()
            .all(|p| !p.aabb.intersects_interior(&seed)),
        "committed partition overlaps an existing one"
    );

    // Clamping covers the degenerate case of a boundary smaller than one
    // grid cell, where the initial seed pokes past it
    let index = medium.add_partition(seed.intersection(medium.boundary()), 1.0)?;
    if let Some(parent) = parent {
        medium.link_adjacent(parent, index)?;
    }

    pending
        .try_reserve(candidates.len())
        .map_err(|_| MediumError::OutOfMemory)?;
    for candidate in candidates.into_iter().rev() {
        pending.push((candidate, Some(index)));
    }
    Ok(())
}

/// Reserved strategy: a greedy decomposition from randomized seeds.
///
/// Currently a stub that succeeds without producing partitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyRandomDecomposition;

impl DecompositionStrategy for GreedyRandomDecomposition {
    fn decompose(
        &self,
        _medium: &mut Medium,
        _octree: &Octree<'_>,
        _definition: Option<&MediumDefinition>,
    ) -> Result<(), MediumError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn grid() -> Vector3<Real> {
        Vector3::new(0.5, 0.5, 0.5)
    }

    fn seed() -> Aabb {
        Aabb::new(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 1.5, 3.0))
    }

    #[test]
    fn slice_up_down_step_y() {
        let up = adjacent_slice(&seed(), &grid(), Direction::Up);
        assert_eq!(up.min, Point3::new(1.0, 1.5, 1.0));
        assert_eq!(up.max, Point3::new(2.0, 2.0, 3.0));

        let down = adjacent_slice(&seed(), &grid(), Direction::Down);
        assert_eq!(down.min, Point3::new(1.0, 0.5, 1.0));
        assert_eq!(down.max, Point3::new(2.0, 1.0, 3.0));
    }

    #[test]
    fn slice_left_right_step_x() {
        let left = adjacent_slice(&seed(), &grid(), Direction::Left);
        assert_eq!(left.min, Point3::new(0.5, 1.0, 1.0));
        assert_eq!(left.max, Point3::new(1.0, 1.5, 3.0));

        let right = adjacent_slice(&seed(), &grid(), Direction::Right);
        assert_eq!(right.min, Point3::new(2.0, 1.0, 1.0));
        assert_eq!(right.max, Point3::new(2.5, 1.5, 3.0));
    }

    #[test]
    fn slice_front_back_step_z() {
        let front = adjacent_slice(&seed(), &grid(), Direction::Front);
        assert_eq!(front.min, Point3::new(1.0, 1.0, 0.5));
        assert_eq!(front.max, Point3::new(2.0, 1.5, 1.0));

        let back = adjacent_slice(&seed(), &grid(), Direction::Back);
        assert_eq!(back.min, Point3::new(1.0, 1.0, 3.0));
        assert_eq!(back.max, Point3::new(2.0, 1.5, 3.5));
    }

    #[test]
    fn slice_keeps_other_axes() {
        let up = adjacent_slice(&seed(), &grid(), Direction::Up);
        assert_eq!(up.min.x, seed().min.x);
        assert_eq!(up.max.x, seed().max.x);
        assert_eq!(up.min.z, seed().min.z);
        assert_eq!(up.max.z, seed().max.z);
    }

    #[test]
    fn direction_bits_are_distinct() {
        let mut mask = 0u8;
        for direction in Direction::ALL {
            assert_eq!(mask & direction.bit(), 0);
            mask |= direction.bit();
        }
        assert_eq!(mask, ALL_DIRECTIONS);
    }
}
