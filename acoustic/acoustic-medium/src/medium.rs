//! The decomposed medium: partitions plus adjacency.

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector3;
use tracing::{debug, info, warn};

use acoustic_spatial::Octree;
use acoustic_types::{Aabb, AcousticMesh, Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{cells, DecompositionStrategy, MediumError, SystematicDecomposition};

/// Caller-supplied constraints for building a medium.
///
/// Passed through to the decomposition strategy; when absent, the medium
/// boundary falls back to the mesh bounding box.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MediumDefinition {
    /// The volume to decompose.
    pub boundary: Aabb,
}

/// One axis-aligned region of uniform acoustic attribute.
///
/// Partitions lie inside the medium boundary and are pairwise
/// interior-disjoint; touching on a face is allowed. `adjacent` holds the
/// indices of the partitions spawned from this one, in construction order
/// (a directed parent-to-child edge; the relation is anti-reflexive).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MediumPartition {
    /// The region covered by this partition.
    pub aabb: Aabb,
    /// Speed of sound inside the partition, in grid units per time step.
    pub sound_speed: Real,
    /// Indices of adjacent partitions, parent to child.
    pub adjacent: Vec<usize>,
}

/// The decomposed volume: a boundary, a grid resolution and the partition
/// list produced by a decomposition strategy.
///
/// # Example
///
/// ```
/// use acoustic_medium::Medium;
/// use acoustic_types::{unit_cube, Vector3};
///
/// let mesh = unit_cube();
/// let mut medium = Medium::new();
/// medium
///     .build_from_mesh(&mesh, None, Vector3::new(0.5, 0.5, 0.5))
///     .unwrap();
/// assert!(!medium.partitions().is_empty());
/// ```
pub struct Medium {
    pub(crate) boundary: Aabb,
    pub(crate) grid_size: Vector3<Real>,
    pub(crate) partitions: Vec<MediumPartition>,
    strategy: Arc<dyn DecompositionStrategy + Send + Sync>,
}

impl Medium {
    /// Create a medium using the systematic decomposition strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(SystematicDecomposition))
    }

    /// Create a medium with an explicit decomposition strategy.
    #[must_use]
    pub fn with_strategy(strategy: Arc<dyn DecompositionStrategy + Send + Sync>) -> Self {
        Self {
            boundary: Aabb::empty(),
            grid_size: Vector3::new(1.0, 1.0, 1.0),
            partitions: Vec::new(),
            strategy,
        }
    }

    /// Replace the decomposition strategy used by subsequent builds.
    pub fn set_decomposition_strategy(
        &mut self,
        strategy: Arc<dyn DecompositionStrategy + Send + Sync>,
    ) {
        self.strategy = strategy;
    }

    /// The volume covered by the decomposition.
    #[must_use]
    pub const fn boundary(&self) -> &Aabb {
        &self.boundary
    }

    /// Dimensions of one grid cell.
    #[must_use]
    pub const fn grid_size(&self) -> Vector3<Real> {
        self.grid_size
    }

    /// The partitions produced by the last build.
    #[must_use]
    pub fn partitions(&self) -> &[MediumPartition] {
        &self.partitions
    }

    /// Drop all partitions.
    pub fn clear(&mut self) {
        self.partitions.clear();
    }

    /// Append a partition and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`MediumError::OutOfMemory`] if the partition list cannot
    /// grow.
    pub fn add_partition(&mut self, aabb: Aabb, sound_speed: Real) -> Result<usize, MediumError> {
        self.partitions
            .try_reserve(1)
            .map_err(|_| MediumError::OutOfMemory)?;
        let index = self.partitions.len();
        debug!(index, ?aabb, "adding partition");
        self.partitions.push(MediumPartition {
            aabb,
            sound_speed,
            adjacent: Vec::new(),
        });
        Ok(index)
    }

    /// Record a directed adjacency edge from `parent` to `child`.
    ///
    /// # Errors
    ///
    /// Returns [`MediumError::OutOfMemory`] if the adjacency list cannot
    /// grow.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a partition index. Debug builds also
    /// reject a self-edge.
    pub fn link_adjacent(&mut self, parent: usize, child: usize) -> Result<(), MediumError> {
        debug_assert_ne!(parent, child, "adjacency is anti-reflexive");
        let partition = &mut self.partitions[parent];
        partition
            .adjacent
            .try_reserve(1)
            .map_err(|_| MediumError::OutOfMemory)?;
        partition.adjacent.push(child);
        Ok(())
    }

    /// Check whether a box is unavailable for growing: outside the medium
    /// boundary, or overlapping the interior of an existing partition.
    ///
    /// Face contact with a partition does not occupy the box; partitions
    /// tile the boundary and legitimately touch.
    #[must_use]
    pub fn is_occupied(&self, aabb: &Aabb) -> bool {
        for axis in 0..3 {
            if aabb.min[axis] < self.boundary.min[axis]
                || aabb.max[axis] > self.boundary.max[axis]
            {
                return true;
            }
        }
        self.partitions
            .iter()
            .any(|p| p.aabb.intersects_interior(aabb))
    }

    /// Decompose a mesh into partitions.
    ///
    /// Clears any previous result, derives the boundary from `definition`
    /// (falling back to the mesh bounding box), builds an octree with
    /// `grid_size` as its subdivision floor, and runs the configured
    /// decomposition strategy. The octree lives only for the duration of
    /// this call.
    ///
    /// An empty boundary - an empty mesh with no definition - yields zero
    /// partitions.
    ///
    /// # Errors
    ///
    /// Returns [`MediumError::InvalidGridSize`] for a non-positive grid
    /// size, and propagates octree and decomposition failures.
    pub fn build_from_mesh(
        &mut self,
        mesh: &AcousticMesh,
        definition: Option<&MediumDefinition>,
        grid_size: Vector3<Real>,
    ) -> Result<(), MediumError> {
        if !(grid_size.x > 0.0 && grid_size.y > 0.0 && grid_size.z > 0.0) {
            return Err(MediumError::InvalidGridSize(grid_size));
        }

        self.clear();
        self.grid_size = grid_size;
        self.boundary = match definition {
            Some(def) => def.boundary,
            None => {
                warn!("no medium definition provided, falling back to the mesh bounding box");
                *mesh.aabb()
            }
        };

        if self.boundary.is_empty() {
            info!("empty boundary, nothing to decompose");
            return Ok(());
        }

        let octree = Octree::build(mesh, grid_size)?;
        let strategy = Arc::clone(&self.strategy);
        strategy.decompose(self, &octree, definition)?;

        #[cfg(debug_assertions)]
        {
            let _ = self.verify_coverage();
        }

        info!(
            partitions = self.partitions.len(),
            "decomposed mesh into partitions"
        );
        Ok(())
    }

    /// Check that every grid cell inside the boundary is contained in some
    /// partition, logging each miss.
    ///
    /// Runs automatically after debug builds of
    /// [`Medium::build_from_mesh`]. A failure indicates a bug in the
    /// decomposition strategy; release builds still produce the degraded
    /// output.
    pub fn verify_coverage(&self) -> bool {
        info!("integrity check...");
        let mut intact = true;
        for cell in cells(&self.boundary, self.grid_size) {
            let covered = self
                .partitions
                .iter()
                .any(|p| p.aabb.contains(&cell.min) && p.aabb.contains(&cell.max));
            if !covered {
                intact = false;
                warn!(?cell, "integrity failure, no partition covers cell");
            }
        }
        if intact {
            info!("integrity check successful");
        }
        intact
    }
}

impl Default for Medium {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Medium")
            .field("boundary", &self.boundary)
            .field("grid_size", &self.grid_size)
            .field("partitions", &self.partitions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn boundary() -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0))
    }

    fn medium_with_boundary() -> Medium {
        let mut medium = Medium::new();
        medium.boundary = boundary();
        medium.grid_size = Vector3::new(1.0, 1.0, 1.0);
        medium
    }

    #[test]
    fn occupied_outside_boundary() {
        let medium = medium_with_boundary();
        let outside = Aabb::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0));
        assert!(medium.is_occupied(&outside));

        let inside = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(!medium.is_occupied(&inside));
    }

    #[test]
    fn occupied_by_partition_interior_only() {
        let mut medium = medium_with_boundary();
        medium
            .add_partition(
                Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 2.0)),
                1.0,
            )
            .unwrap();

        let overlapping = Aabb::new(Point3::new(0.5, 0.0, 0.0), Point3::new(1.5, 1.0, 1.0));
        assert!(medium.is_occupied(&overlapping));

        // Touching the partition's x = 1 face is fine
        let touching = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        assert!(!medium.is_occupied(&touching));
    }

    #[test]
    fn link_adjacent_is_directed() {
        let mut medium = medium_with_boundary();
        let a = medium
            .add_partition(
                Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 2.0)),
                1.0,
            )
            .unwrap();
        let b = medium
            .add_partition(
                Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0)),
                1.0,
            )
            .unwrap();

        medium.link_adjacent(a, b).unwrap();
        assert_eq!(medium.partitions()[a].adjacent, vec![b]);
        assert!(medium.partitions()[b].adjacent.is_empty());
    }

    #[test]
    fn verify_coverage_reports_holes() {
        let mut medium = medium_with_boundary();
        assert!(!medium.verify_coverage());

        medium.add_partition(boundary(), 1.0).unwrap();
        assert!(medium.verify_coverage());
    }

    #[test]
    fn invalid_grid_size_is_rejected() {
        let mesh = acoustic_types::unit_cube();
        let mut medium = Medium::new();
        let result = medium.build_from_mesh(&mesh, None, Vector3::new(0.0, 1.0, 1.0));
        assert!(matches!(result, Err(MediumError::InvalidGridSize(_))));
    }
}
