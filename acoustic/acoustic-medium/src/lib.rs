//! Medium decomposition for the acoustic pre-processor.
//!
//! This crate turns a mesh (indexed by an octree) into a [`Medium`]: a set
//! of axis-aligned [`MediumPartition`]s of uniform acoustic attribute plus
//! a directed adjacency graph, the inputs a time-domain wave solver
//! consumes.
//!
//! - [`cells`] - The grid-cell lattice iterator over an extent
//! - [`evaluate_cell`] - Inverse-distance-weighted cell attributes
//! - [`SystematicDecomposition`] - The region-growing partitioner
//! - [`Medium::build_from_mesh`] - The whole pipeline in one call
//!
//! # Example
//!
//! ```
//! use acoustic_medium::Medium;
//! use acoustic_types::{unit_cube, Vector3};
//!
//! let mesh = unit_cube();
//! let mut medium = Medium::new();
//! medium
//!     .build_from_mesh(&mesh, None, Vector3::new(1.0, 1.0, 1.0))
//!     .unwrap();
//!
//! // One solid partition spanning the whole cube
//! assert_eq!(medium.partitions().len(), 1);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cells;
mod decompose;
mod error;
mod evaluate;
mod medium;

pub use cells::{cells, CellIter};
pub use decompose::{
    DecompositionStrategy, GreedyRandomDecomposition, SystematicDecomposition,
};
pub use error::MediumError;
pub use evaluate::evaluate_cell;
pub use medium::{Medium, MediumDefinition, MediumPartition};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
