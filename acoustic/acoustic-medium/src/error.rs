//! Error types for medium decomposition.

use acoustic_spatial::SpatialError;

/// Errors that can occur while building or decomposing a medium.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MediumError {
    /// An allocation failed while growing the partition set.
    #[error("out of memory while decomposing the medium")]
    OutOfMemory,

    /// The grid size must be positive on every axis.
    #[error("grid size must be positive on every axis, got {0:?}")]
    InvalidGridSize(acoustic_types::Vector3<acoustic_types::Real>),

    /// The internal octree build failed.
    #[error("octree build failed")]
    Spatial(#[from] SpatialError),
}
