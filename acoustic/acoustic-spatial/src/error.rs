//! Error types for spatial operations.

use acoustic_types::Vector3;

/// Errors that can occur while building the spatial index.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// An allocation failed while growing a node index buffer.
    #[error("out of memory while building the octree")]
    OutOfMemory,

    /// The subdivision floor must be positive on every axis.
    #[error("smallest cell must be positive on every axis, got {0:?}")]
    InvalidSmallestCell(Vector3<acoustic_types::Real>),
}
