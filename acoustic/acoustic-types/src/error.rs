//! Error types for mesh construction.

/// Errors that can occur while building or mutating a mesh.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MeshError {
    /// The index count is not divisible by 3.
    #[error("index count {0} is not divisible by 3")]
    IndexCountNotTriangles(usize),

    /// An index does not address a vertex.
    #[error("index {index} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        /// The offending index value.
        index: usize,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}
