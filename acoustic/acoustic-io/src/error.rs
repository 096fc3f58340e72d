//! Error types and stable error codes for OBJ I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for OBJ I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Stable numeric error codes for embedding hosts.
///
/// The values are part of the external interface and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    /// Success.
    Ok = 0,
    /// An allocation failed.
    OutOfMemory = 1,
    /// A file could not be opened.
    FopenFailed = 2,
    /// Reading or writing a stream failed.
    ReadFailed = 3,
    /// A referenced vertex was not written before its edge record.
    VertexIndexNotFound = 4,
    /// The input could not be parsed.
    Parse = 5,
}

/// Errors that can occur during OBJ import or export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IoError {
    /// A file could not be opened.
    #[error("failed to open {path}")]
    FopenFailed {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// An edge record referenced a vertex that was never written.
    #[error("vertex index not found in the export dedup map")]
    VertexIndexNotFound,

    /// The parsed buffers do not form a valid mesh.
    #[error("invalid mesh: {0}")]
    Mesh(#[from] acoustic_types::MeshError),
}

impl IoError {
    /// The stable numeric code of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::FopenFailed { .. } => ErrorCode::FopenFailed,
            Self::Io(_) => ErrorCode::ReadFailed,
            Self::Parse { .. } | Self::Mesh(_) => ErrorCode::Parse,
            Self::VertexIndexNotFound => ErrorCode::VertexIndexNotFound,
        }
    }
}
