//! Core value types for the acoustic decomposition pre-processor.
//!
//! This crate provides the foundational types shared by the spatial index,
//! the medium decomposer, and the I/O layer:
//!
//! - [`Aabb`] - Axis-aligned bounding box over the selected scalar width
//! - [`Attribute`] - Per-vertex acoustic triple (reflection, transmission, absorption)
//! - [`Vertex`] and [`Face`] - Attributed mesh primitives
//! - [`AcousticMesh`] - Typed vertex/index buffers with a parallel attribute buffer
//!
//! # Precision
//!
//! All geometric math uses the [`Real`] scalar: `f64` by default, `f32` when
//! the `f32` feature is enabled. [`EPS`] is the machine epsilon of the
//! selected width.
//!
//! # Coordinate System
//!
//! Right-handed, unit-agnostic. Face winding is counter-clockwise when
//! viewed from outside.
//!
//! # Example
//!
//! ```
//! use acoustic_types::{unit_cube, Attribute};
//!
//! let mesh = unit_cube();
//! assert_eq!(mesh.vertex_count(), 8);
//! assert_eq!(mesh.face_count(), 12);
//! // Vertices start out acoustically solid.
//! assert_eq!(mesh.attribute(0), Attribute::SOLID);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aabb;
mod attribute;
mod error;
mod mesh;
mod real;
mod vertex;

pub use aabb::Aabb;
pub use attribute::Attribute;
pub use error::MeshError;
pub use mesh::{
    cube, unit_cube, AcousticMesh, IndexBuffer, IndexElement, MeshIndex, VertexBuffer,
    VertexElement,
};
pub use real::{position_key, Real, EPS};
pub use vertex::{Face, Vertex};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
