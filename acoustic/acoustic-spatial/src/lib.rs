//! Spatial queries for the acoustic decomposition pre-processor.
//!
//! This crate provides the geometry kernels and the spatial index the
//! medium decomposer is built on:
//!
//! - [`triangle_aabb`], [`segment_aabb`], [`face_aabb`] - Pure intersection
//!   kernels with inclusive boundary semantics
//! - [`Octree`] - A spatial index over mesh faces answering "which faces
//!   might intersect this box?"
//!
//! # Conservative queries
//!
//! The octree works on face *bounding boxes*: [`Octree::query_potential_faces`]
//! returns a superset of the faces whose AABB meets the query box. Callers
//! needing exact results filter the candidates with [`triangle_aabb`].
//!
//! # Example
//!
//! ```
//! use acoustic_spatial::{triangle_aabb, Octree};
//! use acoustic_types::{unit_cube, Aabb, Point3, Vector3};
//!
//! let mesh = unit_cube();
//! let octree = Octree::build(&mesh, Vector3::new(0.25, 0.25, 0.25)).unwrap();
//!
//! let cell = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.5, 0.5, 0.5));
//! let candidates = octree.query_potential_faces(&cell);
//! assert_eq!(candidates.len() % 3, 0);
//!
//! // Filter the candidates down to true intersections
//! let hits = candidates
//!     .chunks_exact(3)
//!     .filter(|tri| {
//!         let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.position(i as usize));
//!         triangle_aabb(&a, &b, &c, &cell)
//!     })
//!     .count();
//! assert!(hits > 0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod intersect;
mod octree;

pub use error::SpatialError;
pub use intersect::{face_aabb, segment_aabb, triangle_aabb, IntersectionPoints};
pub use octree::{Octree, OctreeNode};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
