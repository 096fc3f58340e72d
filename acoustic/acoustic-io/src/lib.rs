//! Wavefront-OBJ I/O for the acoustic pre-processor.
//!
//! Two directions of traffic:
//!
//! - [`import_mesh`] reads a triangle mesh from an OBJ file, fan-
//!   triangulating polygons.
//! - [`export_octree`] and [`export_medium`] write AABB wireframes - one
//!   `v` record per unique box corner, one two-index `f` record per box
//!   edge - for inspecting a spatial index or a decomposition in any OBJ
//!   viewer.
//!
//! Every failure maps to a stable numeric [`ErrorCode`] for embedding
//! hosts.
//!
//! # Example
//!
//! ```no_run
//! use acoustic_io::import_mesh;
//!
//! let mesh = import_mesh("room.obj").unwrap();
//! println!("{} faces", mesh.face_count());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod obj;

pub use error::{ErrorCode, IoError, IoResult};
pub use obj::{export_medium, export_octree, import_mesh, ObjExporter};
