//! Wavefront OBJ reading and wireframe writing.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::warn;

use acoustic_medium::Medium;
use acoustic_spatial::Octree;
use acoustic_types::{
    position_key, Aabb, AcousticMesh, IndexBuffer, MeshIndex, Point3, Real, VertexBuffer,
};

use crate::error::{IoError, IoResult};

/// Load a triangle mesh from an OBJ file.
///
/// `v x y z` records fill the vertex buffer and `f` records the index
/// buffer; polygon faces are fan-triangulated and `i/j/k`-style references
/// reduce to their position index. OBJ indices are 1-based and converted
/// on ingest. Known non-geometry records (`vn`, `vt`, `o`, comments, ...)
/// are skipped silently; unknown keywords are recoverable and logged with
/// their line number.
///
/// # Errors
///
/// Returns [`IoError::FopenFailed`] if the file cannot be opened,
/// [`IoError::Parse`] (with the line number) for malformed numeric fields
/// or out-of-range indices, and [`IoError::Mesh`] if the parsed buffers do
/// not form a valid mesh.
///
/// # Example
///
/// ```no_run
/// use acoustic_io::import_mesh;
///
/// let mesh = import_mesh("model.obj").unwrap();
/// assert!(mesh.face_count() > 0);
/// ```
pub fn import_mesh<P: AsRef<Path>>(path: P) -> IoResult<AcousticMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IoError::FopenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut positions: Vec<Real> = Vec::new();
    let mut indices: Vec<MeshIndex> = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = number + 1;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let mut coords = [0.0; 3];
                for slot in &mut coords {
                    let token = tokens.next().ok_or_else(|| IoError::Parse {
                        line: line_number,
                        message: "vertex record needs 3 coordinates".to_string(),
                    })?;
                    *slot = parse_real(token, line_number)?;
                }
                positions.extend_from_slice(&coords);
            }
            "f" => {
                let mut refs: Vec<MeshIndex> = Vec::new();
                for token in tokens {
                    refs.push(parse_index(token, line_number)?);
                }
                // Fan triangulation; records with fewer than 3 references
                // (e.g. wireframe edges) contribute no triangles
                for i in 1..refs.len().saturating_sub(1) {
                    indices.extend_from_slice(&[refs[0], refs[i], refs[i + 1]]);
                }
            }
            // Known records the mesh model has no use for
            "vn" | "vt" | "vp" | "l" | "p" | "o" | "g" | "s" | "mtllib" | "usemtl" => {}
            comment if comment.starts_with('#') => {}
            unknown => {
                warn!(line = line_number, keyword = unknown, "ignoring unknown OBJ record");
            }
        }
    }

    let mesh = AcousticMesh::assign_buffers(
        VertexBuffer::from_reals(positions),
        IndexBuffer::from_indices(indices),
    )?;
    Ok(mesh)
}

fn parse_real(token: &str, line: usize) -> IoResult<Real> {
    token.parse::<Real>().map_err(|_| IoError::Parse {
        line,
        message: format!("malformed number `{token}`"),
    })
}

/// Parse one face reference (`7`, `7/1`, `7//3`, ...) to a 0-based
/// position index.
fn parse_index(token: &str, line: usize) -> IoResult<MeshIndex> {
    let first = token.split('/').next().unwrap_or(token);
    let value: i64 = first.parse().map_err(|_| IoError::Parse {
        line,
        message: format!("malformed index `{token}`"),
    })?;
    if value < 1 {
        return Err(IoError::Parse {
            line,
            message: format!("OBJ indices are 1-based, got {value}"),
        });
    }
    MeshIndex::try_from(value - 1).map_err(|_| IoError::Parse {
        line,
        message: format!("index {value} exceeds the supported width"),
    })
}

/// Streaming OBJ writer for AABB wireframes.
///
/// Vertices are deduplicated by their bit-exact position key, so boxes
/// sharing corners reference the same `v` records. OBJ indices are
/// 1-based; the counter starts at 1.
///
/// # Example
///
/// ```
/// use acoustic_io::ObjExporter;
/// use acoustic_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// let mut out = Vec::new();
/// let mut exporter = ObjExporter::new(&mut out);
/// exporter.write_aabb_vertices(&aabb).unwrap();
/// exporter.write_aabb_edges(&aabb).unwrap();
/// exporter.finish().unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
/// assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
/// ```
#[derive(Debug)]
pub struct ObjExporter<W: Write> {
    writer: W,
    vertex_indices: HashMap<[u64; 3], u32>,
    index_counter: u32,
}

/// The 12 edges of a box, as pairs into [`Aabb::corners`].
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 4),
    (1, 3),
    (1, 5),
    (2, 3),
    (2, 6),
    (3, 7),
    (4, 5),
    (4, 6),
    (5, 7),
    (6, 7),
];

impl ObjExporter<BufWriter<File>> {
    /// Create an exporter writing to a new file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FopenFailed`] if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| IoError::FopenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ObjExporter<W> {
    /// Create an exporter over any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            vertex_indices: HashMap::new(),
            index_counter: 1, // OBJ indices start at 1
        }
    }

    /// Write one `v` record, unless a bit-identical position was already
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Io`] if the write fails.
    pub fn write_vertex(&mut self, position: &Point3<Real>) -> IoResult<()> {
        let key = position_key(position);
        if !self.vertex_indices.contains_key(&key) {
            writeln!(
                self.writer,
                "v {} {} {}",
                position.x, position.y, position.z
            )?;
            self.vertex_indices.insert(key, self.index_counter);
            self.index_counter += 1;
        }
        Ok(())
    }

    /// Write the 8 corners of a box as `v` records.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Io`] if a write fails.
    pub fn write_aabb_vertices(&mut self, aabb: &Aabb) -> IoResult<()> {
        for corner in aabb.corners() {
            self.write_vertex(&corner)?;
        }
        Ok(())
    }

    /// Write the 12 edges of a box as two-index `f` records.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::VertexIndexNotFound`] if a corner was not
    /// written first, and [`IoError::Io`] if a write fails.
    pub fn write_aabb_edges(&mut self, aabb: &Aabb) -> IoResult<()> {
        let corners = aabb.corners();
        for (a, b) in BOX_EDGES {
            let start = self
                .vertex_indices
                .get(&position_key(&corners[a]))
                .ok_or(IoError::VertexIndexNotFound)?;
            let end = self
                .vertex_indices
                .get(&position_key(&corners[b]))
                .ok_or(IoError::VertexIndexNotFound)?;
            writeln!(self.writer, "f {start} {end}")?;
        }
        Ok(())
    }

    /// Flush the underlying writer and finish the export.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Io`] if the flush fails.
    pub fn finish(mut self) -> IoResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Export an octree as an AABB wireframe: the real root and all of its
/// descendants, vertices first, then the edge records of every node.
///
/// # Errors
///
/// Propagates file-creation and write failures.
pub fn export_octree<P: AsRef<Path>>(path: P, octree: &Octree<'_>) -> IoResult<()> {
    let mut exporter = ObjExporter::create(path)?;
    for node in octree.nodes() {
        exporter.write_aabb_vertices(node.aabb())?;
    }
    for node in octree.nodes() {
        exporter.write_aabb_edges(node.aabb())?;
    }
    exporter.finish()
}

/// Export a medium as an AABB wireframe, one box per partition.
///
/// # Errors
///
/// Propagates file-creation and write failures.
pub fn export_medium<P: AsRef<Path>>(path: P, medium: &Medium) -> IoResult<()> {
    let mut exporter = ObjExporter::create(path)?;
    for partition in medium.partitions() {
        exporter.write_aabb_vertices(&partition.aabb)?;
    }
    for partition in medium.partitions() {
        exporter.write_aabb_edges(&partition.aabb)?;
    }
    exporter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_takes_position_reference() {
        assert_eq!(parse_index("7", 1).unwrap(), 6);
        assert_eq!(parse_index("7/2", 1).unwrap(), 6);
        assert_eq!(parse_index("7//3", 1).unwrap(), 6);
    }

    #[test]
    fn parse_index_rejects_non_positive() {
        assert!(parse_index("0", 4).is_err());
        assert!(parse_index("-2", 4).is_err());
    }

    #[test]
    fn exporter_dedups_shared_corners() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));

        let mut out = Vec::new();
        let mut exporter = ObjExporter::new(&mut out);
        exporter.write_aabb_vertices(&a).unwrap();
        exporter.write_aabb_vertices(&b).unwrap();
        exporter.write_aabb_edges(&a).unwrap();
        exporter.write_aabb_edges(&b).unwrap();
        exporter.finish().unwrap();

        let text = String::from_utf8(out).unwrap();
        // The boxes share the x = 1 face: 12 unique corners, not 16
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 12);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 24);
    }

    #[test]
    fn edges_without_vertices_fail() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let mut out = Vec::new();
        let mut exporter = ObjExporter::new(&mut out);
        let result = exporter.write_aabb_edges(&aabb);
        assert!(matches!(result, Err(IoError::VertexIndexNotFound)));
    }
}
