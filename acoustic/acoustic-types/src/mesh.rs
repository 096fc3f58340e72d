//! Triangle mesh with typed vertex and index buffers.
//!
//! Buffers keep the element width they were supplied with, so a mesh built
//! from `f32` positions and `u16` indices round-trips bit-exactly. All
//! readers convert to the workspace [`Real`] scalar and `usize` indices.

use nalgebra::Point3;

use crate::{Aabb, Attribute, Face, MeshError, Real, Vertex};

/// Canonical index width used by the spatial index.
///
/// 64-bit when the `wide-indices` feature is enabled.
#[cfg(feature = "wide-indices")]
pub type MeshIndex = u64;

/// Canonical index width used by the spatial index.
///
/// 32-bit by default; enable the `wide-indices` feature to widen it.
#[cfg(not(feature = "wide-indices"))]
pub type MeshIndex = u32;

/// Element type tag of a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexElement {
    /// 32-bit IEEE scalars.
    F32,
    /// 64-bit IEEE scalars.
    F64,
}

/// Element type tag of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexElement {
    /// Signed 8-bit indices.
    I8,
    /// Unsigned 8-bit indices.
    U8,
    /// Signed 16-bit indices.
    I16,
    /// Unsigned 16-bit indices.
    U16,
    /// Signed 32-bit indices.
    I32,
    /// Unsigned 32-bit indices.
    U32,
    /// Signed 64-bit indices.
    #[cfg(feature = "wide-indices")]
    I64,
    /// Unsigned 64-bit indices.
    #[cfg(feature = "wide-indices")]
    U64,
}

/// A vertex buffer: packed `x y z` scalar triplets in one of the supported
/// element widths.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexBuffer {
    /// 32-bit scalars.
    F32(Vec<f32>),
    /// 64-bit scalars.
    F64(Vec<f64>),
}

impl VertexBuffer {
    /// Build a vertex buffer of the workspace scalar width.
    #[must_use]
    pub fn from_reals(scalars: Vec<Real>) -> Self {
        #[cfg(feature = "f32")]
        {
            Self::F32(scalars)
        }
        #[cfg(not(feature = "f32"))]
        {
            Self::F64(scalars)
        }
    }

    /// The element type tag.
    #[must_use]
    pub const fn element(&self) -> VertexElement {
        match self {
            Self::F32(_) => VertexElement::F32,
            Self::F64(_) => VertexElement::F64,
        }
    }

    /// Number of scalars in the buffer (3 per vertex).
    #[must_use]
    pub fn scalar_count(&self) -> usize {
        match self {
            Self::F32(data) => data.len(),
            Self::F64(data) => data.len(),
        }
    }

    /// Number of vertex triplets in the buffer.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.scalar_count() / 3
    }

    /// Read the position of vertex `index`, widened to [`Real`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_lossless,
        clippy::unnecessary_cast
    )]
    // Casts convert stored widths to the selected Real; same-width reads are lossless
    pub fn position(&self, index: usize) -> Point3<Real> {
        let i = index * 3;
        match self {
            Self::F32(data) => {
                Point3::new(data[i] as Real, data[i + 1] as Real, data[i + 2] as Real)
            }
            Self::F64(data) => {
                Point3::new(data[i] as Real, data[i + 1] as Real, data[i + 2] as Real)
            }
        }
    }
}

/// An index buffer in one of the supported element widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    /// Signed 8-bit indices.
    I8(Vec<i8>),
    /// Unsigned 8-bit indices.
    U8(Vec<u8>),
    /// Signed 16-bit indices.
    I16(Vec<i16>),
    /// Unsigned 16-bit indices.
    U16(Vec<u16>),
    /// Signed 32-bit indices.
    I32(Vec<i32>),
    /// Unsigned 32-bit indices.
    U32(Vec<u32>),
    /// Signed 64-bit indices.
    #[cfg(feature = "wide-indices")]
    I64(Vec<i64>),
    /// Unsigned 64-bit indices.
    #[cfg(feature = "wide-indices")]
    U64(Vec<u64>),
}

impl IndexBuffer {
    /// Build an index buffer of the canonical [`MeshIndex`] width.
    #[must_use]
    pub fn from_indices(indices: Vec<MeshIndex>) -> Self {
        #[cfg(feature = "wide-indices")]
        {
            Self::U64(indices)
        }
        #[cfg(not(feature = "wide-indices"))]
        {
            Self::U32(indices)
        }
    }

    /// The element type tag.
    #[must_use]
    pub const fn element(&self) -> IndexElement {
        match self {
            Self::I8(_) => IndexElement::I8,
            Self::U8(_) => IndexElement::U8,
            Self::I16(_) => IndexElement::I16,
            Self::U16(_) => IndexElement::U16,
            Self::I32(_) => IndexElement::I32,
            Self::U32(_) => IndexElement::U32,
            #[cfg(feature = "wide-indices")]
            Self::I64(_) => IndexElement::I64,
            #[cfg(feature = "wide-indices")]
            Self::U64(_) => IndexElement::U64,
        }
    }

    /// Number of indices in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::I8(data) => data.len(),
            Self::U8(data) => data.len(),
            Self::I16(data) => data.len(),
            Self::U16(data) => data.len(),
            Self::I32(data) => data.len(),
            Self::U32(data) => data.len(),
            #[cfg(feature = "wide-indices")]
            Self::I64(data) => data.len(),
            #[cfg(feature = "wide-indices")]
            Self::U64(data) => data.len(),
        }
    }

    /// Check whether the buffer holds no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read index `index` as `usize`.
    ///
    /// Negative values in signed buffers wrap to large `usize` values;
    /// mesh construction rejects them via the bounds check.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn get(&self, index: usize) -> usize {
        match self {
            Self::I8(data) => data[index] as usize,
            Self::U8(data) => data[index] as usize,
            Self::I16(data) => data[index] as usize,
            Self::U16(data) => data[index] as usize,
            Self::I32(data) => data[index] as usize,
            Self::U32(data) => data[index] as usize,
            #[cfg(feature = "wide-indices")]
            Self::I64(data) => data[index] as usize,
            #[cfg(feature = "wide-indices")]
            Self::U64(data) => data[index] as usize,
        }
    }
}

/// A triangle mesh with per-vertex acoustic attributes.
///
/// Vertex and index buffers keep their supplied element widths; a parallel
/// attribute buffer (one [`Attribute`] per vertex, initialized to
/// [`Attribute::SOLID`]) carries the acoustic data, and the bounding box is
/// cached at construction.
///
/// # Invariants
///
/// - The index count is divisible by 3 (triangles only).
/// - Every index addresses a vertex in the buffer.
/// - `aabb()` equals the componentwise min/max over all vertex positions.
///
/// # Example
///
/// ```
/// use acoustic_types::{AcousticMesh, IndexBuffer, VertexBuffer};
///
/// let vb = VertexBuffer::F64(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
/// let ib = IndexBuffer::U16(vec![0, 1, 2]);
/// let mesh = AcousticMesh::assign_buffers(vb, ib).unwrap();
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AcousticMesh {
    vb: VertexBuffer,
    ib: IndexBuffer,
    attributes: Vec<Attribute>,
    aabb: Aabb,
}

impl AcousticMesh {
    /// Build a mesh taking ownership of the supplied buffers.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexCountNotTriangles`] if the index count is
    /// not divisible by 3, or [`MeshError::IndexOutOfBounds`] if any index
    /// does not address a vertex (negative indices in signed buffers are
    /// rejected the same way).
    pub fn assign_buffers(vb: VertexBuffer, ib: IndexBuffer) -> Result<Self, MeshError> {
        let index_count = ib.len();
        if index_count % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(index_count));
        }

        let vertex_count = vb.vertex_count();
        for i in 0..index_count {
            let index = ib.get(i);
            if index >= vertex_count {
                return Err(MeshError::IndexOutOfBounds {
                    index,
                    vertex_count,
                });
            }
        }

        let mut aabb = Aabb::empty();
        for v in 0..vertex_count {
            aabb.expand_to_include(&vb.position(v));
        }

        Ok(Self {
            vb,
            ib,
            attributes: vec![Attribute::SOLID; vertex_count],
            aabb,
        })
    }

    /// Build a mesh by copying the caller's buffers.
    ///
    /// Same-width reads through [`AcousticMesh::position`] reproduce the
    /// input scalars bit-exactly.
    ///
    /// # Errors
    ///
    /// See [`AcousticMesh::assign_buffers`].
    pub fn copy_from_buffers(vb: &VertexBuffer, ib: &IndexBuffer) -> Result<Self, MeshError> {
        Self::assign_buffers(vb.clone(), ib.clone())
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vb.vertex_count()
    }

    /// Number of indices.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.ib.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.ib.len() / 3
    }

    /// Check whether the mesh has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.face_count() == 0
    }

    /// Bounding box over all vertex positions.
    ///
    /// Empty (inverted) for a mesh without vertices.
    #[must_use]
    pub const fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// The vertex buffer element tag.
    #[must_use]
    pub const fn vertex_element(&self) -> VertexElement {
        self.vb.element()
    }

    /// The index buffer element tag.
    #[must_use]
    pub const fn index_element(&self) -> IndexElement {
        self.ib.element()
    }

    /// Position of vertex `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn position(&self, index: usize) -> Point3<Real> {
        self.vb.position(index)
    }

    /// Read index `index` from the index buffer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn index(&self, index: usize) -> usize {
        self.ib.get(index)
    }

    /// Attribute of vertex `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn attribute(&self, index: usize) -> Attribute {
        self.attributes[index]
    }

    /// Set the attribute of vertex `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfBounds`] if `index` does not address
    /// a vertex.
    pub fn set_attribute(&mut self, index: usize, attr: Attribute) -> Result<(), MeshError> {
        let slot = self
            .attributes
            .get_mut(index)
            .ok_or(MeshError::IndexOutOfBounds {
                index,
                vertex_count: self.vb.vertex_count(),
            })?;
        *slot = attr;
        Ok(())
    }

    /// Assign one attribute to every vertex.
    pub fn set_attribute_all(&mut self, attr: Attribute) {
        self.attributes.fill(attr);
    }

    /// Vertex `index` with its attribute.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Vertex {
        Vertex::new(self.vb.position(index), self.attributes[index])
    }

    /// Face `face_index` with resolved, attributed vertices.
    ///
    /// # Panics
    ///
    /// Panics if `face_index` is out of bounds.
    #[must_use]
    pub fn face(&self, face_index: usize) -> Face {
        let i = face_index * 3;
        Face::new(
            self.vertex(self.ib.get(i)),
            self.vertex(self.ib.get(i + 1)),
            self.vertex(self.ib.get(i + 2)),
        )
    }

    /// Iterate over all faces.
    pub fn faces(&self) -> impl Iterator<Item = Face> + '_ {
        (0..self.face_count()).map(|f| self.face(f))
    }
}

/// Build an axis-aligned box mesh (8 vertices, 12 triangles) spanning the
/// given AABB, with outward-facing normals and solid attributes.
#[must_use]
pub fn cube(aabb: &Aabb) -> AcousticMesh {
    let (a, b) = (aabb.min, aabb.max);
    #[rustfmt::skip]
    let positions: Vec<Real> = vec![
        a.x, a.y, a.z, // 0
        b.x, a.y, a.z, // 1
        b.x, b.y, a.z, // 2
        a.x, b.y, a.z, // 3
        a.x, a.y, b.z, // 4
        b.x, a.y, b.z, // 5
        b.x, b.y, b.z, // 6
        a.x, b.y, b.z, // 7
    ];

    // 2 triangles per cube face, CCW when viewed from outside
    #[rustfmt::skip]
    let indices: Vec<MeshIndex> = vec![
        0, 2, 1,  0, 3, 2, // bottom (z = min)
        4, 5, 6,  4, 6, 7, // top (z = max)
        0, 1, 5,  0, 5, 4, // front (y = min)
        3, 7, 6,  3, 6, 2, // back (y = max)
        0, 4, 7,  0, 7, 3, // left (x = min)
        1, 2, 6,  1, 6, 5, // right (x = max)
    ];

    let vb = VertexBuffer::from_reals(positions);
    let mut bounds = Aabb::empty();
    for v in 0..vb.vertex_count() {
        bounds.expand_to_include(&vb.position(v));
    }

    AcousticMesh {
        vb,
        ib: IndexBuffer::from_indices(indices),
        attributes: vec![Attribute::SOLID; 8],
        aabb: bounds,
    }
}

/// Build the unit cube mesh spanning (0, 0, 0) to (1, 1, 1).
///
/// # Example
///
/// ```
/// use acoustic_types::unit_cube;
///
/// let mesh = unit_cube();
/// assert_eq!(mesh.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> AcousticMesh {
    cube(&Aabb::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 1.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_rejects_non_triangle_index_count() {
        let vb = VertexBuffer::F64(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let ib = IndexBuffer::U32(vec![0, 1]);
        let result = AcousticMesh::assign_buffers(vb, ib);
        assert!(matches!(result, Err(MeshError::IndexCountNotTriangles(2))));
    }

    #[test]
    fn mesh_rejects_out_of_bounds_index() {
        let vb = VertexBuffer::F64(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let ib = IndexBuffer::U32(vec![0, 1, 3]);
        let result = AcousticMesh::assign_buffers(vb, ib);
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfBounds {
                index: 3,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn mesh_rejects_negative_index() {
        let vb = VertexBuffer::F64(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let ib = IndexBuffer::I8(vec![0, 1, -1]);
        let result = AcousticMesh::assign_buffers(vb, ib);
        assert!(matches!(result, Err(MeshError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn mesh_aabb_spans_vertices() {
        let vb = VertexBuffer::F64(vec![-1.0, 0.0, 2.0, 3.0, -4.0, 0.5, 0.0, 1.0, 0.0]);
        let ib = IndexBuffer::U8(vec![0, 1, 2]);
        let mesh = AcousticMesh::assign_buffers(vb, ib).unwrap();
        assert_eq!(mesh.aabb().min, Point3::new(-1.0, -4.0, 0.0));
        assert_eq!(mesh.aabb().max, Point3::new(3.0, 1.0, 2.0));
    }

    #[test]
    fn copy_from_buffers_is_bit_exact_for_same_width() {
        let scalars = vec![0.1, 0.2, 0.3, -1.5, 2.5, -3.5, 1e-30, 1e30, 0.0];
        let vb = VertexBuffer::F64(scalars.clone());
        let ib = IndexBuffer::U32(vec![0, 1, 2]);
        let mesh = AcousticMesh::copy_from_buffers(&vb, &ib).unwrap();

        for v in 0..3 {
            let p = mesh.position(v);
            assert_eq!(p.x.to_bits(), Real::to_bits(scalars[v * 3] as Real));
            assert_eq!(p.y.to_bits(), Real::to_bits(scalars[v * 3 + 1] as Real));
            assert_eq!(p.z.to_bits(), Real::to_bits(scalars[v * 3 + 2] as Real));
        }
        assert_eq!(mesh.vertex_element(), VertexElement::F64);
        assert_eq!(mesh.index_element(), IndexElement::U32);
    }

    #[test]
    fn f32_positions_widen_exactly() {
        let vb = VertexBuffer::F32(vec![0.5, -0.25, 1.5, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let ib = IndexBuffer::U16(vec![0, 1, 2]);
        let mesh = AcousticMesh::assign_buffers(vb, ib).unwrap();
        let p = mesh.position(0);
        assert_eq!(p, Point3::new(0.5, -0.25, 1.5));
    }

    #[test]
    fn attributes_default_to_solid() {
        let mesh = unit_cube();
        for v in 0..mesh.vertex_count() {
            assert_eq!(mesh.attribute(v), Attribute::SOLID);
        }
    }

    #[test]
    fn set_attribute_round_trips() {
        let mut mesh = unit_cube();
        mesh.set_attribute(3, Attribute::AIR).unwrap();
        assert_eq!(mesh.attribute(3), Attribute::AIR);
        assert_eq!(mesh.attribute(2), Attribute::SOLID);

        assert!(mesh.set_attribute(8, Attribute::AIR).is_err());
    }

    #[test]
    fn face_resolves_attributed_vertices() {
        let mut mesh = unit_cube();
        mesh.set_attribute_all(Attribute::AIR);
        let face = mesh.face(0);
        assert_eq!(face.vertices[0].attr, Attribute::AIR);
        assert_eq!(face.vertices[0].position, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn cube_spans_its_aabb() {
        let bb = Aabb::new(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        let mesh = cube(&bb);
        assert_eq!(mesh.aabb(), &bb);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn empty_mesh_has_inverted_aabb() {
        let mesh =
            AcousticMesh::assign_buffers(VertexBuffer::F64(vec![]), IndexBuffer::U32(vec![]))
                .unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.aabb().is_empty());
    }
}
