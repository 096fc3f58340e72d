//! Octree over mesh faces.
//!
//! The tree is stored as an arena of nodes addressed by index, so parent
//! and child links are plain `usize`s and both build and query run over an
//! explicit work stack instead of self-referential recursion.
//!
//! Every node carries the index triples of the faces whose bounding box
//! intersects the node's AABB. The root is special: its index buffer *is*
//! the mesh's index buffer, accessed through the borrowed mesh rather than
//! copied, so the octree never owns or frees it.

use nalgebra::Vector3;

use acoustic_types::{Aabb, AcousticMesh, MeshIndex, Real};

use crate::SpatialError;

const ROOT: usize = 0;

/// One node of the octree.
#[derive(Debug)]
pub struct OctreeNode {
    aabb: Aabb,
    children: Option<[usize; 8]>,
    /// Index triples of faces possibly intersecting this node. Empty for
    /// the root, which aliases the mesh index buffer instead.
    indices: Vec<MeshIndex>,
}

impl OctreeNode {
    /// The node's bounding box.
    #[must_use]
    pub const fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Child node ids, present iff the node was subdivided.
    ///
    /// All eight children exist or none do.
    #[must_use]
    pub const fn children(&self) -> Option<[usize; 8]> {
        self.children
    }

    /// Check whether the node has no children.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Spatial index over the faces of a borrowed mesh.
///
/// Answers the conservative query "which faces might intersect this box?"
/// by recursively bucketing face index triples into octants of the mesh
/// bounding box.
///
/// # Example
///
/// ```
/// use acoustic_spatial::Octree;
/// use acoustic_types::{unit_cube, Vector3};
///
/// let mesh = unit_cube();
/// // A floor as large as the mesh keeps the root a leaf, so a query over
/// // the whole box answers straight from the aliased mesh index buffer
/// let octree = Octree::build(&mesh, Vector3::new(2.0, 2.0, 2.0)).unwrap();
/// let candidates = octree.query_potential_faces(mesh.aabb());
/// assert_eq!(candidates.len(), mesh.index_count());
/// ```
#[derive(Debug)]
pub struct Octree<'m> {
    mesh: &'m AcousticMesh,
    nodes: Vec<OctreeNode>,
}

impl<'m> Octree<'m> {
    /// Build an octree over a mesh.
    ///
    /// The root inherits the mesh AABB and aliases the mesh index buffer.
    /// A node is subdivided into eight equal octants while it holds more
    /// than one triangle and every axis of its AABB is at least the
    /// matching `smallest_cell` component; each child gathers, from its
    /// parent's triples, the faces whose AABB intersects the child AABB.
    ///
    /// An empty mesh builds successfully and answers every query with the
    /// empty set.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidSmallestCell`] if `smallest_cell` is
    /// not positive on every axis, and [`SpatialError::OutOfMemory`] if an
    /// allocation fails while growing a node.
    pub fn build(
        mesh: &'m AcousticMesh,
        smallest_cell: Vector3<Real>,
    ) -> Result<Self, SpatialError> {
        if !(smallest_cell.x > 0.0 && smallest_cell.y > 0.0 && smallest_cell.z > 0.0) {
            return Err(SpatialError::InvalidSmallestCell(smallest_cell));
        }

        let mut octree = Self {
            mesh,
            nodes: vec![OctreeNode {
                aabb: *mesh.aabb(),
                children: None,
                indices: Vec::new(),
            }],
        };

        if mesh.face_count() == 0 {
            return Ok(octree);
        }

        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            // One triangle left, nothing to separate
            if octree.node_index_count(id) <= 3 {
                continue;
            }
            // Size floor guarantees convergence
            let size = octree.nodes[id].aabb.size();
            if size.x < smallest_cell.x || size.y < smallest_cell.y || size.z < smallest_cell.z {
                continue;
            }

            octree.subdivide(id)?;
            if let Some(children) = octree.nodes[id].children {
                for child in children.iter().rev() {
                    stack.push(*child);
                }
            }
        }

        Ok(octree)
    }

    /// The mesh this octree indexes.
    #[must_use]
    pub const fn mesh(&self) -> &'m AcousticMesh {
        self.mesh
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &OctreeNode {
        &self.nodes[ROOT]
    }

    /// Access a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    #[must_use]
    pub fn node(&self, id: usize) -> &OctreeNode {
        &self.nodes[id]
    }

    /// Iterate over all nodes, the root first.
    pub fn nodes(&self) -> impl Iterator<Item = &OctreeNode> {
        self.nodes.iter()
    }

    /// Collect the index triples of all faces that *might* intersect the
    /// query box.
    ///
    /// The result is a superset of the faces whose AABB meets `query`
    /// (leaf buckets are not re-filtered); callers needing exact hits test
    /// the candidates with [`crate::triangle_aabb`]. A box not meeting the
    /// mesh AABB yields the empty set.
    #[must_use]
    pub fn query_potential_faces(&self, query: &Aabb) -> Vec<MeshIndex> {
        let mut result = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !node.aabb.intersects(query) {
                continue;
            }
            match node.children {
                Some(children) => {
                    for child in children.iter().rev() {
                        stack.push(*child);
                    }
                }
                None => self.append_node_indices(id, &mut result),
            }
        }
        result
    }

    /// Number of indices held by a node (the root aliases the mesh).
    fn node_index_count(&self, id: usize) -> usize {
        if id == ROOT {
            self.mesh.index_count()
        } else {
            self.nodes[id].indices.len()
        }
    }

    /// Append a node's index triples to `out`.
    #[allow(clippy::cast_possible_truncation)]
    // Mesh indices are validated against the vertex count, which the
    // canonical width covers
    fn append_node_indices(&self, id: usize, out: &mut Vec<MeshIndex>) {
        if id == ROOT {
            out.extend((0..self.mesh.index_count()).map(|i| self.mesh.index(i) as MeshIndex));
        } else {
            out.extend_from_slice(&self.nodes[id].indices);
        }
    }

    /// Snapshot a node's triples with their face bounding boxes.
    #[allow(clippy::cast_possible_truncation)]
    fn collect_node_faces(&self, id: usize) -> Vec<([MeshIndex; 3], Aabb)> {
        let count = self.node_index_count(id);
        let mut faces = Vec::with_capacity(count / 3);
        for i in (0..count).step_by(3) {
            let triple = if id == ROOT {
                [
                    self.mesh.index(i) as MeshIndex,
                    self.mesh.index(i + 1) as MeshIndex,
                    self.mesh.index(i + 2) as MeshIndex,
                ]
            } else {
                let indices = &self.nodes[id].indices;
                [indices[i], indices[i + 1], indices[i + 2]]
            };

            let mut aabb = Aabb::from_point(self.mesh.position(as_vertex(triple[0])));
            aabb.expand_to_include(&self.mesh.position(as_vertex(triple[1])));
            aabb.expand_to_include(&self.mesh.position(as_vertex(triple[2])));
            faces.push((triple, aabb));
        }
        faces
    }

    /// Allocate the eight octant children of a node and distribute its
    /// faces among them.
    fn subdivide(&mut self, id: usize) -> Result<(), SpatialError> {
        let parent_faces = self.collect_node_faces(id);
        let parent_aabb = self.nodes[id].aabb;
        let half = parent_aabb.size() * 0.5;

        let mut children = [0usize; 8];
        for (octant, child_slot) in children.iter_mut().enumerate() {
            // Octant bit 2 selects +x, bit 1 +y, bit 0 +z
            let offset = Vector3::new(
                if octant & 4 == 0 { 0.0 } else { half.x },
                if octant & 2 == 0 { 0.0 } else { half.y },
                if octant & 1 == 0 { 0.0 } else { half.z },
            );
            let min = parent_aabb.min + offset;
            let child_aabb = Aabb::new(min, min + half);

            let mut indices = Vec::new();
            for (triple, face_aabb) in &parent_faces {
                if child_aabb.intersects(face_aabb) {
                    indices
                        .try_reserve(3)
                        .map_err(|_| SpatialError::OutOfMemory)?;
                    indices.extend_from_slice(triple);
                }
            }

            self.nodes
                .try_reserve(1)
                .map_err(|_| SpatialError::OutOfMemory)?;
            *child_slot = self.nodes.len();
            self.nodes.push(OctreeNode {
                aabb: child_aabb,
                children: None,
                indices,
            });
        }

        self.nodes[id].children = Some(children);
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)]
// MeshIndex fits usize on every supported target
fn as_vertex(index: MeshIndex) -> usize {
    index as usize
}
