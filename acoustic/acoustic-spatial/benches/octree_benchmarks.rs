//! Benchmarks for octree construction and queries.
//!
//! Run with: cargo bench -p acoustic-spatial
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p acoustic-spatial -- --save-baseline main
//! 2. After changes: cargo bench -p acoustic-spatial -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use acoustic_spatial::Octree;
use acoustic_types::{Aabb, AcousticMesh, IndexBuffer, MeshIndex, Point3, Real, Vector3, VertexBuffer};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Build a lattice of disjoint axis-aligned cubes: `n^3` cubes, 12
/// triangles each, spread over a unit-spaced grid.
fn cube_lattice(n: usize) -> AcousticMesh {
    let mut positions: Vec<Real> = Vec::new();
    let mut indices: Vec<MeshIndex> = Vec::new();

    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let base = (positions.len() / 3) as MeshIndex;
                #[allow(clippy::cast_precision_loss)]
                let min = Point3::new(x as Real, y as Real, z as Real);
                let max = Point3::new(min.x + 0.5, min.y + 0.5, min.z + 0.5);

                #[rustfmt::skip]
                positions.extend_from_slice(&[
                    min.x, min.y, min.z,
                    max.x, min.y, min.z,
                    max.x, max.y, min.z,
                    min.x, max.y, min.z,
                    min.x, min.y, max.z,
                    max.x, min.y, max.z,
                    max.x, max.y, max.z,
                    min.x, max.y, max.z,
                ]);
                #[rustfmt::skip]
                let cube: [MeshIndex; 36] = [
                    0, 2, 1,  0, 3, 2,
                    4, 5, 6,  4, 6, 7,
                    0, 1, 5,  0, 5, 4,
                    3, 7, 6,  3, 6, 2,
                    0, 4, 7,  0, 7, 3,
                    1, 2, 6,  1, 6, 5,
                ];
                indices.extend(cube.iter().map(|i| i + base));
            }
        }
    }

    AcousticMesh::assign_buffers(
        VertexBuffer::from_reals(positions),
        IndexBuffer::from_indices(indices),
    )
    .expect("lattice mesh is valid")
}

// =============================================================================
// Octree Benchmarks
// =============================================================================

fn bench_octree(c: &mut Criterion) {
    let mut group = c.benchmark_group("Octree");

    let mesh = cube_lattice(6); // 216 cubes, 2592 triangles
    let smallest = Vector3::new(0.5, 0.5, 0.5);

    group.throughput(Throughput::Elements(mesh.face_count() as u64));

    group.bench_function("build", |b| {
        b.iter(|| Octree::build(black_box(&mesh), black_box(smallest)));
    });

    let octree = Octree::build(&mesh, smallest).expect("octree build");
    let cell = Aabb::new(Point3::new(1.25, 1.25, 1.25), Point3::new(1.75, 1.75, 1.75));

    group.bench_function("query_cell", |b| {
        b.iter(|| octree.query_potential_faces(black_box(&cell)));
    });

    group.bench_function("query_full", |b| {
        b.iter(|| octree.query_potential_faces(black_box(mesh.aabb())));
    });

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_octree);
criterion_main!(benches);
