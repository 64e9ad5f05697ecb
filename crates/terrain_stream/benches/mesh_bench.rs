//! Benchmarks for tile meshing at every LOD.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::Vec2;
use terrain_stream::{height_map, mesh, HeightMap, HeightMapSettings, MeshSettings};

/// Default 240-quad tile with real terrain heights.
fn reference_height_map() -> HeightMap {
	let settings = MeshSettings::default();
	let size = settings.num_verts_per_line();
	height_map::build(size, size, &HeightMapSettings::default(), Vec2::ZERO)
}

/// Smooth-shaded mesh per LOD of a 240-quad tile.
fn bench_lods(c: &mut Criterion) {
	let mut group = c.benchmark_group("mesh_240_lod");
	let height_map = reference_height_map();
	let settings = MeshSettings::default();

	for lod in 0..terrain_stream::NUM_SUPPORTED_LODS {
		let per_line = terrain_stream::constants::verts_per_line(height_map.width, lod);
		group.throughput(Throughput::Elements((per_line * per_line) as u64));
		group.bench_with_input(BenchmarkId::from_parameter(lod), &lod, |b, &lod| {
			b.iter(|| black_box(mesh::build(&height_map, lod, &settings)))
		});
	}

	group.finish();
}

/// Smooth against flat shading on the largest flat-shaded size (96 quads).
fn bench_shading(c: &mut Criterion) {
	let mut group = c.benchmark_group("mesh_96_shading");

	for flat in [false, true] {
		let settings = MeshSettings::default()
			.with_chunk_size_index(2)
			.with_flat_shaded_chunk_size_index(2)
			.with_flat_shading(flat);
		let size = settings.num_verts_per_line();
		let height_map = height_map::build(size, size, &HeightMapSettings::default(), Vec2::ZERO);
		let name = if flat { "flat" } else { "smooth" };

		group.bench_function(name, |b| {
			b.iter(|| black_box(mesh::build(&height_map, 0, &settings)))
		});
	}

	group.finish();
}

criterion_group!(benches, bench_lods, bench_shading);
criterion_main!(benches);
