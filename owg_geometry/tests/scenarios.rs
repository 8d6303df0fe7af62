//! Literal input/output scenarios and a handful of quantified property
//! checks for the Mercator/quadkey primitives and the triangulation engine.

use owg_core::elevation_point::ElevationPoint;
use owg_core::mercator::Mercator;
use owg_core::quadkey::{quadkey_to_tile, tile_to_quadkey};
use owg_geometry::triangulation::Triangulation;

fn non_supersimplex_triangle_count(triangulation: &Triangulation) -> usize {
	let mesh = triangulation.mesh();
	mesh
		.triangles()
		.filter(|(_, t)| (0..3).all(|i| !mesh.vertex(t.vertex(i)).point.is_supersimplex()))
		.count()
}

#[test]
fn s1_quadkey_walk() {
	assert_eq!(tile_to_quadkey(3, 5, 3), "213");
	let tile = quadkey_to_tile("213").unwrap();
	assert_eq!((tile.x, tile.y, tile.level), (3, 5, 3));
}

#[test]
fn s2_mercator_forward_sphere() {
	let m = Mercator::spherical();
	let (x, y) = m.forward(0.0, 0.0);
	assert!((x - 0.0).abs() < 1e-12 && (y - 0.0).abs() < 1e-12);

	let (x, y) = m.forward(180.0, 0.0);
	assert!((x - 1.0).abs() < 1e-12 && (y - 0.0).abs() < 1e-12);

	let (x, y) = m.forward(0.0, 85.051_128_779_806_59);
	assert!((x - 0.0).abs() < 1e-12 && (y - 1.0).abs() < 1e-12);
}

#[test]
fn s3_insertion_produces_six_triangles_and_correct_query() {
	let mut triangulation = Triangulation::new(-1.0, -1.0, 1.0, 1.0);
	for &(x, y, z) in &[(-0.5, -0.5, 10.0), (0.5, -0.5, 20.0), (0.0, 0.5, 30.0), (0.0, 0.0, 40.0)] {
		triangulation.insert(ElevationPoint::new(x, y, z, 0.0));
	}

	assert_eq!(non_supersimplex_triangle_count(&triangulation), 6);
	assert_eq!(triangulation.query_elevation(0.0, 0.0), Some(40.0));
}

#[test]
fn s4_duplicate_insertion_is_idempotent() {
	let mut triangulation = Triangulation::new(-1.0, -1.0, 1.0, 1.0);
	triangulation.insert(ElevationPoint::new(0.0, 0.0, 100.0, 0.0));
	let triangles_before = triangulation.triangle_count();
	let vertices_before = triangulation.vertex_count();

	triangulation.insert(ElevationPoint::new(0.0, 0.0, 100.0, 0.0));

	assert_eq!(triangulation.triangle_count(), triangles_before);
	assert_eq!(triangulation.vertex_count(), vertices_before);
}

#[test]
fn s5_reduction_to_512_bounds_error_against_513() {
	let mut points = Vec::new();
	let side = 32;
	for i in 0..side {
		for j in 0..side {
			let x = -1.0 + 2.0 * i as f64 / (side - 1) as f64;
			let y = -1.0 + 2.0 * j as f64 / (side - 1) as f64;
			points.push((x, y, x * x + y * y));
		}
	}
	assert_eq!(points.len(), 1024);

	let max_error = |desired_vertex_count: usize| -> f64 {
		let mut triangulation = Triangulation::new(-1.5, -1.5, 1.5, 1.5);
		for &(x, y, z) in &points {
			triangulation.insert(ElevationPoint::new(x, y, z, 0.0));
		}
		let budget = triangulation.vertex_count().saturating_sub(desired_vertex_count);
		triangulation.reduce(budget);
		points
			.iter()
			.map(|&(x, y, z)| {
				let predicted = triangulation.query_elevation(x, y).unwrap_or(z);
				(predicted - z).abs()
			})
			.fold(0.0, f64::max)
	};

	let error_512 = max_error(512);
	let error_513 = max_error(513);
	assert!(error_512 < 2.0 * error_513.max(1e-9));
}

#[test]
fn s6_clip_emits_corners_and_one_interior_point() {
	let mut triangulation = Triangulation::new(-2.0, -2.0, 2.0, 2.0);
	for &(x, y) in &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
		triangulation.insert(ElevationPoint::new(x, y, 0.0, 0.0));
	}
	triangulation.insert(ElevationPoint::new(0.0, 0.0, 100.0, 0.0));

	let clipped = triangulation.intersect_rect(-1.0, -1.0, 1.0, 1.0);
	let mesh = clipped.mesh();

	let corners: Vec<_> = mesh.triangles().flat_map(|(_, t)| (0..3).map(|i| mesh.vertex(t.vertex(i)).point)).filter(|p| p.is_corner()).collect();
	let edges: Vec<_> = mesh.triangles().flat_map(|(_, t)| (0..3).map(|i| mesh.vertex(t.vertex(i)).point)).filter(|p| p.is_edge_cut()).collect();
	let interior: Vec<_> = mesh
		.triangles()
		.flat_map(|(_, t)| (0..3).map(|i| mesh.vertex(t.vertex(i)).point))
		.filter(|p| !p.is_corner() && !p.is_edge_cut() && !p.is_supersimplex())
		.collect();

	let mut corner_coords: Vec<(i64, i64)> = corners.iter().map(|p| (p.x.round() as i64, p.y.round() as i64)).collect();
	corner_coords.sort_unstable();
	corner_coords.dedup();
	assert_eq!(corner_coords, vec![(-1, -1), (-1, 1), (1, -1), (1, 1)]);

	assert!(edges.is_empty());

	let mut interior_coords: Vec<(i64, i64)> = interior.iter().map(|p| (p.x.round() as i64, p.y.round() as i64)).collect();
	interior_coords.dedup();
	assert_eq!(interior_coords, vec![(0, 0)]);
}

#[test]
fn property_mercator_round_trips_within_valid_latitude() {
	let m = Mercator::spherical();
	for lat in [-85.0, -45.0, -1.0, 0.0, 1.0, 45.0, 84.9] {
		for lng in [-179.9, -90.0, -0.1, 0.0, 0.1, 90.0, 179.9] {
			let (x, y) = m.forward(lng, lat);
			let (lng2, lat2) = m.reverse(x, y);
			assert!((lng2 - lng).abs() < 1e-9, "lng round-trip failed for {lng},{lat}");
			assert!((lat2 - lat).abs() < 1e-9, "lat round-trip failed for {lng},{lat}");
		}
	}
}

#[test]
fn property_quadkey_bijection() {
	for level in 0u8..=8 {
		let max = 1i64 << level;
		for tx in 0..max.min(5) {
			for ty in 0..max.min(5) {
				let quadkey = tile_to_quadkey(tx, ty, level);
				let tile = quadkey_to_tile(&quadkey).unwrap();
				assert_eq!((tile.x, tile.y, tile.level), (tx, ty, level));
			}
		}
	}
}

#[test]
fn property_reduce_is_a_removal_budget_not_a_size_target() {
	let mut triangulation = Triangulation::new(-1.0, -1.0, 1.0, 1.0);
	for i in 0..40 {
		let angle = i as f64 * 0.37;
		let r = 0.1 + (i as f64 / 40.0) * 0.8;
		triangulation.insert(ElevationPoint::new(r * angle.cos(), r * angle.sin(), angle.sin() * 10.0, 0.0));
	}
	let triangles_before = triangulation.triangle_count();
	let vertices_before = triangulation.vertex_count();
	let removed = triangulation.reduce(10);

	assert!(removed <= 10);
	assert!(triangulation.triangle_count() <= triangles_before);
	assert_eq!(triangulation.vertex_count(), vertices_before - removed);
}
