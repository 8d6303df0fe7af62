//! Rectangle clipping: rebuild a triangulation restricted to an axis-aligned
//! window, seeded from the window's corners, its boundary crossings, and
//! whatever interior vertices of the source triangulation fall inside it.

use owg_core::elevation_point::ElevationPoint;

use crate::insert::insert_point;
use crate::locate::{LinearLocator, PointLocator};
use crate::mesh::Mesh;
use crate::predicates::barycentric_elevation;

enum Line {
	Vertical(f64),
	Horizontal(f64),
}

/// Looks up the elevation at `(x, y)` by locating it in `mesh` and
/// barycentrically interpolating the containing triangle. `None` if the
/// point falls outside the triangulation's convex hull.
pub fn query_elevation(mesh: &Mesh, locator: &mut dyn PointLocator, x: f64, y: f64) -> Option<f64> {
	let (triangle, relation, _, _) = locator.locate(mesh, x, y)?;
	if relation.is_outside() {
		return None;
	}
	let t = mesh.triangle(triangle);
	let p0 = mesh.vertex(t.vertex(0)).point;
	let p1 = mesh.vertex(t.vertex(1)).point;
	let p2 = mesh.vertex(t.vertex(2)).point;
	barycentric_elevation(p0, p1, p2, x, y).or(Some((p0.elevation + p1.elevation + p2.elevation) / 3.0))
}

/// Clips `source` to the axis-aligned rectangle `[x_min, x_max] x [y_min,
/// y_max]`, returning a brand-new triangulation covering exactly that
/// window. The source triangulation is read-only; the source locator is
/// mutated only by the read-only elevation queries it performs.
pub fn intersect_rect(source: &Mesh, source_locator: &mut dyn PointLocator, x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> (Mesh, LinearLocator) {
	let corners = [(x_min, y_max), (x_max, y_max), (x_max, y_min), (x_min, y_min)];
	let corner_points: Vec<ElevationPoint> = corners
		.iter()
		.map(|&(x, y)| {
			let elevation = query_elevation(source, source_locator, x, y).unwrap_or(0.0);
			ElevationPoint::corner(x, y, elevation)
		})
		.collect();

	let lines = [Line::Vertical(x_min), Line::Vertical(x_max), Line::Horizontal(y_min), Line::Horizontal(y_max)];

	// Top/bottom and left/right crossings are gathered into separate buckets
	// and thinned independently below, each along its own dominant axis, so
	// a point near a corner is never compared against a point on the
	// adjacent side.
	let mut top = Vec::new();
	let mut bottom = Vec::new();
	let mut left = Vec::new();
	let mut right = Vec::new();
	for (_, t) in source.triangles() {
		for e in 0..3 {
			let a = source.vertex(t.vertex(e)).point;
			let b = source.vertex(t.vertex((e + 1) % 3)).point;
			for line in &lines {
				let Some(p) = segment_crosses_line(a, b, line, x_min, y_min, x_max, y_max) else {
					continue;
				};
				match line {
					Line::Horizontal(y) if (*y - y_max).abs() < f64::EPSILON => top.push(p),
					Line::Horizontal(_) => bottom.push(p),
					Line::Vertical(x) if (*x - x_max).abs() < f64::EPSILON => right.push(p),
					Line::Vertical(_) => left.push(p),
				}
			}
		}
	}

	let mut interior = Vec::new();
	for (_, t) in source.triangles() {
		for i in 0..3 {
			let p = source.vertex(t.vertex(i)).point;
			if p.is_removable() && p.x > x_min && p.x < x_max && p.y < y_max && p.y > y_min {
				interior.push(p);
			}
		}
	}
	interior.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal).then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal)));
	interior.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);

	let corner_drop = (x_max - x_min).abs() / 34.0;
	let spacing = (x_max - x_min).abs().max((y_max - y_min).abs()) / 17.0;
	let thin_by_x = |mut points: Vec<ElevationPoint>| -> Vec<ElevationPoint> {
		points.retain(|p| corners.iter().all(|&(cx, cy)| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt() > corner_drop));
		points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
		points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9);
		thin_consecutive(&mut points, spacing);
		points
	};
	let thin_by_y = |mut points: Vec<ElevationPoint>| -> Vec<ElevationPoint> {
		points.retain(|p| corners.iter().all(|&(cx, cy)| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt() > corner_drop));
		points.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));
		points.dedup_by(|a, b| (a.y - b.y).abs() < 1e-9);
		thin_consecutive(&mut points, spacing);
		points
	};

	let mut edge_points = thin_by_x(top);
	edge_points.extend(thin_by_x(bottom));
	edge_points.extend(thin_by_y(left));
	edge_points.extend(thin_by_y(right));

	let mut mesh = Mesh::new();
	let mut locator = LinearLocator::new();
	seed_rectangle(&mut mesh, &mut locator, &corner_points);
	for p in edge_points {
		insert_point(&mut mesh, &mut locator, p);
	}
	for p in interior {
		insert_point(&mut mesh, &mut locator, p);
	}

	(mesh, locator)
}

fn thin_consecutive(points: &mut Vec<ElevationPoint>, min_spacing: f64) {
	if points.len() < 2 {
		return;
	}
	let mut kept = Vec::with_capacity(points.len());
	kept.push(points[0]);
	for &p in points.iter().skip(1) {
		let last = *kept.last().unwrap();
		let d = ((p.x - last.x).powi(2) + (p.y - last.y).powi(2)).sqrt();
		if d > min_spacing {
			kept.push(p);
		}
	}
	*points = kept;
}

fn segment_crosses_line(a: ElevationPoint, b: ElevationPoint, line: &Line, x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Option<ElevationPoint> {
	match *line {
		Line::Vertical(x) => {
			if (a.x - x) * (b.x - x) >= 0.0 || (a.x - b.x).abs() < f64::EPSILON {
				return None;
			}
			let t = (x - a.x) / (b.x - a.x);
			let y = a.y + t * (b.y - a.y);
			if y < y_min || y > y_max {
				return None;
			}
			let elevation = a.elevation + t * (b.elevation - a.elevation);
			Some(ElevationPoint::edge_cut(x, y, elevation))
		}
		Line::Horizontal(y) => {
			if (a.y - y) * (b.y - y) >= 0.0 || (a.y - b.y).abs() < f64::EPSILON {
				return None;
			}
			let t = (y - a.y) / (b.y - a.y);
			let x = a.x + t * (b.x - a.x);
			if x < x_min || x > x_max {
				return None;
			}
			let elevation = a.elevation + t * (b.elevation - a.elevation);
			Some(ElevationPoint::edge_cut(x, y, elevation))
		}
	}
}

/// Seeds a fresh mesh with two triangles spanning `corners` (given in CCW
/// order: top-left, top-right, bottom-right, bottom-left).
fn seed_rectangle(mesh: &mut Mesh, locator: &mut LinearLocator, corners: &[ElevationPoint]) {
	let ids: Vec<_> = corners.iter().map(|&p| mesh.add_vertex(p)).collect();
	let t0 = mesh.add_triangle(ids[0], ids[1], ids[2]);
	let t1 = mesh.add_triangle(ids[0], ids[2], ids[3]);
	mesh.set_neighbor(t0, 1, Some(t1));
	mesh.set_neighbor(t1, 2, Some(t0));
	locator.add_triangle(mesh, t0);
	locator.add_triangle(mesh, t1);
}
