//! Error-driven simplification: rank removable vertices by how much the
//! surface would change without them, and drop the cheapest ones first.

use crate::locate::PointLocator;
use crate::mesh::{Mesh, VertexId};
use crate::predicates::barycentric_elevation;
use crate::remove::{gather_star, plan_ear_triangulation, remove_vertex};

/// The interpolation error incurred by removing `vertex`: the link polygon
/// is re-triangulated exactly as [`remove_vertex`] would do it, and the
/// vertex's own elevation is compared against the barycentric interpolation
/// of whichever output triangle contains its `(x, y)`.
///
/// Returns `None` for a vertex that cannot be removed at all (protected,
/// on the boundary, or ear clipping stalls) — such a vertex is never a
/// candidate for [`reduce`]/[`simplify`].
pub fn vertex_error(mesh: &Mesh, vertex: VertexId) -> Option<f64> {
	let point = mesh.vertex(vertex).point;
	if !point.is_removable() || point.is_protected() {
		return None;
	}

	let (_, link) = gather_star(mesh, vertex)?;
	if link.len() < 3 {
		return None;
	}
	let outputs = plan_ear_triangulation(mesh, &link, point)?;

	for (s0, s1, s2) in outputs {
		let p0 = mesh.vertex(s0).point;
		let p1 = mesh.vertex(s1).point;
		let p2 = mesh.vertex(s2).point;
		if let Some(elevation) = barycentric_elevation(p0, p1, p2, point.x, point.y) {
			return Some((elevation - point.elevation).abs());
		}
	}

	None
}

fn cheapest_candidate(mesh: &Mesh, vertices: &[VertexId]) -> Option<(VertexId, f64)> {
	vertices
		.iter()
		.filter_map(|&v| vertex_error(mesh, v).map(|e| (v, e)))
		.min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

fn all_vertex_ids(mesh: &Mesh) -> Vec<VertexId> {
	// Mesh exposes vertices only through triangles; collect the distinct
	// set referenced by the current triangulation.
	let mut ids = std::collections::HashSet::new();
	for (_, t) in mesh.triangles() {
		for i in 0..3 {
			ids.insert(t.vertex(i));
		}
	}
	ids.into_iter().collect()
}

/// Removes the cheapest-error vertex repeatedly, for at most `target`
/// removals, stopping early once no finite-error vertex remains. `target`
/// is a removal budget, not a final vertex-count bound — callers wanting a
/// size cap should pass `current_count.saturating_sub(desired_count)`.
/// Returns the number actually removed.
pub fn reduce(mesh: &mut Mesh, locator: &mut dyn PointLocator, target: usize) -> usize {
	let mut removed = 0;
	for _ in 0..target {
		let candidates = all_vertex_ids(mesh);
		let Some((vertex, _)) = cheapest_candidate(mesh, &candidates) else {
			break;
		};
		if !remove_vertex(mesh, locator, vertex) {
			break;
		}
		removed += 1;
	}
	removed
}

/// Removes vertices in increasing order of error as long as the cheapest
/// remaining candidate's error stays at or below `epsilon`, for at most
/// `max_iterations` removals. Returns the number actually removed.
pub fn simplify(mesh: &mut Mesh, locator: &mut dyn PointLocator, epsilon: f64, max_iterations: usize) -> usize {
	let mut removed = 0;
	for _ in 0..max_iterations {
		let candidates = all_vertex_ids(mesh);
		let Some((vertex, error)) = cheapest_candidate(mesh, &candidates) else {
			break;
		};
		if error > epsilon {
			break;
		}
		if !remove_vertex(mesh, locator, vertex) {
			break;
		}
		removed += 1;
	}
	removed
}
