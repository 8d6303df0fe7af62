//! Incremental point insertion: locate, classify, split, and legalize.

use owg_core::elevation_point::ElevationPoint;

use crate::locate::{PointLocator, PointTriangleRelation};
use crate::mesh::{Mesh, TriangleId};
use crate::predicates::in_circle;

/// Inserts `point` into the triangulation located via `locator`, starting
/// the search from whatever triangle `locator` last touched.
///
/// Returns the new vertex's triangle on success. Returns `None` when the
/// point coincides with an existing vertex (duplicate insertion is a no-op,
/// not an error) or when it falls strictly outside every triangle the
/// locator can reach (the convex hull of the current mesh does not cover
/// it — callers are expected to have seeded a supersimplex covering the
/// whole domain so this should not happen in practice).
pub fn insert_point(mesh: &mut Mesh, locator: &mut dyn PointLocator, point: ElevationPoint) -> Option<TriangleId> {
	let (triangle, relation, _rx, _ry) = locator.locate(mesh, point.x, point.y)?;

	match relation {
		PointTriangleRelation::Vertex(_) => None,
		PointTriangleRelation::Inside => Some(split_in_triangle(mesh, locator, triangle, point)),
		PointTriangleRelation::Edge(edge) => Some(split_on_edge(mesh, locator, triangle, edge, point)),
		PointTriangleRelation::Outside | PointTriangleRelation::Invalid => None,
	}
}

/// 1-to-3 split: replaces `triangle` with three triangles sharing the new
/// vertex, then legalizes the three edges opposite it.
fn split_in_triangle(mesh: &mut Mesh, locator: &mut dyn PointLocator, triangle: TriangleId, point: ElevationPoint) -> TriangleId {
	let old = *mesh.triangle(triangle);
	let new_vertex = mesh.add_vertex(point);

	let v0 = old.vertex(0);
	let v1 = old.vertex(1);
	let v2 = old.vertex(2);
	let n0 = old.neighbor(0);
	let n1 = old.neighbor(1);
	let n2 = old.neighbor(2);

	// Reuse `triangle` as (v0, v1, new) and create two fresh ones.
	mesh.set_vertex(triangle, 2, new_vertex);
	mesh.set_neighbor(triangle, 0, n0);

	let t1 = mesh.add_triangle(v1, v2, new_vertex);
	let t2 = mesh.add_triangle(v2, v0, new_vertex);

	mesh.set_neighbor(triangle, 1, Some(t1));
	mesh.set_neighbor(triangle, 2, Some(t2));
	mesh.set_neighbor(t1, 1, Some(t2));
	mesh.set_neighbor(t1, 2, Some(triangle));
	mesh.set_neighbor(t2, 1, Some(triangle));
	mesh.set_neighbor(t2, 2, Some(t1));

	if let Some(n) = n0 {
		if let Some(back) = mesh.neighbor_index_of(n, triangle) {
			mesh.set_neighbor(n, back, Some(triangle));
		}
	}
	relink_external_neighbor(mesh, n1, triangle, t1);
	relink_external_neighbor(mesh, n2, triangle, t2);
	mesh.set_neighbor(t1, 0, n1);
	mesh.set_neighbor(t2, 0, n2);

	locator.add_triangle(mesh, triangle);
	locator.add_triangle(mesh, t1);
	locator.add_triangle(mesh, t2);

	legalize(mesh, locator, triangle, 0);
	legalize(mesh, locator, t1, 0);
	legalize(mesh, locator, t2, 0);

	triangle
}

/// 2-to-4 split (or 1-to-2 at the hull boundary): splits `triangle` and, if
/// present, its neighbor across `edge` into four triangles sharing the new
/// vertex, then legalizes the four outer edges.
fn split_on_edge(mesh: &mut Mesh, locator: &mut dyn PointLocator, triangle: TriangleId, edge: usize, point: ElevationPoint) -> TriangleId {
	let neighbor = mesh.triangle(triangle).neighbor(edge);
	let new_vertex = mesh.add_vertex(point);

	let old_a = *mesh.triangle(triangle);
	let pa = old_a.vertex(edge);
	let opp_a = old_a.vertex((edge + 2) % 3);
	let pb = old_a.vertex((edge + 1) % 3);
	let na_far = old_a.neighbor((edge + 2) % 3);
	let na_near = old_a.neighbor((edge + 1) % 3);

	// triangle becomes (pa, new, opp_a); a fresh triangle is (new, pb, opp_a).
	mesh.set_vertex(triangle, (edge + 1) % 3, new_vertex);
	let ta2 = mesh.add_triangle(new_vertex, pb, opp_a);
	mesh.set_neighbor(triangle, (edge + 2) % 3, Some(ta2));
	mesh.set_neighbor(ta2, 2, Some(triangle));
	mesh.set_neighbor(ta2, 0, na_near);
	relink_external_neighbor(mesh, na_near, triangle, ta2);
	mesh.set_neighbor(triangle, (edge + 1) % 3, na_far);
	if let Some(n) = na_far {
		if let Some(back) = mesh.neighbor_index_of(n, triangle) {
			mesh.set_neighbor(n, back, Some(triangle));
		}
	}

	locator.add_triangle(mesh, triangle);
	locator.add_triangle(mesh, ta2);
	legalize(mesh, locator, triangle, (edge + 1) % 3);
	legalize(mesh, locator, ta2, 1);

	let Some(b_id) = neighbor else {
		return triangle;
	};
	let Some(b_edge) = mesh.neighbor_index_of(b_id, triangle).or_else(|| {
		// the edge in `b_id` facing the original triangle has already been
		// rewired above to point at `triangle`; find it via the shared vertices.
		find_shared_edge(mesh, b_id, pa, pb)
	}) else {
		return triangle;
	};

	let old_b = *mesh.triangle(b_id);
	let opp_b = old_b.vertex((b_edge + 2) % 3);
	let nb_far = old_b.neighbor((b_edge + 2) % 3);
	let nb_near = old_b.neighbor((b_edge + 1) % 3);

	mesh.set_vertex(b_id, (b_edge + 1) % 3, new_vertex);
	let tb2 = mesh.add_triangle(pb, new_vertex, opp_b);
	mesh.set_neighbor(b_id, (b_edge + 2) % 3, Some(tb2));
	mesh.set_neighbor(tb2, 2, Some(b_id));
	mesh.set_neighbor(tb2, 1, nb_near);
	relink_external_neighbor(mesh, nb_near, b_id, tb2);
	mesh.set_neighbor(b_id, (b_edge + 1) % 3, nb_far);
	if let Some(n) = nb_far {
		if let Some(back) = mesh.neighbor_index_of(n, b_id) {
			mesh.set_neighbor(n, back, Some(b_id));
		}
	}

	mesh.set_neighbor(triangle, edge, Some(b_id));
	mesh.set_neighbor(b_id, b_edge, Some(triangle));
	mesh.set_neighbor(ta2, 1, Some(tb2));
	mesh.set_neighbor(tb2, 0, Some(ta2));

	locator.add_triangle(mesh, b_id);
	locator.add_triangle(mesh, tb2);
	legalize(mesh, locator, b_id, (b_edge + 1) % 3);
	legalize(mesh, locator, tb2, 2);

	triangle
}

fn find_shared_edge(mesh: &Mesh, triangle: TriangleId, a: crate::mesh::VertexId, b: crate::mesh::VertexId) -> Option<usize> {
	let t = mesh.triangle(triangle);
	(0..3).find(|&i| {
		let x = t.vertex(i);
		let y = t.vertex((i + 1) % 3);
		(x == a && y == b) || (x == b && y == a)
	})
}

fn relink_external_neighbor(mesh: &mut Mesh, neighbor: Option<TriangleId>, old: TriangleId, new: TriangleId) {
	if let Some(n) = neighbor {
		if let Some(back) = mesh.neighbor_index_of(n, old) {
			mesh.set_neighbor(n, back, Some(new));
		}
	}
}

/// Recursively legalizes edge `edge` of `triangle`: if its opposite vertex
/// lies inside the circumcircle of `triangle`, flips the edge and recurses
/// on the two edges of the flipped quadrilateral that face outward.
fn legalize(mesh: &mut Mesh, locator: &mut dyn PointLocator, triangle: TriangleId, edge: usize) {
	let Some(neighbor) = mesh.triangle(triangle).neighbor(edge) else {
		return;
	};
	let Some(opposite) = mesh.opposite_vertex(triangle, edge) else {
		return;
	};

	let t = mesh.triangle(triangle);
	let a = mesh.vertex(t.vertex(edge)).point;
	let b = mesh.vertex(t.vertex((edge + 1) % 3)).point;
	let c = mesh.vertex(t.vertex((edge + 2) % 3)).point;
	let d = mesh.vertex(opposite).point;

	if d.is_supersimplex() {
		return;
	}
	if !is_convex_quad(a, b, c, d) {
		return;
	}
	if !in_circle(a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y) {
		return;
	}

	let Some((new_a, new_b)) = mesh.flip_edge(triangle, edge) else {
		return;
	};
	locator.add_triangle(mesh, new_a);
	locator.add_triangle(mesh, new_b);

	legalize(mesh, locator, new_a, 0);
	legalize(mesh, locator, new_b, 0);
	let _ = neighbor;
}

/// A quadrilateral `a,b,c,d` (with diagonal `a-c`) is strictly convex iff
/// `d` and `c` both lie on the side of `a-b`/`b-c` consistent with the
/// triangle winding, i.e. every one of its four corner turns agrees in sign.
fn is_convex_quad(a: ElevationPoint, b: ElevationPoint, c: ElevationPoint, d: ElevationPoint) -> bool {
	use crate::predicates::ccw;
	let s1 = ccw(a.x, a.y, b.x, b.y, d.x, d.y);
	let s2 = ccw(b.x, b.y, c.x, c.y, d.x, d.y);
	let s3 = ccw(c.x, c.y, a.x, a.y, d.x, d.y);
	(s1 > 0.0 && s2 > 0.0) || (s1 < 0.0 && s2 < 0.0) || (s3.abs() > 0.0 && s1.signum() == s3.signum() && s2.signum() == s3.signum())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::locate::LinearLocator;

	fn pt(x: f64, y: f64) -> ElevationPoint {
		ElevationPoint::new(x, y, 0.0, 0.0)
	}

	fn seeded_square() -> (Mesh, LinearLocator) {
		let mut mesh = Mesh::new();
		let v0 = mesh.add_vertex(ElevationPoint::supersimplex(0.0, 0.0));
		let v1 = mesh.add_vertex(ElevationPoint::supersimplex(10.0, 0.0));
		let v2 = mesh.add_vertex(ElevationPoint::supersimplex(10.0, 10.0));
		let v3 = mesh.add_vertex(ElevationPoint::supersimplex(0.0, 10.0));
		let t0 = mesh.add_triangle(v0, v1, v2);
		let t1 = mesh.add_triangle(v0, v2, v3);
		mesh.set_neighbor(t0, 1, Some(t1));
		mesh.set_neighbor(t1, 2, Some(t0));

		let mut locator = LinearLocator::new();
		locator.add_triangle(&mesh, t0);
		locator.add_triangle(&mesh, t1);
		(mesh, locator)
	}

	#[test]
	fn inserting_interior_point_adds_two_triangles() {
		let (mut mesh, mut locator) = seeded_square();
		let before = mesh.triangle_count();
		insert_point(&mut mesh, &mut locator, pt(5.0, 5.0)).expect("inside the square");
		assert_eq!(mesh.triangle_count(), before + 2);
		assert_eq!(mesh.vertex_count(), 5);
	}

	#[test]
	fn inserting_duplicate_vertex_is_a_no_op() {
		let (mut mesh, mut locator) = seeded_square();
		let before_t = mesh.triangle_count();
		let before_v = mesh.vertex_count();
		let result = insert_point(&mut mesh, &mut locator, pt(0.0, 0.0));
		assert!(result.is_none());
		assert_eq!(mesh.triangle_count(), before_t);
		assert_eq!(mesh.vertex_count(), before_v);
	}

	#[test]
	fn inserting_point_on_shared_edge_adds_two_triangles() {
		let (mut mesh, mut locator) = seeded_square();
		let before = mesh.triangle_count();
		insert_point(&mut mesh, &mut locator, pt(5.0, 5.0 * 10.0 / 10.0)).expect("on the diagonal");
		assert_eq!(mesh.triangle_count(), before + 2);
	}
}
