//! Ear-reduction vertex removal: peel the star of triangles around a vertex
//! and re-triangulate the resulting polygon without it.

use owg_core::elevation_point::ElevationPoint;

use crate::locate::PointLocator;
use crate::mesh::{Mesh, TriangleId, VertexId};
use crate::predicates::{ccw, in_circle};

/// Removes `vertex` from the triangulation, re-triangulating the polygon
/// left behind by its incident triangles.
///
/// Returns `true` if the vertex was removed. Returns `false`, leaving the
/// mesh completely unchanged, if: the vertex is protected
/// ([`owg_core::elevation_point::ElevationPoint::is_removable`] is false),
/// its star is not a closed fan (it sits on an outer boundary — this engine
/// only removes interior data points), or no valid ear can be found in a
/// full pass over the link polygon. The last case is logged at debug level
/// rather than treated as an error: a removal that cannot legally proceed
/// is simply not performed.
pub fn remove_vertex(mesh: &mut Mesh, locator: &mut dyn PointLocator, vertex: VertexId) -> bool {
	if !mesh.vertex(vertex).point.is_removable() {
		return false;
	}

	let Some((triangles, link)) = gather_star(mesh, vertex) else {
		log::debug!("vertex removal skipped: not an interior vertex");
		return false;
	};

	if link.len() < 3 {
		return false;
	}

	let outer_spokes: Vec<(VertexId, VertexId, Option<TriangleId>)> = triangles
		.iter()
		.enumerate()
		.map(|(m, &tid)| {
			let a = link[m];
			let b = link[(m + 1) % link.len()];
			let idx = vertex_slot(mesh, tid, vertex);
			let outward = mesh.triangle(tid).neighbor((idx + 1) % 3);
			(a, b, outward)
		})
		.collect();

	let removed_point = mesh.vertex(vertex).point;
	let Some(outputs) = plan_ear_triangulation(mesh, &link, removed_point) else {
		log::debug!("vertex removal stalled: no ear found, leaving vertex in place");
		return false;
	};

	let mut slots = triangles.into_iter();
	let mut new_ids = Vec::with_capacity(outputs.len());
	for &(s0, s1, s2) in &outputs {
		let tid = slots.next().expect("enough reused slots for n-2 output triangles");
		mesh.set_vertex(tid, 0, s0);
		mesh.set_vertex(tid, 1, s1);
		mesh.set_vertex(tid, 2, s2);
		mesh.set_neighbor(tid, 0, None);
		mesh.set_neighbor(tid, 1, None);
		mesh.set_neighbor(tid, 2, None);
		new_ids.push(tid);
	}
	for leftover in slots {
		mesh.remove_triangle(leftover);
		locator.remove_triangle(leftover);
	}

	for &tid in &new_ids {
		for edge in 0..3 {
			let t = *mesh.triangle(tid);
			let a = t.vertex(edge);
			let b = t.vertex((edge + 1) % 3);
			if let Some(&(_, _, outward)) = outer_spokes.iter().find(|(x, y, _)| *x == a && *y == b) {
				mesh.set_neighbor(tid, edge, outward);
				if let Some(n) = outward {
					if let Some(back) = find_edge(mesh, n, b, a) {
						mesh.set_neighbor(n, back, Some(tid));
					}
				}
			}
		}
	}
	mesh.relink_patch(&new_ids);

	for &tid in &new_ids {
		locator.add_triangle(mesh, tid);
	}

	true
}

fn vertex_slot(mesh: &Mesh, triangle: TriangleId, vertex: VertexId) -> usize {
	(0..3).find(|&i| mesh.triangle(triangle).vertex(i) == vertex).expect("triangle must reference vertex")
}

fn find_edge(mesh: &Mesh, triangle: TriangleId, a: VertexId, b: VertexId) -> Option<usize> {
	(0..3).find(|&i| {
		let t = mesh.triangle(triangle);
		t.vertex(i) == a && t.vertex((i + 1) % 3) == b
	})
}

/// Walks the closed fan of triangles around `vertex`, returning the
/// triangles in rotational order and the CCW "link" polygon of their
/// opposite vertices. `None` if the fan is not closed (boundary vertex).
pub(crate) fn gather_star(mesh: &Mesh, vertex: VertexId) -> Option<(Vec<TriangleId>, Vec<VertexId>)> {
	let (start, start_idx) = mesh.triangles().find_map(|(id, t)| (0..3).find(|&i| t.vertex(i) == vertex).map(|i| (id, i)))?;

	let mut triangles = Vec::new();
	let mut link = Vec::new();
	let mut current = start;
	let mut idx = start_idx;

	loop {
		triangles.push(current);
		link.push(mesh.triangle(current).vertex((idx + 1) % 3));

		let next = mesh.triangle(current).neighbor(idx)?;
		if next == start {
			break;
		}
		let next_idx = vertex_slot(mesh, next, vertex);
		current = next;
		idx = next_idx;
	}

	Some((triangles, link))
}

/// Computes the ear-clipping retriangulation of the cyclic `link` polygon,
/// purely in terms of coordinates — no mesh mutation, so a stalled pass
/// leaves the caller free to bail out with nothing touched.
pub(crate) fn plan_ear_triangulation(mesh: &Mesh, link: &[VertexId], removed: ElevationPoint) -> Option<Vec<(VertexId, VertexId, VertexId)>> {
	let mut remaining = link.to_vec();
	let mut outputs = Vec::with_capacity(link.len().saturating_sub(2));

	while remaining.len() > 3 {
		let n = remaining.len();
		let mut chosen = None;

		for k in 0..n {
			let i0 = (k + n - 1) % n;
			let i2 = (k + 1) % n;
			let s0 = remaining[i0];
			let s1 = remaining[k];
			let s2 = remaining[i2];
			let p0 = mesh.vertex(s0).point;
			let p1 = mesh.vertex(s1).point;
			let p2 = mesh.vertex(s2).point;

			if ccw(p0.x, p0.y, p1.x, p1.y, p2.x, p2.y) <= 0.0 {
				continue;
			}
			if ccw(p0.x, p0.y, p2.x, p2.y, removed.x, removed.y) < 0.0 {
				continue;
			}

			let empty = (0..n).filter(|&j| j != i0 && j != k && j != i2).all(|j| {
				let p = mesh.vertex(remaining[j]).point;
				!in_circle(p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p.x, p.y)
			});

			if empty {
				chosen = Some((k, s0, s1, s2));
				break;
			}
		}

		let (k, s0, s1, s2) = chosen?;
		outputs.push((s0, s1, s2));
		remaining.remove(k);
	}

	outputs.push((remaining[0], remaining[1], remaining[2]));
	Some(outputs)
}
