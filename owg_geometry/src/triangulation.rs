//! Top-level triangulation API: seed, insert, remove, simplify, clip.

use owg_core::elevation_point::ElevationPoint;

use crate::clip;
use crate::insert::insert_point;
use crate::locate::{LinearLocator, PointLocator};
use crate::mesh::{Mesh, TriangleId, VertexId};
use crate::remove::remove_vertex;
use crate::simplify;

/// An incremental Delaunay triangulation over an axis-aligned domain.
///
/// Seeded with a bounding rectangle (its four corners are supersimplex
/// vertices, never returned by traversal and never removable), then built
/// up by repeated [`insert`](Self::insert). `Triangulation` owns both the
/// arena ([`Mesh`]) and a [`LinearLocator`] kept in sync with it.
pub struct Triangulation {
	mesh: Mesh,
	locator: LinearLocator,
}

impl Triangulation {
	/// Seeds an empty triangulation covering `[x_min, x_max] x [y_min,
	/// y_max]` with two supersimplex triangles.
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
		let mut mesh = Mesh::new();
		let mut locator = LinearLocator::new();

		let v0 = mesh.add_vertex(ElevationPoint::supersimplex(x_min, y_max));
		let v1 = mesh.add_vertex(ElevationPoint::supersimplex(x_max, y_max));
		let v2 = mesh.add_vertex(ElevationPoint::supersimplex(x_max, y_min));
		let v3 = mesh.add_vertex(ElevationPoint::supersimplex(x_min, y_min));
		let t0 = mesh.add_triangle(v0, v1, v2);
		let t1 = mesh.add_triangle(v0, v2, v3);
		mesh.set_neighbor(t0, 1, Some(t1));
		mesh.set_neighbor(t1, 2, Some(t0));
		locator.add_triangle(&mesh, t0);
		locator.add_triangle(&mesh, t1);

		Triangulation { mesh, locator }
	}

	pub fn mesh(&self) -> &Mesh {
		&self.mesh
	}

	pub fn vertex_count(&self) -> usize {
		self.mesh.vertex_count()
	}

	pub fn triangle_count(&self) -> usize {
		self.mesh.triangle_count()
	}

	/// Inserts a data point. Returns `false` for a duplicate vertex or a
	/// point outside the seeded domain, never an error.
	pub fn insert(&mut self, point: ElevationPoint) -> bool {
		insert_point(&mut self.mesh, &mut self.locator, point).is_some()
	}

	/// Removes a vertex by id, re-triangulating its star. See
	/// [`crate::remove::remove_vertex`] for the exact failure policy.
	pub fn remove(&mut self, vertex: VertexId) -> bool {
		remove_vertex(&mut self.mesh, &mut self.locator, vertex)
	}

	pub fn vertex_error(&self, vertex: VertexId) -> Option<f64> {
		simplify::vertex_error(&self.mesh, vertex)
	}

	/// Removes the cheapest-error candidate repeatedly, for at most `target`
	/// removals (a budget, not a final vertex count). Returns the number
	/// removed.
	pub fn reduce(&mut self, target: usize) -> usize {
		simplify::reduce(&mut self.mesh, &mut self.locator, target)
	}

	/// Removes vertices with error at or below `epsilon`, cheapest first,
	/// up to `max_iterations` removals. Returns the number removed.
	pub fn simplify(&mut self, epsilon: f64, max_iterations: usize) -> usize {
		simplify::simplify(&mut self.mesh, &mut self.locator, epsilon, max_iterations)
	}

	/// Barycentrically interpolates the elevation at `(x, y)`, or `None` if
	/// it falls outside the triangulation's current extent.
	pub fn query_elevation(&mut self, x: f64, y: f64) -> Option<f64> {
		clip::query_elevation(&self.mesh, &mut self.locator, x, y)
	}

	/// Builds a brand-new triangulation restricted to the given rectangle,
	/// seeded from its corners, boundary crossings, and interior vertices
	/// of `self`. `self` is left untouched.
	pub fn intersect_rect(&mut self, x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Triangulation {
		let (mesh, locator) = clip::intersect_rect(&self.mesh, &mut self.locator, x_min, y_min, x_max, y_max);
		Triangulation { mesh, locator }
	}

	pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &crate::mesh::Triangle)> {
		self.mesh.triangles()
	}

	/// Inserts both endpoints of a line segment plus every point where the
	/// segment crosses an existing triangle edge, in order from `a` to `b`.
	/// Useful for forcing a break line (a ridge, a watercourse) into the
	/// mesh. Returns the ordered list of interior crossing coordinates
	/// (excluding the two endpoints).
	pub fn insert_line(&mut self, ax: f64, ay: f64, bx: f64, by: f64, elevation_a: f64, elevation_b: f64) -> Vec<(f64, f64)> {
		let crossings = self.intersect_line(ax, ay, bx, by);

		self.insert(ElevationPoint::new(ax, ay, elevation_a, 0.0));
		for &(cx, cy) in &crossings {
			let t = ((cx - ax).hypot(cy - ay)) / (bx - ax).hypot(by - ay);
			let elevation = elevation_a + t.clamp(0.0, 1.0) * (elevation_b - elevation_a);
			self.insert(ElevationPoint::new(cx, cy, elevation, 0.0));
		}
		self.insert(ElevationPoint::new(bx, by, elevation_b, 0.0));

		crossings
	}

	/// Finds every point where segment `(a, b)` crosses a triangle edge of
	/// the current mesh, ordered from `a` to `b`, without inserting them.
	pub fn intersect_line(&self, ax: f64, ay: f64, bx: f64, by: f64) -> Vec<(f64, f64)> {
		use crate::predicates::find_oriented_intersection;

		let mut hits = Vec::new();
		for (_, t) in self.mesh.triangles() {
			for e in 0..3 {
				let p0 = self.mesh.vertex(t.vertex(e)).point;
				let p1 = self.mesh.vertex(t.vertex((e + 1) % 3)).point;
				if let Some(u) = find_oriented_intersection(ax, ay, bx, by, p0.x, p0.y, p1.x, p1.y) {
					hits.push((ax + u * (bx - ax), ay + u * (by - ay)));
				}
			}
		}
		hits.sort_by(|(x0, y0), (x1, y1)| {
			let d0 = (x0 - ax).hypot(y0 - ay);
			let d1 = (x1 - ax).hypot(y1 - ay);
			d0.partial_cmp(&d1).unwrap_or(std::cmp::Ordering::Equal)
		});
		hits.dedup_by(|a, b| (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);
		hits
	}
}
