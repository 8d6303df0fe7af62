//! Tile JSON serialization and the binary `.tri` checkpoint used for
//! coarser-LOD resampling.

use std::collections::HashMap;
use std::io::{Read, Write};

use anyhow::{Context, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use owg_core::elevation_point::ElevationPoint;
use owg_geometry::mesh::VertexId;
use owg_geometry::triangulation::Triangulation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonPoint {
	pub x: f64,
	pub y: f64,
	pub elevation: f64,
}

impl From<ElevationPoint> for JsonPoint {
	fn from(p: ElevationPoint) -> Self {
		JsonPoint { x: p.x, y: p.y, elevation: p.elevation }
	}
}

/// The serialized shape of one output tile: corners, the four (already
/// edge-sorted) crossing-point lists, the interior points, and a triangle
/// index array into the deduplicated point list built by concatenating
/// corners, then the four edge lists in N/E/S/W order, then interior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileMesh {
	pub corners: [JsonPoint; 4], // NW, NE, SE, SW
	pub edges: [Vec<JsonPoint>; 4], // N, E, S, W
	pub interior: Vec<JsonPoint>,
	pub triangles: Vec<[u32; 3]>,
}

impl TileMesh {
	/// Flattens the point list in the order the `triangles` indices assume.
	pub fn points(&self) -> Vec<&JsonPoint> {
		let mut out: Vec<&JsonPoint> = self.corners.iter().collect();
		for edge in &self.edges {
			out.extend(edge.iter());
		}
		out.extend(self.interior.iter());
		out
	}
}

/// Builds the serializable mesh for a clipped tile directly from its
/// triangulation, classifying each vertex by its
/// [`ElevationPoint`] weight (corner, edge cut, or ordinary interior point)
/// and bucketing edge cuts into N/E/S/W by which side of `bounds` they lie
/// on. `bounds` is `(x_min, y_min, x_max, y_max)`, the exact rectangle the
/// triangulation was clipped to.
pub fn build_tile_mesh(triangulation: &Triangulation, bounds: (f64, f64, f64, f64)) -> TileMesh {
	let (x_min, y_min, x_max, y_max) = bounds;
	let mesh = triangulation.mesh();

	let mut seen: HashMap<(i64, i64), VertexId> = HashMap::new();
	for (_, t) in triangulation.triangles() {
		for i in 0..3 {
			let v = t.vertex(i);
			let p = mesh.vertex(v).point;
			seen.entry((p.x.to_bits() as i64, p.y.to_bits() as i64)).or_insert(v);
		}
	}

	let mut corners = Vec::new();
	let mut north = Vec::new();
	let mut east = Vec::new();
	let mut south = Vec::new();
	let mut west = Vec::new();
	let mut interior = Vec::new();

	for &v in seen.values() {
		let p = mesh.vertex(v).point;
		if p.is_corner() {
			corners.push(p);
		} else if p.is_edge_cut() {
			if (p.y - y_max).abs() < 1e-6 {
				north.push(p);
			} else if (p.y - y_min).abs() < 1e-6 {
				south.push(p);
			} else if (p.x - x_max).abs() < 1e-6 {
				east.push(p);
			} else {
				west.push(p);
			}
		} else if p.is_removable() {
			interior.push(p);
		}
	}

	corners.sort_by(|a, b| {
		let angle = |p: &ElevationPoint| (p.y > (y_min + y_max) / 2.0, p.x > (x_min + x_max) / 2.0);
		angle(a).cmp(&angle(b))
	});
	north.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
	south.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
	east.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));
	west.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

	let corners: [ElevationPoint; 4] = [
		*corners.iter().find(|p| p.x <= x_min + 1e-6 && p.y >= y_max - 1e-6).unwrap_or(&ElevationPoint::corner(x_min, y_max, 0.0)),
		*corners.iter().find(|p| p.x >= x_max - 1e-6 && p.y >= y_max - 1e-6).unwrap_or(&ElevationPoint::corner(x_max, y_max, 0.0)),
		*corners.iter().find(|p| p.x >= x_max - 1e-6 && p.y <= y_min + 1e-6).unwrap_or(&ElevationPoint::corner(x_max, y_min, 0.0)),
		*corners.iter().find(|p| p.x <= x_min + 1e-6 && p.y <= y_min + 1e-6).unwrap_or(&ElevationPoint::corner(x_min, y_min, 0.0)),
	];

	let mut index_of: HashMap<(i64, i64), u32> = HashMap::new();
	let key = |p: &ElevationPoint| (p.x.to_bits() as i64, p.y.to_bits() as i64);
	let mut next = 0u32;
	for p in corners.iter().chain(north.iter()).chain(east.iter()).chain(south.iter()).chain(west.iter()).chain(interior.iter()) {
		index_of.entry(key(p)).or_insert_with(|| {
			let idx = next;
			next += 1;
			idx
		});
	}

	let mut triangles = Vec::new();
	for (_, t) in triangulation.triangles() {
		let mut indices = [0u32; 3];
		let mut ok = true;
		for i in 0..3 {
			let p = mesh.vertex(t.vertex(i)).point;
			match index_of.get(&key(&p)) {
				Some(&idx) => indices[i] = idx,
				None => {
					ok = false;
					break;
				}
			}
		}
		if ok {
			triangles.push(indices);
		}
	}

	TileMesh {
		corners: corners.map(JsonPoint::from),
		edges: [north, east, south, west].map(|e| e.into_iter().map(JsonPoint::from).collect()),
		interior: interior.into_iter().map(JsonPoint::from).collect(),
		triangles,
	}
}

pub fn write_tile_json<W: Write>(mesh: &TileMesh, writer: &mut W) -> Result<()> {
	serde_json::to_writer_pretty(writer, mesh).context("serializing tile JSON")
}

pub fn read_tile_json<R: Read>(reader: R) -> Result<TileMesh> {
	serde_json::from_reader(reader).context("parsing tile JSON")
}

/// Binary `.tri` checkpoint: a flat little-endian stream of the same
/// points used to build the tile mesh (corners, edges, interior, in that
/// order), each as `x, y, elevation` doubles. Used only by LOD resampling,
/// which re-triangulates from the points rather than replaying the mesh
/// topology.
pub fn write_tri_checkpoint<W: Write>(mesh: &TileMesh, writer: &mut W) -> Result<()> {
	for p in mesh.points() {
		writer.write_f64::<LittleEndian>(p.x)?;
		writer.write_f64::<LittleEndian>(p.y)?;
		writer.write_f64::<LittleEndian>(p.elevation)?;
	}
	Ok(())
}

pub fn read_tri_checkpoint<R: Read>(mut reader: R) -> Result<Vec<JsonPoint>> {
	let mut points = Vec::new();
	loop {
		let x = match reader.read_f64::<LittleEndian>() {
			Ok(v) => v,
			Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
			Err(err) => return Err(err).context("reading .tri checkpoint"),
		};
		let y = reader.read_f64::<LittleEndian>()?;
		let elevation = reader.read_f64::<LittleEndian>()?;
		points.push(JsonPoint { x, y, elevation });
	}
	Ok(points)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn json_round_trips() {
		let mesh = TileMesh {
			corners: [
				JsonPoint { x: 0.0, y: 1.0, elevation: 1.0 },
				JsonPoint { x: 1.0, y: 1.0, elevation: 2.0 },
				JsonPoint { x: 1.0, y: 0.0, elevation: 3.0 },
				JsonPoint { x: 0.0, y: 0.0, elevation: 4.0 },
			],
			edges: [vec![], vec![], vec![], vec![]],
			interior: vec![],
			triangles: vec![[0, 1, 2], [0, 2, 3]],
		};
		let mut buf = Vec::new();
		write_tile_json(&mesh, &mut buf).unwrap();
		let parsed = read_tile_json(&buf[..]).unwrap();
		assert_eq!(parsed, mesh);
	}

	#[test]
	fn tri_checkpoint_round_trips_coordinates() {
		let mesh = TileMesh {
			corners: [
				JsonPoint { x: 0.0, y: 1.0, elevation: 1.0 },
				JsonPoint { x: 1.0, y: 1.0, elevation: 2.0 },
				JsonPoint { x: 1.0, y: 0.0, elevation: 3.0 },
				JsonPoint { x: 0.0, y: 0.0, elevation: 4.0 },
			],
			edges: [vec![], vec![], vec![], vec![]],
			interior: vec![JsonPoint { x: 0.5, y: 0.5, elevation: 2.5 }],
			triangles: vec![],
		};
		let mut buf = Vec::new();
		write_tri_checkpoint(&mesh, &mut buf).unwrap();
		let points = read_tri_checkpoint(&buf[..]).unwrap();
		assert_eq!(points.len(), 5);
		assert_eq!(points[4].elevation, 2.5);
	}

	#[test]
	fn build_tile_mesh_classifies_corners_and_interior() {
		let mut tri = Triangulation::new(-10.0, -10.0, 10.0, 10.0);
		tri.insert(ElevationPoint::new(0.0, 0.0, 3.0, 0.0));
		let mut clipped = tri.intersect_rect(-5.0, -5.0, 5.0, 5.0);
		clipped.insert(ElevationPoint::new(1.0, 1.0, 9.0, 0.0));

		let mesh = build_tile_mesh(&clipped, (-5.0, -5.0, 5.0, 5.0));
		assert_eq!(mesh.corners.len(), 4);
		assert!(!mesh.triangles.is_empty());
		assert!(mesh.interior.iter().any(|p| (p.x - 1.0).abs() < 1e-9 && (p.y - 1.0).abs() < 1e-9));
	}
}
