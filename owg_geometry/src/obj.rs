//! Wavefront OBJ export, used for visually inspecting a triangulation
//! while debugging the engine.

use std::io::Write;

use anyhow::Result;

use crate::mesh::Mesh;

/// Writes every triangle in `mesh` as a Wavefront OBJ mesh (`v x y z` /
/// `f i j k`, 1-indexed). Supersimplex vertices are exported like any
/// other, since the point of this format is visual inspection, not
/// round-tripping into the pipeline.
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
	let mut index_of = std::collections::HashMap::new();
	let mut next_index = 1u32;

	for (_, t) in mesh.triangles() {
		for i in 0..3 {
			let v = t.vertex(i);
			index_of.entry(v).or_insert_with(|| {
				let p = mesh.vertex(v).point;
				let idx = next_index;
				next_index += 1;
				(idx, p)
			});
		}
	}

	let mut ordered: Vec<_> = index_of.iter().collect();
	ordered.sort_by_key(|(_, (idx, _))| *idx);
	for (_, (_, p)) in &ordered {
		writeln!(writer, "v {} {} {}", p.x, p.y, p.elevation)?;
	}

	for (_, t) in mesh.triangles() {
		let i0 = index_of[&t.vertex(0)].0;
		let i1 = index_of[&t.vertex(1)].0;
		let i2 = index_of[&t.vertex(2)].0;
		writeln!(writer, "f {i0} {i1} {i2}")?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use owg_core::elevation_point::ElevationPoint;

	#[test]
	fn writes_one_vertex_line_per_vertex_and_one_face_per_triangle() {
		let mut mesh = Mesh::new();
		let v0 = mesh.add_vertex(ElevationPoint::new(0.0, 0.0, 1.0, 0.0));
		let v1 = mesh.add_vertex(ElevationPoint::new(1.0, 0.0, 2.0, 0.0));
		let v2 = mesh.add_vertex(ElevationPoint::new(0.0, 1.0, 3.0, 0.0));
		mesh.add_triangle(v0, v1, v2);

		let mut buf = Vec::new();
		write_obj(&mesh, &mut buf).unwrap();
		let text = String::from_utf8(buf).unwrap();
		assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
		assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 1);
	}
}
