//! Drives the per-tile processing pipeline: gather the 3x3 neighborhood,
//! triangulate, clip to the central tile, reduce, and serialize.

use std::fs::File;
use std::io::BufWriter;

use anyhow::Result;
use owg_core::elevation_point::ElevationPoint;
use owg_core::io::tile_store::{TileExt, TileStore};
use owg_geometry::triangulation::Triangulation;

use crate::gather::gather_neighborhood;
use crate::tile_json::{build_tile_mesh, write_tile_json, write_tri_checkpoint};

/// Point-count bounds enforced on every output tile by [`reduce`].
pub const DEFAULT_MIN_POINTS: usize = 512;
pub const DEFAULT_MAX_POINTS: usize = 2048;

#[derive(Debug, Clone, Copy)]
pub struct TileDriverConfig {
	pub max_points: usize,
}

impl Default for TileDriverConfig {
	fn default() -> Self {
		TileDriverConfig { max_points: DEFAULT_MAX_POINTS }
	}
}

/// Processes one output tile `(lod, tx, ty)`:
///
/// 1. Gather the 3x3 tile neighborhood's points and combined bounding rect.
/// 2. Build a triangulation over that rect and insert every gathered point.
/// 3. Clip to the central tile's exact Mercator rectangle.
/// 4. Reduce to at most `config.max_points` vertices.
/// 5. Serialize the result to `tiles/<lod>/<tx>/<ty>.json`.
/// 6. Write a binary `.tri` checkpoint to `temp/tiles/<lod>/<tx>/<ty>.tri`.
pub fn process_tile(store: &TileStore, lod: u8, tx: i64, ty: i64, config: TileDriverConfig) -> Result<usize> {
	let neighborhood = gather_neighborhood(store, lod, tx, ty)?;
	let (x_min, y_min, x_max, y_max) = neighborhood.bounds;

	let mut triangulation = Triangulation::new(x_min, y_min, x_max, y_max);
	for point in neighborhood.points {
		triangulation.insert(point);
	}

	let center = owg_core::quadkey::TileCoord::new(tx, ty, lod);
	let (cx0, cy0, cx1, cy1) = center.mercator_extent()?;
	let (cx_min, cx_max) = (cx0.min(cx1), cx0.max(cx1));
	let (cy_min, cy_max) = (cy0.min(cy1), cy0.max(cy1));

	let mut clipped = triangulation.intersect_rect(cx_min, cy_min, cx_max, cy_max);
	let budget = clipped.vertex_count().saturating_sub(config.max_points);
	let removed = clipped.reduce(budget);

	let mesh = build_tile_mesh(&clipped, (cx_min, cy_min, cx_max, cy_max));

	let json_path = store.tile_path(lod, tx, ty, TileExt::Json);
	TileStore::ensure_parent(&json_path)?;
	let json_file = TileStore::open_locked_for_write(&json_path)?;
	write_tile_json(&mesh, &mut BufWriter::new(json_file))?;

	let tri_path = store.temp_tile_path(lod, tx, ty, TileExt::Tri);
	TileStore::ensure_parent(&tri_path)?;
	let tri_file: File = TileStore::open_locked_for_write(&tri_path)?;
	write_tri_checkpoint(&mesh, &mut BufWriter::new(tri_file))?;

	Ok(removed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use owg_core::io::points::write_pts;
	use tempfile::tempdir;

	#[test]
	fn process_tile_writes_json_and_checkpoint() {
		let dir = tempdir().unwrap();
		let store = TileStore::new(dir.path());
		let lod = 6u8;
		let tx = 20i64;
		let ty = 20i64;

		let center = owg_core::quadkey::TileCoord::new(tx, ty, lod);
		let (x0, y0, x1, y1) = center.mercator_extent().unwrap();
		let (x_min, x_max) = (x0.min(x1), x0.max(x1));
		let (y_min, y_max) = (y0.min(y1), y0.max(y1));
		let mid_x = (x_min + x_max) / 2.0;
		let mid_y = (y_min + y_max) / 2.0;

		let pts_path = store.temp_tile_path(lod, tx, ty, TileExt::Pts);
		write_pts(&pts_path, &[ElevationPoint::new(mid_x, mid_y, 42.0, 0.0)]).unwrap();

		let removed = process_tile(&store, lod, tx, ty, TileDriverConfig::default()).unwrap();
		assert_eq!(removed, 0);

		let json_path = store.tile_path(lod, tx, ty, TileExt::Json);
		assert!(json_path.is_file());
		let tri_path = store.temp_tile_path(lod, tx, ty, TileExt::Tri);
		assert!(tri_path.is_file());
	}
}
