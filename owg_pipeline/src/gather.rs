//! Gathers the 3x3 tile neighborhood needed to triangulate one output tile.

use std::path::Path;

use anyhow::Result;
use owg_core::elevation_point::ElevationPoint;
use owg_core::io::points::read_pts;
use owg_core::io::tile_store::{TileExt, TileStore};
use owg_core::quadkey::TileCoord;

/// Every point collected from the central tile and its eight neighbors,
/// plus the Mercator rectangle spanning all nine tiles.
pub struct Neighborhood {
	pub points: Vec<ElevationPoint>,
	pub bounds: (f64, f64, f64, f64), // (x_min, y_min, x_max, y_max)
}

/// Reads the `.pts` point-set file for each of the 3x3 tiles centered on
/// `(tx, ty)` at `lod` from `store`'s temp tree, concatenating every point
/// found (a missing neighbor file contributes nothing, per
/// [`owg_core::io::points::read_pts`]'s missing-file policy).
pub fn gather_neighborhood(store: &TileStore, lod: u8, tx: i64, ty: i64) -> Result<Neighborhood> {
	let mut points = Vec::new();
	let mut x_min = f64::INFINITY;
	let mut y_min = f64::INFINITY;
	let mut x_max = f64::NEG_INFINITY;
	let mut y_max = f64::NEG_INFINITY;

	for dy in -1..=1i64 {
		for dx in -1..=1i64 {
			let neighbor = TileCoord::new(tx + dx, ty + dy, lod);
			let path = store.temp_tile_path(lod, neighbor.x, neighbor.y, TileExt::Pts);
			points.extend(read_pts(Path::new(&path))?);

			let (nx0, ny0, nx1, ny1) = neighbor.mercator_extent()?;
			x_min = x_min.min(nx0.min(nx1));
			x_max = x_max.max(nx0.max(nx1));
			y_min = y_min.min(ny0.min(ny1));
			y_max = y_max.max(ny0.max(ny1));
		}
	}

	Ok(Neighborhood {
		points,
		bounds: (x_min, y_min, x_max, y_max),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use owg_core::io::points::write_pts;
	use tempfile::tempdir;

	#[test]
	fn missing_neighbors_contribute_nothing() {
		let dir = tempdir().unwrap();
		let store = TileStore::new(dir.path());
		let center_path = store.temp_tile_path(4, 5, 5, TileExt::Pts);
		write_pts(&center_path, &[ElevationPoint::new(0.0, 0.0, 1.0, 0.0)]).unwrap();

		let neighborhood = gather_neighborhood(&store, 4, 5, 5).unwrap();
		assert_eq!(neighborhood.points.len(), 1);
		assert!(neighborhood.bounds.0 < neighborhood.bounds.2);
		assert!(neighborhood.bounds.1 < neighborhood.bounds.3);
	}
}
