//! `owg calcextent` — computes a layer's tile extent at a given level of
//! detail from a WGS84 bounding box.

use clap::Args;
use owg_core::mercator::Mercator;
use owg_core::quadkey::TileCoord;

use crate::cli_error::CliError;

#[derive(Args, Debug)]
pub struct Subcommand {
	/// West longitude, degrees.
	#[arg(long)]
	pub lng0: f64,
	/// South latitude, degrees.
	#[arg(long)]
	pub lat0: f64,
	/// East longitude, degrees.
	#[arg(long)]
	pub lng1: f64,
	/// North latitude, degrees.
	#[arg(long)]
	pub lat1: f64,
	/// Level of detail to compute the extent at.
	#[arg(long)]
	pub lod: u8,
}

/// Returns the inclusive tile extent `(tx0, ty0, tx1, ty1)` covering the
/// WGS84 bounding box at `lod`.
pub fn calc_extent(lng0: f64, lat0: f64, lng1: f64, lat1: f64, lod: u8) -> (i64, i64, i64, i64) {
	let projection = Mercator::spherical();
	let sw = TileCoord::from_wgs84(&projection, lng0, lat0, lod);
	let ne = TileCoord::from_wgs84(&projection, lng1, lat1, lod);

	let tx0 = sw.x.min(ne.x);
	let tx1 = sw.x.max(ne.x);
	// Tile rows increase southward, so the northern latitude yields the
	// smaller row index.
	let ty0 = sw.y.min(ne.y);
	let ty1 = sw.y.max(ne.y);

	(tx0, ty0, tx1, ty1)
}

pub fn run(args: &Subcommand) -> Result<(), CliError> {
	if args.lng0 >= args.lng1 || args.lat0 >= args.lat1 {
		return Err(CliError::params("bounding box is empty or inverted (expect lng0<lng1, lat0<lat1)"));
	}

	let (tx0, ty0, tx1, ty1) = calc_extent(args.lng0, args.lat0, args.lng1, args.lat1, args.lod);
	println!("{tx0} {ty0} {tx1} {ty1}");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn whole_globe_at_lod_0_is_a_single_tile() {
		let (tx0, ty0, tx1, ty1) = calc_extent(-180.0, -85.0, 180.0, 85.0, 0);
		assert_eq!((tx0, ty0, tx1, ty1), (0, 0, 0, 0));
	}

	#[test]
	fn extent_widens_with_lod() {
		let (tx0, ty0, tx1, ty1) = calc_extent(7.0, 47.0, 7.1, 47.1, 10);
		assert!(tx1 >= tx0);
		assert!(ty1 >= ty0);
	}

	#[test]
	fn rejects_inverted_bbox() {
		let args = Subcommand { lng0: 10.0, lat0: 0.0, lng1: 5.0, lat1: 1.0, lod: 5 };
		assert!(run(&args).is_err());
	}
}
