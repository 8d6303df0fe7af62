//! `owg resample` — builds one coarser-LOD raw tile from its four children,
//! averaging image pixels or elevation samples (§4.9).

use std::path::PathBuf;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use clap::{Args, ValueEnum};
use owg_core::io::tile_store::{TileExt, TileStore};
use owg_pipeline::resample::{ELEVATION_SENTINEL, Rgba, resample_elevation, resample_image};

use crate::cli_error::CliError;

/// Raw tiles are stored as square grids of this side length.
const TILE_SIDE: usize = 256;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayerKind {
	Image,
	Elevation,
}

#[derive(Args, Debug)]
pub struct Subcommand {
	#[arg(long)]
	pub layer: PathBuf,
	#[arg(long, value_enum)]
	pub r#type: LayerKind,
	/// LOD of the tile being produced; its children live at `lod + 1`.
	#[arg(long)]
	pub lod: u8,
	#[arg(long)]
	pub tx: i64,
	#[arg(long)]
	pub ty: i64,
}

pub fn run(args: &Subcommand) -> Result<(), CliError> {
	let store = TileStore::new(&args.layer);
	let children = [
		(2 * args.tx, 2 * args.ty),
		(2 * args.tx + 1, 2 * args.ty),
		(2 * args.tx, 2 * args.ty + 1),
		(2 * args.tx + 1, 2 * args.ty + 1),
	];
	let child_lod = args.lod + 1;

	match args.r#type {
		LayerKind::Image => resample_image_tile(&store, child_lod, children, args.lod, args.tx, args.ty),
		LayerKind::Elevation => resample_elevation_tile(&store, child_lod, children, args.lod, args.tx, args.ty),
	}
}

fn read_image_grid(store: &TileStore, lod: u8, tx: i64, ty: i64) -> anyhow::Result<Vec<Rgba>> {
	let path = store.tile_path(lod, tx, ty, TileExt::Raw);
	let Ok(bytes) = std::fs::read(&path) else {
		return Ok(vec![(0, 0, 0, 0); TILE_SIDE * TILE_SIDE]);
	};
	Ok(bytes.chunks_exact(4).map(|c| (c[0], c[1], c[2], c[3])).collect())
}

fn write_image_grid(store: &TileStore, lod: u8, tx: i64, ty: i64, grid: &[Rgba]) -> anyhow::Result<()> {
	let path = store.tile_path(lod, tx, ty, TileExt::Raw);
	TileStore::ensure_parent(&path)?;
	let mut bytes = Vec::with_capacity(grid.len() * 4);
	for &(r, g, b, a) in grid {
		bytes.extend_from_slice(&[r, g, b, a]);
	}
	std::fs::write(&path, bytes)?;
	Ok(())
}

fn resample_image_tile(store: &TileStore, child_lod: u8, children: [(i64, i64); 4], lod: u8, tx: i64, ty: i64) -> Result<(), CliError> {
	let grids: Vec<Vec<Rgba>> = children
		.iter()
		.map(|&(cx, cy)| read_image_grid(store, child_lod, cx, cy))
		.collect::<anyhow::Result<_>>()?;

	let mut out = Vec::with_capacity(TILE_SIDE * TILE_SIDE);
	for row in 0..TILE_SIDE {
		for col in 0..TILE_SIDE {
			let idx = row * TILE_SIDE + col;
			out.push(resample_image([grids[0][idx], grids[1][idx], grids[2][idx], grids[3][idx]]));
		}
	}

	write_image_grid(store, lod, tx, ty, &out)?;
	log::info!("resampled image tile {lod}/{tx}/{ty} from its four children");
	Ok(())
}

fn read_elevation_grid(store: &TileStore, lod: u8, tx: i64, ty: i64) -> anyhow::Result<Vec<f64>> {
	let path = store.tile_path(lod, tx, ty, TileExt::Raw);
	let Ok(bytes) = std::fs::read(&path) else {
		return Ok(vec![ELEVATION_SENTINEL; TILE_SIDE * TILE_SIDE]);
	};
	let mut cursor = bytes.as_slice();
	let mut values = Vec::with_capacity(TILE_SIDE * TILE_SIDE);
	while !cursor.is_empty() {
		values.push(cursor.read_f64::<LittleEndian>()?);
	}
	Ok(values)
}

fn write_elevation_grid(store: &TileStore, lod: u8, tx: i64, ty: i64, grid: &[f64]) -> anyhow::Result<()> {
	let path = store.tile_path(lod, tx, ty, TileExt::Raw);
	TileStore::ensure_parent(&path)?;
	let mut bytes = Vec::with_capacity(grid.len() * 8);
	for &value in grid {
		bytes.write_f64::<LittleEndian>(value)?;
	}
	std::fs::write(&path, bytes)?;
	Ok(())
}

fn resample_elevation_tile(store: &TileStore, child_lod: u8, children: [(i64, i64); 4], lod: u8, tx: i64, ty: i64) -> Result<(), CliError> {
	let grids: Vec<Vec<f64>> = children
		.iter()
		.map(|&(cx, cy)| read_elevation_grid(store, child_lod, cx, cy))
		.collect::<anyhow::Result<_>>()?;

	let mut out = Vec::with_capacity(TILE_SIDE * TILE_SIDE);
	for row in 0..TILE_SIDE {
		for col in 0..TILE_SIDE {
			let idx = row * TILE_SIDE + col;
			out.push(resample_elevation([grids[0][idx], grids[1][idx], grids[2][idx], grids[3][idx]]));
		}
	}

	write_elevation_grid(store, lod, tx, ty, &out)?;
	log::info!("resampled elevation tile {lod}/{tx}/{ty} from its four children");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn missing_children_resample_image_to_transparent_black() {
		let dir = tempdir().unwrap();
		let args = Subcommand { layer: dir.path().to_path_buf(), r#type: LayerKind::Image, lod: 3, tx: 1, ty: 1 };
		run(&args).unwrap();

		let store = TileStore::new(dir.path());
		let grid = read_image_grid(&store, 3, 1, 1).unwrap();
		assert!(grid.iter().all(|&p| p == (0, 0, 0, 0)));
	}

	#[test]
	fn missing_children_resample_elevation_to_sentinel() {
		let dir = tempdir().unwrap();
		let args = Subcommand { layer: dir.path().to_path_buf(), r#type: LayerKind::Elevation, lod: 3, tx: 1, ty: 1 };
		run(&args).unwrap();

		let store = TileStore::new(dir.path());
		let grid = read_elevation_grid(&store, 3, 1, 1).unwrap();
		assert!(grid.iter().all(|&v| v == ELEVATION_SENTINEL));
	}

	#[test]
	fn opaque_children_average_into_parent() {
		let dir = tempdir().unwrap();
		let store = TileStore::new(dir.path());
		for &(cx, cy) in &[(2i64, 2i64), (3, 2), (2, 3), (3, 3)] {
			write_image_grid(&store, 4, cx, cy, &vec![(40, 80, 120, 255); TILE_SIDE * TILE_SIDE]).unwrap();
		}

		let args = Subcommand { layer: dir.path().to_path_buf(), r#type: LayerKind::Image, lod: 3, tx: 1, ty: 1 };
		run(&args).unwrap();

		let grid = read_image_grid(&store, 3, 1, 1).unwrap();
		assert_eq!(grid[0], (40, 80, 120, 255));
	}
}
