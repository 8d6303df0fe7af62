//! Tile-store path layout: `<root>/tiles/<lod>/<tx>/<ty>.<ext>`, with a
//! parallel `temp/` tree for intermediate checkpoints.

use std::fs::{self, File};
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};

use crate::io::lock_exclusive;

/// Filename extension for a tile-store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileExt {
	Png,
	Json,
	Raw,
	Pts,
	Tri,
}

impl TileExt {
	fn as_str(self) -> &'static str {
		match self {
			TileExt::Png => "png",
			TileExt::Json => "json",
			TileExt::Raw => "raw",
			TileExt::Pts => "pts",
			TileExt::Tri => "tri",
		}
	}
}

/// Root of one layer's tile-store tree, rooted at a directory containing
/// `tiles/` and `temp/tiles/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileStore {
	root: PathBuf,
}

impl TileStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		TileStore { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Path to a final tile output, creating its parent directory lazily.
	pub fn tile_path(&self, lod: u8, tx: i64, ty: i64, ext: TileExt) -> PathBuf {
		self.root.join("tiles").join(lod.to_string()).join(tx.to_string()).join(format!("{ty}.{}", ext.as_str()))
	}

	/// Path to an intermediate checkpoint under `temp/tiles/`.
	pub fn temp_tile_path(&self, lod: u8, tx: i64, ty: i64, ext: TileExt) -> PathBuf {
		self.root.join("temp").join("tiles").join(lod.to_string()).join(tx.to_string()).join(format!("{ty}.{}", ext.as_str()))
	}

	/// Creates the parent directory of `path`, if any.
	pub fn ensure_parent(path: &Path) -> IoResult<()> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)?;
		}
		Ok(())
	}

	/// Opens (creating if absent) and exclusively locks `path` for the
	/// duration of a write. The returned file's lock is released when it is
	/// dropped.
	pub fn open_locked_for_write(path: &Path) -> IoResult<File> {
		Self::ensure_parent(path)?;
		let file = fs::OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
		lock_exclusive(&file)?;
		Ok(file)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn tile_path_matches_layout() {
		let store = TileStore::new("/data/layer");
		let path = store.tile_path(12, 34, 56, TileExt::Json);
		assert_eq!(path, Path::new("/data/layer/tiles/12/34/56.json"));
	}

	#[test]
	fn temp_tile_path_is_under_temp() {
		let store = TileStore::new("/data/layer");
		let path = store.temp_tile_path(12, 34, 56, TileExt::Tri);
		assert_eq!(path, Path::new("/data/layer/temp/tiles/12/34/56.tri"));
	}

	#[test]
	fn open_locked_for_write_creates_parents() {
		let dir = tempdir().unwrap();
		let store = TileStore::new(dir.path());
		let path = store.tile_path(1, 0, 0, TileExt::Pts);
		let _file = TileStore::open_locked_for_write(&path).unwrap();
		assert!(path.parent().unwrap().is_dir());
	}
}
