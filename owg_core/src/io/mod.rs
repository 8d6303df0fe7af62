//! Tile-store filesystem layout, point-set file I/O, and the on-disk work
//! queue. The tile-store filesystem is the only shared mutable resource in
//! the toolchain; everything in this module goes through advisory file
//! locks rather than a database.

pub mod points;
pub mod queue;
pub mod tile_store;

use std::fs::File;
use std::io;

use fs2::FileExt;

/// Takes an exclusive advisory lock on `file`, blocking until it is
/// available. Released automatically when `file` is dropped or
/// [`unlock`](Self::unlock) is called.
pub fn lock_exclusive(file: &File) -> io::Result<()> {
	file.lock_exclusive()
}

/// Takes a shared advisory lock on `file`, blocking until it is available.
pub fn lock_shared(file: &File) -> io::Result<()> {
	file.lock_shared()
}

/// Releases a lock taken with [`lock_exclusive`] or [`lock_shared`].
pub fn unlock(file: &File) -> io::Result<()> {
	file.unlock()
}
