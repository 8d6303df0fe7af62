//! `owg tile` — runs the tile driver (gather, triangulate, clip, reduce,
//! serialize) for one explicit tile or for a batch pulled from the work
//! queue, optionally spread across a worker pool.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use clap::Args;
use owg_core::ConcurrencyLimits;
use owg_core::io::queue::JobQueue;
use owg_core::io::tile_store::TileStore;
use owg_pipeline::tile_driver::{self, TileDriverConfig};

use crate::cli_error::CliError;
use crate::commands::queue::{QUEUE_RECORD_LEN, decode_job};

#[derive(Args, Debug)]
pub struct Subcommand {
	/// Layer directory (tileset root).
	#[arg(long)]
	pub layer: PathBuf,

	/// Level of detail of the tile(s) to process.
	#[arg(long)]
	pub lod: Option<u8>,
	/// Tile column; requires `--lod` and `--ty`.
	#[arg(long)]
	pub tx: Option<i64>,
	/// Tile row; requires `--lod` and `--tx`.
	#[arg(long)]
	pub ty: Option<i64>,

	/// Pull up to this many tile jobs from the layer's work queue instead of
	/// processing a single explicit tile.
	#[arg(long)]
	pub amount: Option<usize>,

	/// Maximum points retained per output tile (§4.10 default range is
	/// 512-2048).
	#[arg(long, default_value_t = tile_driver::DEFAULT_MAX_POINTS)]
	pub maxpoints: usize,

	/// Number of worker threads; defaults to a mixed I/O+CPU sizing.
	#[arg(long)]
	pub numthreads: Option<usize>,
}

pub fn run(args: &Subcommand) -> Result<(), CliError> {
	let store = TileStore::new(&args.layer);
	let config = TileDriverConfig { max_points: args.maxpoints };

	let jobs: Vec<(u8, i64, i64)> = if let Some(amount) = args.amount {
		let queue = JobQueue::new(args.layer.join("jobqueue.jobs"), QUEUE_RECORD_LEN);
		queue.fetch(amount)?.iter().map(|record| decode_job(record)).collect()
	} else {
		match (args.lod, args.tx, args.ty) {
			(Some(lod), Some(tx), Some(ty)) => vec![(lod, tx, ty)],
			_ => return Err(CliError::params("pass either --lod/--tx/--ty for a single tile, or --amount to pull from the queue")),
		}
	};

	if jobs.is_empty() {
		log::info!("no tile jobs to process");
		return Ok(());
	}

	let limits = ConcurrencyLimits::new();
	let numthreads = args.numthreads.unwrap_or(limits.mixed).max(1).min(jobs.len());

	let (tx_jobs, rx_jobs) = mpsc::channel::<(u8, i64, i64)>();
	for job in jobs {
		tx_jobs.send(job).expect("receiver outlives all sends");
	}
	drop(tx_jobs);

	let rx_jobs = std::sync::Mutex::new(rx_jobs);
	thread::scope(|scope| -> Result<(), CliError> {
		let mut handles = Vec::new();
		for _ in 0..numthreads {
			let store = &store;
			let rx_jobs = &rx_jobs;
			handles.push(scope.spawn(move || -> anyhow::Result<()> {
				loop {
					let job = {
						let rx = rx_jobs.lock().expect("queue mutex poisoned");
						rx.recv()
					};
					let Ok((lod, tx, ty)) = job else { break };
					let removed = tile_driver::process_tile(store, lod, tx, ty, config)?;
					log::debug!("tile {lod}/{tx}/{ty}: reduced by {removed} vertices");
				}
				Ok(())
			}));
		}
		for handle in handles {
			handle.join().expect("worker thread panicked").map_err(CliError::from)?;
		}
		Ok(())
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use owg_core::elevation_point::ElevationPoint;
	use owg_core::io::points::write_pts;
	use owg_core::io::tile_store::TileExt;
	use tempfile::tempdir;

	#[test]
	fn processes_a_single_explicit_tile() {
		let dir = tempdir().unwrap();
		let store = TileStore::new(dir.path());
		let lod = 5u8;
		let tx = 10i64;
		let ty = 10i64;
		let center = owg_core::quadkey::TileCoord::new(tx, ty, lod);
		let (x0, y0, x1, y1) = center.mercator_extent().unwrap();
		let mid = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		write_pts(&store.temp_tile_path(lod, tx, ty, TileExt::Pts), &[ElevationPoint::new(mid.0, mid.1, 7.0, 0.0)]).unwrap();

		let args = Subcommand {
			layer: dir.path().to_path_buf(),
			lod: Some(lod),
			tx: Some(tx),
			ty: Some(ty),
			amount: None,
			maxpoints: tile_driver::DEFAULT_MAX_POINTS,
			numthreads: Some(1),
		};
		run(&args).unwrap();
		assert!(store.tile_path(lod, tx, ty, TileExt::Json).is_file());
	}

	#[test]
	fn requires_either_explicit_tile_or_amount() {
		let dir = tempdir().unwrap();
		let args = Subcommand {
			layer: dir.path().to_path_buf(),
			lod: None,
			tx: None,
			ty: None,
			amount: None,
			maxpoints: tile_driver::DEFAULT_MAX_POINTS,
			numthreads: None,
		};
		assert!(run(&args).is_err());
	}
}
