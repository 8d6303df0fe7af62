//! `owg queue generate|fetch` — produces and drains the tile-pyramid work
//! queue (§4.11): a fixed-size binary record per tile job, `{ i32 x; i32 y;
//! i32 lod }`, little-endian.

use std::path::PathBuf;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use clap::{Args, Subcommand as ClapSubcommand};
use owg_core::config::LayerSettings;
use owg_core::io::queue::JobQueue;

use crate::cli_error::CliError;

/// `{ i32 x; i32 y; i32 lod }`.
pub const QUEUE_RECORD_LEN: usize = 12;

pub fn encode_job(lod: u8, tx: i64, ty: i64) -> Vec<u8> {
	let mut buf = Vec::with_capacity(QUEUE_RECORD_LEN);
	buf.write_i32::<LittleEndian>(tx as i32).expect("writing to a Vec never fails");
	buf.write_i32::<LittleEndian>(ty as i32).expect("writing to a Vec never fails");
	buf.write_i32::<LittleEndian>(lod as i32).expect("writing to a Vec never fails");
	buf
}

pub fn decode_job(record: &[u8]) -> (u8, i64, i64) {
	let mut cursor = record;
	let tx = cursor.read_i32::<LittleEndian>().unwrap_or(0) as i64;
	let ty = cursor.read_i32::<LittleEndian>().unwrap_or(0) as i64;
	let lod = cursor.read_i32::<LittleEndian>().unwrap_or(0) as u8;
	(lod, tx, ty)
}

fn queue_path(layer: &std::path::Path) -> PathBuf {
	layer.join("jobqueue.jobs")
}

#[derive(ClapSubcommand, Debug)]
pub enum Subcommand {
	/// Enumerate every tile in a layer's extent at its max LOD into the queue.
	Generate(GenerateArgs),
	/// Drain up to `--amount` jobs from the tail of the queue.
	Fetch(FetchArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
	#[arg(long)]
	pub layer: PathBuf,
	/// Level of detail; defaults to the layer's configured `maxlod`.
	#[arg(long)]
	pub lod: Option<u8>,
	/// Tile extent tx0 ty0 tx1 ty1; defaults to the layer's configured extent.
	#[arg(long, num_args = 4)]
	pub extent: Vec<i64>,
	/// Replace an existing queue instead of appending to it.
	#[arg(long)]
	pub overridejobqueue: bool,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
	#[arg(long)]
	pub layer: PathBuf,
	/// Number of jobs to drain.
	#[arg(long, default_value_t = 1)]
	pub amount: usize,
}

pub fn run(cmd: &Subcommand) -> Result<(), CliError> {
	match cmd {
		Subcommand::Generate(args) => run_generate(args),
		Subcommand::Fetch(args) => run_fetch(args),
	}
}

fn run_generate(args: &GenerateArgs) -> Result<(), CliError> {
	let (lod, tx0, ty0, tx1, ty1) = if !args.extent.is_empty() {
		if args.extent.len() != 4 {
			return Err(CliError::params("--extent requires exactly four values: tx0 ty0 tx1 ty1"));
		}
		let Some(lod) = args.lod else {
			return Err(CliError::params("--lod is required when --extent is given explicitly"));
		};
		(lod, args.extent[0], args.extent[1], args.extent[2], args.extent[3])
	} else {
		let settings = LayerSettings::load(&args.layer).map_err(CliError::config)?;
		let extent = settings.extent();
		(args.lod.unwrap_or(settings.maxlod as u8), extent.tx0, extent.ty0, extent.tx1, extent.ty1)
	};

	let path = queue_path(&args.layer);
	if args.overridejobqueue {
		let _ = std::fs::remove_file(&path);
		let _ = std::fs::remove_file(path.with_extension("jobs.seek"));
	}

	let mut jobs = Vec::new();
	for ty in ty0..=ty1 {
		for tx in tx0..=tx1 {
			jobs.push(encode_job(lod, tx, ty));
		}
	}

	let queue = JobQueue::new(&path, QUEUE_RECORD_LEN);
	queue.commit(&jobs)?;
	log::info!("generated {} tile jobs for layer {}", jobs.len(), args.layer.display());
	Ok(())
}

fn run_fetch(args: &FetchArgs) -> Result<(), CliError> {
	let queue = JobQueue::new(queue_path(&args.layer), QUEUE_RECORD_LEN);
	let jobs = queue.fetch(args.amount)?;
	for record in &jobs {
		let (lod, tx, ty) = decode_job(record);
		println!("{lod} {tx} {ty}");
	}
	Ok(())
}
