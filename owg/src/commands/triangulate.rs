//! `owg triangulate` — standalone debug driver: reads a raw `.pts` point
//! set, triangulates it (optionally clipping to a rectangle and reducing
//! to a point budget), and writes a Wavefront OBJ for visual inspection.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;
use owg_core::io::points::read_pts;
use owg_geometry::obj::write_obj;
use owg_geometry::triangulation::Triangulation;

use crate::cli_error::CliError;

#[derive(Args, Debug)]
pub struct Subcommand {
	/// Input `.pts` point set.
	#[arg(long)]
	pub input: PathBuf,
	/// Output Wavefront OBJ path.
	#[arg(long)]
	pub output: PathBuf,
	/// Clip rectangle x_min y_min x_max y_max, in the input's own units.
	#[arg(long, num_args = 4)]
	pub bounds: Vec<f64>,
	/// Point budget after reduction; must be strictly between 32 and 2048.
	#[arg(long, default_value_t = 512)]
	pub maxpoints: usize,
}

pub fn run(args: &Subcommand) -> Result<(), CliError> {
	if !(32..2048).contains(&args.maxpoints) {
		return Err(CliError::params("--maxpoints must be strictly between 32 and 2048"));
	}
	if !args.bounds.is_empty() && args.bounds.len() != 4 {
		return Err(CliError::params("--bounds requires exactly four values: x_min y_min x_max y_max"));
	}

	let points = read_pts(&args.input)?;
	if points.is_empty() {
		return Err(CliError::params(format!("{} contains no points", args.input.display())));
	}

	let x_min = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
	let x_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
	let y_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
	let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

	let mut triangulation = Triangulation::new(x_min, y_min, x_max, y_max);
	for point in points {
		triangulation.insert(point);
	}

	let mut triangulation = if args.bounds.len() == 4 {
		triangulation.intersect_rect(args.bounds[0], args.bounds[1], args.bounds[2], args.bounds[3])
	} else {
		triangulation
	};

	let budget = triangulation.vertex_count().saturating_sub(args.maxpoints);
	if budget > 0 {
		let removed = triangulation.reduce(budget);
		log::debug!("reduced triangulation by {removed} vertices to fit --maxpoints={}", args.maxpoints);
	}

	if let Some(parent) = args.output.parent() {
		std::fs::create_dir_all(parent).map_err(|e| CliError::file(anyhow::Error::new(e)))?;
	}
	let file = File::create(&args.output).map_err(|e| CliError::file(anyhow::Error::new(e).context(format!("creating {}", args.output.display()))))?;
	let mut writer = BufWriter::new(file);
	write_obj(triangulation.mesh(), &mut writer)?;

	log::info!(
		"triangulated {} into {} vertices, {} triangles",
		args.input.display(),
		triangulation.vertex_count(),
		triangulation.triangle_count()
	);
	Ok(())
}
