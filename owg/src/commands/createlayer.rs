//! `owg createlayer` — scaffolds a new layer directory with its settings and
//! an empty process-status record.

use std::path::PathBuf;

use clap::Args;
use owg_core::config::{LayerExtent, LayerFormat, LayerSettings, LayerType};
use owg_core::exit_code::ERROR_PARAMS;
use owg_core::process_status::ProcessStatus;

use crate::cli_error::CliError;

#[derive(Args, Debug)]
pub struct Subcommand {
	/// Directory the tileset root lives under; the layer is created at
	/// `<root>/<name>`.
	#[arg(long)]
	pub root: PathBuf,

	/// Layer name.
	#[arg(long)]
	pub name: String,

	/// "image" or "elevation".
	#[arg(long, value_enum)]
	pub r#type: LayerKind,

	/// On-disk tile format.
	#[arg(long, value_enum, default_value_t = FormatArg::Raw)]
	pub format: FormatArg,

	/// Maximum level of detail the layer will be built to.
	#[arg(long)]
	pub lod: u32,

	/// Tile extent at `--lod`, as four inclusive tile coordinates: tx0 ty0 tx1 ty1.
	#[arg(long, num_args = 4)]
	pub extent: Vec<i64>,

	/// Delete and recreate the layer directory if it already exists.
	#[arg(long)]
	pub force: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LayerKind {
	Image,
	Elevation,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FormatArg {
	Png,
	Jpg,
	Json,
	Raw,
}

pub fn run(args: &Subcommand) -> Result<(), CliError> {
	if args.extent.len() != 4 {
		return Err(CliError::params("--extent requires exactly four values: tx0 ty0 tx1 ty1"));
	}

	let layer_dir = args.root.join(&args.name);
	if layer_dir.exists() {
		if !args.force {
			return Err(CliError::params(format!("layer directory {} already exists; pass --force to recreate it", layer_dir.display())));
		}
		std::fs::remove_dir_all(&layer_dir).map_err(|e| CliError::file(anyhow::Error::new(e).context(format!("deleting {}", layer_dir.display()))))?;
	}

	let layer_type = match args.r#type {
		LayerKind::Image => LayerType::Image,
		LayerKind::Elevation => LayerType::Elevation,
	};
	let format = match args.format {
		FormatArg::Png => LayerFormat::Png,
		FormatArg::Jpg => LayerFormat::Jpg,
		FormatArg::Json => LayerFormat::Json,
		FormatArg::Raw => LayerFormat::Raw,
	};
	let extent = LayerExtent::new(args.extent[0], args.extent[1], args.extent[2], args.extent[3]);
	if extent.tx0 > extent.tx1 || extent.ty0 > extent.ty1 {
		return Err(CliError::new(ERROR_PARAMS, anyhow::anyhow!("extent is inverted: {:?}", args.extent)));
	}

	let settings = LayerSettings::new(&args.name, layer_type, format, args.lod, extent);
	settings.save(&layer_dir)?;
	ProcessStatus::default().save(&layer_dir)?;

	log::info!("created layer {:?} at {}", args.name, layer_dir.display());
	Ok(())
}
