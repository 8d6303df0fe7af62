//! Command-line entry point for the tile-pyramid toolchain.

mod cli_error;
mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use cli_error::CliError;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about = "Build and inspect a Mercator elevation/imagery tile pyramid",
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Triangulate a raw point set into a debug OBJ mesh.
	Triangulate(commands::triangulate::Subcommand),
	/// Run the tile driver over one tile or a batch from the work queue.
	Tile(commands::tile::Subcommand),
	/// Downsample four child tiles into one coarser-LOD tile.
	Resample(commands::resample::Subcommand),
	/// Scaffold a new layer directory.
	Createlayer(commands::createlayer::Subcommand),
	/// Compute a layer's tile extent from a WGS84 bounding box.
	Calcextent(commands::calcextent::Subcommand),
	/// Generate or drain the tile-pyramid work queue.
	#[command(subcommand)]
	Queue(commands::queue::Subcommand),
}

fn run(cli: &Cli) -> Result<(), CliError> {
	match &cli.command {
		Commands::Triangulate(args) => commands::triangulate::run(args),
		Commands::Tile(args) => commands::tile::run(args),
		Commands::Resample(args) => commands::resample::run(args),
		Commands::Createlayer(args) => commands::createlayer::run(args),
		Commands::Calcextent(args) => commands::calcextent::run(args),
		Commands::Queue(cmd) => commands::queue::run(cmd),
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	env_logger::Builder::new().filter_level(cli.verbose.log_level_filter()).format_timestamp(None).init();

	match run(&cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			log::error!("{err}");
			ExitCode::from(err.code.clamp(1, 255) as u8)
		}
	}
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::{Cli, run};

	fn run_command(arg_vec: Vec<&str>) -> Result<String, String> {
		let cli = Cli::try_parse_from(arg_vec).map_err(|e| e.to_string())?;
		let msg = format!("{cli:?}");
		run(&cli).map_err(|e| e.to_string())?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["owg"]).unwrap_err();
		assert!(err.contains("Build and inspect a Mercator elevation/imagery tile pyramid"));
		assert!(err.contains("Usage: owg"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["owg", "-V"]).unwrap_err();
		assert!(err.starts_with("owg "));
	}

	#[test]
	fn calcextent_requires_its_arguments() {
		let err = run_command(vec!["owg", "calcextent"]).unwrap_err();
		assert!(err.contains("lng0"));
	}
}
