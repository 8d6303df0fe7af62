//! Maps a tool failure onto the shared exit-code taxonomy (`owg_core::exit_code`).

use owg_core::exit_code;

/// A command failure tagged with the process exit code it should produce.
#[derive(Debug)]
pub struct CliError {
	pub code: i32,
	pub error: anyhow::Error,
}

impl CliError {
	pub fn new(code: i32, error: impl Into<anyhow::Error>) -> Self {
		CliError { code, error: error.into() }
	}

	pub fn config(error: impl Into<anyhow::Error>) -> Self {
		Self::new(exit_code::ERROR_CONFIG, error)
	}

	pub fn params(message: impl Into<String>) -> Self {
		Self::new(exit_code::ERROR_PARAMS, anyhow::anyhow!(message.into()))
	}

	pub fn file(error: impl Into<anyhow::Error>) -> Self {
		Self::new(exit_code::ERROR_FILE, error)
	}
}

impl std::fmt::Display for CliError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:#}", self.error)
	}
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
	fn from(error: anyhow::Error) -> Self {
		CliError::file(error)
	}
}
