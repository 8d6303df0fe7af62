use std::io::Write;
use std::time::Instant;

use colored::Colorize;

use super::ProgressTrait;

const BAR_WIDTH: usize = 40;

/// Terminal progress bar drawn with carriage returns, in the style of the
/// CLI's other status output (colored when stdout is a tty).
pub struct TerminalProgressBar {
	message: String,
	position: u64,
	max_value: u64,
	started_at: Instant,
	finished: bool,
}

impl TerminalProgressBar {
	pub fn new(message: &str, max_value: u64) -> Self {
		let bar = TerminalProgressBar {
			message: message.to_string(),
			position: 0,
			max_value: max_value.max(1),
			started_at: Instant::now(),
			finished: false,
		};
		bar.draw();
		bar
	}

	fn draw(&self) {
		let fraction = (self.position as f64 / self.max_value as f64).clamp(0.0, 1.0);
		let filled = (fraction * BAR_WIDTH as f64).round() as usize;
		let bar: String = "#".repeat(filled) + &"-".repeat(BAR_WIDTH - filled);
		let percent = (fraction * 100.0) as u32;
		eprint!(
			"\r{} [{}] {:>3}% {}",
			self.message.bold(),
			bar.cyan(),
			percent,
			format!("{}/{}", self.position, self.max_value).dimmed()
		);
		let _ = std::io::stderr().flush();
	}
}

impl ProgressTrait for TerminalProgressBar {
	fn set_position(&mut self, value: u64) {
		self.position = value.min(self.max_value);
		self.draw();
	}

	fn position(&self) -> u64 {
		self.position
	}

	fn set_message(&mut self, message: &str) {
		message.clone_into(&mut self.message);
		self.draw();
	}

	fn finish(&mut self) {
		if self.finished {
			return;
		}
		self.finished = true;
		self.position = self.max_value;
		self.draw();
		eprintln!(" ({:.1}s)", self.started_at.elapsed().as_secs_f64());
	}
}

impl Drop for TerminalProgressBar {
	fn drop(&mut self) {
		self.finish();
	}
}
