//! Progress reporting for long-running tile-pyramid operations.
//!
//! Library code never prints directly; it reports progress through
//! [`ProgressTrait`] so the CLI can render a bar while anything embedding
//! this crate as a library gets a silent no-op.

#[cfg(feature = "cli")]
mod bar;
#[cfg(not(feature = "cli"))]
mod dummy;

/// A sink for progress updates on a unit of work with a known total.
pub trait ProgressTrait: Send {
	/// Advances the current position to `value`, clamped to the configured
	/// maximum.
	fn set_position(&mut self, value: u64);

	/// Advances the current position by `delta`.
	fn inc(&mut self, delta: u64) {
		self.set_position(self.position() + delta);
	}

	/// The current position.
	fn position(&self) -> u64;

	/// Replaces the status line shown alongside the bar.
	fn set_message(&mut self, message: &str);

	/// Marks the work as complete and finalizes the display.
	fn finish(&mut self);
}

/// Builds a progress reporter for a unit of work with `max_value` steps.
///
/// Without the `cli` feature this always returns the silent no-op
/// implementation, since there is no terminal to draw to.
pub fn get_progress_bar(message: &str, max_value: u64) -> Box<dyn ProgressTrait> {
	#[cfg(feature = "cli")]
	{
		Box::new(bar::TerminalProgressBar::new(message, max_value))
	}
	#[cfg(not(feature = "cli"))]
	{
		let _ = (message, max_value);
		Box::new(dummy::DummyProgress::default())
	}
}
