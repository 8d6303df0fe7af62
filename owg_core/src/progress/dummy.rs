use super::ProgressTrait;

/// Progress sink that discards every update. Used whenever the `cli`
/// feature is off, i.e. when this crate is embedded as a library.
#[derive(Debug, Default)]
pub struct DummyProgress {
	position: u64,
}

impl ProgressTrait for DummyProgress {
	fn set_position(&mut self, value: u64) {
		self.position = value;
	}

	fn position(&self) -> u64 {
		self.position
	}

	fn set_message(&mut self, _message: &str) {}

	fn finish(&mut self) {}
}
