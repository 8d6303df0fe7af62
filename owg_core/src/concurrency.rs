//! Sizing heuristics for the thread pools used by the tile driver and queue
//! workers.

/// Recommended thread-pool sizes for different kinds of workloads, derived
/// from the number of available CPUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimits {
	/// Threads for I/O-bound work (tile-store reads, network fetches).
	pub io_bound: usize,
	/// Threads for CPU-bound work (triangulation, simplification).
	pub cpu_bound: usize,
	/// Threads for workloads that mix the two (the tile driver itself).
	pub mixed: usize,
}

impl ConcurrencyLimits {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of logical CPUs, as reported by the OS.
	pub fn cpu_count() -> usize {
		num_cpus::get()
	}
}

impl Default for ConcurrencyLimits {
	fn default() -> Self {
		let cpus = Self::cpu_count().max(1);
		ConcurrencyLimits {
			io_bound: cpus * 3,
			cpu_bound: cpus,
			mixed: (cpus * 3 / 2).max(1),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cpu_count_is_at_least_one() {
		assert!(ConcurrencyLimits::cpu_count() >= 1);
	}

	#[test]
	fn default_scales_with_cpu_count() {
		let limits = ConcurrencyLimits::default();
		let cpus = ConcurrencyLimits::cpu_count().max(1);
		assert_eq!(limits.cpu_bound, cpus);
		assert_eq!(limits.io_bound, cpus * 3);
	}

	#[test]
	fn mixed_is_between_cpu_bound_and_io_bound() {
		let limits = ConcurrencyLimits::default();
		assert!(limits.mixed >= limits.cpu_bound);
		assert!(limits.mixed <= limits.io_bound);
	}

	#[test]
	fn new_matches_default() {
		assert_eq!(ConcurrencyLimits::new(), ConcurrencyLimits::default());
	}
}
