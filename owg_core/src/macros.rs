//! Test-support macros shared across the workspace's integration tests.

/// Asserts that `$left` matches the wildcard pattern `$right` (`*` and `?`),
/// printing both values on failure.
///
/// Callers must depend on the `wildmatch` crate directly; this macro
/// references it by absolute path rather than re-exporting it.
#[macro_export]
macro_rules! assert_wildcard {
	($left:expr, $right:expr) => {
		let left = $left;
		let right = $right;
		assert!(
			::wildmatch::WildMatch::new(right).matches(left),
			"assertion failed: `{left}` does not match wildcard `{right}`"
		);
	};
}
