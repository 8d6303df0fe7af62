//! Forward and inverse Spherical/Ellipsoidal Mercator projection.
//!
//! Coordinates are normalized so the full globe spans `x,y ∈ [-1,1]`: the
//! standard Mercator formula is divided by π instead of by the ellipsoid's
//! semi-major axis. This matches the convention used throughout the rest of
//! the toolchain (quadkey math, tile rectangles, ...).

use std::f64::consts::PI;

/// WGS84 first eccentricity, used by the ellipsoidal projection mode.
pub const WGS84_ECCENTRICITY: f64 = 0.081_819_190_842_961_775_161_887_117_288_255;

/// Latitude whose spherical Mercator y equals exactly 1.0 (the pole cutoff).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

const HALF_PI: f64 = PI / 2.0;
const REVERSE_ITERATIONS: usize = 10;

/// Spherical/ellipsoidal Web-Mercator forward and inverse projection.
///
/// `eccentricity == 0.0` selects the spherical (pure Web-Mercator, EPSG:3857)
/// variant; any other value runs the ellipsoidal (WGS84, e≈0.0818192) variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
	pub eccentricity: f64,
}

impl Mercator {
	pub const fn spherical() -> Self {
		Mercator { eccentricity: 0.0 }
	}

	pub const fn ellipsoidal() -> Self {
		Mercator {
			eccentricity: WGS84_ECCENTRICITY,
		}
	}

	/// Projects (lng°, lat°) to normalized Mercator (x,y) ∈ [-1,1]².
	///
	/// Latitude is clamped to ±[`MAX_LATITUDE`] before projecting, so the
	/// result is always finite.
	pub fn forward(&self, lng: f64, lat: f64) -> (f64, f64) {
		let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
		let lng_rad = lng.to_radians();
		let lat_rad = lat.to_radians();

		let y = if self.eccentricity == 0.0 {
			(PI / 4.0 + lat_rad / 2.0).tan().ln()
		} else {
			let e = self.eccentricity;
			let esin = e * lat_rad.sin();
			(PI / 4.0 + lat_rad / 2.0).tan().ln() + 0.5 * e * ((1.0 - esin) / (1.0 + esin)).ln()
		};

		(lng_rad / PI, y / PI)
	}

	/// Inverse of [`forward`](Self::forward): normalized Mercator (x,y) → (lng°, lat°).
	///
	/// Longitude and latitude are normalized into `[-180,180]` and `[-90,90]`
	/// respectively via modular wraparound (see DESIGN.md open question O1 —
	/// the original C++ used a bounded `while` loop here instead).
	pub fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
		let x = x * PI;
		let y = y * PI;

		let t = (-y).exp();
		let mut lat_rad = HALF_PI - 2.0 * t.atan();

		if self.eccentricity != 0.0 {
			let e = self.eccentricity;
			for _ in 0..REVERSE_ITERATIONS {
				let esin = e * lat_rad.sin();
				let f = ((1.0 - esin) / (1.0 + esin)).powf(0.5 * e);
				lat_rad = HALF_PI - 2.0 * (t * f).atan();
			}
		}

		let lng = normalize_degrees_symmetric(x.to_degrees(), 360.0);
		let lat = normalize_degrees_symmetric(lat_rad.to_degrees(), 180.0);
		(lng, lat)
	}
}

impl Default for Mercator {
	fn default() -> Self {
		Mercator::spherical()
	}
}

/// Wraps `value` into `(-period/2, period/2]` using Euclidean remainder, so
/// arbitrarily large inputs normalize correctly (unlike a bounded `±period`
/// step loop).
fn normalize_degrees_symmetric(value: f64, period: f64) -> f64 {
	let half = period / 2.0;
	let wrapped = (value + half).rem_euclid(period) - half;
	// rem_euclid can land exactly on -half; fold it to +half to match the
	// half-open convention used by longitude/latitude ranges.
	if wrapped <= -half { wrapped + period } else { wrapped }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn forward_sphere_origin() {
		let m = Mercator::spherical();
		let (x, y) = m.forward(0.0, 0.0);
		assert!((x - 0.0).abs() < 1e-12);
		assert!((y - 0.0).abs() < 1e-12);
	}

	#[test]
	fn forward_sphere_dateline() {
		let m = Mercator::spherical();
		let (x, y) = m.forward(180.0, 0.0);
		assert!((x - 1.0).abs() < 1e-12);
		assert!((y - 0.0).abs() < 1e-12);
	}

	#[test]
	fn forward_sphere_max_latitude() {
		let m = Mercator::spherical();
		let (x, y) = m.forward(0.0, MAX_LATITUDE);
		assert!((x - 0.0).abs() < 1e-12);
		assert!((y - 1.0).abs() < 1e-12);
	}

	#[test]
	fn round_trip_sphere() {
		let m = Mercator::spherical();
		for lat in [-80.0, -45.0, -1.0, 0.0, 12.3, 44.9, 84.9] {
			for lng in [-179.9, -90.0, -0.1, 0.0, 45.0, 120.0, 179.9] {
				let (x, y) = m.forward(lng, lat);
				let (lng2, lat2) = m.reverse(x, y);
				assert!((lng - lng2).abs() < 1e-9, "lng {lng} != {lng2}");
				assert!((lat - lat2).abs() < 1e-9, "lat {lat} != {lat2}");
			}
		}
	}

	#[test]
	fn round_trip_ellipsoid() {
		let m = Mercator::ellipsoidal();
		for lat in [-80.0, -20.0, 0.0, 33.3, 84.0] {
			for lng in [-150.0, -1.0, 0.0, 77.7] {
				let (x, y) = m.forward(lng, lat);
				let (lng2, lat2) = m.reverse(x, y);
				assert!((lng - lng2).abs() < 1e-9);
				assert!((lat - lat2).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn normalize_wraps_large_inputs() {
		assert!((normalize_degrees_symmetric(540.0, 360.0) - 180.0).abs() < 1e-9);
		assert!((normalize_degrees_symmetric(-540.0, 360.0) - 180.0).abs() < 1e-9);
		assert!((normalize_degrees_symmetric(3601.0, 360.0) - 1.0).abs() < 1e-9);
	}
}
