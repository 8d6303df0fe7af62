//! Shared primitives for the tile-pyramid toolchain: Mercator/quadkey addressing,
//! the elevation point-set data model, tile-store paths, the on-disk work queue,
//! and the small ambient stack (config, progress, concurrency sizing) every tool
//! in the workspace builds on.

pub mod concurrency;
pub mod config;
pub mod elevation_point;
pub mod exit_code;
pub mod io;
pub mod macros;
pub mod mercator;
pub mod process_status;
pub mod progress;
pub mod quadkey;

pub use concurrency::ConcurrencyLimits;
pub use elevation_point::ElevationPoint;
pub use mercator::Mercator;
pub use quadkey::{TileCoord, map_size};
