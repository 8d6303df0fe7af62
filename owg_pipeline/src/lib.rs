//! Tile-pyramid processing: 3x3 neighborhood gather, triangulate, clip,
//! reduce, serialize; plus coarser-LOD resampling.

pub mod gather;
pub mod resample;
pub mod tile_driver;
pub mod tile_json;
