pub mod calcextent;
pub mod createlayer;
pub mod queue;
pub mod resample;
pub mod tile;
pub mod triangulate;
