//! Incremental Delaunay triangulation: point insertion, ear-reduction vertex
//! removal, error-driven simplification, and rectangle clipping over
//! elevation point sets.

pub mod clip;
pub mod insert;
pub mod locate;
pub mod mesh;
pub mod obj;
pub mod predicates;
pub mod remove;
pub mod simplify;
pub mod triangulation;

pub use triangulation::Triangulation;
