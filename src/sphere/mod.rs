//! Spherical geometry primitives: angle normalization, rotation and the
//! Mollweide projection.

pub mod angle;
pub mod mollweide;
pub mod rotate;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use angle::{normalize, normalize_all};
pub use rotate::{rotate_mesh, rotate_points};
