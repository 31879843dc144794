//! Skymap renders whole-sky lon/lat data on rotated Mollweide maps.
//!
//! The crate re-centers a regular 360°×180° grid on an arbitrary view
//! direction (a polar tilt `alf`, an azimuth `phi` and a horizontal shift
//! `th`) and splits the rotated mesh into patches that never wrap across
//! the map edge. Drawing goes through the [`Renderer`] trait; a raster
//! implementation is available with the `image-io` feature and mesh
//! rotation can run on rayon with the `rayon` feature.

mod trace;

pub mod grid;
pub mod map;
pub mod orientation;
pub mod render;
pub mod sphere;
pub mod split;
pub mod util;

pub use grid::{insert_coordinate, Axis, Grid, Matrix, Mesh};
pub use map::{MapConfig, RotatedMap};
pub use orientation::{Orientation, Preset, PresetCoords, ResolvedOrientation};
pub use render::{draw_map, ColorRange, DrawOptions, Renderer};
pub use sphere::{normalize, normalize_all, rotate_mesh, rotate_points};
pub use split::{
    correct_seam_values, find_seams, gridline, split_columns, split_gridline, split_patches,
    Gridline, GridlineKind, Patch,
};
pub use util::{SkyMapError, SkyMapResult};

#[cfg(feature = "image-io")]
pub use render::raster::RasterRenderer;
#[cfg(feature = "rayon")]
pub use sphere::rayon::rotate_mesh_par;
