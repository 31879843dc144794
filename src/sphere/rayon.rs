//! Rayon-parallel mesh rotation (feature-gated).
//!
//! Mesh nodes are independent, so the parallel path splits the node list
//! across threads and produces the same values as [`rotate_mesh`].
//!
//! [`rotate_mesh`]: crate::sphere::rotate_mesh

use crate::grid::{Matrix, Mesh};
use crate::sphere::rotate::{check_mesh, rotate_point};
use crate::util::SkyMapResult;
use rayon::prelude::*;

/// Rotates every node of `mesh` by `tilt_deg` using the rayon thread pool.
pub fn rotate_mesh_par(mesh: &Mesh, tilt_deg: f64) -> SkyMapResult<Mesh> {
    check_mesh(mesh, tilt_deg)?;
    let (rows, cols) = mesh.shape();
    let (lon, lat): (Vec<f64>, Vec<f64>) = mesh
        .lon
        .as_slice()
        .par_iter()
        .zip(mesh.lat.as_slice().par_iter())
        .map(|(&lon, &lat)| rotate_point(lon, lat, tilt_deg))
        .unzip();
    Ok(Mesh {
        lon: Matrix::from_parts(lon, rows, cols),
        lat: Matrix::from_parts(lat, rows, cols),
    })
}
