//! Rigid rotation of spherical coordinates.
//!
//! The rotation turns the sphere by `tilt_deg` about the y axis (the axis
//! through longitude 90°), so the north pole moves toward longitude 0 and
//! lands at `(0, 90 - tilt)`. Equivalently, the source point `(0, tilt)`
//! moves to `(0, 0)`. Output longitudes lie in `[0, 360)`.

use crate::grid::{Matrix, Mesh};
use crate::util::math::wrap_deg;
use crate::util::{SkyMapError, SkyMapResult};

/// Rotates a single `(lon, lat)` pair without validating its inputs.
#[inline]
pub(crate) fn rotate_point(lon_deg: f64, lat_deg: f64, tilt_deg: f64) -> (f64, f64) {
    if tilt_deg == 0.0 {
        return (wrap_deg(lon_deg, 0.0), lat_deg);
    }
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_t, cos_t) = tilt_deg.to_radians().sin_cos();

    let x = cos_lat * cos_lon;
    let y = cos_lat * sin_lon;
    let z = sin_lat;

    let xr = x * cos_t + z * sin_t;
    let zr = z * cos_t - x * sin_t;

    // atan2 against the horizontal radius stays accurate next to the poles.
    let lat = zr.atan2(xr.hypot(y)).to_degrees();
    let lon = wrap_deg(y.atan2(xr).to_degrees(), 0.0);
    (lon, lat)
}

fn check_inputs(lons: &[f64], lats: &[f64], tilt_deg: f64) -> SkyMapResult<()> {
    SkyMapError::check_finite("tilt", tilt_deg)?;
    if lons.len() != lats.len() {
        return Err(SkyMapError::InvalidInput(
            "longitude and latitude arrays differ in length",
        ));
    }
    if let Some(&bad) = lons.iter().chain(lats).find(|v| !v.is_finite()) {
        return Err(SkyMapError::NonFiniteAngle {
            name: "coordinate",
            value: bad,
        });
    }
    Ok(())
}

/// Rotates paired longitude/latitude arrays by `tilt_deg`.
///
/// `tilt_deg == 0` is an exact identity for longitudes already in
/// `[0, 360]`; rotating by `t` and then `-t` restores the input up to
/// floating-point error.
pub fn rotate_points(
    lons: &[f64],
    lats: &[f64],
    tilt_deg: f64,
) -> SkyMapResult<(Vec<f64>, Vec<f64>)> {
    check_inputs(lons, lats, tilt_deg)?;
    Ok(lons
        .iter()
        .zip(lats)
        .map(|(&lon, &lat)| rotate_point(lon, lat, tilt_deg))
        .unzip())
}

/// Rotates every node of `mesh` by `tilt_deg`, preserving its shape.
pub fn rotate_mesh(mesh: &Mesh, tilt_deg: f64) -> SkyMapResult<Mesh> {
    let (rows, cols) = mesh.shape();
    let (lon, lat) = rotate_points(mesh.lon.as_slice(), mesh.lat.as_slice(), tilt_deg)?;
    Ok(Mesh {
        lon: Matrix::from_parts(lon, rows, cols),
        lat: Matrix::from_parts(lat, rows, cols),
    })
}

#[cfg(feature = "rayon")]
pub(crate) fn check_mesh(mesh: &Mesh, tilt_deg: f64) -> SkyMapResult<()> {
    check_inputs(mesh.lon.as_slice(), mesh.lat.as_slice(), tilt_deg)
}
