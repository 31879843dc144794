//! Canonicalization of angles into a 360° window.

use crate::util::math::wrap_deg;
use crate::util::{SkyMapError, SkyMapResult};

/// Maps `angle_deg` into `[lower_deg, lower_deg + 360)`.
///
/// An input exactly equal to `lower_deg + 360` is returned unchanged so an
/// explicit closing edge (e.g. `360` in a `[0, 360]` edge array) survives.
/// Non-finite input yields [`SkyMapError::NonFiniteAngle`].
pub fn normalize(angle_deg: f64, lower_deg: f64) -> SkyMapResult<f64> {
    SkyMapError::check_finite("angle", angle_deg)?;
    SkyMapError::check_finite("lower bound", lower_deg)?;
    Ok(wrap_deg(angle_deg, lower_deg))
}

/// Applies [`normalize`] to every element of `angles_deg`.
pub fn normalize_all(angles_deg: &[f64], lower_deg: f64) -> SkyMapResult<Vec<f64>> {
    angles_deg
        .iter()
        .map(|&angle| normalize(angle, lower_deg))
        .collect()
}
