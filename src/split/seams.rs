//! Location of the map seam in a shifted longitude edge array.
//!
//! After the grid is shifted so that the view azimuth sits at longitude 0,
//! the seam of the rotated map runs along the edges at multiples of 180°.

use crate::util::{SkyMapError, SkyMapResult};

/// Maximum number of interior seam crossings the splitter handles.
pub const MAX_SEAMS: usize = 2;

/// Absolute distance (degrees) under which an edge counts as on the seam.
pub(crate) const SEAM_SNAP_DEG: f64 = 1e-9;

/// True when `lon_deg` sits on a multiple of 180°.
pub(crate) fn on_seam(lon_deg: f64) -> bool {
    let r = lon_deg.rem_euclid(180.0);
    r < SEAM_SNAP_DEG || 180.0 - r < SEAM_SNAP_DEG
}

/// Returns the interior indices of `shifted_lons` that lie on the seam.
///
/// The first and last edges (and interior edges equal to them in value)
/// never count: cutting there would produce an empty patch. More than
/// [`MAX_SEAMS`] crossings yields [`SkyMapError::UnsupportedSeams`].
pub fn find_seams(shifted_lons: &[f64]) -> SkyMapResult<Vec<usize>> {
    let (first, last) = match (shifted_lons.first(), shifted_lons.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(Vec::new()),
    };
    let seams: Vec<usize> = shifted_lons
        .iter()
        .enumerate()
        .skip(1)
        .take(shifted_lons.len().saturating_sub(2))
        .filter(|&(_, &lon)| on_seam(lon) && lon != first && lon != last)
        .map(|(idx, _)| idx)
        .collect();
    if seams.len() > MAX_SEAMS {
        return Err(SkyMapError::UnsupportedSeams { count: seams.len() });
    }
    Ok(seams)
}
