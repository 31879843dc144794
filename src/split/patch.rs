//! Splitting a rotated mesh into wrap-free patches.
//!
//! Every patch covers a simply connected region whose rotated longitudes
//! stay inside one `[0, 360]` window, so a renderer can fill it without a
//! band smeared across the whole map.

use crate::grid::{Matrix, Mesh};
use crate::split::seams::MAX_SEAMS;
use crate::trace::trace_event;
use crate::util::math::near_sq;
use crate::util::{SkyMapError, SkyMapResult};

/// Default squared tolerance for recognizing seam longitudes.
pub const SEAM_TOLERANCE_SQ: f64 = 1e-10;

/// A contiguous angular region of the rotated map.
///
/// `lon` and `lat` hold pixel edges and have one more row and column than
/// `data`.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    pub lon: Matrix,
    pub lat: Matrix,
    pub data: Matrix,
}

impl Patch {
    /// Returns the `(rows, cols)` of the data pixels.
    pub fn pixel_shape(&self) -> (usize, usize) {
        self.data.shape()
    }
}

/// Cuts `mesh` and `data` at the edge columns in `seams`, left to right.
///
/// Edge ranges share their boundary column: a cut at `c` yields edge
/// columns `[0..=c]` and `[c..]` and data columns `[0..c)` and `[c..)`.
pub fn split_columns(mesh: &Mesh, data: &Matrix, seams: &[usize]) -> SkyMapResult<Vec<Patch>> {
    if seams.len() > MAX_SEAMS {
        return Err(SkyMapError::UnsupportedSeams { count: seams.len() });
    }
    if seams.is_empty() {
        return Ok(vec![Patch {
            lon: mesh.lon.clone(),
            lat: mesh.lat.clone(),
            data: data.clone(),
        }]);
    }
    let edge_cols = mesh.lon.cols();
    if seams.windows(2).any(|w| w[0] >= w[1]) {
        return Err(SkyMapError::InvalidInput("seam indices must be increasing"));
    }
    if let Some(&bad) = seams.iter().find(|&&c| c == 0 || c + 1 >= edge_cols) {
        return Err(SkyMapError::IndexOutOfBounds {
            index: bad,
            len: edge_cols,
            context: "seam",
        });
    }

    let mut bounds = Vec::with_capacity(seams.len() + 2);
    bounds.push(0);
    bounds.extend_from_slice(seams);
    bounds.push(edge_cols.saturating_sub(1));

    bounds
        .windows(2)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            Ok(Patch {
                lon: mesh.lon.column_range(start..end + 1)?,
                lat: mesh.lat.column_range(start..end + 1)?,
                data: data.column_range(start..end)?,
            })
        })
        .collect()
}

/// Splits the rotated mesh into display-ordered, seam-corrected patches.
///
/// `phi_deg` is the normalized azimuth of the view. With a single cut and
/// `phi_deg < 0` the two patches are emitted tail first. Seam longitudes
/// are then rewritten by [`correct_seam_values`].
pub fn split_patches(
    mesh: &Mesh,
    data: &Matrix,
    seams: &[usize],
    phi_deg: f64,
    tolerance_sq: f64,
) -> SkyMapResult<Vec<Patch>> {
    let mut patches = split_columns(mesh, data, seams)?;
    if patches.len() == 1 {
        return Ok(patches);
    }
    if patches.len() == 2 && phi_deg < 0.0 {
        patches.reverse();
    }
    correct_seam_values(&mut patches, phi_deg, tolerance_sq);
    trace_event!("split_patches", patches = patches.len(), phi = phi_deg);
    Ok(patches)
}

/// Pins longitudes lying on the 0°/360° seam to the side of their patch.
///
/// Rotation leaves the cut edges at values within rounding noise of 0 or
/// 360. For `phi_deg > 0` the first and third patch sit on the 360 side;
/// for `phi_deg <= 0` the first and third sit on the 0 side and the second
/// on the 360 side. Values within `tolerance_sq` (squared degrees) of the
/// wrong side are rewritten.
pub fn correct_seam_values(patches: &mut [Patch], phi_deg: f64, tolerance_sq: f64) {
    let count = patches.len();
    for (idx, patch) in patches.iter_mut().enumerate() {
        let outer = idx == 0 || (idx == 2 && count > 2);
        let rewrite = match (phi_deg > 0.0, outer) {
            (true, true) => Some((0.0, 360.0)),
            (true, false) => None,
            (false, true) => Some((360.0, 0.0)),
            (false, false) => Some((0.0, 360.0)),
        };
        if let Some((from, to)) = rewrite {
            replace_near(&mut patch.lon, from, to, tolerance_sq);
        }
    }
}

fn replace_near(values: &mut Matrix, from: f64, to: f64, tolerance_sq: f64) {
    for v in values.as_mut_slice() {
        if near_sq(*v, from, tolerance_sq) {
            *v = to;
        }
    }
}
