//! Rotated map grid lines, broken where they leave the map edge.

use crate::sphere::rotate_points;
use crate::util::math::{linspace, wrap_deg};
use crate::util::{SkyMapError, SkyMapResult};

/// Vertices sampled along a meridian (every 2° of latitude).
pub const MERIDIAN_POINTS: usize = 91;
/// Vertices sampled along a parallel (every 2° of longitude).
pub const PARALLEL_POINTS: usize = 181;

/// Longitude step (degrees) above which consecutive vertices are taken to
/// straddle the map edge rather than be joined by a real excursion.
const JUMP_DEG: f64 = 90.0;

/// The family a grid line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridlineKind {
    /// Line of constant longitude.
    Meridian,
    /// Line of constant latitude.
    Parallel,
}

/// Polyline in display degrees with NaN vertices marking pen-up breaks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Gridline {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
}

impl Gridline {
    /// Returns the number of vertices, breaks included.
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    /// Returns true if the line has no vertices.
    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    /// Returns the number of pen-up breaks.
    pub fn breaks(&self) -> usize {
        self.lon.iter().filter(|v| v.is_nan()).count()
    }

    /// Iterates the pen-down runs between breaks as `(lons, lats)` slices.
    pub fn segments(&self) -> impl Iterator<Item = (&[f64], &[f64])> + '_ {
        let mut start = 0usize;
        let mut bounds = Vec::new();
        for (idx, lon) in self.lon.iter().enumerate() {
            if lon.is_nan() {
                bounds.push((start, idx));
                start = idx + 1;
            }
        }
        bounds.push((start, self.lon.len()));
        bounds
            .into_iter()
            .filter(|(s, e)| e > s)
            .map(move |(s, e)| (&self.lon[s..e], &self.lat[s..e]))
    }
}

/// Builds the rotated grid line for one meridian or parallel.
///
/// The line is densely sampled in source coordinates, rotated by
/// `alf_deg`, shifted by `-th_deg`, wrapped into `[-180, 180]` (an exact
/// 180 is kept) and split
/// at every crossing of the map edge.
pub fn gridline(
    coord_deg: f64,
    kind: GridlineKind,
    alf_deg: f64,
    th_deg: f64,
) -> SkyMapResult<Gridline> {
    SkyMapError::check_finite("gridline coordinate", coord_deg)?;
    SkyMapError::check_finite("th", th_deg)?;
    let (lon0, lat0) = match kind {
        GridlineKind::Meridian => {
            let lat = linspace(-90.0, 90.0, MERIDIAN_POINTS);
            (vec![coord_deg; lat.len()], lat)
        }
        GridlineKind::Parallel => {
            let lon = linspace(0.0, 360.0, PARALLEL_POINTS);
            (lon.clone(), vec![coord_deg; lon.len()])
        }
    };
    let (lons, lats) = rotate_points(&lon0, &lat0, alf_deg)?;
    let lons = lons
        .into_iter()
        .map(|lon| wrap_deg(lon - th_deg, -180.0))
        .collect();
    Ok(split_gridline(lons, lats))
}

/// Splits a polyline at every step whose longitude jumps by more than 90°.
///
/// Before the vertex after each jump, inserts `(-e, m)`, `(NaN, NaN)`,
/// `(e, m)`, where `e` is that vertex's longitude rounded to a multiple of
/// 180° and `m` the mean latitude of the two straddling vertices. Both
/// pieces then end exactly on the map edge.
pub fn split_gridline(lons: Vec<f64>, lats: Vec<f64>) -> Gridline {
    let jumps: Vec<usize> = (1..lons.len())
        .filter(|&i| (lons[i - 1] - lons[i]).abs() > JUMP_DEG)
        .collect();
    if jumps.is_empty() {
        return Gridline { lon: lons, lat: lats };
    }

    let extra = 3 * jumps.len();
    let mut lon = Vec::with_capacity(lons.len() + extra);
    let mut lat = Vec::with_capacity(lats.len() + extra);
    let mut next_jump = jumps.iter().peekable();
    for (idx, (&lo, &la)) in lons.iter().zip(&lats).enumerate() {
        if next_jump.peek() == Some(&&idx) {
            next_jump.next();
            let edge = 180.0 * (lo / 180.0).round();
            let mid_lat = (la + lats[idx - 1]) / 2.0;
            lon.extend_from_slice(&[-edge, f64::NAN, edge]);
            lat.extend_from_slice(&[mid_lat, f64::NAN, mid_lat]);
        }
        lon.push(lo);
        lat.push(la);
    }
    Gridline { lon, lat }
}
