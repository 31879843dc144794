//! The rotated-map pipeline.
//!
//! `RotatedMap::build` widens the grid to a full turn, inserts the pixel
//! edges the rotation will carry onto the map seam, shifts the view
//! azimuth to longitude 0, rotates the mesh by the polar tilt and cuts it
//! into wrap-free patches.

use crate::grid::{insert_coordinate, Axis, Grid, Matrix, Mesh};
use crate::orientation::{Orientation, ResolvedOrientation};
use crate::split::{find_seams, gridline, split_patches, Gridline, GridlineKind, Patch};
use crate::split::SEAM_TOLERANCE_SQ;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::math::wrap_deg;
use crate::util::SkyMapResult;

/// Configuration for building a rotated map.
#[derive(Clone, Debug)]
pub struct MapConfig {
    /// Squared tolerance (degrees²) used to recognize seam longitudes.
    pub seam_tolerance_sq: f64,
    /// Rotate the mesh on the rayon thread pool (requires the `rayon`
    /// feature; ignored otherwise).
    pub parallel: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seam_tolerance_sq: SEAM_TOLERANCE_SQ,
            parallel: false,
        }
    }
}

/// A grid rotated into a view orientation and split into patches.
#[derive(Clone, Debug)]
pub struct RotatedMap {
    patches: Vec<Patch>,
    orientation: ResolvedOrientation,
}

impl RotatedMap {
    /// Rotates `grid` into `orientation` and splits it along the map seam.
    pub fn build(grid: &Grid, orientation: &Orientation, cfg: &MapConfig) -> SkyMapResult<Self> {
        let view = orientation.resolve()?;
        let _span = trace_span!("rotated_map", alf = view.alf, phi = view.phi, th = view.th)
            .entered();

        let (lons, lats, data) = grid.clone().into_parts();
        if lons.len() < 2 || lats.len() < 2 {
            trace_warn!("grid has no pixels; emitting a single empty patch");
            let mesh = Mesh::from_edges(&lons, &lats);
            return Ok(Self {
                patches: vec![Patch {
                    lon: mesh.lon,
                    lat: mesh.lat,
                    data,
                }],
                orientation: view,
            });
        }

        let (lons, lats, data) = augment(lons, lats, data, &view)?;
        let ins = wrap_deg(view.phi, lons[0]);
        let mut shifted: Vec<f64> = lons.iter().map(|lon| lon - ins).collect();

        let already_wrapped =
            view.alf == 0.0 && shifted.iter().all(|&lon| (0.0..=360.0).contains(&lon));
        let seams = if already_wrapped {
            Vec::new()
        } else {
            find_seams(&shifted)?
        };
        for &idx in &seams {
            shifted[idx] = 180.0 * (shifted[idx] / 180.0).round();
        }
        trace_event!("seams", count = seams.len(), edges = shifted.len());

        let mesh = Mesh::from_edges(&shifted, &lats);
        let rotated = rotate_for(&mesh, view.alf, cfg.parallel)?;
        // The cut sides follow the azimuth relative to the first edge, not the raw phi.
        let side = wrap_deg(view.phi - lons[0], -180.0);
        let patches = split_patches(&rotated, &data, &seams, side, cfg.seam_tolerance_sq)?;

        Ok(Self {
            patches,
            orientation: view,
        })
    }

    /// Returns the patches in display order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Consumes the map and returns its patches.
    pub fn into_patches(self) -> Vec<Patch> {
        self.patches
    }

    /// Returns the normalized orientation the map was built for.
    pub fn orientation(&self) -> ResolvedOrientation {
        self.orientation
    }

    /// Builds the rotated grid lines for the given tick positions.
    ///
    /// Parallels are drawn at each latitude tick and meridians at each
    /// longitude tick offset by the view azimuth.
    pub fn gridlines(&self, lon_ticks: &[f64], lat_ticks: &[f64]) -> SkyMapResult<Vec<Gridline>> {
        let view = self.orientation;
        let parallels = lat_ticks
            .iter()
            .map(|&lat| gridline(lat, GridlineKind::Parallel, view.alf, view.th));
        let meridians = lon_ticks
            .iter()
            .map(|&lon| gridline(lon + view.phi, GridlineKind::Meridian, view.alf, view.th));
        parallels.chain(meridians).collect()
    }
}

/// Widens the grid to 360° and inserts the rotation boundary edges.
fn augment(
    mut lons: Vec<f64>,
    lats: Vec<f64>,
    mut data: Matrix,
    view: &ResolvedOrientation,
) -> SkyMapResult<(Vec<f64>, Vec<f64>, Matrix)> {
    let lon_min = lons[0];
    if lons[lons.len() - 1] - lon_min < 360.0 {
        // A NaN column keeps the uncovered sky from being read as a seam.
        data = data.with_column_appended(f64::NAN);
        lons.push(lon_min + 360.0);
    }

    let mut lats = lats;
    if view.alf != 0.0 {
        let boundary = (90.0 - view.alf.abs()).abs();
        if lats[0] < -boundary {
            (lats, data) = insert_with_data(-boundary, &lats, Axis::Lat, data)?;
        }
        if boundary < lats[lats.len() - 1] {
            (lats, data) = insert_with_data(boundary, &lats, Axis::Lat, data)?;
        }
    }

    let ins = wrap_deg(view.phi, lon_min);
    (lons, data) = insert_with_data(ins, &lons, Axis::Lon, data)?;
    let opposite = wrap_deg(view.phi + 180.0, lon_min);
    (lons, data) = insert_with_data(opposite, &lons, Axis::Lon, data)?;

    Ok((lons, lats, data))
}

fn insert_with_data(
    value: f64,
    coords: &[f64],
    axis: Axis,
    data: Matrix,
) -> SkyMapResult<(Vec<f64>, Matrix)> {
    let (coords, picked) = insert_coordinate(value, coords, axis, Some(&data))?;
    Ok((coords, picked.unwrap_or(data)))
}

#[cfg(feature = "rayon")]
fn rotate_for(mesh: &Mesh, tilt_deg: f64, parallel: bool) -> SkyMapResult<Mesh> {
    if parallel {
        crate::sphere::rayon::rotate_mesh_par(mesh, tilt_deg)
    } else {
        crate::sphere::rotate_mesh(mesh, tilt_deg)
    }
}

#[cfg(not(feature = "rayon"))]
fn rotate_for(mesh: &Mesh, tilt_deg: f64, _parallel: bool) -> SkyMapResult<Mesh> {
    crate::sphere::rotate_mesh(mesh, tilt_deg)
}

#[cfg(test)]
mod tests {
    use super::{MapConfig, RotatedMap};
    use crate::grid::Grid;
    use crate::orientation::Orientation;

    fn quarter_grid() -> Grid {
        Grid::from_rows(
            vec![0.0, 90.0, 180.0, 270.0, 360.0],
            vec![-90.0, 0.0, 90.0],
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]],
        )
        .unwrap()
    }

    #[test]
    fn tilted_view_inserts_boundary_rows() {
        let map = RotatedMap::build(
            &quarter_grid(),
            &Orientation::new(30.0, 0.0, 0.0),
            &MapConfig::default(),
        )
        .unwrap();
        // Rows at -60 and 60 are added; phi = 0 cuts once at 180.
        assert_eq!(map.patches().len(), 2);
        for patch in map.patches() {
            assert_eq!(patch.data.rows(), 4);
            assert_eq!(patch.lon.rows(), 5);
        }
    }

    #[test]
    fn narrow_grid_is_widened_with_nan() {
        let grid = Grid::from_rows(vec![0.0, 90.0, 180.0], vec![-90.0, 90.0], vec![vec![1.0, 2.0]])
            .unwrap();
        let map =
            RotatedMap::build(&grid, &Orientation::default(), &MapConfig::default()).unwrap();
        assert_eq!(map.patches().len(), 1);
        let data = &map.patches()[0].data;
        assert_eq!(data.cols(), 3);
        assert!(data.get(0, 2).unwrap().is_nan());
        assert_eq!(map.patches()[0].lon.row(0).unwrap(), &[0.0, 90.0, 180.0, 360.0]);
    }

    #[test]
    fn gridlines_cover_requested_ticks() {
        let map = RotatedMap::build(
            &quarter_grid(),
            &Orientation::new(20.0, 45.0, 10.0),
            &MapConfig::default(),
        )
        .unwrap();
        let lines = map.gridlines(&[-90.0, 0.0, 90.0], &[-30.0, 30.0]).unwrap();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| !line.is_empty()));
    }

    #[test]
    fn empty_grid_degrades_to_single_patch() {
        let grid = Grid::new(Vec::new(), Vec::new(), Default::default()).unwrap();
        let map = RotatedMap::build(&grid, &Orientation::new(10.0, 10.0, 0.0), &MapConfig::default())
            .unwrap();
        assert_eq!(map.patches().len(), 1);
        assert!(map.patches()[0].data.is_empty());
    }
}
