//! Regular lon/lat grids and their coordinate meshes.
//!
//! A `Grid` stores pixel edges rather than pixel centers: `n` data columns
//! need `n + 1` longitude edges and `m` data rows need `m + 1` latitude
//! edges. All transforms produce new grids; a `Grid` is never mutated.

pub mod augment;
mod matrix;

pub use augment::{insert_coordinate, Axis};
pub use matrix::Matrix;

use crate::util::{SkyMapError, SkyMapResult};

/// Whole-sky data on a regular lon/lat grid, in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    lon_edges: Vec<f64>,
    lat_edges: Vec<f64>,
    data: Matrix,
}

impl Grid {
    /// Creates a grid, validating edge ordering and the data shape.
    pub fn new(lon_edges: Vec<f64>, lat_edges: Vec<f64>, data: Matrix) -> SkyMapResult<Self> {
        check_edges(&lon_edges)?;
        check_edges(&lat_edges)?;
        let expected_rows = lat_edges.len().saturating_sub(1);
        let expected_cols = lon_edges.len().saturating_sub(1);
        // Zero-size grids only need to be empty in some dimension.
        let shape_ok = data.shape() == (expected_rows, expected_cols)
            || (data.is_empty() && (expected_rows == 0 || expected_cols == 0));
        if !shape_ok {
            return Err(SkyMapError::ShapeMismatch {
                rows: data.rows(),
                cols: data.cols(),
                lat_edges: lat_edges.len(),
                lon_edges: lon_edges.len(),
            });
        }
        Ok(Self {
            lon_edges,
            lat_edges,
            data,
        })
    }

    /// Creates a grid from nested data rows (one row per latitude band).
    pub fn from_rows(
        lon_edges: Vec<f64>,
        lat_edges: Vec<f64>,
        rows: Vec<Vec<f64>>,
    ) -> SkyMapResult<Self> {
        Self::new(lon_edges, lat_edges, Matrix::from_rows(rows)?)
    }

    /// Returns the ascending longitude edges.
    pub fn lon_edges(&self) -> &[f64] {
        &self.lon_edges
    }

    /// Returns the ascending latitude edges.
    pub fn lat_edges(&self) -> &[f64] {
        &self.lat_edges
    }

    /// Returns the data matrix (`lat bands x lon bands`).
    pub fn data(&self) -> &Matrix {
        &self.data
    }

    /// Returns the covered longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        match (self.lon_edges.first(), self.lon_edges.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<f64>, Matrix) {
        (self.lon_edges, self.lat_edges, self.data)
    }
}

fn check_edges(edges: &[f64]) -> SkyMapResult<()> {
    if let Some(&bad) = edges.iter().find(|v| !v.is_finite()) {
        return Err(SkyMapError::NonFiniteAngle {
            name: "grid edge",
            value: bad,
        });
    }
    if edges.windows(2).any(|w| w[1] < w[0]) {
        return Err(SkyMapError::InvalidInput("grid edges must be ascending"));
    }
    Ok(())
}

/// Pixel-edge coordinates of every grid node, as produced by a meshgrid.
///
/// Both matrices are `(lat edges) x (lon edges)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub lon: Matrix,
    pub lat: Matrix,
}

impl Mesh {
    /// Expands 1-D edge arrays into a mesh.
    pub fn from_edges(lon_edges: &[f64], lat_edges: &[f64]) -> Self {
        let rows = lat_edges.len();
        let cols = lon_edges.len();
        let mut lon = Vec::with_capacity(rows * cols);
        let mut lat = Vec::with_capacity(rows * cols);
        for &la in lat_edges {
            lon.extend_from_slice(lon_edges);
            lat.extend(std::iter::repeat(la).take(cols));
        }
        Self {
            lon: Matrix::from_parts(lon, rows, cols),
            lat: Matrix::from_parts(lat, rows, cols),
        }
    }

    /// Returns `(rows, cols)` of the mesh.
    pub fn shape(&self) -> (usize, usize) {
        self.lon.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, Matrix, Mesh};
    use crate::util::SkyMapError;

    #[test]
    fn grid_rejects_shape_mismatch() {
        let err = Grid::from_rows(
            vec![0.0, 180.0, 360.0],
            vec![-90.0, 90.0],
            vec![vec![1.0, 2.0, 3.0]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SkyMapError::ShapeMismatch {
                rows: 1,
                cols: 3,
                lat_edges: 2,
                lon_edges: 3,
            }
        );
    }

    #[test]
    fn grid_rejects_descending_edges() {
        let err = Grid::new(vec![360.0, 0.0], vec![-90.0, 90.0], Matrix::filled(1, 1, 0.0));
        assert!(matches!(err, Err(SkyMapError::InvalidInput(_))));
    }

    #[test]
    fn grid_accepts_zero_size() {
        let grid = Grid::new(Vec::new(), Vec::new(), Matrix::default()).unwrap();
        assert_eq!(grid.lon_span(), 0.0);
    }

    #[test]
    fn mesh_repeats_edges() {
        let mesh = Mesh::from_edges(&[0.0, 90.0, 180.0], &[-90.0, 90.0]);
        assert_eq!(mesh.shape(), (2, 3));
        assert_eq!(mesh.lon.row(1).unwrap(), &[0.0, 90.0, 180.0]);
        assert_eq!(mesh.lat.row(0).unwrap(), &[-90.0, -90.0, -90.0]);
    }
}
