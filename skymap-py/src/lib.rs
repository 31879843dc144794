//! Python bindings for the skymap rotated Mollweide map library.
//!
//! This module exposes the rotation, seam-splitting and gridline API to
//! Python via PyO3. Arrays cross the boundary as numpy `float64` arrays.

use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use skymap::{
    GridlineKind, Grid as RustGrid, MapConfig as RustMapConfig, Matrix, Orientation, Preset,
    PresetCoords, RotatedMap, SkyMapError,
};

type PyArrayPair<'py> = (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>);
type PyPatch<'py> = (
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray2<f64>>,
);

/// Convert a SkyMapError to a Python exception.
fn to_py_err(err: SkyMapError) -> PyErr {
    match err {
        SkyMapError::UnsupportedSeams { .. } => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn matrix_from_py(array: &PyReadonlyArray2<'_, f64>) -> PyResult<Matrix> {
    let shape = array.shape();
    let (rows, cols) = (shape[0], shape[1]);
    // Non-contiguous inputs are copied in logical order.
    let data = match array.as_slice() {
        Ok(slice) => slice.to_vec(),
        Err(_) => array.as_array().iter().copied().collect(),
    };
    Matrix::new(data, rows, cols).map_err(to_py_err)
}

fn matrix_to_py<'py>(py: Python<'py>, matrix: Matrix) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let (rows, cols) = matrix.shape();
    let array = Array2::from_shape_vec((rows, cols), matrix.into_vec())
        .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;
    Ok(array.into_pyarray(py))
}

fn vec_from_py(array: &PyReadonlyArray1<'_, f64>) -> Vec<f64> {
    array.as_array().to_vec()
}

/// Wrap an angle into [lower, lower + 360).
///
/// Args:
///     angle: angle in degrees
///     lower: lower bound of the window (default: -180)
///
/// Returns:
///     The wrapped angle; an input equal to lower + 360 is returned as is.
#[pyfunction]
#[pyo3(signature = (angle, lower = -180.0))]
fn normalize(angle: f64, lower: f64) -> PyResult<f64> {
    skymap::normalize(angle, lower).map_err(to_py_err)
}

/// Rotate paired lon/lat arrays by a polar tilt.
///
/// Args:
///     lon: 1D float64 array of longitudes in degrees
///     lat: 1D float64 array of latitudes in degrees
///     tilt: rotation angle in degrees
///
/// Returns:
///     (lon, lat) tuple of rotated arrays, lon in [0, 360)
#[pyfunction]
fn rotate_sphere<'py>(
    py: Python<'py>,
    lon: PyReadonlyArray1<'py, f64>,
    lat: PyReadonlyArray1<'py, f64>,
    tilt: f64,
) -> PyResult<PyArrayPair<'py>> {
    let (lon, lat) =
        skymap::rotate_points(&vec_from_py(&lon), &vec_from_py(&lat), tilt).map_err(to_py_err)?;
    Ok((
        Array1::from_vec(lon).into_pyarray(py),
        Array1::from_vec(lat).into_pyarray(py),
    ))
}

/// Rotate a lon/lat grid and split it into wrap-free patches.
///
/// Args:
///     lon: 1D array of n + 1 ascending longitude edges (degrees)
///     lat: 1D array of m + 1 ascending latitude edges (degrees)
///     data: 2D float64 array (m x n)
///     alf: polar tilt in degrees (default: 0)
///     phi: azimuth in degrees (default: 0)
///     th: horizontal re-centering in degrees (default: 0)
///     center_meridian: interpret th as the longitude on the central meridian
///     preset: orientation keyword overriding the angles (e.g. "nose", "gal")
///     parallel: rotate on the rayon thread pool (default: False)
///
/// Returns:
///     List of (lon, lat, data) tuples, one per patch in display order
#[pyfunction]
#[pyo3(signature = (
    lon,
    lat,
    data,
    alf = 0.0,
    phi = 0.0,
    th = 0.0,
    center_meridian = false,
    preset = None,
    parallel = false
))]
#[allow(clippy::too_many_arguments)]
fn rotated_patches<'py>(
    py: Python<'py>,
    lon: PyReadonlyArray1<'py, f64>,
    lat: PyReadonlyArray1<'py, f64>,
    data: PyReadonlyArray2<'py, f64>,
    alf: f64,
    phi: f64,
    th: f64,
    center_meridian: bool,
    preset: Option<&str>,
    parallel: bool,
) -> PyResult<Vec<PyPatch<'py>>> {
    let grid = RustGrid::new(vec_from_py(&lon), vec_from_py(&lat), matrix_from_py(&data)?)
        .map_err(to_py_err)?;
    let orientation = match preset {
        Some(name) => name
            .parse::<Preset>()
            .map_err(to_py_err)?
            .orientation(&PresetCoords::default()),
        None => Orientation::new(alf, phi, th).with_center_meridian(center_meridian),
    };
    let cfg = RustMapConfig {
        parallel,
        ..RustMapConfig::default()
    };

    let map = RotatedMap::build(&grid, &orientation, &cfg).map_err(to_py_err)?;
    map.into_patches()
        .into_iter()
        .map(|patch| {
            Ok((
                matrix_to_py(py, patch.lon)?,
                matrix_to_py(py, patch.lat)?,
                matrix_to_py(py, patch.data)?,
            ))
        })
        .collect()
}

/// Build one rotated grid line, broken with NaN where it leaves the map.
///
/// Args:
///     coord: longitude of a meridian or latitude of a parallel (degrees)
///     kind: "meridian" or "parallel"
///     alf: polar tilt in degrees
///     th: horizontal re-centering in degrees (default: 0)
///
/// Returns:
///     (lon, lat) tuple of display-degree arrays
#[pyfunction]
#[pyo3(signature = (coord, kind, alf, th = 0.0))]
fn gridline<'py>(
    py: Python<'py>,
    coord: f64,
    kind: &str,
    alf: f64,
    th: f64,
) -> PyResult<PyArrayPair<'py>> {
    let kind = match kind.to_lowercase().as_str() {
        "meridian" | "lon" => GridlineKind::Meridian,
        "parallel" | "lat" => GridlineKind::Parallel,
        _ => {
            return Err(PyValueError::new_err(
                "kind must be 'meridian' or 'parallel'",
            ))
        }
    };
    let line = skymap::gridline(coord, kind, alf, th).map_err(to_py_err)?;
    Ok((
        Array1::from_vec(line.lon).into_pyarray(py),
        Array1::from_vec(line.lat).into_pyarray(py),
    ))
}

/// Python module for skymap rotated Mollweide maps.
#[pymodule]
fn _skymap(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    m.add_function(wrap_pyfunction!(rotate_sphere, m)?)?;
    m.add_function(wrap_pyfunction!(rotated_patches, m)?)?;
    m.add_function(wrap_pyfunction!(gridline, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
