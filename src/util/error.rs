//! Error types for skymap.

use thiserror::Error;

/// Result alias for skymap operations.
pub type SkyMapResult<T> = std::result::Result<T, SkyMapError>;

/// Errors that can occur while rotating, splitting or rendering a map.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SkyMapError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Data matrix shape does not match the coordinate edge arrays.
    #[error(
        "data shape {rows}x{cols} does not match {lat_edges} latitude and {lon_edges} longitude edges"
    )]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        lat_edges: usize,
        lon_edges: usize,
    },
    /// An angle or coordinate was NaN or infinite.
    #[error("non-finite {name}: {value}")]
    NonFiniteAngle { name: &'static str, value: f64 },
    /// The rotated grid crosses the map edge more often than can be split.
    #[error("unsupported seam topology: {count} interior crossings (at most 2)")]
    UnsupportedSeams { count: usize },
    /// The orientation keyword is not known.
    #[error("unknown orientation preset: {name:?}")]
    UnknownPreset { name: String },
    /// Index is outside the valid range for the given context.
    #[error("{context} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// Failed to encode or write an image.
    #[cfg(feature = "image-io")]
    #[error("image I/O failed: {reason}")]
    ImageIo { reason: String },
}

impl SkyMapError {
    /// Returns `Ok(value)` if it is finite, otherwise a `NonFiniteAngle` error.
    pub(crate) fn check_finite(name: &'static str, value: f64) -> SkyMapResult<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SkyMapError::NonFiniteAngle { name, value })
        }
    }
}
