//! Drawing a rotated map through a narrow renderer interface.
//!
//! The core never rasterizes anything itself. [`draw_map`] converts patches
//! and gridlines into display radians and hands them to a [`Renderer`];
//! [`raster::RasterRenderer`] is one implementation (feature `image-io`).

#[cfg(feature = "image-io")]
pub mod raster;

use crate::grid::Matrix;
use crate::map::RotatedMap;
use crate::split::Patch;
use crate::trace::{trace_event, trace_span};
use crate::util::math::linspace;
use crate::util::{SkyMapError, SkyMapResult};

/// Receives projected-ready geometry in display radians.
pub trait Renderer {
    /// Fills one patch. `lon_rad`/`lat_rad` are pixel edges, one larger
    /// than `data` in each dimension.
    fn fill_patch(
        &mut self,
        lon_rad: &Matrix,
        lat_rad: &Matrix,
        data: &Matrix,
        range: ColorRange,
    ) -> SkyMapResult<()>;

    /// Strokes one polyline. NaN vertices lift the pen.
    fn stroke_gridline(&mut self, lon_rad: &[f64], lat_rad: &[f64]) -> SkyMapResult<()>;
}

/// Color scale bounds shared by all patches of a map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRange {
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorRange {
    /// The `[0, 1]` range used for pre-normalized data.
    pub const UNIT: ColorRange = ColorRange {
        vmin: 0.0,
        vmax: 1.0,
    };

    /// Creates a range, rejecting non-finite or inverted bounds.
    pub fn new(vmin: f64, vmax: f64) -> SkyMapResult<Self> {
        SkyMapError::check_finite("vmin", vmin)?;
        SkyMapError::check_finite("vmax", vmax)?;
        if vmin > vmax {
            return Err(SkyMapError::InvalidInput("vmin must not exceed vmax"));
        }
        Ok(Self { vmin, vmax })
    }

    /// Derives the range from the finite values of `patches`.
    ///
    /// Explicit bounds win. A missing bound falls back to the data minimum
    /// or maximum, or to 0 and 1 when no value is finite. An automatic
    /// positive minimum is dropped to 0 when the maximum exceeds ten times
    /// it, so sparse positive data keeps a zero baseline.
    pub fn from_patches(patches: &[Patch], vmin: Option<f64>, vmax: Option<f64>) -> Self {
        let data_range = patches
            .iter()
            .filter_map(|patch| patch.data.finite_range())
            .reduce(|(lo, hi), (plo, phi)| (lo.min(plo), hi.max(phi)));

        let vmax = vmax.unwrap_or_else(|| data_range.map_or(1.0, |(_, hi)| hi));
        let vmin = match vmin {
            Some(vmin) => vmin,
            None => {
                let lo = data_range.map_or(0.0, |(lo, _)| lo);
                if lo > 0.0 && vmax > 10.0 * lo {
                    0.0
                } else {
                    lo
                }
            }
        };
        Self { vmin, vmax }
    }

    /// Maps `value` to `[0, 1]` inside the range; values outside fall
    /// below 0 or above 1 and NaN stays NaN.
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span > 0.0 {
            (value - self.vmin) / span
        } else if value.is_nan() {
            value
        } else if value < self.vmin {
            -1.0
        } else if value > self.vmax {
            2.0
        } else {
            0.5
        }
    }
}

/// Options for [`draw_map`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawOptions {
    /// Lower color bound; derived from the data when `None`.
    pub vmin: Option<f64>,
    /// Upper color bound; derived from the data when `None`.
    pub vmax: Option<f64>,
    /// Data are already scaled to `[0, 1]`; overrides `vmin`/`vmax`.
    pub normalized: bool,
    /// Meridian ticks, relative to the view azimuth.
    pub lon_ticks: Vec<f64>,
    /// Parallel ticks.
    pub lat_ticks: Vec<f64>,
    /// Draw gridlines after the patches.
    pub grid_on: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            vmin: None,
            vmax: None,
            normalized: false,
            lon_ticks: linspace(-150.0, 180.0, 12),
            lat_ticks: linspace(-75.0, 75.0, 11),
            grid_on: true,
        }
    }
}

/// Draws `map` through `renderer` and returns the color range used.
///
/// Each patch is filled twice, at display longitude `-(lon + th)` and at
/// `-(lon - 360 + th)`, so that both sides of the map edge are covered
/// whatever the re-centering angle. Gridlines follow the patches.
pub fn draw_map<R: Renderer + ?Sized>(
    renderer: &mut R,
    map: &RotatedMap,
    opts: &DrawOptions,
) -> SkyMapResult<ColorRange> {
    let range = if opts.normalized {
        ColorRange::UNIT
    } else {
        ColorRange::from_patches(map.patches(), opts.vmin, opts.vmax)
    };
    let th = map.orientation().th;
    let _span = trace_span!("draw_map", patches = map.patches().len(), th = th).entered();

    for patch in map.patches() {
        let lat = patch.lat.map(f64::to_radians);
        for offset in [0.0, -360.0] {
            let lon = patch.lon.map(|lon| -(lon + offset + th).to_radians());
            renderer.fill_patch(&lon, &lat, &patch.data, range)?;
        }
    }

    if opts.grid_on {
        let lines = map.gridlines(&opts.lon_ticks, &opts.lat_ticks)?;
        trace_event!("gridlines", count = lines.len());
        for line in &lines {
            let lon: Vec<f64> = line.lon.iter().map(|v| v.to_radians()).collect();
            let lat: Vec<f64> = line.lat.iter().map(|v| v.to_radians()).collect();
            renderer.stroke_gridline(&lon, &lat)?;
        }
    }

    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::{ColorRange, DrawOptions};
    use crate::grid::{Matrix, Mesh};
    use crate::split::Patch;

    fn patch_with(values: Vec<f64>) -> Patch {
        let cols = values.len();
        let lons: Vec<f64> = (0..=cols).map(|i| i as f64).collect();
        let mesh = Mesh::from_edges(&lons, &[-1.0, 1.0]);
        Patch {
            lon: mesh.lon,
            lat: mesh.lat,
            data: Matrix::new(values, 1, cols).unwrap(),
        }
    }

    #[test]
    fn range_spans_all_patches() {
        let patches = vec![patch_with(vec![-2.0, f64::NAN]), patch_with(vec![3.0, 1.0])];
        let range = ColorRange::from_patches(&patches, None, None);
        assert_eq!(range, ColorRange { vmin: -2.0, vmax: 3.0 });
    }

    #[test]
    fn sparse_positive_data_gets_zero_baseline() {
        let patches = vec![patch_with(vec![2.0, 50.0])];
        let range = ColorRange::from_patches(&patches, None, None);
        assert_eq!(range.vmin, 0.0);
        let range = ColorRange::from_patches(&patches, Some(2.0), None);
        assert_eq!(range.vmin, 2.0);
        let patches = vec![patch_with(vec![2.0, 15.0])];
        assert_eq!(ColorRange::from_patches(&patches, None, None).vmin, 2.0);
    }

    #[test]
    fn all_nan_falls_back_to_unit_range() {
        let patches = vec![patch_with(vec![f64::NAN, f64::NAN])];
        assert_eq!(
            ColorRange::from_patches(&patches, None, None),
            ColorRange::UNIT
        );
        assert_eq!(
            ColorRange::from_patches(&patches, None, Some(5.0)).vmax,
            5.0
        );
    }

    #[test]
    fn scale_handles_degenerate_range() {
        let range = ColorRange::new(3.0, 3.0).unwrap();
        assert_eq!(range.scale(3.0), 0.5);
        assert!(range.scale(4.0) > 1.0);
        assert!(range.scale(f64::NAN).is_nan());
        assert!(ColorRange::new(2.0, 1.0).is_err());
    }

    #[test]
    fn default_ticks_match_map_graticule() {
        let opts = DrawOptions::default();
        assert_eq!(opts.lon_ticks.len(), 12);
        assert_eq!(opts.lon_ticks[0], -150.0);
        assert_eq!(opts.lon_ticks[11], 180.0);
        assert_eq!(opts.lat_ticks.len(), 11);
        assert!((opts.lat_ticks[5]).abs() < 1e-12);
    }
}
