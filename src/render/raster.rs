//! Software rasterizer writing Mollweide maps to RGBA images.
//!
//! Available when the `image-io` feature is enabled.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::grid::Matrix;
use crate::render::{ColorRange, Renderer};
use crate::sphere::mollweide::{self, X_MAX, Y_MAX};
use crate::util::{SkyMapError, SkyMapResult};

const UNDER: Rgba<u8> = Rgba([0, 0, 0, 255]);
const OVER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GRID: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Viridis anchor colors, evenly spaced over `[0, 1]`.
const PALETTE: [[u8; 3]; 5] = [
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

/// Renders patches and gridlines into an in-memory RGBA image.
///
/// The whole map ellipse spans the image; pixels outside it stay
/// transparent.
pub struct RasterRenderer {
    image: RgbaImage,
}

impl RasterRenderer {
    /// Creates a transparent canvas of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> SkyMapResult<Self> {
        if width == 0 || height == 0 {
            return Err(SkyMapError::InvalidInput("raster size must be non-zero"));
        }
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// Returns the rendered image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consumes the renderer and returns the rendered image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Writes the image as PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> SkyMapResult<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|err| SkyMapError::ImageIo {
                reason: err.to_string(),
            })
    }

    fn size(&self) -> (f64, f64) {
        (f64::from(self.image.width()), f64::from(self.image.height()))
    }

    fn to_plane(&self, px: f64, py: f64) -> (f64, f64) {
        let (w, h) = self.size();
        ((px / w * 2.0 - 1.0) * X_MAX, (1.0 - py / h * 2.0) * Y_MAX)
    }

    fn put_clipped(&mut self, px: i64, py: i64, color: Rgba<u8>) {
        let (w, h) = (i64::from(self.image.width()), i64::from(self.image.height()));
        if px < 0 || py < 0 || px >= w || py >= h {
            return;
        }
        let (x, y) = self.to_plane(px as f64 + 0.5, py as f64 + 0.5);
        if mollweide::contains(x, y) {
            self.image.put_pixel(px as u32, py as u32, color);
        }
    }

    /// Scanline-fills a quadrilateral given in pixel space (even-odd rule).
    fn fill_polygon(&mut self, corners: &[(f64, f64); 4], color: Rgba<u8>) {
        let y_lo = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let y_hi = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);
        let height = f64::from(self.image.height());
        let row_start = y_lo.floor().max(0.0) as i64;
        let row_end = y_hi.ceil().min(height) as i64;

        let mut crossings = Vec::with_capacity(4);
        for row in row_start..row_end {
            let yc = row as f64 + 0.5;
            crossings.clear();
            for i in 0..4 {
                let (x0, y0) = corners[i];
                let (x1, y1) = corners[(i + 1) % 4];
                if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
                    crossings.push(x0 + (yc - y0) / (y1 - y0) * (x1 - x0));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil() as i64;
                let end = (pair[1] - 0.5).floor() as i64;
                for col in start..=end {
                    self.put_clipped(col, row, color);
                }
            }
        }
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba<u8>) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0);
        let n = steps as i64;
        for i in 0..=n {
            let t = i as f64 / steps;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            self.put_clipped(x.floor() as i64, y.floor() as i64, color);
        }
    }
}

impl Renderer for RasterRenderer {
    fn fill_patch(
        &mut self,
        lon_rad: &Matrix,
        lat_rad: &Matrix,
        data: &Matrix,
        range: ColorRange,
    ) -> SkyMapResult<()> {
        let (rows, cols) = data.shape();
        if rows == 0 || cols == 0 {
            return Ok(());
        }
        if lon_rad.shape() != (rows + 1, cols + 1) || lat_rad.shape() != lon_rad.shape() {
            return Err(SkyMapError::ShapeMismatch {
                rows,
                cols,
                lat_edges: lat_rad.rows(),
                lon_edges: lon_rad.cols(),
            });
        }

        let edge_cols = cols + 1;
        let lons = lon_rad.as_slice();
        let lats = lat_rad.as_slice();
        let size = self.size();
        let node = |r: usize, c: usize| {
            let idx = r * edge_cols + c;
            let (x, y) = mollweide::project(lons[idx], lats[idx]);
            to_pixel(size, x, y)
        };

        for (idx, &value) in data.as_slice().iter().enumerate() {
            let Some(color) = colormap(range.scale(value)) else {
                continue;
            };
            let (r, c) = (idx / cols, idx % cols);
            let corners = [node(r, c), node(r, c + 1), node(r + 1, c + 1), node(r + 1, c)];
            if corners.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
                continue;
            }
            self.fill_polygon(&corners, color);
        }
        Ok(())
    }

    fn stroke_gridline(&mut self, lon_rad: &[f64], lat_rad: &[f64]) -> SkyMapResult<()> {
        if lon_rad.len() != lat_rad.len() {
            return Err(SkyMapError::InvalidInput(
                "gridline longitude and latitude lengths differ",
            ));
        }
        let mut last: Option<(f64, f64)> = None;
        for (&lon, &lat) in lon_rad.iter().zip(lat_rad) {
            if lon.is_nan() || lat.is_nan() {
                last = None;
                continue;
            }
            let (x, y) = mollweide::project(lon, lat);
            let here = to_pixel(self.size(), x, y);
            if let Some(prev) = last {
                self.draw_line(prev, here, GRID);
            }
            last = Some(here);
        }
        Ok(())
    }
}

/// Maps Mollweide plane coordinates to fractional pixel coordinates.
fn to_pixel((w, h): (f64, f64), x: f64, y: f64) -> (f64, f64) {
    ((x / X_MAX + 1.0) * 0.5 * w, (1.0 - y / Y_MAX) * 0.5 * h)
}

/// Maps a scaled value to a color. NaN yields `None` (transparent).
fn colormap(t: f64) -> Option<Rgba<u8>> {
    if t.is_nan() {
        return None;
    }
    if t < 0.0 {
        return Some(UNDER);
    }
    if t > 1.0 {
        return Some(OVER);
    }
    let pos = t * (PALETTE.len() - 1) as f64;
    let lo = (pos.floor() as usize).min(PALETTE.len() - 2);
    let frac = pos - lo as f64;
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    let (a, b) = (PALETTE[lo], PALETTE[lo + 1]);
    Some(Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255]))
}
