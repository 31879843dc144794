//! Forward Mollweide (equal-area) projection of the unit sphere.
//!
//! Output coordinates lie inside the ellipse `(x / 2√2)² + (y / √2)² <= 1`.

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

const NEWTON_MAX_ITERS: usize = 20;
const NEWTON_EPS: f64 = 1e-12;

/// Half-width of the projected map.
pub const X_MAX: f64 = 2.0 * SQRT_2;
/// Half-height of the projected map.
pub const Y_MAX: f64 = SQRT_2;

/// Projects `(lon_rad, lat_rad)` onto the Mollweide plane.
///
/// Longitudes outside `[-π, π]` land outside the map ellipse, which lets a
/// caller draw wrapped copies and clip them.
pub fn project(lon_rad: f64, lat_rad: f64) -> (f64, f64) {
    let theta = auxiliary_angle(lat_rad);
    let x = X_MAX / PI * lon_rad * theta.cos();
    let y = Y_MAX * theta.sin();
    (x, y)
}

/// True when `(x, y)` lies on or inside the map ellipse.
pub fn contains(x: f64, y: f64) -> bool {
    let u = x / X_MAX;
    let v = y / Y_MAX;
    u * u + v * v <= 1.0
}

/// Solves `2θ + sin 2θ = π sin φ` by Newton iteration.
fn auxiliary_angle(lat_rad: f64) -> f64 {
    if (FRAC_PI_2 - lat_rad.abs()) < 1e-10 {
        return FRAC_PI_2.copysign(lat_rad);
    }
    let target = PI * lat_rad.sin();
    let mut two_theta = lat_rad;
    for _ in 0..NEWTON_MAX_ITERS {
        let delta = -(two_theta + two_theta.sin() - target) / (1.0 + two_theta.cos());
        two_theta += delta;
        if delta.abs() < NEWTON_EPS {
            break;
        }
    }
    two_theta / 2.0
}
