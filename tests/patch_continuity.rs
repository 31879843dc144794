//! Patches must never wrap around inside themselves, whatever the grid origin.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skymap::{Grid, MapConfig, Orientation, Patch, RotatedMap};

const POLE_EPS_DEG: f64 = 1e-6;

fn full_sky(lon_start: f64, lon_bins: usize, lat_bins: usize) -> Grid {
    let lon_step = 360.0 / lon_bins as f64;
    let lat_step = 180.0 / lat_bins as f64;
    let lon = (0..=lon_bins)
        .map(|i| lon_start + lon_step * i as f64)
        .collect();
    let lat = (0..=lat_bins)
        .map(|i| -90.0 + lat_step * i as f64)
        .collect();
    let rows = (0..lat_bins)
        .map(|r| (0..lon_bins).map(|c| (r * lon_bins + c) as f64).collect())
        .collect();
    Grid::from_rows(lon, lat, rows).unwrap()
}

/// Largest longitude step between neighbouring nodes of any patch row.
///
/// The source polar rows and rows touching a rotated pole carry no usable
/// longitude and are skipped.
fn max_row_step(patches: &[Patch]) -> f64 {
    let mut worst: f64 = 0.0;
    for patch in patches {
        let rows = patch.lon.rows();
        for r in 1..rows.saturating_sub(1) {
            let lon = patch.lon.row(r).unwrap();
            let lat = patch.lat.row(r).unwrap();
            if lat.iter().any(|v| v.abs() > 90.0 - POLE_EPS_DEG) {
                continue;
            }
            for pair in lon.windows(2) {
                if pair[0].is_nan() || pair[1].is_nan() {
                    continue;
                }
                worst = worst.max((pair[1] - pair[0]).abs());
            }
        }
    }
    worst
}

fn pixel_count(patches: &[Patch]) -> usize {
    patches
        .iter()
        .map(|p| {
            let (rows, cols) = p.pixel_shape();
            rows * cols
        })
        .sum()
}

fn build(grid: &Grid, alf: f64, phi: f64, th: f64) -> RotatedMap {
    RotatedMap::build(grid, &Orientation::new(alf, phi, th), &MapConfig::default()).unwrap()
}

#[test]
fn offset_origin_grid_splits_like_zero_origin() {
    let zero = full_sky(0.0, 8, 4);
    let offset = full_sky(-180.0, 8, 4);

    for &(alf, phi) in &[(0.0, 0.0), (0.0, 10.0), (20.0, 10.0), (20.0, -30.0)] {
        let a = build(&zero, alf, phi, 0.0);
        let b = build(&offset, alf, phi, 0.0);
        let (step_a, step_b) = (max_row_step(a.patches()), max_row_step(b.patches()));
        assert!(step_a <= 180.0, "zero origin ({alf}, {phi}): step {step_a}");
        assert!(step_b <= 180.0, "offset origin ({alf}, {phi}): step {step_b}");
    }
}

#[test]
fn identity_view_on_offset_grid_keeps_rows_monotonic() {
    let map = build(&full_sky(-180.0, 8, 4), 0.0, 0.0, 0.0);
    let patches = map.patches();
    assert_eq!(patches.len(), 2);
    for patch in patches {
        for r in 0..patch.lon.rows() {
            let lon = patch.lon.row(r).unwrap();
            assert!(
                lon.windows(2).all(|w| w[1] > w[0]),
                "row {r} wraps: {lon:?}"
            );
        }
    }
}

#[test]
fn random_views_never_wrap_inside_a_patch() {
    let mut rng = StdRng::seed_from_u64(0x5eed_ca11);
    for &origin in &[0.0, -180.0] {
        let grid = full_sky(origin, 12, 6);
        for _ in 0..40 {
            let alf = rng.random_range(-80.0..80.0);
            let phi = rng.random_range(-180.0..180.0);
            let th = rng.random_range(-180.0..180.0);
            let map = build(&grid, alf, phi, th);
            let step = max_row_step(map.patches());
            assert!(
                step <= 180.0,
                "origin {origin}, view ({alf}, {phi}, {th}): step {step}"
            );
            assert!(pixel_count(map.patches()) >= 12 * 6);
        }
    }
}
