//! Patch boundaries must coincide with a direct rotation of the same edges.

use skymap::{rotate_points, Grid, MapConfig, Orientation, RotatedMap};

const TOL_DEG: f64 = 1e-6;

fn lon_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

fn four_by_four() -> Grid {
    let rows: Vec<Vec<f64>> = (0..4)
        .map(|r| (0..4).map(|c| (r * 4 + c) as f64).collect())
        .collect();
    Grid::from_rows(
        vec![0.0, 90.0, 180.0, 270.0, 360.0],
        vec![-90.0, -45.0, 0.0, 45.0, 90.0],
        rows,
    )
    .unwrap()
}

#[test]
fn boundary_columns_match_direct_rotation() {
    let map = RotatedMap::build(
        &four_by_four(),
        &Orientation::new(35.0, 45.0, 20.0),
        &MapConfig::default(),
    )
    .unwrap();
    let patches = map.patches();
    assert_eq!(patches.len(), 3);

    // Edges after augmentation, shifted so the view azimuth sits at 0.
    let lats = [-90.0, -55.0, -45.0, 0.0, 45.0, 55.0, 90.0];
    let boundaries = [(-45.0, 0.0), (0.0, 180.0), (180.0, 315.0)];
    let edge_cols = [2, 4, 3];

    for ((patch, &(left, right)), &cols) in patches.iter().zip(&boundaries).zip(&edge_cols) {
        assert_eq!(patch.lon.shape(), (lats.len(), cols));
        for (col, shifted) in [(0, left), (cols - 1, right)] {
            let lons = vec![shifted; lats.len()];
            let (exp_lon, exp_lat) = rotate_points(&lons, &lats, 35.0).unwrap();
            let got_lon = patch.lon.column(col).unwrap();
            let got_lat = patch.lat.column(col).unwrap();
            for i in 0..lats.len() {
                assert!((got_lat[i] - exp_lat[i]).abs() < TOL_DEG);
                assert!(
                    lon_distance(got_lon[i], exp_lon[i]) < TOL_DEG,
                    "patch edge {col} row {i}: {} vs {}",
                    got_lon[i],
                    exp_lon[i]
                );
            }
        }
    }
}

#[test]
fn shared_seams_agree_between_neighbors() {
    let map = RotatedMap::build(
        &four_by_four(),
        &Orientation::new(35.0, 45.0, 20.0),
        &MapConfig::default(),
    )
    .unwrap();
    for pair in map.patches().windows(2) {
        let last = pair[0].lat.cols() - 1;
        assert_eq!(pair[0].lat.column(last), pair[1].lat.column(0));
        let left = pair[0].lon.column(last).unwrap();
        let right = pair[1].lon.column(0).unwrap();
        for (a, b) in left.iter().zip(&right) {
            assert!(lon_distance(*a, *b) < TOL_DEG);
        }
    }
}

#[test]
fn seam_values_are_pinned_to_their_patch_side() {
    let map = RotatedMap::build(
        &four_by_four(),
        &Orientation::new(35.0, 45.0, 20.0),
        &MapConfig::default(),
    )
    .unwrap();
    // phi > 0: the outer patches never keep values next to 0.
    for idx in [0, 2] {
        let patch = &map.patches()[idx];
        assert!(patch.lon.as_slice().iter().all(|lon| lon.abs() > 1e-5));
    }
    assert!(map
        .patches()
        .iter()
        .flat_map(|p| p.lon.as_slice())
        .all(|lon| (0.0..=360.0).contains(lon)));
}
