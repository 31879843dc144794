use skymap::{gridline, split_gridline, GridlineKind};

#[test]
fn tilted_meridian_breaks_once_at_map_edge() {
    let line = gridline(90.0, GridlineKind::Meridian, 90.0, -90.0).unwrap();
    assert_eq!(line.breaks(), 1);
    let nan = line.lon.iter().position(|v| v.is_nan()).unwrap();
    assert!(line.lat[nan].is_nan());
    let mut ends = [line.lon[nan - 1], line.lon[nan + 1]];
    ends.sort_by(f64::total_cmp);
    assert_eq!(ends, [-180.0, 180.0]);
    assert_eq!(line.lat[nan - 1], line.lat[nan + 1]);
}

#[test]
fn every_crossing_gets_its_own_break() {
    let lons = vec![170.0, -170.0, -160.0, 170.0, 175.0, -175.0];
    let lats = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let line = split_gridline(lons, lats);
    assert_eq!(line.breaks(), 3);
    for (idx, lon) in line.lon.iter().enumerate() {
        if lon.is_nan() {
            assert_eq!(line.lon[idx - 1].abs(), 180.0);
            assert_eq!(line.lon[idx + 1], -line.lon[idx - 1]);
        }
    }
}

#[test]
fn pen_down_runs_never_jump() {
    for alf in [-35.0, 20.0, 50.0] {
        for coord in [-60.0, -10.0, 15.0, 80.0] {
            let line = gridline(coord, GridlineKind::Parallel, alf, 25.0).unwrap();
            for (lon, lat) in line.segments() {
                assert_eq!(lon.len(), lat.len());
                assert!(lon.windows(2).all(|w| (w[1] - w[0]).abs() <= 90.0));
                assert!(lon.iter().all(|v| (-180.0..=180.0).contains(v)));
            }
        }
    }
}
