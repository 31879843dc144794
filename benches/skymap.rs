use criterion::{criterion_group, criterion_main, Criterion};
use skymap::{
    rotate_mesh, Grid, MapConfig, Matrix, Mesh, Orientation, Preset, PresetCoords, RotatedMap,
};
use std::hint::black_box;

fn make_grid(step_deg: usize) -> Grid {
    let cols = 360 / step_deg;
    let rows = 180 / step_deg;
    let lon: Vec<f64> = (0..=cols).map(|i| (i * step_deg) as f64).collect();
    let lat: Vec<f64> = (0..=rows)
        .map(|i| (i * step_deg) as f64 - 90.0)
        .collect();
    let mut data = Vec::with_capacity(rows * cols);
    for y in 0..rows {
        for x in 0..cols {
            data.push(((x * 13) ^ (y * 7) ^ (x * y)) as f64 % 97.0);
        }
    }
    Grid::new(lon, lat, Matrix::new(data, rows, cols).unwrap()).unwrap()
}

fn bench_rotation(c: &mut Criterion) {
    let grid = make_grid(1);
    let mesh = Mesh::from_edges(grid.lon_edges(), grid.lat_edges());

    c.bench_function("rotate_mesh_1deg", |b| {
        b.iter(|| black_box(rotate_mesh(&mesh, 35.0).unwrap()));
    });

    #[cfg(feature = "rayon")]
    c.bench_function("rotate_mesh_1deg_par", |b| {
        b.iter(|| black_box(skymap::rotate_mesh_par(&mesh, 35.0).unwrap()));
    });
}

fn bench_map(c: &mut Criterion) {
    let grid = make_grid(6);
    let coords = PresetCoords::default();
    let nose = Preset::Nose.orientation(&coords);
    let galactic = Preset::Galactic.orientation(&coords);
    let cfg = MapConfig::default();

    c.bench_function("build_map_6deg_nose", |b| {
        b.iter(|| black_box(RotatedMap::build(&grid, &nose, &cfg).unwrap()));
    });

    c.bench_function("build_map_6deg_galactic", |b| {
        b.iter(|| black_box(RotatedMap::build(&grid, &galactic, &cfg).unwrap()));
    });

    let map = RotatedMap::build(&grid, &Orientation::new(35.0, 45.0, 20.0), &cfg).unwrap();
    let lon_ticks: Vec<f64> = (0..12).map(|i| -150.0 + 30.0 * i as f64).collect();
    let lat_ticks: Vec<f64> = (0..11).map(|i| -75.0 + 15.0 * i as f64).collect();
    c.bench_function("gridlines_default_ticks", |b| {
        b.iter(|| black_box(map.gridlines(&lon_ticks, &lat_ticks).unwrap()));
    });
}

criterion_group!(benches, bench_rotation, bench_map);
criterion_main!(benches);
