//! Benchmarks for grid metrics and the geostrophic velocity solver.
//!
//! Run with: `cargo bench --bench geostrophic_bench`
//!
//! Measures metrics setup and per-field velocity cost at various padded
//! window sizes.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use eddy_grid::grid::{StaggeredMasks, Unpad};
use eddy_grid::solver::{compute_metrics, solve};
use ndarray::Array2;

/// Regular 0.25° mid-latitude window with a wavy SSH field.
fn setup(n: usize) -> (Array2<f64>, Array2<f64>, Array2<f64>, Array2<bool>) {
    let lon = Array2::from_shape_fn((n, n), |(_, i)| -40.0 + i as f64 * 0.25);
    let lat = Array2::from_shape_fn((n, n), |(j, _)| 20.0 + j as f64 * 0.25 * 40.0 / n as f64);
    let ssh = Array2::from_shape_fn((n, n), |(j, i)| {
        0.3 * (i as f64 * 0.1).sin() * (j as f64 * 0.07).cos()
    });
    let mask = Array2::from_shape_fn((n, n), |(j, i)| (i + 3 * j) % 17 != 0);
    (lon, lat, ssh, mask)
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for &n in &[64usize, 256, 512] {
        let (lon, lat, _, _) = setup(n);
        group.bench_with_input(BenchmarkId::new("compute_metrics", n), &n, |b, _| {
            b.iter(|| compute_metrics(black_box(lon.view()), black_box(lat.view())))
        });
    }

    group.finish();
}

fn bench_velocity(c: &mut Criterion) {
    let mut group = c.benchmark_group("geostrophic");

    for &n in &[64usize, 256, 512] {
        let (lon, lat, ssh, mask) = setup(n);
        let metrics = compute_metrics(lon.view(), lat.view()).unwrap();
        let masks = StaggeredMasks::from_rho(mask.view()).unwrap();
        let unpad = Unpad::new(2);
        group.bench_with_input(BenchmarkId::new("solve", n), &n, |b, _| {
            b.iter(|| solve(black_box(ssh.view()), &metrics, &masks, unpad))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_metrics, bench_velocity);
criterion_main!(benches);
