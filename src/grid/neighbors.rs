//! k-nearest-neighbour search over grid points.
//!
//! Distances are Euclidean in raw `(lon, lat)` degrees. Grids here are at most
//! a few million points and queries come in handfuls (box corners), so an
//! exhaustive scan is used instead of a spatial tree.

use ndarray::ArrayView2;

use crate::error::{GridError, ensure_same_shape};

/// Neighbour count used for zero-crossing column bounds on irregular grids.
pub const DEFAULT_NEIGHBORS: usize = 4;

/// Indices `(j, i)` of the `k` grid points closest to each query point.
///
/// Results for a query are ordered nearest first; equal distances keep the
/// row-major order of the grid. NaN coordinates never match.
pub fn k_nearest(
    lon: ArrayView2<f64>,
    lat: ArrayView2<f64>,
    queries: &[(f64, f64)],
    k: usize,
) -> Result<Vec<Vec<(usize, usize)>>, GridError> {
    ensure_same_shape(lon.dim(), lat.dim())?;
    Ok(queries
        .iter()
        .map(|&(qx, qy)| nearest_to(lon, lat, qx, qy, k))
        .collect())
}

/// Parallel version of [`k_nearest`] using Rayon, one task per query.
#[cfg(feature = "parallel")]
pub fn k_nearest_parallel(
    lon: ArrayView2<f64>,
    lat: ArrayView2<f64>,
    queries: &[(f64, f64)],
    k: usize,
) -> Result<Vec<Vec<(usize, usize)>>, GridError> {
    use rayon::prelude::*;

    ensure_same_shape(lon.dim(), lat.dim())?;
    Ok(queries
        .par_iter()
        .map(|&(qx, qy)| nearest_to(lon, lat, qx, qy, k))
        .collect())
}

fn nearest_to(
    lon: ArrayView2<f64>,
    lat: ArrayView2<f64>,
    qx: f64,
    qy: f64,
    k: usize,
) -> Vec<(usize, usize)> {
    if k == 0 {
        return Vec::new();
    }

    // Sorted ascending by distance, at most k entries
    let mut best: Vec<(f64, (usize, usize))> = Vec::with_capacity(k + 1);
    for ((j, i), &x) in lon.indexed_iter() {
        let y = lat[[j, i]];
        let d2 = (x - qx).powi(2) + (y - qy).powi(2);
        if d2.is_nan() {
            continue;
        }
        if best.len() == k && d2 >= best[k - 1].0 {
            continue;
        }
        let pos = best.partition_point(|&(d, _)| d <= d2);
        best.insert(pos, (d2, (j, i)));
        best.truncate(k);
    }
    best.into_iter().map(|(_, idx)| idx).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn coords() -> (Array2<f64>, Array2<f64>) {
        let lon = Array2::from_shape_fn((4, 5), |(_, i)| i as f64);
        let lat = Array2::from_shape_fn((4, 5), |(j, _)| j as f64);
        (lon, lat)
    }

    #[test]
    fn test_single_nearest() {
        let (lon, lat) = coords();
        let found = k_nearest(lon.view(), lat.view(), &[(3.2, 1.9)], 1).unwrap();
        assert_eq!(found, vec![vec![(2, 3)]]);
    }

    #[test]
    fn test_k_ordering() {
        let (lon, lat) = coords();
        let found = k_nearest(lon.view(), lat.view(), &[(0.1, 0.0)], 3).unwrap();
        assert_eq!(found[0][0], (0, 0));
        assert_eq!(found[0][1], (0, 1));
        assert_eq!(found[0][2], (1, 0));
    }

    #[test]
    fn test_k_larger_than_grid() {
        let (lon, lat) = coords();
        let found = k_nearest(lon.view(), lat.view(), &[(0.0, 0.0)], 50).unwrap();
        assert_eq!(found[0].len(), 20);
    }

    #[test]
    fn test_nan_points_skipped() {
        let (mut lon, lat) = coords();
        lon[[0, 0]] = f64::NAN;
        let found = k_nearest(lon.view(), lat.view(), &[(0.0, 0.0)], 1).unwrap();
        assert_ne!(found[0][0], (0, 0));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let (lon, lat) = coords();
        let queries = [(0.4, 0.2), (4.0, 3.0), (2.5, 1.5)];
        let serial = k_nearest(lon.view(), lat.view(), &queries, 4).unwrap();
        let parallel = k_nearest_parallel(lon.view(), lat.view(), &queries, 4).unwrap();
        assert_eq!(serial, parallel);
    }
}
