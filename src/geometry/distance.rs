//! Great-circle distances on a spherical Earth.

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{GridError, ensure_same_shape};

/// Earth radius used for grid metrics (m), as in ROMS `scalars.h`.
pub const EARTH_RADIUS: f64 = 6_371_315.0;

/// Sphere radius used for contour and point-to-point distances (m).
pub const SPHERE_RADIUS: f64 = 6_370_997.0;

/// Half-angle haversine term, clamped to `[0, 1]`.
#[inline]
fn haversine_term(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let sin_dlat = ((lat2 - lat1).to_radians() * 0.5).sin();
    let sin_dlon = ((lon2 - lon1).to_radians() * 0.5).sin();
    let cos_lat1 = lat1.to_radians().cos();
    let cos_lat2 = lat2.to_radians().cos();
    let a = sin_dlon * sin_dlon * cos_lat1 * cos_lat2 + sin_dlat * sin_dlat;
    // Rounding can push `a` just past 1 near antipodes; NaN stays NaN
    a.clamp(0.0, 1.0)
}

#[inline]
fn central_angle(a: f64) -> f64 {
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Haversine distance in metres between two points given in degrees.
///
/// # Example
///
/// ```
/// use eddy_grid::geometry::haversine;
///
/// let d = haversine(0.0, 0.0, 1.0, 0.0);
/// assert!((d - 111_199.0).abs() < 100.0);
/// ```
#[inline]
pub fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    EARTH_RADIUS * central_angle(haversine_term(lon1, lat1, lon2, lat2))
}

/// Element-wise haversine distance between two sets of points.
///
/// All four arrays must share a shape.
pub fn distance(
    lon1: ArrayView2<f64>,
    lat1: ArrayView2<f64>,
    lon2: ArrayView2<f64>,
    lat2: ArrayView2<f64>,
) -> Result<Array2<f64>, GridError> {
    let shape = lon1.dim();
    ensure_same_shape(shape, lat1.dim())?;
    ensure_same_shape(shape, lon2.dim())?;
    ensure_same_shape(shape, lat2.dim())?;

    let mut out = Array2::zeros(shape);
    Zip::from(&mut out)
        .and(&lon1)
        .and(&lat1)
        .and(&lon2)
        .and(&lat2)
        .for_each(|d, &x1, &y1, &x2, &y2| *d = haversine(x1, y1, x2, y2));
    Ok(out)
}

/// Point-to-point distance in metres on the contour sphere ([`SPHERE_RADIUS`]).
#[inline]
pub fn great_circle(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> f64 {
    SPHERE_RADIUS * central_angle(haversine_term(lon0, lat0, lon1, lat1))
}

/// Maximum latitude separation considered by [`distance_grid`] (degrees).
const GRID_MAX_DLAT: f64 = 15.0;
/// Maximum longitude separation considered by [`distance_grid`] (degrees).
const GRID_MAX_DLON: f64 = 20.0;

/// Pairwise distances in kilometres between two point sets.
///
/// Entry `[i, j]` is the distance from point `i` of the first set to point
/// `j` of the second. Pairs further apart than 15° in latitude or 20° in
/// (wrapped) longitude are NaN, which keeps matching searches local.
pub fn distance_grid(lon0: &[f64], lat0: &[f64], lon1: &[f64], lat1: &[f64]) -> Array2<f64> {
    let n0 = lon0.len().min(lat0.len());
    let n1 = lon1.len().min(lat1.len());
    let radius_km = SPHERE_RADIUS / 1000.0;

    Array2::from_shape_fn((n0, n1), |(i, j)| {
        let dlat = (lat1[j] - lat0[i]).abs();
        if dlat > GRID_MAX_DLAT {
            return f64::NAN;
        }
        let mut dlon = (lon1[j] - lon0[i]).abs();
        if dlon > 180.0 {
            dlon = ((dlon + 180.0).rem_euclid(360.0) - 180.0).abs();
        }
        if dlon > GRID_MAX_DLON {
            return f64::NAN;
        }
        let sin_dlat = (dlat * 0.5).to_radians().sin();
        let sin_dlon = (dlon * 0.5).to_radians().sin();
        let a = (sin_dlon * sin_dlon * lat0[i].to_radians().cos() * lat1[j].to_radians().cos()
            + sin_dlat * sin_dlat)
            .clamp(0.0, 1.0);
        radius_km * central_angle(a)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_distance() {
        for &(lon, lat) in &[(0.0, 0.0), (123.4, -56.7), (359.9, 89.0), (-45.0, 10.0)] {
            assert_eq!(haversine(lon, lat, lon, lat), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ((10.0, 20.0), (11.0, 21.5)),
            ((350.0, -40.0), (5.0, -38.0)),
            ((0.0, 89.0), (180.0, 89.0)),
        ];
        for ((x1, y1), (x2, y2)) in pairs {
            let forward = haversine(x1, y1, x2, y2);
            let backward = haversine(x2, y2, x1, y1);
            assert!((forward - backward).abs() < 1e-6, "{} vs {}", forward, backward);
        }
    }

    #[test]
    fn test_quarter_meridian() {
        let d = haversine(0.0, 0.0, 0.0, 90.0);
        let expected = EARTH_RADIUS * std::f64::consts::FRAC_PI_2;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_is_finite() {
        let d = haversine(0.0, 0.0, 180.0, 0.0);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS * std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(haversine(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_array_distance_shape_mismatch() {
        let a = array![[0.0, 1.0]];
        let b = array![[0.0], [1.0]];
        assert!(distance(a.view(), a.view(), b.view(), b.view()).is_err());
    }

    #[test]
    fn test_array_distance_matches_scalar() {
        let lon1 = array![[0.0, 10.0]];
        let lat1 = array![[0.0, 45.0]];
        let lon2 = array![[1.0, 12.0]];
        let lat2 = array![[0.0, 46.0]];
        let d = distance(lon1.view(), lat1.view(), lon2.view(), lat2.view()).unwrap();
        assert_eq!(d[[0, 1]], haversine(10.0, 45.0, 12.0, 46.0));
    }

    #[test]
    fn test_distance_grid_cutoffs() {
        let d = distance_grid(&[0.0, 0.0], &[0.0, 0.0], &[1.0, 30.0, 359.0], &[0.0, 0.0, 20.0]);
        assert_eq!(d.dim(), (2, 3));
        assert!((d[[0, 0]] - 111.19).abs() < 0.1);
        // 30° of longitude apart
        assert!(d[[0, 1]].is_nan());
        // Wrapped longitude is close, but latitude is 20° apart
        assert!(d[[0, 2]].is_nan());
    }

    #[test]
    fn test_distance_grid_wraps_longitude() {
        let d = distance_grid(&[359.5], &[0.0], &[0.5], &[0.0]);
        assert!((d[[0, 0]] - 111.19).abs() < 0.1);
    }
}
