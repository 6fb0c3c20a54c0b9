//! Coriolis parameter and grid spacing on a padded window.

use std::f64::consts::PI;

use ndarray::{Array2, ArrayView2, Axis, Zip, s};

use crate::error::{GridError, ensure_same_shape};
use crate::geometry::distance;
use crate::grid::staggering::{replicate_edges, rho_to_u, rho_to_v};

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Length of a day used for the Earth rotation rate (s).
pub const DAY_SECONDS: f64 = 86_400.0;

/// Static metric fields at rho points of a padded window.
///
/// `d_x`/`d_y` are grid spacings in metres, `p_m`/`p_n` their reciprocals.
/// Nothing is guarded: on the equator `f` is zero and `gof` infinite, a zero
/// spacing gives an infinite `p_m`. Such cells are excluded downstream by the
/// mask, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct Metrics {
    /// Coriolis parameter `2Ω sin(lat)` (1/s)
    pub f: Array2<f64>,
    /// Gravity over Coriolis `g / f` (m·s)
    pub gof: Array2<f64>,
    /// Inverse zonal spacing (1/m)
    pub p_m: Array2<f64>,
    /// Inverse meridional spacing (1/m)
    pub p_n: Array2<f64>,
    /// Zonal spacing (m)
    pub d_x: Array2<f64>,
    /// Meridional spacing (m)
    pub d_y: Array2<f64>,
}

impl Metrics {
    /// Rho shape of every metric field.
    pub fn shape(&self) -> (usize, usize) {
        self.f.dim()
    }
}

/// Coriolis parameter for a latitude in degrees.
#[inline]
pub fn coriolis(lat: f64) -> f64 {
    lat.to_radians().sin() * 4.0 * PI / DAY_SECONDS
}

/// Midpoints of longitude pairs taken along the shorter arc, so a pair
/// straddling the seam (359, 0) gives 359.5 rather than 179.5.
fn lon_midpoints(a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
    Zip::from(&a)
        .and(&b)
        .map_collect(|&x0, &x1| x0 + 0.5 * (x1 - x0 + 180.0).rem_euclid(360.0) - 90.0)
}

/// Compute metrics from padded rho-point coordinates.
///
/// `d_x` is the haversine distance between consecutive u points (the
/// midpoints either side of a rho cell); the first and last columns copy
/// their neighbour. `d_y` is the same along rows with v points. Both axes
/// need at least three points.
pub fn compute_metrics(lon: ArrayView2<f64>, lat: ArrayView2<f64>) -> Result<Metrics, GridError> {
    let shape = lon.dim();
    ensure_same_shape(shape, lat.dim())?;
    let (ny, nx) = shape;
    if ny < 3 || nx < 3 {
        return Err(GridError::invalid_shape(
            "metrics",
            format!("padded window {}x{} needs at least 3x3 points", ny, nx),
        ));
    }

    let f = lat.mapv(coriolis);
    let gof = f.mapv(|fv| GRAVITY / fv);

    let lon_u = lon_midpoints(lon.slice(s![.., ..-1]), lon.slice(s![.., 1..]));
    let lat_u = rho_to_u(lat)?;
    let mut d_x = Array2::zeros(shape);
    d_x.slice_mut(s![.., 1..-1]).assign(&distance(
        lon_u.slice(s![.., ..-1]),
        lat_u.slice(s![.., ..-1]),
        lon_u.slice(s![.., 1..]),
        lat_u.slice(s![.., 1..]),
    )?);
    replicate_edges(&mut d_x, Axis(1));

    let lon_v = lon_midpoints(lon.slice(s![..-1, ..]), lon.slice(s![1.., ..]));
    let lat_v = rho_to_v(lat)?;
    let mut d_y = Array2::zeros(shape);
    d_y.slice_mut(s![1..-1, ..]).assign(&distance(
        lon_v.slice(s![..-1, ..]),
        lat_v.slice(s![..-1, ..]),
        lon_v.slice(s![1.., ..]),
        lat_v.slice(s![1.., ..]),
    )?);
    replicate_edges(&mut d_y, Axis(0));

    let p_m = d_x.mapv(f64::recip);
    let p_n = d_y.mapv(f64::recip);

    Ok(Metrics {
        f,
        gof,
        p_m,
        p_n,
        d_x,
        d_y,
    })
}
