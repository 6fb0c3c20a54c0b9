//! Map projections for plotting and land-mask construction.
//!
//! Projects geographic coordinates (degrees) to Cartesian map coordinates
//! (meters). Projections never feed the velocity computation.
//!
//! # Example
//!
//! ```
//! use eddy_grid::io::{MapProjector, MercatorProjector};
//! use eddy_grid::types::GeoBounds;
//!
//! let bounds = GeoBounds::new(-30.0, 10.0, -45.0, -25.0);
//! let proj = MercatorProjector::for_domain(&bounds);
//!
//! let (x, y) = proj.project(5.0, -30.0);
//! let (lon, lat) = proj.inverse(x, y);
//! assert!((lon - 5.0).abs() < 1e-8);
//! assert!((lat + 30.0).abs() < 1e-8);
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{GridError, ensure_same_shape};
use crate::types::GeoBounds;

/// Margin added around a domain when building its map extent (degrees).
pub const DOMAIN_MARGIN: f64 = 1.0;

/// Trait for map projections.
pub trait MapProjector {
    /// Convert `(lon, lat)` in degrees to map `(x, y)` in meters.
    fn project(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Convert map `(x, y)` back to `(lon, lat)` in degrees.
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);

    /// Project coordinate arrays element-wise.
    fn project_arrays(
        &self,
        lon: ArrayView2<f64>,
        lat: ArrayView2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>), GridError> {
        ensure_same_shape(lon.dim(), lat.dim())?;
        let mut x = Array2::zeros(lon.raw_dim());
        let mut y = Array2::zeros(lon.raw_dim());
        Zip::from(&mut x)
            .and(&mut y)
            .and(&lon)
            .and(&lat)
            .for_each(|xo, yo, &lo, &la| {
                let (px, py) = self.project(lo, la);
                *xo = px;
                *yo = py;
            });
        Ok((x, y))
    }
}

/// Ellipsoidal Mercator projection with a true-scale latitude.
///
/// Uses the GRS80 ellipsoid, central meridian 0. The `extent` is informative
/// (map corners for plotting) and does not clip.
#[derive(Debug, Clone, Copy)]
pub struct MercatorProjector {
    /// Latitude of true scale in degrees
    lat_ts: f64,
    /// Scale factor on the central meridian derived from `lat_ts`
    k0: f64,
    /// Map extent in geographic coordinates
    extent: GeoBounds,
}

impl MercatorProjector {
    /// GRS80 equatorial radius in meters
    const A: f64 = 6_378_137.0;
    /// GRS80 flattening
    const F: f64 = 1.0 / 298.257_222_101;
    /// Inverse latitude iteration limit
    const MAX_ITER: usize = 15;

    fn eccentricity() -> f64 {
        (2.0 * Self::F - Self::F * Self::F).sqrt()
    }

    /// Create a projection true to scale at `lat_ts` degrees.
    pub fn new(lat_ts: f64, extent: GeoBounds) -> Self {
        let e = Self::eccentricity();
        let phi = lat_ts.to_radians();
        let k0 = phi.cos() / (1.0 - (e * phi.sin()).powi(2)).sqrt();
        Self { lat_ts, k0, extent }
    }

    /// Projection for a domain: extent grown by one degree, true scale at the
    /// central latitude of the box.
    pub fn for_domain(bounds: &GeoBounds) -> Self {
        Self::new(bounds.lat_mid(), bounds.with_margin(DOMAIN_MARGIN))
    }

    /// Latitude of true scale.
    pub fn lat_ts(&self) -> f64 {
        self.lat_ts
    }

    /// Geographic extent of the map.
    pub fn extent(&self) -> GeoBounds {
        self.extent
    }

    /// Map corners `((x_min, y_min), (x_max, y_max))` of the extent.
    pub fn corners(&self) -> ((f64, f64), (f64, f64)) {
        let ll = self.project(self.extent.lon_min, self.extent.lat_min);
        let ur = self.project(self.extent.lon_max, self.extent.lat_max);
        (ll, ur)
    }
}

impl MapProjector for MercatorProjector {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let e = Self::eccentricity();
        let phi = lat.to_radians();
        let con = e * phi.sin();
        let x = Self::A * self.k0 * lon.to_radians();
        let y = Self::A
            * self.k0
            * ((FRAC_PI_4 + 0.5 * phi).tan() * ((1.0 - con) / (1.0 + con)).powf(0.5 * e)).ln();
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let e = Self::eccentricity();
        let lon = (x / (Self::A * self.k0)).to_degrees();
        let t = (-y / (Self::A * self.k0)).exp();

        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..Self::MAX_ITER {
            let con = e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - con) / (1.0 + con)).powf(0.5 * e)).atan();
            let converged = (next - phi).abs() < 1e-12;
            phi = next;
            if converged {
                break;
            }
        }
        (lon, phi.to_degrees())
    }
}
