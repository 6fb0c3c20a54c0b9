//! Geographic domain bounds.

use std::fmt;

/// Longitude/latitude bounding box of an analysis domain, in degrees.
///
/// Longitude bounds are kept as given: `lon_min > lon_max` (or bounds outside
/// the grid's native range) describes a box that wraps the zero meridian.
///
/// # Example
///
/// ```
/// use eddy_grid::types::GeoBounds;
///
/// // Agulhas retroflection, straddling the zero meridian
/// let bounds = GeoBounds::new(350.0, 40.0, -45.0, -30.0);
/// assert!(bounds.wraps());
/// assert_eq!(bounds.lon_span(), 50.0);
/// assert_eq!(bounds.lat_span(), 15.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Western longitude (degrees)
    pub lon_min: f64,
    /// Eastern longitude (degrees)
    pub lon_max: f64,
    /// Southern latitude (degrees)
    pub lat_min: f64,
    /// Northern latitude (degrees)
    pub lat_max: f64,
}

impl GeoBounds {
    /// Create new domain bounds.
    ///
    /// # Panics
    ///
    /// Panics if `lat_max <= lat_min`.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        assert!(
            lat_max > lat_min,
            "lat_max ({}) must be greater than lat_min ({})",
            lat_max,
            lat_min
        );

        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Longitude midpoint as `lon_min + (lon_max - lon_min) / 2`.
    ///
    /// Not wrap-aware; it is only used for the separable row lookup where the
    /// longitude plays no role.
    #[inline]
    pub fn lon_mid(&self) -> f64 {
        self.lon_min + 0.5 * (self.lon_max - self.lon_min)
    }

    /// Latitude midpoint.
    #[inline]
    pub fn lat_mid(&self) -> f64 {
        self.lat_min + 0.5 * (self.lat_max - self.lat_min)
    }

    /// True when the western bound lies east of the eastern bound.
    #[inline]
    pub fn wraps(&self) -> bool {
        self.lon_min > self.lon_max
    }

    /// Zonal extent in degrees, measured eastward from `lon_min`.
    pub fn lon_span(&self) -> f64 {
        let span = self.lon_max - self.lon_min;
        if span < 0.0 {
            span + 360.0
        } else {
            span
        }
    }

    /// Meridional extent in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Check if a point is inside the box (inclusive, wrap-aware).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.lat_min || lat > self.lat_max {
            return false;
        }
        let offset = (lon - self.lon_min).rem_euclid(360.0);
        offset <= self.lon_span()
    }

    /// Grow the box by a fixed margin in degrees on every side.
    pub fn with_margin(&self, margin: f64) -> Self {
        Self::new(
            self.lon_min - margin,
            self.lon_max + margin,
            self.lat_min - margin,
            self.lat_max + margin,
        )
    }

    /// Check that every bound is a finite number.
    pub fn is_finite(&self) -> bool {
        self.lon_min.is_finite()
            && self.lon_max.is_finite()
            && self.lat_min.is_finite()
            && self.lat_max.is_finite()
    }

    /// Return bounds as tuple `(lon_min, lon_max, lat_min, lat_max)`.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.lon_min, self.lon_max, self.lat_min, self.lat_max)
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lon [{:.2}, {:.2}] × lat [{:.2}, {:.2}]",
            self.lon_min, self.lon_max, self.lat_min, self.lat_max
        )
    }
}
