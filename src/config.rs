//! Domain configuration.
//!
//! A [`DomainConfig`] names an analysis region and how it is prepared:
//!
//! ```
//! use eddy_grid::config::DomainConfig;
//! use eddy_grid::types::GeoBounds;
//!
//! let config = DomainConfig::new("agulhas", GeoBounds::new(350.0, 40.0, -45.0, -30.0))
//!     .with_pad(3)
//!     .with_resolution(0.25);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.pad, 3);
//! ```

use crate::error::GridError;
use crate::types::GeoBounds;

/// Default number of cells added around a domain for centred differences.
pub const DEFAULT_PAD: usize = 2;

/// Fraction of a wavelength used as Gaussian filter standard deviation.
const GAUSSIAN_FRACTION: f64 = 0.125;

/// Configuration of one analysis domain.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainConfig {
    /// Domain name used in events and logs
    pub name: String,
    /// Longitude/latitude box
    pub bounds: GeoBounds,
    /// Padding in cells around the core window
    pub pad: usize,
    /// Grid resolution in degrees; taken from the grid when unset
    pub resolution: Option<f64>,
}

impl DomainConfig {
    /// Create a configuration with the default pad.
    pub fn new(name: impl Into<String>, bounds: GeoBounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            pad: DEFAULT_PAD,
            resolution: None,
        }
    }

    /// Set the padding.
    pub fn with_pad(mut self, pad: usize) -> Self {
        self.pad = pad;
        self
    }

    /// Set the grid resolution in degrees.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Replace the bounds.
    pub fn with_bounds(mut self, bounds: GeoBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Check the configuration before any window is computed.
    pub fn validate(&self) -> Result<(), GridError> {
        let b = &self.bounds;
        if !b.is_finite() {
            return Err(GridError::InvalidConfig(format!(
                "{}: non-finite bounds {}",
                self.name, b
            )));
        }
        if b.lat_min >= b.lat_max {
            return Err(GridError::InvalidConfig(format!(
                "{}: lat_min {} must be below lat_max {}",
                self.name, b.lat_min, b.lat_max
            )));
        }
        if b.lon_min == b.lon_max {
            return Err(GridError::InvalidConfig(format!(
                "{}: empty longitude range at {}",
                self.name, b.lon_min
            )));
        }
        match self.resolution {
            Some(res) if !(res.is_finite() && res > 0.0) => Err(GridError::InvalidConfig(format!(
                "{}: resolution must be positive, got {}",
                self.name, res
            ))),
            _ => Ok(()),
        }
    }
}

/// Gaussian filter standard deviations in grid cells for zonal and
/// meridional wavelengths `zwl`, `mwl` (degrees) on a grid of `resolution`
/// degrees.
///
/// # Example
///
/// ```
/// use eddy_grid::config::gaussian_resolution;
///
/// let (zres, mres) = gaussian_resolution(20.0, 10.0, 0.25).unwrap();
/// assert_eq!(zres, 10.0);
/// assert_eq!(mres, 5.0);
/// ```
pub fn gaussian_resolution(zwl: f64, mwl: f64, resolution: f64) -> Result<(f64, f64), GridError> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(GridError::InvalidConfig(format!(
            "resolution must be positive, got {}",
            resolution
        )));
    }
    Ok((
        zwl * GAUSSIAN_FRACTION / resolution,
        mwl * GAUSSIAN_FRACTION / resolution,
    ))
}
