//! Grid data sources and map projections.
//!
//! This module provides:
//! - **Grid sources**: the [`GridSource`] contract for coordinates, masks and
//!   named variables, with an in-memory implementation
//! - **NetCDF input**: [`NetcdfGridSource`] over gridded altimetry or model
//!   output (requires `netcdf` feature)
//! - **Map projections**: Mercator projection of domain coordinates for
//!   plotting and land-mask construction
//!
//! # Coordinate conventions
//!
//! Sources return 2-D `(ny, nx)` arrays. 1-D coordinate axes are expanded
//! with a meshgrid: longitude varies along columns, latitude along rows.
//! Masks are `true` over ocean.
//!
//! # Example
//!
//! ```
//! use eddy_grid::io::{AttributeValue, GridSource, MemoryGridSource};
//! use ndarray::Array2;
//!
//! let lon = Array2::from_shape_fn((3, 4), |(_, i)| i as f64);
//! let lat = Array2::from_shape_fn((3, 4), |(j, _)| j as f64);
//! let source = MemoryGridSource::new(lon, lat)
//!     .with_variable("adt", Array2::zeros((3, 4)))
//!     .with_attribute("adt", "units", AttributeValue::Text("m".into()));
//!
//! assert_eq!(source.variable("adt").unwrap().dim(), (3, 4));
//! assert_eq!(source.attribute("adt", "units").unwrap().as_str(), Some("m"));
//! ```

mod memory;
#[cfg(feature = "netcdf")]
mod netcdf_source;
mod projection;

use ndarray::Array2;

use crate::error::GridError;

pub use memory::MemoryGridSource;
#[cfg(feature = "netcdf")]
pub use netcdf_source::{LAT_NAMES, LON_NAMES, MASK_NAMES, NetcdfGridSource};
pub use projection::{DOMAIN_MARGIN, MapProjector, MercatorProjector};

/// Attribute value attached to a source variable.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl AttributeValue {
    /// Scalar numeric value, or the first element of a numeric list.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(x) => Some(*x),
            AttributeValue::Numbers(xs) => xs.first().copied(),
            AttributeValue::Text(_) => None,
        }
    }

    /// Text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Supplier of grid coordinates, mask and named 2-D fields.
pub trait GridSource {
    /// Longitudes at rho points, `(ny, nx)`.
    fn lon(&self) -> Result<Array2<f64>, GridError>;

    /// Latitudes at rho points, `(ny, nx)`.
    fn lat(&self) -> Result<Array2<f64>, GridError>;

    /// Ocean mask, `true` over ocean.
    fn mask(&self) -> Result<Array2<bool>, GridError>;

    /// Names of the available variables.
    fn variable_names(&self) -> Vec<String>;

    /// Number of time steps stored for a variable (1 for static fields).
    fn time_steps(&self, name: &str) -> Result<usize, GridError>;

    /// One time step of a variable, unpacked to physical units with missing
    /// values as NaN.
    fn variable_at(&self, name: &str, step: usize) -> Result<Array2<f64>, GridError>;

    /// A variable attribute.
    fn attribute(&self, variable: &str, name: &str) -> Result<AttributeValue, GridError>;

    /// First (or only) time step of a variable.
    fn variable(&self, name: &str) -> Result<Array2<f64>, GridError> {
        self.variable_at(name, 0)
    }

    /// First variable present among `candidates`.
    fn find_variable(&self, candidates: &[&str]) -> Option<String> {
        let names = self.variable_names();
        candidates
            .iter()
            .find(|c| names.iter().any(|n| n == *c))
            .map(|c| c.to_string())
    }
}

/// Check that a time step index is in range.
pub(crate) fn check_step(name: &str, step: usize, steps: usize) -> Result<(), GridError> {
    if step < steps {
        Ok(())
    } else {
        Err(GridError::invalid_shape(
            "time step",
            format!("{} has {} steps, requested {}", name, steps, step),
        ))
    }
}
