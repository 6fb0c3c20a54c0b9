//! Strongly-typed domain types for safer APIs.
//!
//! - **Named bounds over positional tuples**: `GeoBounds { lon_min, lon_max, lat_min, lat_max }`
//! - **Tagged staggering**: a `StaggeredField` knows whether it lives on rho, u or v points,
//!   so a u-field cannot silently be differenced as if it were a rho-field.
//!
//! # Example
//!
//! ```
//! use eddy_grid::types::{GeoBounds, StaggerPoint};
//!
//! let bounds = GeoBounds::new(-10.0, 10.0, 30.0, 40.0);
//! assert_eq!(bounds.lat_mid(), 35.0);
//!
//! // u points have one column fewer than rho points
//! assert_eq!(StaggerPoint::U.shape_from_rho((5, 8)), (5, 7));
//! ```

mod bounds;
mod stagger;

pub use bounds::GeoBounds;
pub use stagger::{StaggerPoint, StaggeredField};
