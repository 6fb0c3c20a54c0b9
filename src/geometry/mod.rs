//! Spherical geometry on longitude/latitude coordinates.
//!
//! - **Distances**: haversine on the metric sphere ([`EARTH_RADIUS`]) and
//!   pairwise neighbour distances for matching ([`distance_grid`])
//! - **Nearest index**: 1-D interpolation search on separable axes
//! - **Longitude wrapping**: mapping into a reference window, seam cutting for polylines
//! - **Resampling**: uniform arc-length resampling of contours

mod distance;
mod longitude;
mod nearest;
mod resample;

pub use distance::{EARTH_RADIUS, SPHERE_RADIUS, distance, distance_grid, great_circle, haversine};
pub use longitude::{wrap_longitude, wrap_to};
pub use nearest::{fractional_index, interp1d, nearest, nearest_index};
pub use resample::uniform_resample;
