//! # eddy-grid
//!
//! Grid windowing and geostrophic velocities for ocean eddy detection.
//!
//! This crate provides the building blocks between a gridded sea surface
//! height product and an eddy detector:
//! - Great-circle distances and nearest-index search on lon/lat axes
//! - Domain windows on regional and global grids, including boxes that wrap
//!   the zero meridian
//! - Padding and unpadding for stencil operations
//! - Rho/u/v staggering operators and grid metrics (Coriolis, spacings)
//! - Surface geostrophic velocity, eddy kinetic energy and speed
//! - Land-aware Gaussian smoothing
//! - Grid sources (in memory, NetCDF), bilinear resampling and map projection
//!
//! Computation code reports progress through an injected
//! [`observe::EventSink`] rather than logging directly.

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod interp;
pub mod io;
pub mod observe;
pub mod solver;
pub mod types;

// Re-export main types for convenience
pub use config::{DomainConfig, gaussian_resolution};
pub use domain::{DomainView, GridDomain, MetricsCache, StaticFields};
pub use error::GridError;
pub use geometry::{distance, haversine, nearest};
pub use grid::{
    ColumnRange, Grid, GridId, GridKind, IndexRange, StaggeredMasks, Unpad, Window,
    compute_window, gaussian_kernel, masked_convolution, pad_window, rho_to_u, rho_to_v,
    u_to_rho, v_to_rho,
};
pub use interp::{FieldInterpolator, GeoBilinear};
pub use io::{GridSource, MapProjector, MemoryGridSource, MercatorProjector};
#[cfg(feature = "netcdf")]
pub use io::NetcdfGridSource;
pub use observe::{EventSink, GridEvent, NullSink, RecordingSink, TracingSink};
pub use solver::{
    MaskedField, Metrics, VelocityDiagnostics, VelocityField, compute_metrics, solve,
};
pub use types::{GeoBounds, StaggerPoint, StaggeredField};
