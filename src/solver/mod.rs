//! Grid metrics and geostrophic velocity.
//!
//! # Submodules
//!
//! - [`metrics`]: Coriolis parameter and grid spacing on a padded window
//! - [`geostrophic`]: Surface velocities, EKE and speed from SSH
//! - [`diagnostics`]: Summary statistics of velocity fields
//!
//! Metrics are computed once per padded window and reused for every SSH field
//! on that window; [`solve`] is a pure function of its inputs.

pub mod diagnostics;
pub mod geostrophic;
pub mod metrics;

pub use diagnostics::VelocityDiagnostics;
pub use geostrophic::{MaskedField, VelocityField, solve};
pub use metrics::{GRAVITY, Metrics, compute_metrics, coriolis};
