//! Summary statistics of a velocity field.

use std::fmt;

use super::geostrophic::VelocityField;

/// Energy and speed statistics over the valid cells of a [`VelocityField`].
///
/// Non-finite values (equatorial cells) are skipped even when flagged valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityDiagnostics {
    /// Cells in the core window
    pub total_cells: usize,
    /// Cells with valid, finite energy
    pub valid_cells: usize,
    /// Mean eddy kinetic energy (m²/s²)
    pub mean_eke: f64,
    /// Maximum eddy kinetic energy (m²/s²)
    pub max_eke: f64,
    /// Maximum speed (m/s)
    pub max_speed: f64,
}

impl VelocityDiagnostics {
    /// Compute diagnostics; all statistics are 0 when no cell is valid.
    pub fn compute(field: &VelocityField) -> Self {
        let total_cells = field.eke.data.len();
        let mut valid_cells = 0;
        let mut sum_eke = 0.0;
        let mut max_eke: f64 = 0.0;
        for e in field.eke.valid_values().filter(|e| e.is_finite()) {
            valid_cells += 1;
            sum_eke += e;
            max_eke = max_eke.max(e);
        }
        let max_speed = field
            .uspd
            .valid_values()
            .filter(|s| s.is_finite())
            .fold(0.0, f64::max);

        Self {
            total_cells,
            valid_cells,
            mean_eke: if valid_cells > 0 {
                sum_eke / valid_cells as f64
            } else {
                0.0
            },
            max_eke,
            max_speed,
        }
    }

    /// Fraction of core cells with valid energy.
    pub fn valid_fraction(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.valid_cells as f64 / self.total_cells as f64
        }
    }

    /// Format diagnostics as a single-line summary.
    pub fn summary_line(&self) -> String {
        format!(
            "valid={}/{} EKE_mean={:.4e} EKE_max={:.4e} |u|_max={:.3}",
            self.valid_cells, self.total_cells, self.mean_eke, self.max_eke, self.max_speed
        )
    }
}

impl fmt::Display for VelocityDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Velocity Diagnostics:")?;
        writeln!(
            f,
            "  Valid cells: {}/{} ({:.1}%)",
            self.valid_cells,
            self.total_cells,
            100.0 * self.valid_fraction()
        )?;
        writeln!(f, "  EKE mean:    {:.6e} m²/s²", self.mean_eke)?;
        writeln!(f, "  EKE max:     {:.6e} m²/s²", self.max_eke)?;
        write!(f, "  Speed max:   {:.4} m/s", self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{StaggeredMasks, Unpad};
    use crate::solver::{compute_metrics, solve};
    use ndarray::Array2;

    const TOL: f64 = 1e-12;

    fn field(zeta: Array2<f64>, rho: Array2<bool>) -> VelocityField {
        let (ny, nx) = zeta.dim();
        let lon = Array2::from_shape_fn((ny, nx), |(_, i)| i as f64 * 0.5);
        let lat = Array2::from_shape_fn((ny, nx), |(j, _)| -40.0 + j as f64 * 0.5);
        let metrics = compute_metrics(lon.view(), lat.view()).unwrap();
        let masks = StaggeredMasks::from_rho(rho.view()).unwrap();
        solve(zeta.view(), &metrics, &masks, Unpad::new(1)).unwrap()
    }

    #[test]
    fn test_at_rest() {
        let vel = field(Array2::zeros((6, 6)), Array2::from_elem((6, 6), true));
        let diag = VelocityDiagnostics::compute(&vel);
        assert_eq!(diag.total_cells, 16);
        assert_eq!(diag.valid_cells, 16);
        assert!(diag.mean_eke.abs() < TOL);
        assert!(diag.max_speed.abs() < TOL);
    }

    #[test]
    fn test_max_matches_field() {
        let zeta = Array2::from_shape_fn((6, 6), |(j, i)| 0.02 * (j * i) as f64);
        let vel = field(zeta, Array2::from_elem((6, 6), true));
        let diag = VelocityDiagnostics::compute(&vel);
        let max_eke = vel.eke.data.iter().cloned().fold(0.0, f64::max);
        assert!((diag.max_eke - max_eke).abs() < TOL);
        assert!(diag.mean_eke <= diag.max_eke);
        assert!((diag.max_speed - (2.0 * diag.max_eke).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_all_land() {
        let vel = field(Array2::zeros((5, 5)), Array2::from_elem((5, 5), false));
        let diag = VelocityDiagnostics::compute(&vel);
        assert_eq!(diag.valid_cells, 0);
        assert_eq!(diag.mean_eke, 0.0);
        assert_eq!(diag.valid_fraction(), 0.0);
    }

    #[test]
    fn test_summary_line() {
        let vel = field(Array2::zeros((5, 5)), Array2::from_elem((5, 5), true));
        let line = VelocityDiagnostics::compute(&vel).summary_line();
        assert!(line.starts_with("valid=9/9"));
        assert!(VelocityDiagnostics::compute(&vel)
            .to_string()
            .contains("Valid cells: 9/9"));
    }
}
