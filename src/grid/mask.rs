//! Ocean/land masks at rho, u and v points.
//!
//! Masks follow the ROMS convention: `true` (1) is a valid ocean cell,
//! `false` (0) is land or missing data.

use ndarray::{Array2, ArrayView2, Zip, s};

use crate::error::GridError;

/// Rho mask together with the derived u- and v-point masks.
///
/// A face is ocean only if both cells it separates are ocean.
#[derive(Clone, Debug, PartialEq)]
pub struct StaggeredMasks {
    /// Cell-centre mask, shape `(ny, nx)`
    pub rho: Array2<bool>,
    /// East/west face mask, shape `(ny, nx - 1)`
    pub u: Array2<bool>,
    /// North/south face mask, shape `(ny - 1, nx)`
    pub v: Array2<bool>,
}

impl StaggeredMasks {
    /// Derive u and v masks from a rho mask.
    pub fn from_rho(rho: ArrayView2<bool>) -> Result<Self, GridError> {
        let (ny, nx) = rho.dim();
        if ny < 2 || nx < 2 {
            return Err(GridError::invalid_shape(
                "uv mask",
                format!("rho mask {}x{} needs at least 2 rows and 2 columns", ny, nx),
            ));
        }

        let mut u = Array2::from_elem((ny, nx - 1), false);
        Zip::from(&mut u)
            .and(rho.slice(s![.., ..-1]))
            .and(rho.slice(s![.., 1..]))
            .for_each(|m, &a, &b| *m = a && b);

        let mut v = Array2::from_elem((ny - 1, nx), false);
        Zip::from(&mut v)
            .and(rho.slice(s![..-1, ..]))
            .and(rho.slice(s![1.., ..]))
            .for_each(|m, &a, &b| *m = a && b);

        Ok(Self {
            rho: rho.to_owned(),
            u,
            v,
        })
    }

    /// Shape of the rho mask.
    pub fn shape(&self) -> (usize, usize) {
        self.rho.dim()
    }
}

/// Statistics about a grid mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskStatistics {
    /// Total number of cells
    pub total_cells: usize,
    /// Number of ocean cells
    pub ocean_cells: usize,
    /// Number of land cells
    pub land_cells: usize,
}

impl MaskStatistics {
    /// Count ocean and land cells of a mask.
    pub fn compute(mask: ArrayView2<bool>) -> Self {
        let total_cells = mask.len();
        let ocean_cells = mask.iter().filter(|&&m| m).count();
        Self {
            total_cells,
            ocean_cells,
            land_cells: total_cells - ocean_cells,
        }
    }

    /// Fraction of ocean cells, 0.0 for an empty mask.
    pub fn ocean_fraction(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.ocean_cells as f64 / self.total_cells as f64
        }
    }
}

impl std::fmt::Display for MaskStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mask Statistics:")?;
        writeln!(f, "  Total cells: {}", self.total_cells)?;
        writeln!(
            f,
            "  Ocean cells: {} ({:.1}%)",
            self.ocean_cells,
            100.0 * self.ocean_fraction()
        )?;
        write!(f, "  Land cells: {}", self.land_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_uv_masks() {
        let rho = array![[true, true, false], [true, true, true]];
        let masks = StaggeredMasks::from_rho(rho.view()).unwrap();
        assert_eq!(masks.u, array![[true, false], [true, true]]);
        assert_eq!(masks.v, array![[true, true, false]]);
    }

    #[test]
    fn test_too_small() {
        let rho = array![[true, true]];
        assert!(StaggeredMasks::from_rho(rho.view()).is_err());
    }

    #[test]
    fn test_statistics() {
        let rho = array![[true, false], [true, true]];
        let stats = MaskStatistics::compute(rho.view());
        assert_eq!(stats.total_cells, 4);
        assert_eq!(stats.ocean_cells, 3);
        assert_eq!(stats.land_cells, 1);
        assert!((stats.ocean_fraction() - 0.75).abs() < 1e-12);
        assert!(stats.to_string().contains("75.0%"));
    }
}
