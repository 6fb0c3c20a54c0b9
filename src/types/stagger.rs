//! Staggered grid point conventions.

use ndarray::Array2;

use crate::error::GridError;
use crate::grid::staggering::{rho_to_u, rho_to_v, u_to_rho, v_to_rho};

/// Location of a field on an Arakawa C-grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StaggerPoint {
    /// Cell centre
    Rho,
    /// East/west cell face (one column fewer than rho)
    U,
    /// North/south cell face (one row fewer than rho)
    V,
}

impl StaggerPoint {
    /// Shape of a field at this point for a rho-grid of shape `(ny, nx)`.
    pub fn shape_from_rho(self, (ny, nx): (usize, usize)) -> (usize, usize) {
        match self {
            StaggerPoint::Rho => (ny, nx),
            StaggerPoint::U => (ny, nx.saturating_sub(1)),
            StaggerPoint::V => (ny.saturating_sub(1), nx),
        }
    }

    /// Shape of the rho-grid a field of shape `(ny, nx)` at this point belongs to.
    pub fn rho_shape(self, (ny, nx): (usize, usize)) -> (usize, usize) {
        match self {
            StaggerPoint::Rho => (ny, nx),
            StaggerPoint::U => (ny, nx + 1),
            StaggerPoint::V => (ny + 1, nx),
        }
    }
}

/// A 2-D field tagged with its staggering.
#[derive(Clone, Debug, PartialEq)]
pub struct StaggeredField {
    pub point: StaggerPoint,
    pub data: Array2<f64>,
}

impl StaggeredField {
    /// Tag an array with its grid point convention.
    pub fn new(point: StaggerPoint, data: Array2<f64>) -> Self {
        Self { point, data }
    }

    /// A rho-point field.
    pub fn rho(data: Array2<f64>) -> Self {
        Self::new(StaggerPoint::Rho, data)
    }

    /// Shape of the underlying array.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Interpolate to rho points. Rho fields are returned unchanged.
    pub fn into_rho(self) -> Result<StaggeredField, GridError> {
        let data = match self.point {
            StaggerPoint::Rho => self.data,
            StaggerPoint::U => u_to_rho(self.data.view())?,
            StaggerPoint::V => v_to_rho(self.data.view())?,
        };
        Ok(Self::rho(data))
    }

    /// Interpolate a rho field to `target` points.
    ///
    /// Only rho fields can be moved to u or v; moving between u and v goes
    /// through rho explicitly.
    pub fn to_point(&self, target: StaggerPoint) -> Result<StaggeredField, GridError> {
        if self.point == target {
            return Ok(self.clone());
        }
        if self.point != StaggerPoint::Rho {
            return Err(GridError::invalid_shape(
                "stagger conversion",
                format!("{:?} field must be converted to rho first", self.point),
            ));
        }
        let data = match target {
            StaggerPoint::U => rho_to_u(self.data.view())?,
            StaggerPoint::V => rho_to_v(self.data.view())?,
            StaggerPoint::Rho => unreachable!("handled by the equality check"),
        };
        Ok(Self::new(target, data))
    }
}
