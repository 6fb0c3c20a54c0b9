//! Resampling of grid fields onto arbitrary points.

use ndarray::ArrayView2;

use crate::error::{GridError, ensure_same_shape};
use crate::grid::Grid;

/// Interpolates a masked grid field at scattered `(lon, lat)` points.
pub trait FieldInterpolator {
    /// Value of `field` at each point; NaN where it cannot be determined.
    ///
    /// `valid` flags usable cells of `field` (same shape).
    fn interpolate(
        &self,
        field: ArrayView2<f64>,
        valid: ArrayView2<bool>,
        lon: &[f64],
        lat: &[f64],
    ) -> Result<Vec<f64>, GridError>;
}

/// Bilinear interpolation on a regular longitude/latitude grid.
///
/// When the longitude axis covers the full circle, the cell between the last
/// and first column is used for points across the seam. A point whose
/// surrounding cell has any invalid corner, or that falls outside a
/// non-circular grid, is NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBilinear {
    lon0: f64,
    lat0: f64,
    lon_step: f64,
    lat_step: f64,
    nx: usize,
    ny: usize,
    circular: bool,
}

impl GeoBilinear {
    /// Build from uniformly spaced axes.
    pub fn from_axes(lon: &[f64], lat: &[f64]) -> Result<Self, GridError> {
        if lon.len() < 2 || lat.len() < 2 {
            return Err(GridError::DegenerateGrid(format!(
                "bilinear interpolation needs 2 points per axis, got {}x{}",
                lat.len(),
                lon.len()
            )));
        }
        let lon_step = lon[1] - lon[0];
        let lat_step = lat[1] - lat[0];
        if lon_step == 0.0 || lat_step == 0.0 {
            return Err(GridError::DegenerateGrid("zero grid step".to_string()));
        }
        let seam = (lon[lon.len() - 1] + lon_step).rem_euclid(360.0);
        let circular = (seam - lon[0].rem_euclid(360.0)).abs() < 1e-9;
        Ok(Self {
            lon0: lon[0],
            lat0: lat[0],
            lon_step,
            lat_step,
            nx: lon.len(),
            ny: lat.len(),
            circular,
        })
    }

    /// Build from a regular grid.
    pub fn from_grid(grid: &Grid) -> Result<Self, GridError> {
        if !grid.is_regular() {
            return Err(GridError::DegenerateGrid(
                "bilinear interpolation needs a regular grid".to_string(),
            ));
        }
        let lon = grid.lon_axis().to_vec();
        let lat = grid.lat_axis().to_vec();
        Self::from_axes(&lon, &lat)
    }

    /// True when the longitude axis wraps around the globe.
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Column pair and weight for a longitude.
    fn columns(&self, lon: f64) -> Option<(usize, usize, f64)> {
        let x = (lon - self.lon0) / self.lon_step;
        let i0 = x.floor();
        let xd = x - i0;
        let nx = self.nx as i64;
        let i0 = i0 as i64;
        if self.circular {
            let a = i0.rem_euclid(nx) as usize;
            let b = (i0 + 1).rem_euclid(nx) as usize;
            Some((a, b, xd))
        } else if i0 >= 0 && i0 + 1 < nx {
            Some((i0 as usize, i0 as usize + 1, xd))
        } else if i0 + 1 == nx && xd == 0.0 {
            Some((i0 as usize - 1, i0 as usize, 1.0))
        } else {
            None
        }
    }

    fn rows(&self, lat: f64) -> Option<(usize, usize, f64)> {
        let y = (lat - self.lat0) / self.lat_step;
        let j0 = y.floor();
        let yd = y - j0;
        let ny = self.ny as i64;
        let j0 = j0 as i64;
        if j0 >= 0 && j0 + 1 < ny {
            Some((j0 as usize, j0 as usize + 1, yd))
        } else if j0 + 1 == ny && yd == 0.0 {
            Some((j0 as usize - 1, j0 as usize, 1.0))
        } else {
            None
        }
    }
}

impl FieldInterpolator for GeoBilinear {
    fn interpolate(
        &self,
        field: ArrayView2<f64>,
        valid: ArrayView2<bool>,
        lon: &[f64],
        lat: &[f64],
    ) -> Result<Vec<f64>, GridError> {
        ensure_same_shape((self.ny, self.nx), field.dim())?;
        ensure_same_shape(field.dim(), valid.dim())?;
        if lon.len() != lat.len() {
            return Err(GridError::invalid_shape(
                "interpolation points",
                format!("{} longitudes for {} latitudes", lon.len(), lat.len()),
            ));
        }

        let values = lon
            .iter()
            .zip(lat)
            .map(|(&x, &y)| {
                if !x.is_finite() || !y.is_finite() {
                    return f64::NAN;
                }
                let (Some((i0, i1, xd)), Some((j0, j1, yd))) = (self.columns(x), self.rows(y))
                else {
                    return f64::NAN;
                };
                if !(valid[[j0, i0]] && valid[[j0, i1]] && valid[[j1, i0]] && valid[[j1, i1]]) {
                    return f64::NAN;
                }
                let bottom = field[[j0, i0]] * (1.0 - xd) + field[[j0, i1]] * xd;
                let top = field[[j1, i0]] * (1.0 - xd) + field[[j1, i1]] * xd;
                bottom * (1.0 - yd) + top * yd
            })
            .collect();
        Ok(values)
    }
}
