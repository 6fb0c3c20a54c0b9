//! Masked convolution for smoothing fields near land.
//!
//! Land cells take no part in the weighted sum and the remaining weights are
//! renormalised, so a coastal cell is the kernel average of its ocean
//! neighbours only. Masked centres and windows without any ocean give NaN.

use ndarray::{Array2, ArrayView2};

use crate::error::{GridError, ensure_same_shape};

/// Kernel half-width in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Separable Gaussian kernel with standard deviations in cells along columns
/// (`sigma_x`) and rows (`sigma_y`), truncated at four deviations.
///
/// The kernel is not normalised; [`masked_convolution`] divides by the
/// weights it actually uses.
pub fn gaussian_kernel(sigma_x: f64, sigma_y: f64) -> Result<Array2<f64>, GridError> {
    for sigma in [sigma_x, sigma_y] {
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "gaussian sigma must be finite and non-negative, got {}",
                sigma
            )));
        }
    }
    let rx = (TRUNCATE * sigma_x + 0.5) as usize;
    let ry = (TRUNCATE * sigma_y + 0.5) as usize;
    let term = |offset: usize, radius: usize, sigma: f64| {
        let d = offset as f64 - radius as f64;
        if d == 0.0 { 0.0 } else { d * d / (sigma * sigma) }
    };
    Ok(Array2::from_shape_fn((2 * ry + 1, 2 * rx + 1), |(j, i)| {
        (-0.5 * (term(i, rx, sigma_x) + term(j, ry, sigma_y))).exp()
    }))
}

/// Convolve `data` with `kernel` over the cells flagged in `valid`.
///
/// The kernel must have odd extents and is centred on each cell. Cells
/// outside the array count as invalid. The output has the shape of `data`.
pub fn masked_convolution(
    data: ArrayView2<f64>,
    valid: ArrayView2<bool>,
    kernel: ArrayView2<f64>,
) -> Result<Array2<f64>, GridError> {
    ensure_same_shape(data.dim(), valid.dim())?;
    let (ky, kx) = kernel.dim();
    if ky % 2 == 0 || kx % 2 == 0 {
        return Err(GridError::invalid_shape(
            "convolution kernel",
            format!("extents must be odd, got {}x{}", ky, kx),
        ));
    }
    let (ny, nx) = data.dim();
    let (hy, hx) = (ky / 2, kx / 2);

    let cell = |j: usize, i: usize| -> f64 {
        if !valid[[j, i]] {
            return f64::NAN;
        }
        let mut sum = 0.0;
        let mut weight = 0.0;
        for (dj, krow) in kernel.outer_iter().enumerate() {
            let Some(y) = (j + dj).checked_sub(hy).filter(|&y| y < ny) else {
                continue;
            };
            for (di, &k) in krow.iter().enumerate() {
                let Some(x) = (i + di).checked_sub(hx).filter(|&x| x < nx) else {
                    continue;
                };
                if valid[[y, x]] {
                    sum += k * data[[y, x]];
                    weight += k;
                }
            }
        }
        if weight != 0.0 { sum / weight } else { f64::NAN }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let values: Vec<f64> = (0..ny * nx)
            .into_par_iter()
            .map(|k| cell(k / nx, k % nx))
            .collect();
        Array2::from_shape_vec((ny, nx), values).map_err(|e| {
            GridError::invalid_shape("masked convolution", e.to_string())
        })
    }
    #[cfg(not(feature = "parallel"))]
    {
        Ok(Array2::from_shape_fn((ny, nx), |(j, i)| cell(j, i)))
    }
}
