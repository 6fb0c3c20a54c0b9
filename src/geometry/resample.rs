//! Polyline resampling along geodesic arc length.

use super::distance::great_circle;
use super::nearest::interp1d;
use crate::error::GridError;

/// Smallest segment length kept when building the arc-length axis (m).
///
/// Repeated points would otherwise make the axis non-increasing.
const MIN_SEGMENT: f64 = 1e-3;

/// Resample a lon/lat polyline to (nearly) uniform spacing.
///
/// The output has `fixed_size` points, or `num_fac` times the input length
/// when `fixed_size` is `None`. End points are preserved.
pub fn uniform_resample(
    x: &[f64],
    y: &[f64],
    num_fac: usize,
    fixed_size: Option<usize>,
) -> Result<(Vec<f64>, Vec<f64>), GridError> {
    if x.len() != y.len() {
        return Err(GridError::invalid_shape(
            "uniform_resample",
            format!("{} longitudes for {} latitudes", x.len(), y.len()),
        ));
    }
    if x.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut arc = Vec::with_capacity(x.len());
    arc.push(0.0);
    for i in 1..x.len() {
        let step = great_circle(x[i - 1], y[i - 1], x[i], y[i]).max(MIN_SEGMENT);
        arc.push(arc[i - 1] + step);
    }

    let n_out = fixed_size.unwrap_or(x.len() * num_fac);
    let total = arc[arc.len() - 1];
    let mut x_new = Vec::with_capacity(n_out);
    let mut y_new = Vec::with_capacity(n_out);
    for k in 0..n_out {
        let s = if n_out > 1 {
            total * k as f64 / (n_out - 1) as f64
        } else {
            0.0
        };
        x_new.push(interp1d(s, &arc, x)?);
        y_new.push(interp1d(s, &arc, y)?);
    }
    Ok((x_new, y_new))
}
