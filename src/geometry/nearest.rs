//! Nearest-index lookup on monotonic coordinate axes.
//!
//! Grids with separable coordinates (longitude constant along columns,
//! latitude constant along rows) are searched one axis at a time: the target
//! value is linearly interpolated against the axis to a fractional index,
//! which is then rounded to the nearest integer.

use crate::error::GridError;

/// Fractional position of `value` on a monotonic axis.
///
/// Linear interpolation between bracketing entries; values outside the axis
/// clamp to `0` or `len - 1`. Both ascending and descending axes are accepted.
/// The caller guarantees monotonicity.
pub fn fractional_index(axis: &[f64], value: f64) -> Result<f64, GridError> {
    let n = axis.len();
    if n == 0 {
        return Err(GridError::DegenerateGrid(
            "coordinate axis has zero length".to_string(),
        ));
    }
    if n == 1 || value.is_nan() {
        return Ok(if value.is_nan() { f64::NAN } else { 0.0 });
    }

    if axis[n - 1] >= axis[0] {
        Ok(ascending_position(axis, value))
    } else {
        let reversed: Vec<f64> = axis.iter().rev().copied().collect();
        Ok((n - 1) as f64 - ascending_position(&reversed, value))
    }
}

fn ascending_position(sorted: &[f64], value: f64) -> f64 {
    let n = sorted.len();
    let upper = sorted.partition_point(|&x| x <= value);
    if upper == 0 {
        return 0.0;
    }
    if upper == n {
        return (n - 1) as f64;
    }
    let i = upper - 1;
    let step = sorted[i + 1] - sorted[i];
    if step == 0.0 {
        i as f64
    } else {
        i as f64 + (value - sorted[i]) / step
    }
}

/// Interpolate `fp` sampled at ascending `xp` at position `x`.
///
/// Values outside `xp` clamp to the end samples.
pub fn interp1d(x: f64, xp: &[f64], fp: &[f64]) -> Result<f64, GridError> {
    if xp.len() != fp.len() {
        return Err(GridError::invalid_shape(
            "interp1d",
            format!("{} sample positions for {} values", xp.len(), fp.len()),
        ));
    }
    let pos = fractional_index(xp, x)?;
    if pos.is_nan() {
        return Ok(f64::NAN);
    }
    let i = pos.floor() as usize;
    let frac = pos - i as f64;
    if i + 1 >= fp.len() {
        return Ok(fp[fp.len() - 1]);
    }
    Ok(fp[i] * (1.0 - frac) + fp[i + 1] * frac)
}

/// Nearest integer index of `value` on `axis`; half-way ties go to the lower index.
///
/// # Example
///
/// ```
/// use eddy_grid::geometry::nearest_index;
///
/// let axis = [0.0, 1.0, 2.0, 3.0, 4.0];
/// assert_eq!(nearest_index(&axis, 2.4).unwrap(), 2);
/// assert_eq!(nearest_index(&axis, 2.6).unwrap(), 3);
/// ```
pub fn nearest_index(axis: &[f64], value: f64) -> Result<usize, GridError> {
    let pos = fractional_index(axis, value)?;
    if !pos.is_finite() {
        return Err(GridError::InvalidConfig(format!(
            "cannot locate non-finite coordinate {}",
            value
        )));
    }
    Ok((pos - 0.5).ceil().max(0.0) as usize)
}

/// Nearest `(i, j)` grid index of `(lon, lat)` on separable axes.
///
/// `lon_axis` is the first grid row of longitudes, `lat_axis` the first
/// column of latitudes.
pub fn nearest(
    lon: f64,
    lat: f64,
    lon_axis: &[f64],
    lat_axis: &[f64],
) -> Result<(usize, usize), GridError> {
    Ok((nearest_index(lon_axis, lon)?, nearest_index(lat_axis, lat)?))
}
