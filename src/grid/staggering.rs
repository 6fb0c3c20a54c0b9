//! Conversions between rho, u and v points of a staggered grid.
//!
//! ```text
//!     rho   u   rho   u   rho
//!      o----|----o----|----o      u = (rho[i] + rho[i+1]) / 2
//! ```
//!
//! Going from rho to a face point averages neighbours and loses one column
//! (u) or row (v). Going back averages neighbouring faces into the interior
//! cells; the first and last cells have a single face neighbour and instead
//! replicate the nearest interior value.

use ndarray::{Array2, ArrayView2, Axis, Zip, s};

use crate::error::GridError;

/// Half-sum of two equally shaped views.
#[inline]
pub fn half_interp(a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
    let mut out = Array2::zeros(a.raw_dim());
    Zip::from(&mut out)
        .and(&a)
        .and(&b)
        .for_each(|o, &x, &y| *o = (x + y) * 0.5);
    out
}

fn require_extent(
    context: &'static str,
    field: &ArrayView2<f64>,
    axis: Axis,
    min: usize,
) -> Result<(), GridError> {
    let len = field.len_of(axis);
    if len < min {
        return Err(GridError::invalid_shape(
            context,
            format!(
                "axis {} has length {}, need at least {}",
                axis.index(),
                len,
                min
            ),
        ));
    }
    Ok(())
}

/// Average adjacent columns: `(a[:, :-1] + a[:, 1:]) / 2`.
pub fn rho_to_u(field: ArrayView2<f64>) -> Result<Array2<f64>, GridError> {
    require_extent("rho_to_u", &field, Axis(1), 2)?;
    Ok(half_interp(
        field.slice(s![.., ..-1]),
        field.slice(s![.., 1..]),
    ))
}

/// Average adjacent rows: `(a[:-1] + a[1:]) / 2`.
pub fn rho_to_v(field: ArrayView2<f64>) -> Result<Array2<f64>, GridError> {
    require_extent("rho_to_v", &field, Axis(0), 2)?;
    Ok(half_interp(
        field.slice(s![..-1, ..]),
        field.slice(s![1.., ..]),
    ))
}

/// u points to rho points: one more column, edge columns replicated.
pub fn u_to_rho(field: ArrayView2<f64>) -> Result<Array2<f64>, GridError> {
    require_extent("u_to_rho", &field, Axis(1), 2)?;
    let (ny, nx) = field.dim();
    let mut out = Array2::zeros((ny, nx + 1));
    out.slice_mut(s![.., 1..-1]).assign(&half_interp(
        field.slice(s![.., ..-1]),
        field.slice(s![.., 1..]),
    ));
    replicate_edges(&mut out, Axis(1));
    Ok(out)
}

/// v points to rho points: one more row, edge rows replicated.
pub fn v_to_rho(field: ArrayView2<f64>) -> Result<Array2<f64>, GridError> {
    require_extent("v_to_rho", &field, Axis(0), 2)?;
    let (ny, nx) = field.dim();
    let mut out = Array2::zeros((ny + 1, nx));
    out.slice_mut(s![1..-1, ..]).assign(&half_interp(
        field.slice(s![..-1, ..]),
        field.slice(s![1.., ..]),
    ));
    replicate_edges(&mut out, Axis(0));
    Ok(out)
}

/// Copy index 1 into index 0 and index n-2 into n-1 along `axis`.
///
/// Requires at least three lanes along `axis`.
pub(crate) fn replicate_edges<T: Clone>(out: &mut Array2<T>, axis: Axis) {
    let n = out.len_of(axis);
    let first = out.index_axis(axis, 1).to_owned();
    out.index_axis_mut(axis, 0).assign(&first);
    let last = out.index_axis(axis, n - 2).to_owned();
    out.index_axis_mut(axis, n - 1).assign(&last);
}

/// Validity of a u-point quantity moved to rho points.
///
/// An interior rho cell is valid when both neighbouring faces are; edge cells
/// copy their neighbour like the values do.
pub fn u_mask_to_rho(valid: ArrayView2<bool>) -> Result<Array2<bool>, GridError> {
    let (ny, nx) = valid.dim();
    if nx < 2 {
        return Err(GridError::invalid_shape(
            "u_mask_to_rho",
            format!("need at least 2 columns, got {}", nx),
        ));
    }
    let mut out = Array2::from_elem((ny, nx + 1), false);
    Zip::from(out.slice_mut(s![.., 1..-1]))
        .and(valid.slice(s![.., ..-1]))
        .and(valid.slice(s![.., 1..]))
        .for_each(|o, &a, &b| *o = a && b);
    replicate_edges(&mut out, Axis(1));
    Ok(out)
}

/// Validity of a v-point quantity moved to rho points.
pub fn v_mask_to_rho(valid: ArrayView2<bool>) -> Result<Array2<bool>, GridError> {
    let (ny, nx) = valid.dim();
    if ny < 2 {
        return Err(GridError::invalid_shape(
            "v_mask_to_rho",
            format!("need at least 2 rows, got {}", ny),
        ));
    }
    let mut out = Array2::from_elem((ny + 1, nx), false);
    Zip::from(out.slice_mut(s![1..-1, ..]))
        .and(valid.slice(s![..-1, ..]))
        .and(valid.slice(s![1.., ..]))
        .for_each(|o, &a, &b| *o = a && b);
    replicate_edges(&mut out, Axis(0));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_rho_to_u_shape_and_values() {
        let a = array![[0.0, 2.0, 4.0], [1.0, 3.0, 5.0]];
        let u = rho_to_u(a.view()).unwrap();
        assert_eq!(u, array![[1.0, 3.0], [2.0, 4.0]]);
    }

    #[test]
    fn test_rho_to_v_shape_and_values() {
        let a = array![[0.0, 2.0], [2.0, 4.0], [6.0, 8.0]];
        let v = rho_to_v(a.view()).unwrap();
        assert_eq!(v, array![[1.0, 3.0], [4.0, 6.0]]);
    }

    #[test]
    fn test_u_to_rho_replicates_edges() {
        let u = array![[1.0, 3.0, 7.0]];
        let rho = u_to_rho(u.view()).unwrap();
        // interior: 2, 5; edges copy their neighbour
        assert_eq!(rho, array![[2.0, 2.0, 5.0, 5.0]]);
    }

    #[test]
    fn test_v_to_rho_replicates_edges() {
        let v = array![[1.0], [3.0], [7.0]];
        let rho = v_to_rho(v.view()).unwrap();
        assert_eq!(rho, array![[2.0], [2.0], [5.0], [5.0]]);
    }

    #[test]
    fn test_constant_round_trip() {
        let c = Array2::from_elem((4, 6), 3.25);
        let back = u_to_rho(rho_to_u(c.view()).unwrap().view()).unwrap();
        assert_eq!(back.dim(), c.dim());
        for (&x, &y) in back.iter().zip(c.iter()) {
            assert!((x - y).abs() < TOL);
        }

        let back = v_to_rho(rho_to_v(c.view()).unwrap().view()).unwrap();
        for (&x, &y) in back.iter().zip(c.iter()) {
            assert!((x - y).abs() < TOL);
        }
    }

    #[test]
    fn test_linear_ramp_round_trip_interior() {
        let nx = 8;
        let ramp = Array2::from_shape_fn((3, nx), |(_, i)| 2.0 * i as f64 + 1.0);
        let back = u_to_rho(rho_to_u(ramp.view()).unwrap().view()).unwrap();

        for j in 0..3 {
            for i in 1..nx - 1 {
                assert!((back[[j, i]] - ramp[[j, i]]).abs() < TOL);
            }
            // Boundary columns replicate the interior neighbour, not the ramp
            assert!((back[[j, 0]] - ramp[[j, 1]]).abs() < TOL);
            assert!((back[[j, nx - 1]] - ramp[[j, nx - 2]]).abs() < TOL);
        }
    }

    #[test]
    fn test_too_narrow_is_invalid_shape() {
        let a = Array2::<f64>::zeros((3, 1));
        assert!(matches!(
            rho_to_u(a.view()),
            Err(GridError::InvalidShape { .. })
        ));
        assert!(matches!(
            u_to_rho(a.view()),
            Err(GridError::InvalidShape { .. })
        ));
        let b = Array2::<f64>::zeros((1, 3));
        assert!(rho_to_v(b.view()).is_err());
        assert!(v_to_rho(b.view()).is_err());
    }

    #[test]
    fn test_mask_staggering() {
        let valid = array![[true, false, true, true]];
        let rho = u_mask_to_rho(valid.view()).unwrap();
        assert_eq!(rho, array![[false, false, false, true, true]]);
    }

    #[test]
    fn test_nan_propagates() {
        let u = array![[1.0, f64::NAN, 3.0]];
        let rho = u_to_rho(u.view()).unwrap();
        assert!(rho[[0, 1]].is_nan());
        assert!(rho[[0, 2]].is_nan());
        assert!(rho[[0, 0]].is_nan());
    }
}
