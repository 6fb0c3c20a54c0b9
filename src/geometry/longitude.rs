//! Longitude wrapping for coordinate sequences.

/// Map a longitude into `[reference, reference + 360)`.
#[inline]
pub fn wrap_to(lon: f64, reference: f64) -> f64 {
    (lon - reference).rem_euclid(360.0) + reference
}

/// Wrap a polyline's longitudes into `[reference, reference + 360)`.
///
/// Without `cut`, every longitude is wrapped independently and `y` is
/// returned unchanged.
///
/// With `cut`, a segment that jumps across the seam is split: the line is
/// extended one point past the seam, a NaN separator is inserted, and the
/// next piece starts one point before the seam on the other side. This keeps
/// plotted contours from drawing a line across the whole map.
///
/// # Example
///
/// ```
/// use eddy_grid::geometry::wrap_longitude;
///
/// let (x, _) = wrap_longitude(&[170.0, 190.0], &[0.0, 1.0], -180.0, true);
/// assert_eq!(x.len(), 5);
/// assert_eq!(x[0], 170.0);
/// assert_eq!(x[1], 190.0);
/// assert!(x[2].is_nan());
/// assert_eq!(x[3], -190.0);
/// assert_eq!(x[4], -170.0);
/// ```
pub fn wrap_longitude(x: &[f64], y: &[f64], reference: f64, cut: bool) -> (Vec<f64>, Vec<f64>) {
    if !cut {
        let out = x.iter().map(|&lon| wrap_to(lon, reference)).collect();
        return (out, y.to_vec());
    }

    let n = x.len().min(y.len());
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut jumps = Vec::new();
    let mut x_previous = x[0];
    let mut wrapped_previous = wrap_to(x[0], reference);
    for i in 1..n {
        let wrapped = wrap_to(x[i], reference);
        if !x[i].is_nan() && !x_previous.is_nan() {
            let d = x[i] - x_previous;
            let d_wrapped = wrapped - wrapped_previous;
            // A seam crossing changes the step by a multiple of 360
            if (d - d_wrapped).abs() > 180.0 {
                jumps.push(i);
            }
        }
        x_previous = x[i];
        wrapped_previous = wrapped;
    }

    let mut out_x = Vec::with_capacity(n + jumps.len() * 3);
    let mut out_y = Vec::with_capacity(n + jumps.len() * 3);
    let mut next_jump = jumps.iter().peekable();
    for i in 0..n {
        if next_jump.peek() == Some(&&i) {
            next_jump.next();
            let correction = if x[i - 1] > x[i] { 360.0 } else { -360.0 };
            out_x.push(wrap_to(x[i], reference) - correction);
            out_y.push(y[i]);
            out_x.push(f64::NAN);
            out_y.push(f64::NAN);
            out_x.push(wrap_to(x[i - 1], reference) + correction);
            out_y.push(y[i - 1]);
        }
        out_x.push(wrap_to(x[i], reference));
        out_y.push(y[i]);
    }
    (out_x, out_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_to() {
        assert_eq!(wrap_to(-10.0, 0.0), 350.0);
        assert_eq!(wrap_to(370.0, 0.0), 10.0);
        assert_eq!(wrap_to(190.0, -180.0), -170.0);
        assert_eq!(wrap_to(-180.0, -180.0), -180.0);
    }

    #[test]
    fn test_plain_wrap() {
        let (x, y) = wrap_longitude(&[-5.0, 5.0, 365.0], &[1.0, 2.0, 3.0], 0.0, false);
        assert_eq!(x, vec![355.0, 5.0, 5.0]);
        assert_eq!(y, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cut_without_crossing_is_identity() {
        let x = [10.1, 10.3, 10.7];
        let y = [0.0, 0.5, 1.0];
        let (wx, wy) = wrap_longitude(&x, &y, -180.0, true);
        assert_eq!(wx.len(), 3);
        assert_eq!(wy, y.to_vec());
    }

    #[test]
    fn test_cut_westward_crossing() {
        let (x, y) = wrap_longitude(&[-170.0, -190.0], &[5.0, 6.0], -180.0, true);
        // -190 wraps to 170; line continues to -190, breaks, resumes from -170 + 360
        assert_eq!(x[0], -170.0);
        assert_eq!(x[1], -190.0);
        assert!(x[2].is_nan());
        assert_eq!(x[3], 190.0);
        assert_eq!(x[4], 170.0);
        assert_eq!((y[0], y[1]), (5.0, 6.0));
        assert!(y[2].is_nan());
        assert_eq!((y[3], y[4]), (5.0, 6.0));
    }

    #[test]
    fn test_nan_breaks_are_kept() {
        let (x, _) = wrap_longitude(&[10.0, f64::NAN, 20.0], &[0.0, 0.0, 0.0], 0.0, true);
        assert_eq!(x.len(), 3);
        assert!(x[1].is_nan());
    }
}
