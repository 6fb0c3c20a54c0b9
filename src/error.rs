//! Error type shared by the grid, solver and I/O layers.
//!
//! Structural problems (wrong shapes, empty axes, bad configuration) are
//! reported immediately. Numerical degeneracies such as poles or fully masked
//! windows are not errors: they flow through the arithmetic as NaN/∞ and are
//! excluded downstream by masks.

use thiserror::Error;

/// Errors raised by grid windowing, staggering and the velocity solver.
#[derive(Debug, Error)]
pub enum GridError {
    /// Array rank or extent is unusable for the requested operation.
    #[error("Invalid shape for {context}: {detail}")]
    InvalidShape {
        context: &'static str,
        detail: String,
    },

    /// Two arrays that must share a shape do not.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Zero-length coordinate axis or zero grid step.
    #[error("Degenerate grid: {0}")]
    DegenerateGrid(String),

    /// Invalid domain configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Variable not found in a grid source.
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Attribute not found on a grid source variable.
    #[error("Missing attribute {attribute} on variable {variable}")]
    MissingAttribute { variable: String, attribute: String },

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),
}

impl GridError {
    /// Create an invalid shape error.
    pub fn invalid_shape(context: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidShape {
            context,
            detail: detail.into(),
        }
    }

    /// Create a shape mismatch error from two `(rows, cols)` pairs.
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch { expected, actual }
    }
}

/// Check that two 2-D shapes agree.
pub(crate) fn ensure_same_shape(
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<(), GridError> {
    if expected == actual {
        Ok(())
    } else {
        Err(GridError::shape_mismatch(expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = GridError::shape_mismatch((4, 5), (4, 6));
        assert_eq!(err.to_string(), "Shape mismatch: expected (4, 5), got (4, 6)");
    }

    #[test]
    fn test_ensure_same_shape() {
        assert!(ensure_same_shape((3, 3), (3, 3)).is_ok());
        assert!(matches!(
            ensure_same_shape((3, 3), (2, 3)),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}
