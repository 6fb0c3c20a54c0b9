//! Index windows into a grid, padding and unpadding.
//!
//! A domain is described by three windows:
//!
//! - the *core* window covering the requested bounding box,
//! - the *padded* window, the core grown by `pad` cells on every side
//!   (clamped to the grid) so centred differences are valid on the core edge,
//! - the *unpad* offsets that strip `pad` cells back off a padded array.
//!
//! The unpad offsets are fixed at `pad` even when the padded window was
//! clamped at a grid edge. Near an edge the padded array then holds fewer than
//! `pad` context cells and unpadding removes core cells as well; this
//! under-coverage is intentional and callers keep domains away from the edge
//! when they need the full core.
//!
//! Under zero crossing the columns of a window are not a contiguous slice:
//! they run from `stop` to the grid width and continue from `0` to `start`.

use std::ops::Range;

use ndarray::{Array2, ArrayView2, Axis, s};

/// Half-open index range along one axis; an open end extends to the axis end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl IndexRange {
    /// Range `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Range from `start` to the end of the axis.
    pub fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Concrete range on an axis of length `len`.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let end = self.end.unwrap_or(len).min(len);
        let start = self.start.min(end);
        start..end
    }

    /// Number of selected indices on an axis of length `len`.
    pub fn len(&self, len: usize) -> usize {
        self.resolve(len).len()
    }

    /// Grow by `pad` on both sides, clamped to `[0, len]`. Open ends stay open.
    pub fn padded(&self, pad: usize, len: usize) -> Self {
        Self {
            start: self.start.saturating_sub(pad),
            end: self.end.map(|end| (end + pad).min(len)),
        }
    }
}

/// Column selection of a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnRange {
    /// Contiguous columns.
    Linear(IndexRange),
    /// Columns wrapping the seam: `stop..width` followed by `0..start`.
    Wrapped { start: usize, stop: usize },
}

impl ColumnRange {
    /// True for a window that wraps the zero meridian.
    pub fn is_wrapped(&self) -> bool {
        matches!(self, ColumnRange::Wrapped { .. })
    }

    /// Column indices in array order for a grid of `width` columns.
    pub fn indices(&self, width: usize) -> Vec<usize> {
        match *self {
            ColumnRange::Linear(range) => range.resolve(width).collect(),
            ColumnRange::Wrapped { start, stop } => create_index_inverse(start, stop, width),
        }
    }

    /// Number of selected columns.
    pub fn len(&self, width: usize) -> usize {
        match *self {
            ColumnRange::Linear(range) => range.len(width),
            ColumnRange::Wrapped { start, stop } => {
                width.saturating_sub(stop.min(width)) + start.min(width)
            }
        }
    }

    /// Grow by `pad` columns on both sides.
    ///
    /// For a wrapped range the pad direction is inverted: the gap
    /// `start..stop` shrinks, which widens the selection.
    pub fn padded(&self, pad: usize, width: usize) -> Self {
        match *self {
            ColumnRange::Linear(range) => ColumnRange::Linear(range.padded(pad, width)),
            ColumnRange::Wrapped { start, stop } => ColumnRange::Wrapped {
                start: (start + pad).min(width),
                stop: stop.saturating_sub(pad),
            },
        }
    }
}

/// Indices `stop..size` followed by `0..start`.
///
/// # Example
///
/// ```
/// use eddy_grid::grid::create_index_inverse;
///
/// assert_eq!(create_index_inverse(2, 7, 9), vec![7, 8, 0, 1]);
/// ```
pub fn create_index_inverse(start: usize, stop: usize, size: usize) -> Vec<usize> {
    (stop.min(size)..size).chain(0..start.min(size)).collect()
}

/// Rectangular selection of grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    pub rows: IndexRange,
    pub cols: ColumnRange,
}

impl Window {
    /// Window over the whole grid.
    pub fn full() -> Self {
        Self {
            rows: IndexRange::open(0),
            cols: ColumnRange::Linear(IndexRange::open(0)),
        }
    }

    /// True when the columns wrap the zero meridian.
    pub fn zero_crossing(&self) -> bool {
        self.cols.is_wrapped()
    }

    /// Row indices for a grid with `ny` rows.
    pub fn row_indices(&self, ny: usize) -> Vec<usize> {
        self.rows.resolve(ny).collect()
    }

    /// Column indices for a grid with `nx` columns.
    pub fn col_indices(&self, nx: usize) -> Vec<usize> {
        self.cols.indices(nx)
    }

    /// Shape of the array this window selects from a grid of `grid_shape`.
    pub fn shape(&self, (ny, nx): (usize, usize)) -> (usize, usize) {
        (self.rows.len(ny), self.cols.len(nx))
    }

    /// Copy the selected cells out of a full-grid field.
    pub fn extract<T: Clone>(&self, field: ArrayView2<T>) -> Array2<T> {
        let (ny, nx) = field.dim();
        let rows = self.rows.resolve(ny);
        let band = field.slice(s![rows, ..]);
        match self.cols {
            ColumnRange::Linear(range) => band.slice(s![.., range.resolve(nx)]).to_owned(),
            ColumnRange::Wrapped { .. } => band.select(Axis(1), &self.cols.indices(nx)),
        }
    }

    /// Pad the window by `pad` cells, returning the padded window and the
    /// offsets that recover the core from an array built on it.
    pub fn pad(&self, pad: usize, grid_shape: (usize, usize)) -> (Window, Unpad) {
        pad_window(self, pad, grid_shape)
    }
}

/// Fixed leading/trailing offsets stripped from a padded array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Unpad {
    pub rows: usize,
    pub cols: usize,
}

impl Unpad {
    /// Offsets for a given pad count on both axes.
    pub fn new(pad: usize) -> Self {
        Self {
            rows: pad,
            cols: pad,
        }
    }

    fn axis_range(offset: usize, len: usize) -> Range<usize> {
        let end = len.saturating_sub(offset);
        offset.min(end)..end
    }

    /// View of the core region of a padded array.
    pub fn apply<'a, T>(&self, padded: ArrayView2<'a, T>) -> ArrayView2<'a, T> {
        let (ny, nx) = padded.dim();
        let rows = Self::axis_range(self.rows, ny);
        let cols = Self::axis_range(self.cols, nx);
        padded.slice_move(s![rows, cols])
    }

    /// Shape of the core region of an array of `padded_shape`.
    pub fn shape(&self, (ny, nx): (usize, usize)) -> (usize, usize) {
        (
            Self::axis_range(self.rows, ny).len(),
            Self::axis_range(self.cols, nx).len(),
        )
    }
}

/// Grow `window` by `pad` cells on every side.
///
/// Rows: `start' = max(0, start - pad)`, `end' = min(ny, end + pad)`.
/// Columns: the same, except that wrapped columns invert the pad direction.
/// The unpad offsets are `pad` on both axes regardless of clamping.
pub fn pad_window(window: &Window, pad: usize, (ny, nx): (usize, usize)) -> (Window, Unpad) {
    let padded = Window {
        rows: window.rows.padded(pad, ny),
        cols: window.cols.padded(pad, nx),
    };
    (padded, Unpad::new(pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn numbered(ny: usize, nx: usize) -> Array2<usize> {
        Array2::from_shape_fn((ny, nx), |(j, i)| j * 100 + i)
    }

    #[test]
    fn test_index_range() {
        let r = IndexRange::new(3, 8);
        assert_eq!(r.resolve(10), 3..8);
        assert_eq!(r.len(10), 5);
        assert_eq!(r.resolve(5), 3..5);
        assert_eq!(IndexRange::open(4).resolve(10), 4..10);
    }

    #[test]
    fn test_padding_clamps() {
        let r = IndexRange::new(1, 9).padded(2, 10);
        assert_eq!(r, IndexRange::new(0, 10));
        let open = IndexRange::open(5).padded(2, 10);
        assert_eq!(open, IndexRange::open(3));
    }

    #[test]
    fn test_index_inverse() {
        assert_eq!(create_index_inverse(3, 8, 10), vec![8, 9, 0, 1, 2]);
        assert_eq!(create_index_inverse(0, 10, 10), Vec::<usize>::new());
    }

    #[test]
    fn test_wrapped_padding_widens() {
        let cols = ColumnRange::Wrapped { start: 11, stop: 349 };
        assert_eq!(cols.len(360), 22);
        let padded = cols.padded(2, 360);
        assert_eq!(padded, ColumnRange::Wrapped { start: 13, stop: 347 });
        assert_eq!(padded.len(360), 26);
    }

    #[test]
    fn test_extract_linear() {
        let field = numbered(6, 8);
        let window = Window {
            rows: IndexRange::new(1, 3),
            cols: ColumnRange::Linear(IndexRange::new(2, 5)),
        };
        let sub = window.extract(field.view());
        assert_eq!(sub.dim(), (2, 3));
        assert_eq!(sub[[0, 0]], 102);
        assert_eq!(sub[[1, 2]], 204);
    }

    #[test]
    fn test_extract_wrapped() {
        let field = numbered(3, 10);
        let window = Window {
            rows: IndexRange::new(0, 2),
            cols: ColumnRange::Wrapped { start: 2, stop: 8 },
        };
        let sub = window.extract(field.view());
        assert_eq!(sub.dim(), (2, 4));
        let first_row: Vec<usize> = sub.row(0).to_vec();
        assert_eq!(first_row, vec![8, 9, 0, 1]);
    }

    #[test]
    fn test_unpad_recovers_core() {
        let grid = (20, 30);
        let field = numbered(grid.0, grid.1);
        let core = Window {
            rows: IndexRange::new(5, 12),
            cols: ColumnRange::Linear(IndexRange::new(6, 20)),
        };
        let (padded, unpad) = core.pad(3, grid);
        let padded_field = padded.extract(field.view());
        let recovered = unpad.apply(padded_field.view());
        assert_eq!(recovered, core.extract(field.view()));
    }

    #[test]
    fn test_unpad_zero_pad_is_identity() {
        let field = numbered(4, 4);
        let view = Unpad::new(0).apply(field.view());
        assert_eq!(view.dim(), (4, 4));
    }

    #[test]
    fn test_clamped_edge_under_covers() {
        let grid = (10, 10);
        let core = Window {
            rows: IndexRange::new(1, 6),
            cols: ColumnRange::Linear(IndexRange::new(3, 7)),
        };
        let (padded, unpad) = core.pad(2, grid);
        // Only one row of context exists above row 1
        assert_eq!(padded.rows, IndexRange::new(0, 8));
        let padded_shape = padded.shape(grid);
        assert_eq!(padded_shape, (8, 8));
        // Fixed offsets strip one core row too many
        assert_eq!(unpad.shape(padded_shape), (4, 4));
        assert_eq!(core.shape(grid), (5, 4));
    }

    #[test]
    fn test_unpad_larger_than_array_is_empty() {
        let field = numbered(3, 3);
        let view = Unpad::new(2).apply(field.view());
        assert_eq!(view.dim(), (0, 0));
    }
}
