//! Locating the index window of a lon/lat box on a grid.

use crate::error::GridError;
use crate::geometry::{fractional_index, nearest, wrap_to};
use crate::observe::{EventSink, GridEvent};
use crate::types::GeoBounds;

#[cfg(not(feature = "parallel"))]
use super::neighbors::k_nearest;
#[cfg(feature = "parallel")]
use super::neighbors::k_nearest_parallel;
use super::neighbors::DEFAULT_NEIGHBORS;
use super::window::{ColumnRange, IndexRange, Window};
use super::Grid;

/// Longitude margin added on each side of the box when locating seam columns (degrees).
const SEAM_MARGIN: f64 = 0.5;

/// Compute the core window covering `bounds` on `grid`.
///
/// Rows come from the nearest points to `(lon_mid, lat_min)` and
/// `(lon_mid, lat_max)`, columns from `(lon_min, lat_mid)` and
/// `(lon_max, lat_mid)`, giving the half-open ranges `[j0, j1)` and
/// `[i0, i1)`. Bounds outside the grid clamp to its edge.
///
/// On a [`Global`](super::GridKind::Global) grid the longitudes are first
/// wrapped into the grid's native range. If the box then runs past the seam
/// the window is a [`ColumnRange::Wrapped`] one:
///
/// - regular grids take the columns from 1-D interpolation on the first row,
///   widened by half a degree on each side,
/// - irregular grids search the four nearest points to the corners of the
///   grid parts on either side of the seam. The western edge is the smallest
///   column matched east of the seam, the eastern edge the largest column
///   matched west of it.
pub fn compute_window(
    grid: &Grid,
    bounds: &GeoBounds,
    sink: &dyn EventSink,
) -> Result<Window, GridError> {
    let lon_axis = grid.lon_axis().to_vec();
    let lat_axis = grid.lat_axis().to_vec();

    let (_, j0) = nearest(bounds.lon_mid(), bounds.lat_min, &lon_axis, &lat_axis)?;
    let (_, j1) = nearest(bounds.lon_mid(), bounds.lat_max, &lon_axis, &lat_axis)?;
    let rows = IndexRange::new(j0, j1);

    let cols = if grid.is_periodic() {
        periodic_columns(grid, bounds, &lon_axis, &lat_axis, sink)?
    } else {
        let (i0, _) = nearest(bounds.lon_min, bounds.lat_mid(), &lon_axis, &lat_axis)?;
        let (i1, _) = nearest(bounds.lon_max, bounds.lat_mid(), &lon_axis, &lat_axis)?;
        ColumnRange::Linear(IndexRange::new(i0, i1))
    };

    Ok(Window { rows, cols })
}

fn periodic_columns(
    grid: &Grid,
    bounds: &GeoBounds,
    lon_axis: &[f64],
    lat_axis: &[f64],
    sink: &dyn EventSink,
) -> Result<ColumnRange, GridError> {
    if bounds.lon_max - bounds.lon_min >= 360.0 {
        return Ok(ColumnRange::Linear(IndexRange::open(0)));
    }

    let origin = lon_axis.iter().copied().fold(f64::INFINITY, f64::min);
    let lon_min = wrap_to(bounds.lon_min, origin);
    let lon_max = wrap_to(bounds.lon_max, origin);

    if lon_min <= lon_max {
        let (i0, _) = nearest(lon_min, bounds.lat_mid(), lon_axis, lat_axis)?;
        let (i1, _) = nearest(lon_max, bounds.lat_mid(), lon_axis, lat_axis)?;
        return Ok(ColumnRange::Linear(IndexRange::new(i0, i1)));
    }

    let west = wrap_to(lon_min - SEAM_MARGIN, origin);
    let east = wrap_to(lon_max + SEAM_MARGIN, origin);

    let (start, stop) = if grid.is_regular() {
        let stop = fractional_index(lon_axis, west)?.floor() as usize;
        let start = fractional_index(lon_axis, east)?.floor() as usize + 1;
        (start, stop)
    } else {
        seam_columns_irregular(grid, bounds, west, east, sink)?
    };

    // Near-full circles overlap once widened: take every column once
    if start >= stop {
        return Ok(ColumnRange::Linear(IndexRange::open(0)));
    }
    Ok(ColumnRange::Wrapped { start, stop })
}

/// Bounding box corners `[(x_min, y_min), (x_max, y_min), (x_max, y_max), (x_min, y_max)]`
/// of the grid points selected by `keep`.
fn subset_corners(grid: &Grid, keep: impl Fn(f64) -> bool) -> Option<[(f64, f64); 4]> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    let mut any = false;
    for (&x, &y) in grid.lon().iter().zip(grid.lat().iter()) {
        if !keep(x) {
            continue;
        }
        any = true;
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    any.then_some([(x_min, y_min), (x_max, y_min), (x_max, y_max), (x_min, y_max)])
}

fn box_corners(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> [(f64, f64); 4] {
    [(x_min, y_min), (x_max, y_min), (x_max, y_max), (x_min, y_max)]
}

fn seam_columns_irregular(
    grid: &Grid,
    bounds: &GeoBounds,
    west: f64,
    east: f64,
    sink: &dyn EventSink,
) -> Result<(usize, usize), GridError> {
    let right = subset_corners(grid, |x| x >= west).unwrap_or_else(|| {
        sink.record(GridEvent::EmptySeamSubset { side: "right" });
        box_corners(west, west, bounds.lat_min, bounds.lat_max)
    });
    let left = subset_corners(grid, |x| x <= east).unwrap_or_else(|| {
        sink.record(GridEvent::EmptySeamSubset { side: "left" });
        box_corners(east, east, bounds.lat_min, bounds.lat_max)
    });

    let right_hits = search(grid, &right)?;
    let left_hits = search(grid, &left)?;

    let stop = right_hits.iter().map(|&(_, i)| i).min().unwrap_or(0);
    let start = left_hits.iter().map(|&(_, i)| i).max().unwrap_or(0);
    Ok((start, stop))
}

fn search(grid: &Grid, corners: &[(f64, f64); 4]) -> Result<Vec<(usize, usize)>, GridError> {
    #[cfg(feature = "parallel")]
    let found = k_nearest_parallel(grid.lon(), grid.lat(), corners, DEFAULT_NEIGHBORS)?;
    #[cfg(not(feature = "parallel"))]
    let found = k_nearest(grid.lon(), grid.lat(), corners, DEFAULT_NEIGHBORS)?;
    Ok(found.into_iter().flatten().collect())
}
