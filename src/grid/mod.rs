//! Geographic grid, windows and staggered-grid operators.
//!
//! A [`Grid`] holds 2-D longitude/latitude coordinates of cell centres (rho
//! points) and an ocean mask. It is immutable once built; domains are cut out
//! of it with [`Window`]s computed by [`compute_window`].
//!
//! ```text
//!   row ny-1  o  o  o  o  o
//!             o  o  o  o  o     lon[j, i], lat[j, i], mask[j, i]
//!   row 0     o  o  o  o  o
//!           col 0       col nx-1
//! ```

mod filter;
mod indexer;
mod mask;
mod neighbors;
pub mod staggering;
mod window;

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{GridError, ensure_same_shape};
use crate::io::GridSource;

pub use filter::{gaussian_kernel, masked_convolution};
pub use indexer::compute_window;
pub use mask::{MaskStatistics, StaggeredMasks};
#[cfg(feature = "parallel")]
pub use neighbors::k_nearest_parallel;
pub use neighbors::{DEFAULT_NEIGHBORS, k_nearest};
pub use staggering::{rho_to_u, rho_to_v, u_to_rho, v_to_rho};
pub use window::{ColumnRange, IndexRange, Unpad, Window, create_index_inverse, pad_window};

/// Relative tolerance when comparing grid steps for regularity.
const STEP_TOLERANCE: f64 = 1e-6;

static NEXT_GRID_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a loaded grid, used as a cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(u64);

impl GridId {
    fn next() -> Self {
        Self(NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Longitude topology of a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// Periodic in longitude (global altimetry products); domains may wrap
    /// the zero meridian.
    Global,
    /// Bounded regional grid; domains never wrap.
    #[default]
    Regional,
}

/// Longitude/latitude grid with an ocean mask.
#[derive(Clone, Debug)]
pub struct Grid {
    id: GridId,
    kind: GridKind,
    lon: Array2<f64>,
    lat: Array2<f64>,
    mask: Array2<bool>,
}

impl Grid {
    /// Create a grid from rho-point coordinates and mask.
    ///
    /// All three arrays must share a non-empty shape.
    pub fn new(
        kind: GridKind,
        lon: Array2<f64>,
        lat: Array2<f64>,
        mask: Array2<bool>,
    ) -> Result<Self, GridError> {
        let shape = lon.dim();
        if shape.0 == 0 || shape.1 == 0 {
            return Err(GridError::DegenerateGrid(format!(
                "grid shape {:?} has an empty axis",
                shape
            )));
        }
        ensure_same_shape(shape, lat.dim())?;
        ensure_same_shape(shape, mask.dim())?;

        Ok(Self {
            id: GridId::next(),
            kind,
            lon,
            lat,
            mask,
        })
    }

    /// Create a grid where every cell is ocean.
    pub fn with_full_mask(
        kind: GridKind,
        lon: Array2<f64>,
        lat: Array2<f64>,
    ) -> Result<Self, GridError> {
        let mask = Array2::from_elem(lon.raw_dim(), true);
        Self::new(kind, lon, lat, mask)
    }

    /// Create an all-ocean grid from 1-D axes (`lon` along columns, `lat` along rows).
    ///
    /// # Example
    ///
    /// ```
    /// use eddy_grid::grid::{Grid, GridKind};
    ///
    /// let lon: Vec<f64> = (0..360).map(|i| i as f64 + 0.5).collect();
    /// let lat: Vec<f64> = (0..180).map(|j| j as f64 - 89.5).collect();
    /// let grid = Grid::from_axes(GridKind::Global, &lon, &lat).unwrap();
    /// assert_eq!(grid.shape(), (180, 360));
    /// assert!(grid.is_regular());
    /// ```
    pub fn from_axes(kind: GridKind, lon: &[f64], lat: &[f64]) -> Result<Self, GridError> {
        let shape = (lat.len(), lon.len());
        let lon2d = Array2::from_shape_fn(shape, |(_, i)| lon[i]);
        let lat2d = Array2::from_shape_fn(shape, |(j, _)| lat[j]);
        Self::with_full_mask(kind, lon2d, lat2d)
    }

    /// Load coordinates and mask from a grid source.
    pub fn from_source(source: &dyn GridSource, kind: GridKind) -> Result<Self, GridError> {
        let lon = source.lon()?;
        let lat = source.lat()?;
        let mask = source.mask()?;
        Self::new(kind, lon, lat, mask)
    }

    /// Identity of this grid instance.
    pub fn id(&self) -> GridId {
        self.id
    }

    /// Longitude topology.
    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// True for periodic (global) grids.
    pub fn is_periodic(&self) -> bool {
        self.kind == GridKind::Global
    }

    /// Grid shape `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        self.lon.dim()
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.lon.ncols()
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.lon.nrows()
    }

    pub fn lon(&self) -> ArrayView2<'_, f64> {
        self.lon.view()
    }

    pub fn lat(&self) -> ArrayView2<'_, f64> {
        self.lat.view()
    }

    pub fn mask(&self) -> ArrayView2<'_, bool> {
        self.mask.view()
    }

    /// Longitudes of the first row.
    pub fn lon_axis(&self) -> ArrayView1<'_, f64> {
        self.lon.index_axis(Axis(0), 0)
    }

    /// Latitudes of the first column.
    pub fn lat_axis(&self) -> ArrayView1<'_, f64> {
        self.lat.index_axis(Axis(1), 0)
    }

    /// True when row 0 longitudes and column 0 latitudes are uniformly spaced
    /// with a non-zero step.
    pub fn is_regular(&self) -> bool {
        uniform_step(self.lon_axis()).is_some() && uniform_step(self.lat_axis()).is_some()
    }

    /// Longitude step of a regular grid in degrees.
    pub fn resolution(&self) -> Option<f64> {
        if !self.is_regular() {
            return None;
        }
        uniform_step(self.lon_axis()).map(f64::abs)
    }

    /// Ocean/land counts of the full grid.
    pub fn mask_statistics(&self) -> MaskStatistics {
        MaskStatistics::compute(self.mask.view())
    }
}

/// Common step of a uniformly spaced axis.
fn uniform_step(axis: ArrayView1<f64>) -> Option<f64> {
    if axis.len() < 2 {
        return None;
    }
    let first = axis[1] - axis[0];
    if first == 0.0 || !first.is_finite() {
        return None;
    }
    let tol = STEP_TOLERANCE * first.abs();
    let uniform = axis
        .windows(2)
        .into_iter()
        .all(|w| ((w[1] - w[0]) - first).abs() <= tol);
    uniform.then_some(first)
}
