//! Analysis domains on a grid.
//!
//! A [`GridDomain`] ties a [`DomainConfig`] to a shared [`Grid`]: it locates
//! the core window, pads it, and holds the metrics and masks of the padded
//! window. Velocities are then computed per SSH field against those cached
//! static fields.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use eddy_grid::config::DomainConfig;
//! use eddy_grid::domain::GridDomain;
//! use eddy_grid::grid::{Grid, GridKind};
//! use eddy_grid::observe::NullSink;
//! use eddy_grid::types::GeoBounds;
//! use ndarray::Array2;
//!
//! let lon: Vec<f64> = (0..80).map(|i| i as f64 * 0.25).collect();
//! let lat: Vec<f64> = (0..60).map(|j| 20.0 + j as f64 * 0.25).collect();
//! let grid = Arc::new(Grid::from_axes(GridKind::Regional, &lon, &lat).unwrap());
//!
//! let config = DomainConfig::new("box", GeoBounds::new(5.0, 12.0, 25.0, 30.0));
//! let domain = GridDomain::new(grid.clone(), config, &NullSink).unwrap();
//!
//! let ssh = Array2::zeros(grid.shape());
//! let vel = domain.velocity(ssh.view(), &NullSink).unwrap();
//! assert_eq!(vel.shape(), domain.shape());
//! ```

mod cache;

use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Axis};

use crate::config::{DomainConfig, gaussian_resolution};
use crate::error::{GridError, ensure_same_shape};
use crate::grid::{
    Grid, MaskStatistics, StaggeredMasks, Unpad, Window, compute_window, gaussian_kernel,
    masked_convolution, pad_window,
};
use crate::io::{MapProjector, MercatorProjector};
use crate::observe::{EventSink, GridEvent};
use crate::solver::{Metrics, VelocityField, solve};

pub use cache::{MetricsCache, StaticFields};

/// Explicit row and column indices selecting a sub-array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainView {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl DomainView {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }
}

/// One configured analysis domain on a grid.
#[derive(Clone, Debug)]
pub struct GridDomain {
    grid: Arc<Grid>,
    config: DomainConfig,
    window: Window,
    padded: Window,
    unpad: Unpad,
    statics: Arc<StaticFields>,
}

impl GridDomain {
    /// Build a domain, computing its static fields.
    pub fn new(
        grid: Arc<Grid>,
        config: DomainConfig,
        sink: &dyn EventSink,
    ) -> Result<Self, GridError> {
        Self::build(grid, config, None, sink)
    }

    /// Build a domain, sharing static fields through `cache`.
    pub fn with_cache(
        grid: Arc<Grid>,
        config: DomainConfig,
        cache: &MetricsCache,
        sink: &dyn EventSink,
    ) -> Result<Self, GridError> {
        Self::build(grid, config, Some(cache), sink)
    }

    fn build(
        grid: Arc<Grid>,
        config: DomainConfig,
        cache: Option<&MetricsCache>,
        sink: &dyn EventSink,
    ) -> Result<Self, GridError> {
        config.validate()?;
        let grid_shape = grid.shape();

        let window = compute_window(&grid, &config.bounds, sink)?;
        let core_shape = window.shape(grid_shape);
        sink.record(GridEvent::WindowComputed {
            domain: config.name.clone(),
            window,
            shape: core_shape,
        });
        if window.zero_crossing() {
            sink.record(GridEvent::ZeroCrossing {
                domain: config.name.clone(),
                regular: grid.is_regular(),
            });
        }

        let (padded, unpad) = pad_window(&window, config.pad, grid_shape);
        let padded_shape = padded.shape(grid_shape);
        let full = (core_shape.0 + 2 * config.pad, core_shape.1 + 2 * config.pad);
        sink.record(GridEvent::Padded {
            pad: config.pad,
            padded_shape,
            clamped: padded_shape != full,
        });

        let (statics, cached) = match cache {
            Some(cache) => cache.get_or_compute(&grid, &padded)?,
            None => (Arc::new(StaticFields::compute(&grid, &padded)?), false),
        };
        sink.record(GridEvent::MetricsReady {
            grid: grid.id(),
            shape: statics.shape(),
            cached,
        });

        Ok(Self {
            grid,
            config,
            window,
            padded,
            unpad,
            statics,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Core window on the grid.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Padded window on the grid.
    pub fn padded_window(&self) -> Window {
        self.padded
    }

    /// Offsets recovering the core from a padded array.
    pub fn unpad(&self) -> Unpad {
        self.unpad
    }

    /// True when the domain wraps the zero meridian.
    pub fn zero_crossing(&self) -> bool {
        self.window.zero_crossing()
    }

    /// Shape of unpadded output fields.
    pub fn shape(&self) -> (usize, usize) {
        self.unpad.shape(self.padded_shape())
    }

    /// Shape of padded fields.
    pub fn padded_shape(&self) -> (usize, usize) {
        self.statics.shape()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.statics.metrics
    }

    pub fn masks(&self) -> &StaggeredMasks {
        &self.statics.masks
    }

    /// Padded longitudes.
    pub fn lon_pad(&self) -> ArrayView2<'_, f64> {
        self.statics.lon.view()
    }

    /// Padded latitudes.
    pub fn lat_pad(&self) -> ArrayView2<'_, f64> {
        self.statics.lat.view()
    }

    /// Unpadded longitudes.
    pub fn lon(&self) -> ArrayView2<'_, f64> {
        self.unpad.apply(self.statics.lon.view())
    }

    /// Unpadded latitudes.
    pub fn lat(&self) -> ArrayView2<'_, f64> {
        self.unpad.apply(self.statics.lat.view())
    }

    /// Ocean/land counts over the unpadded domain.
    pub fn mask_statistics(&self) -> MaskStatistics {
        MaskStatistics::compute(self.unpad.apply(self.statics.masks.rho.view()))
    }

    /// Grid indices of the core window.
    pub fn view(&self) -> DomainView {
        let (ny, nx) = self.grid.shape();
        DomainView {
            rows: self.window.row_indices(ny),
            cols: self.window.col_indices(nx),
        }
    }

    /// Grid indices of the padded window.
    pub fn view_pad(&self) -> DomainView {
        let (ny, nx) = self.grid.shape();
        DomainView {
            rows: self.padded.row_indices(ny),
            cols: self.padded.col_indices(nx),
        }
    }

    /// Indices of the core inside a padded array.
    pub fn view_unpad(&self) -> DomainView {
        let (ny, nx) = self.padded_shape();
        let rows_end = ny.saturating_sub(self.unpad.rows);
        let cols_end = nx.saturating_sub(self.unpad.cols);
        DomainView {
            rows: (self.unpad.rows.min(rows_end)..rows_end).collect(),
            cols: (self.unpad.cols.min(cols_end)..cols_end).collect(),
        }
    }

    /// Copy the cells selected by `view` out of `field`.
    ///
    /// Use [`view`](Self::view) or [`view_pad`](Self::view_pad) with
    /// full-grid fields and [`view_unpad`](Self::view_unpad) with padded ones.
    pub fn extract<T: Clone>(
        &self,
        field: ArrayView2<T>,
        view: &DomainView,
    ) -> Result<Array2<T>, GridError> {
        let (ny, nx) = field.dim();
        let out_of_range = view.rows.iter().any(|&j| j >= ny) || view.cols.iter().any(|&i| i >= nx);
        if out_of_range {
            return Err(GridError::invalid_shape(
                "domain view",
                format!("indices exceed field of shape {:?}", (ny, nx)),
            ));
        }
        Ok(field
            .select(Axis(0), &view.rows)
            .select(Axis(1), &view.cols))
    }

    /// Padded copy of a full-grid field.
    pub fn pad_field(&self, field: ArrayView2<f64>) -> Result<Array2<f64>, GridError> {
        ensure_same_shape(self.grid.shape(), field.dim())?;
        Ok(self.padded.extract(field))
    }

    /// Geostrophic velocities from an SSH field.
    ///
    /// `zeta` may cover the full grid or only the padded window.
    pub fn velocity(
        &self,
        zeta: ArrayView2<f64>,
        sink: &dyn EventSink,
    ) -> Result<VelocityField, GridError> {
        let padded_shape = self.padded_shape();
        let field = if zeta.dim() == padded_shape {
            solve(zeta, self.metrics(), self.masks(), self.unpad)?
        } else if zeta.dim() == self.grid.shape() {
            let zeta_pad = self.padded.extract(zeta);
            solve(zeta_pad.view(), self.metrics(), self.masks(), self.unpad)?
        } else {
            return Err(GridError::shape_mismatch(padded_shape, zeta.dim()));
        };
        sink.record(GridEvent::VelocityComputed {
            shape: field.shape(),
            valid_cells: field.uspd.valid_count(),
        });
        Ok(field)
    }

    /// Velocities for a sequence of SSH fields, in input order.
    pub fn velocity_series(
        &self,
        fields: &[Array2<f64>],
        sink: &dyn EventSink,
    ) -> Result<Vec<VelocityField>, GridError> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            fields
                .par_iter()
                .map(|zeta| self.velocity(zeta.view(), sink))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            fields
                .iter()
                .map(|zeta| self.velocity(zeta.view(), sink))
                .collect()
        }
    }

    /// Mercator projection framing this domain.
    pub fn projector(&self) -> MercatorProjector {
        MercatorProjector::for_domain(&self.config.bounds)
    }

    /// Map coordinates of the unpadded domain.
    pub fn project(&self) -> Result<(Array2<f64>, Array2<f64>), GridError> {
        self.projector().project_arrays(self.lon(), self.lat())
    }

    /// Gaussian filter scales in cells for zonal/meridional wavelengths in
    /// degrees. Uses the configured resolution, else the grid's own.
    pub fn gaussian_resolution(&self, zwl: f64, mwl: f64) -> Result<(f64, f64), GridError> {
        let resolution = self
            .config
            .resolution
            .or_else(|| self.grid.resolution())
            .ok_or_else(|| {
                GridError::InvalidConfig(format!(
                    "{}: no resolution configured for an irregular grid",
                    self.config.name
                ))
            })?;
        gaussian_resolution(zwl, mwl, resolution)
    }

    /// Smooth an unpadded field with a Gaussian sized from zonal and
    /// meridional wavelengths in degrees. Land cells are left out of the
    /// average and come back as NaN.
    pub fn gaussian_filter(
        &self,
        field: ArrayView2<f64>,
        zwl: f64,
        mwl: f64,
    ) -> Result<Array2<f64>, GridError> {
        ensure_same_shape(self.shape(), field.dim())?;
        let (zres, mres) = self.gaussian_resolution(zwl, mwl)?;
        let kernel = gaussian_kernel(zres, mres)?;
        let valid = self.unpad.apply(self.statics.masks.rho.view());
        masked_convolution(field, valid, kernel.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ColumnRange, GridKind};
    use crate::observe::{NullSink, RecordingSink};
    use crate::types::GeoBounds;
    use approx::assert_relative_eq;

    fn regional() -> Arc<Grid> {
        let lon: Vec<f64> = (0..40).map(|i| i as f64 * 0.5).collect();
        let lat: Vec<f64> = (0..30).map(|j| 20.0 + j as f64 * 0.5).collect();
        Arc::new(Grid::from_axes(GridKind::Regional, &lon, &lat).unwrap())
    }

    fn global() -> Arc<Grid> {
        let lon: Vec<f64> = (0..360).map(|i| i as f64 + 0.5).collect();
        let lat: Vec<f64> = (0..40).map(|j| -50.0 + j as f64 + 0.5).collect();
        Arc::new(Grid::from_axes(GridKind::Global, &lon, &lat).unwrap())
    }

    #[test]
    fn test_events_and_shapes() {
        let sink = RecordingSink::new();
        let config = DomainConfig::new("box", GeoBounds::new(5.0, 12.0, 25.0, 30.0)).with_pad(2);
        let domain = GridDomain::new(regional(), config, &sink).unwrap();

        // Rows 10..20, columns 10..24
        assert_eq!(domain.view().shape(), (10, 14));
        assert_eq!(domain.view_pad().shape(), (14, 18));
        assert_eq!(domain.padded_shape(), (14, 18));
        assert_eq!(domain.shape(), (10, 14));
        assert_eq!(domain.view_unpad().rows, (2..12).collect::<Vec<_>>());
        assert!(!domain.zero_crossing());

        let events = sink.events();
        assert!(matches!(events[0], GridEvent::WindowComputed { shape: (10, 14), .. }));
        assert!(matches!(
            events[1],
            GridEvent::Padded {
                pad: 2,
                clamped: false,
                ..
            }
        ));
        assert!(matches!(events[2], GridEvent::MetricsReady { cached: false, .. }));
    }

    #[test]
    fn test_views_agree_with_unpad() {
        let grid = regional();
        let config = DomainConfig::new("box", GeoBounds::new(5.0, 12.0, 25.0, 30.0)).with_pad(3);
        let domain = GridDomain::new(grid.clone(), config, &NullSink).unwrap();

        let core = domain.extract(grid.lon(), &domain.view()).unwrap();
        let padded = domain.extract(grid.lon(), &domain.view_pad()).unwrap();
        let unpadded = domain.extract(padded.view(), &domain.view_unpad()).unwrap();
        assert_eq!(core, unpadded);
        assert_eq!(core.view(), domain.lon());
        assert!(domain.extract(padded.view(), &domain.view_pad()).is_err());
    }

    #[test]
    fn test_clamped_padding_is_reported() {
        let sink = RecordingSink::new();
        let config = DomainConfig::new("edge", GeoBounds::new(-5.0, 8.0, 10.0, 30.0));
        let domain = GridDomain::new(regional(), config, &sink).unwrap();
        assert_eq!(
            sink.count(|e| matches!(e, GridEvent::Padded { clamped: true, .. })),
            1
        );
        // Fixed offsets strip cells that were never padded
        assert!(domain.shape().0 < domain.view().rows.len());
    }

    #[test]
    fn test_zero_crossing_domain() {
        let grid = global();
        let sink = RecordingSink::new();
        let config = DomainConfig::new("seam", GeoBounds::new(350.0, 10.0, -30.0, -10.0));
        let domain = GridDomain::new(grid.clone(), config, &sink).unwrap();

        assert!(domain.zero_crossing());
        assert_eq!(
            domain.window().cols,
            ColumnRange::Wrapped {
                start: 11,
                stop: 349
            }
        );
        assert_eq!(
            sink.count(|e| matches!(e, GridEvent::ZeroCrossing { regular: true, .. })),
            1
        );

        let lon = domain.lon();
        assert_eq!(lon.ncols(), 22);
        assert_eq!(lon[[0, 0]], 349.5);
        assert_eq!(lon[[0, 21]], 10.5);
        // Padding widens the wrapped selection on both sides
        assert_eq!(domain.view_pad().cols.len(), 26);
        assert_eq!(domain.view_pad().cols[0], 347);
    }

    #[test]
    fn test_velocity_full_and_padded_input() {
        let grid = regional();
        let config = DomainConfig::new("box", GeoBounds::new(5.0, 12.0, 25.0, 30.0));
        let domain = GridDomain::new(grid.clone(), config, &NullSink).unwrap();

        // SSH rising northwards
        let ssh = Array2::from_shape_fn(grid.shape(), |(j, _)| 0.01 * j as f64);
        let from_full = domain.velocity(ssh.view(), &NullSink).unwrap();
        let ssh_pad = domain.pad_field(ssh.view()).unwrap();
        let from_pad = domain.velocity(ssh_pad.view(), &NullSink).unwrap();
        assert_eq!(from_full, from_pad);

        // Northern hemisphere, height increasing north: flow to the west
        let (j, i) = (4, 6);
        assert!(from_full.u.get(j, i).unwrap() < 0.0);
        assert_relative_eq!(from_full.v.get(j, i).unwrap(), 0.0, epsilon = 1e-12);

        let wrong = Array2::zeros((3, 3));
        assert!(matches!(
            domain.velocity(wrong.view(), &NullSink),
            Err(GridError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_velocity_series_keeps_order() {
        let grid = regional();
        let config = DomainConfig::new("box", GeoBounds::new(5.0, 12.0, 25.0, 30.0));
        let domain = GridDomain::new(grid.clone(), config, &NullSink).unwrap();

        let fields: Vec<Array2<f64>> = (0..4)
            .map(|k| Array2::from_shape_fn(grid.shape(), |(j, _)| 0.01 * k as f64 * j as f64))
            .collect();
        let sink = RecordingSink::new();
        let series = domain.velocity_series(&fields, &sink).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(
            sink.count(|e| matches!(e, GridEvent::VelocityComputed { .. })),
            4
        );
        for (k, field) in series.iter().enumerate() {
            let expected = domain.velocity(fields[k].view(), &NullSink).unwrap();
            assert_eq!(field, &expected);
        }
        assert!(series[0].uspd.valid_values().all(|s| s.abs() < 1e-12));
        assert!(series[3].uspd.valid_values().any(|s| s > 0.0));
    }

    #[test]
    fn test_shared_cache() {
        let grid = regional();
        let cache = MetricsCache::new();
        let sink = RecordingSink::new();
        let bounds = GeoBounds::new(5.0, 12.0, 25.0, 30.0);
        let a = GridDomain::with_cache(grid.clone(), DomainConfig::new("a", bounds), &cache, &sink)
            .unwrap();
        let b = GridDomain::with_cache(grid.clone(), DomainConfig::new("b", bounds), &cache, &sink)
            .unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(a.metrics(), b.metrics());
        assert_eq!(
            sink.count(|e| matches!(e, GridEvent::MetricsReady { cached: true, .. })),
            1
        );
    }

    #[test]
    fn test_projection_and_resolution() {
        let config = DomainConfig::new("box", GeoBounds::new(5.0, 12.0, 25.0, 30.0));
        let domain = GridDomain::new(regional(), config, &NullSink).unwrap();
        let (x, y) = domain.project().unwrap();
        assert_eq!(x.dim(), domain.shape());
        assert!(x[[0, 1]] > x[[0, 0]]);
        assert!(y[[1, 0]] > y[[0, 0]]);
        assert_eq!(domain.projector().lat_ts(), 27.5);

        let (z, m) = domain.gaussian_resolution(4.0, 2.0).unwrap();
        assert_eq!(z, 1.0);
        assert_eq!(m, 0.5);
    }

    #[test]
    fn test_gaussian_filter_skips_land() {
        let lon = Array2::from_shape_fn((20, 30), |(_, i)| i as f64 * 0.5);
        let lat = Array2::from_shape_fn((20, 30), |(j, _)| 20.0 + j as f64 * 0.5);
        let mut mask = Array2::from_elem((20, 30), true);
        mask[[10, 15]] = false;
        let grid = Grid::new(GridKind::Regional, lon, lat, mask).unwrap();
        let config = DomainConfig::new("smooth", GeoBounds::new(2.0, 12.0, 22.0, 28.0));
        let domain = GridDomain::new(Arc::new(grid), config, &NullSink).unwrap();

        let field = Array2::from_elem(domain.shape(), 0.2);
        let smooth = domain.gaussian_filter(field.view(), 8.0, 4.0).unwrap();
        assert_eq!(smooth.dim(), domain.shape());
        assert_eq!(domain.mask_statistics().land_cells, 1);
        assert_eq!(smooth.iter().filter(|x| x.is_nan()).count(), 1);
        for x in smooth.iter().filter(|x| !x.is_nan()) {
            assert_relative_eq!(*x, 0.2, epsilon = 1e-12);
        }
        assert!(domain.gaussian_filter(field.t(), 8.0, 4.0).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let mut bounds = GeoBounds::new(5.0, 12.0, 25.0, 30.0);
        bounds.lon_max = 5.0;
        let config = DomainConfig::new("bad", bounds);
        assert!(matches!(
            GridDomain::new(regional(), config, &NullSink),
            Err(GridError::InvalidConfig(_))
        ));
    }
}
