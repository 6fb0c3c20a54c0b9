//! Shared cache of static fields per (grid, padded window).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use ndarray::Array2;

use crate::error::GridError;
use crate::grid::{Grid, GridId, StaggeredMasks, Window};
use crate::solver::{Metrics, compute_metrics};

/// Everything on a padded window that does not depend on the SSH field.
#[derive(Clone, Debug)]
pub struct StaticFields {
    /// Padded longitudes
    pub lon: Array2<f64>,
    /// Padded latitudes
    pub lat: Array2<f64>,
    pub metrics: Metrics,
    pub masks: StaggeredMasks,
}

impl StaticFields {
    /// Cut the padded window out of `grid` and derive metrics and masks.
    pub fn compute(grid: &Grid, padded: &Window) -> Result<Self, GridError> {
        let lon = padded.extract(grid.lon());
        let lat = padded.extract(grid.lat());
        let mask = padded.extract(grid.mask());
        let metrics = compute_metrics(lon.view(), lat.view())?;
        let masks = StaggeredMasks::from_rho(mask.view())?;
        Ok(Self {
            lon,
            lat,
            metrics,
            masks,
        })
    }

    /// Padded rho shape.
    pub fn shape(&self) -> (usize, usize) {
        self.lon.dim()
    }
}

type Key = (GridId, Window);

/// Read-mostly map from `(grid, padded window)` to [`StaticFields`].
///
/// Several domains over the same grid and window share one set of metrics.
/// Lookups take a read lock only; a miss computes outside any lock and
/// inserts under a short write lock, keeping the first value stored if two
/// threads race on the same key.
#[derive(Debug, Default)]
pub struct MetricsCache {
    entries: RwLock<HashMap<Key, Arc<StaticFields>>>,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached fields for a grid and padded window.
    pub fn get(&self, grid: GridId, padded: &Window) -> Option<Arc<StaticFields>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&(grid, *padded)).cloned()
    }

    /// Cached fields, computing and storing them on a miss.
    ///
    /// The flag is `true` when the value came from the cache.
    pub fn get_or_compute(
        &self,
        grid: &Grid,
        padded: &Window,
    ) -> Result<(Arc<StaticFields>, bool), GridError> {
        if let Some(hit) = self.get(grid.id(), padded) {
            return Ok((hit, true));
        }
        let fields = Arc::new(StaticFields::compute(grid, padded)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let stored = entries
            .entry((grid.id(), *padded))
            .or_insert(fields)
            .clone();
        Ok((stored, false))
    }

    /// Number of cached windows.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
