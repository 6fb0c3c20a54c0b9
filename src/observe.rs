//! Event reporting for grid and solver operations.
//!
//! Computation code does not log on its own. It reports [`GridEvent`]s to an
//! [`EventSink`] supplied by the caller; [`TracingSink`] forwards them to
//! `tracing` with structured fields.

use std::sync::Mutex;

use crate::grid::{GridId, Window};

/// Something worth reporting while building a domain or computing velocities.
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    /// Core window of a domain was located on the grid.
    WindowComputed {
        domain: String,
        window: Window,
        shape: (usize, usize),
    },
    /// The requested longitude range wraps the grid seam.
    ZeroCrossing {
        domain: String,
        regular: bool,
    },
    /// A zero-crossing half of an irregular grid had no points; the box
    /// corners were used for the neighbour search instead.
    EmptySeamSubset { side: &'static str },
    /// Window padded for stencil operations.
    Padded {
        pad: usize,
        padded_shape: (usize, usize),
        clamped: bool,
    },
    /// Metrics for a padded window were computed or reused.
    MetricsReady {
        grid: GridId,
        shape: (usize, usize),
        cached: bool,
    },
    /// Geostrophic velocities were computed for one SSH field.
    VelocityComputed {
        shape: (usize, usize),
        valid_cells: usize,
    },
}

/// Receiver of [`GridEvent`]s.
pub trait EventSink: Send + Sync {
    fn record(&self, event: GridEvent);
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: GridEvent) {
        match event {
            GridEvent::WindowComputed {
                domain,
                window,
                shape,
            } => tracing::info!(
                domain = %domain,
                rows = ?window.rows,
                cols = ?window.cols,
                shape = ?shape,
                "Set initial indices"
            ),
            GridEvent::ZeroCrossing { domain, regular } => tracing::info!(
                domain = %domain,
                regular,
                "Domain crosses the zero meridian"
            ),
            GridEvent::EmptySeamSubset { side } => tracing::warn!(
                side,
                "No grid points on this side of the seam, using box corners"
            ),
            GridEvent::Padded {
                pad,
                padded_shape,
                clamped,
            } => {
                if clamped {
                    tracing::warn!(
                        pad,
                        padded_shape = ?padded_shape,
                        "Padding clamped at grid edge, unpadded fields lose edge cells"
                    );
                } else {
                    tracing::debug!(pad, padded_shape = ?padded_shape, "Set padding indices");
                }
            }
            GridEvent::MetricsReady {
                grid,
                shape,
                cached,
            } => tracing::debug!(
                grid = ?grid,
                shape = ?shape,
                cached,
                "Coriolis and grid spacing ready"
            ),
            GridEvent::VelocityComputed { shape, valid_cells } => tracing::debug!(
                shape = ?shape,
                valid_cells,
                "Geostrophic velocity computed"
            ),
        }
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: GridEvent) {}
}

/// Keeps events in memory, for tests and batch summaries.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GridEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<GridEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded events matching a predicate.
    pub fn count(&self, pred: impl Fn(&GridEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: GridEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
