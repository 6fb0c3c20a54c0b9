//! Surface geostrophic velocity from sea surface height.
//!
//! ```text
//! u = -g/f · ∂η/∂y        v = g/f · ∂η/∂x
//! ```
//!
//! Gradients are taken on v points (for `u`) and u points (for `v`), scaled by
//! the face-averaged inverse spacing, then moved back to rho points.

use ndarray::{Array2, ArrayView2, Zip, s};

use crate::error::{GridError, ensure_same_shape};
use crate::grid::staggering::{half_interp, u_mask_to_rho, u_to_rho, v_mask_to_rho, v_to_rho};
use crate::grid::{StaggeredMasks, Unpad};

use super::metrics::Metrics;

/// A rho-point field with a per-cell validity flag.
///
/// Invalid cells keep whatever the arithmetic produced; consumers check
/// `valid` instead of relying on a fill value.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedField {
    pub data: Array2<f64>,
    pub valid: Array2<bool>,
}

impl MaskedField {
    /// Pair data with a validity mask of the same shape.
    pub fn new(data: Array2<f64>, valid: Array2<bool>) -> Result<Self, GridError> {
        ensure_same_shape(data.dim(), valid.dim())?;
        Ok(Self { data, valid })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Value at `(j, i)` if the cell is valid.
    pub fn get(&self, j: usize, i: usize) -> Option<f64> {
        match self.valid.get((j, i)) {
            Some(true) => self.data.get((j, i)).copied(),
            _ => None,
        }
    }

    /// Number of valid cells.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// Iterator over valid values.
    pub fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data
            .iter()
            .zip(self.valid.iter())
            .filter_map(|(&x, &ok)| ok.then_some(x))
    }

    /// Copy of the data with invalid cells replaced by `fill`.
    pub fn filled(&self, fill: f64) -> Array2<f64> {
        let mut out = self.data.clone();
        Zip::from(&mut out)
            .and(&self.valid)
            .for_each(|x, &ok| {
                if !ok {
                    *x = fill;
                }
            });
        out
    }
}

/// Geostrophic velocities for one SSH field.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityField {
    /// Zonal velocity on the padded window (m/s)
    pub u_pad: Array2<f64>,
    /// Meridional velocity on the padded window (m/s)
    pub v_pad: Array2<f64>,
    /// Zonal velocity on the core window
    pub u: MaskedField,
    /// Meridional velocity on the core window
    pub v: MaskedField,
    /// Eddy kinetic energy `(u² + v²) / 2` (m²/s²)
    pub eke: MaskedField,
    /// Speed `sqrt(u² + v²)` (m/s)
    pub uspd: MaskedField,
}

impl VelocityField {
    /// Core window shape.
    pub fn shape(&self) -> (usize, usize) {
        self.u.shape()
    }
}

/// Compute geostrophic velocities from SSH `zeta` on the padded window.
///
/// `zeta`, `metrics` and `masks` must all share the padded rho shape. The
/// core fields are recovered with `unpad`. A velocity is valid where every
/// face it was interpolated from is ocean. Speed and EKE follow the rho
/// mask alone, so ocean cells next to the coast keep them.
pub fn solve(
    zeta: ArrayView2<f64>,
    metrics: &Metrics,
    masks: &StaggeredMasks,
    unpad: Unpad,
) -> Result<VelocityField, GridError> {
    let shape = metrics.shape();
    ensure_same_shape(shape, zeta.dim())?;
    ensure_same_shape(shape, masks.shape())?;

    // -g/f dη/dy, gradient on v points
    let pn_v = half_interp(metrics.p_n.slice(s![1.., ..]), metrics.p_n.slice(s![..-1, ..]));
    let mut grad_v = &zeta.slice(s![1.., ..]) - &zeta.slice(s![..-1, ..]);
    grad_v *= &pn_v;
    let mut u_pad = v_to_rho(grad_v.view())?;
    Zip::from(&mut u_pad)
        .and(&metrics.gof)
        .for_each(|u, &gof| *u *= -gof);

    // g/f dη/dx, gradient on u points
    let pm_u = half_interp(metrics.p_m.slice(s![.., 1..]), metrics.p_m.slice(s![.., ..-1]));
    let mut grad_u = &zeta.slice(s![.., 1..]) - &zeta.slice(s![.., ..-1]);
    grad_u *= &pm_u;
    let mut v_pad = u_to_rho(grad_u.view())?;
    Zip::from(&mut v_pad)
        .and(&metrics.gof)
        .for_each(|v, &gof| *v *= gof);

    let u_valid = v_mask_to_rho(masks.v.view())?;
    let v_valid = u_mask_to_rho(masks.u.view())?;

    let u_core = unpad.apply(u_pad.view()).to_owned();
    let v_core = unpad.apply(v_pad.view()).to_owned();
    let u_valid = unpad.apply(u_valid.view()).to_owned();
    let v_valid = unpad.apply(v_valid.view()).to_owned();
    let rho_valid = unpad.apply(masks.rho.view()).to_owned();

    let eke = Zip::from(&u_core)
        .and(&v_core)
        .map_collect(|&u, &v| 0.5 * (u * u + v * v));
    let uspd = Zip::from(&u_core)
        .and(&v_core)
        .map_collect(|&u, &v| (u * u + v * v).sqrt());

    Ok(VelocityField {
        u: MaskedField::new(u_core, u_valid)?,
        v: MaskedField::new(v_core, v_valid)?,
        eke: MaskedField::new(eke, rho_valid.clone())?,
        uspd: MaskedField::new(uspd, rho_valid)?,
        u_pad,
        v_pad,
    })
}
