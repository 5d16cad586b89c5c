//! Per-property resolvers.
//!
//! Every resolver shares the same shape: skip states that already carry a
//! value, pick a route from what else is resolved (fitting with an R² gate
//! when enough calibration states exist, closed-form or domain-conversion
//! otherwise), write predictions through [`Soil::fill`] and report anything
//! it could not do as an advisory. Resolvers never overwrite and never fail
//! on missing data; only malformed configuration is an error.

use crate::soil::Soil;
use soilprops_config::EngineCfg;
use soilprops_models::Relax;

mod bulk_ec;
mod bulk_perm;
mod defaults;
mod frequency;
mod particle_density;
mod salinity;
mod temperature;
mod texture;
mod water;
mod water_ec;
mod water_perm;

pub use bulk_ec::bulk_ec;
pub use bulk_perm::bulk_perm;
pub use defaults::{air_perm, bulk_perm_inf, solid_ec, solid_perm};
pub use frequency::{frequency_ec, frequency_perm};
pub use particle_density::particle_density;
pub use salinity::salinity;
pub use temperature::temperature;
pub use texture::texture;
pub use water::water;
pub use water_ec::water_ec;
pub use water_perm::water_perm;

/// Round to `n` decimal places, reference style.
pub(crate) fn round_to(value: f64, n: u32) -> f64 {
    let scale = 10f64.powi(n as i32);
    (value * scale).round() / scale
}

pub(crate) fn relax(cfg: &EngineCfg) -> Relax {
    Relax {
        step: cfg.relax_step,
        tol: cfg.relax_tol,
    }
}

/// Calibration interval extended on both sides by `1 / range_ratio` of its
/// width, floored at zero.
pub(crate) fn extended_range(lo: f64, hi: f64, cfg: &EngineCfg) -> (f64, f64) {
    let pad = (hi - lo) / cfg.range_ratio;
    let a = round_to(lo - pad, cfg.roundn).max(0.0);
    let b = round_to(hi + pad, cfg.roundn);
    (a, b)
}

/// Depolarization factor for the Wunderlich fits: configuration override,
/// then a previously fitted value, then a bounded RMSE fit.
pub(crate) fn resolve_lw<F>(
    soil: &mut Soil,
    cfg: &EngineCfg,
    rmse: F,
) -> (f64, bool)
where
    F: Fn(f64) -> f64,
{
    if let Some(lw) = cfg.lw {
        return (lw, true);
    }
    if let Some(lw) = soil.lw {
        return (lw, true);
    }
    let res = crate::optimize::minimize_scalar(
        rmse,
        -0.2,
        0.8,
        cfg.opt_max_iter,
        cfg.opt_tol,
    );
    soil.lw = Some(res.x);
    (res.x, res.converged)
}

/// Root mean squared error over the finite entries of `errors`.
pub(crate) fn nan_rmse(errors: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for e in errors {
        if e.is_finite() {
            sum += e * e;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        (sum / count as f64).sqrt()
    }
}
