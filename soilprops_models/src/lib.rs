#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Pedophysical model library.
//!
//! Pure, stateless equations relating soil water content, electrical
//! conductivity and dielectric permittivity. Every function takes and returns
//! plain `f64` per soil state; callers decide vectorization, rounding and
//! missing-value handling. `NaN` inputs propagate to `NaN` outputs.
//!
//! Units follow the soil-physics conventions used throughout:
//! water content in m³/m³, conductivity in S/m, temperature in K,
//! frequency in Hz, texture fractions in percent, densities in g/cm³.

pub mod bulk_ec;
pub mod bulk_perm;
pub mod pedotransfer;
pub mod water;
pub mod water_ec;
pub mod water_perm;

pub use bulk_ec::{fu, longmire_smith_ec, rhoades, sheets_hendrickx, wunderlich_ec};
pub use bulk_perm::{
    hilhorst, longmire_smith_p, roth_crim, roth_mv, roth_w, wunderlich_p,
};
pub use pedotransfer::schjonnen;
pub use water::{lr, lr_mv, lr_w};
pub use water_ec::sen_goode;
pub use water_perm::{malmberg_maryott, olhoeft, stogryn};

/// Step control for the Wunderlich relaxation integrations.
///
/// The reference step of 0.01 reproduces published model outputs; `tol`
/// greater than zero stops the loop early once increments fall below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relax {
    pub step: f64,
    pub tol: f64,
}

impl Default for Relax {
    fn default() -> Self {
        Self { step: 0.01, tol: 0.0 }
    }
}
