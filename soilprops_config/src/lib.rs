#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Engine configuration for the soil property resolution engine.
//!
//! `EngineCfg` is deserialized from TOML and validated before use. The
//! defaults reproduce the published reference behavior of the underlying
//! pedophysical models; tightening knobs such as `fit_r2_min` makes the
//! engine stricter than the reference.

use serde::Deserialize;

/// Tunables of the property resolution engine.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineCfg {
    /// Decimal places for predicted values.
    pub roundn: u32,
    /// Ratio by which fitted routes extend the calibration value range.
    pub range_ratio: f64,
    /// Minimum R² for a fitted route to publish its predictions.
    /// Zero accepts every fit.
    pub fit_r2_min: f64,
    /// Calibration states required before a Wunderlich fit is attempted.
    pub min_fit_points: usize,
    /// Absolute tolerance for degenerate-range and array-similarity checks.
    pub similarity_tol: f64,
    /// Integration step of the Wunderlich relaxation loops.
    pub relax_step: f64,
    /// Early-exit increment tolerance for the relaxation loops; 0 disables.
    pub relax_tol: f64,
    /// Iteration cap of the scalar minimizer.
    pub opt_max_iter: usize,
    /// Interval tolerance of the scalar minimizer.
    pub opt_tol: f64,
    /// Coordinate-descent sweeps for two-parameter fits.
    pub pair_sweeps: usize,
    /// Upper bound on resolution passes over the property graph.
    pub max_passes: usize,
    /// Depolarization factor override; fitted from calibration data when absent.
    pub lw: Option<f64>,
    /// Mixing-model alpha exponent override; model defaults apply when absent.
    pub alpha: Option<f64>,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            roundn: 3,
            range_ratio: 2.0,
            fit_r2_min: 0.0,
            min_fit_points: 3,
            similarity_tol: 1e-3,
            relax_step: 0.01,
            relax_tol: 0.0,
            opt_max_iter: 100,
            opt_tol: 1e-8,
            pair_sweeps: 8,
            max_passes: 4,
            lw: None,
            alpha: None,
        }
    }
}

impl EngineCfg {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> eyre::Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a TOML file and validate.
    pub fn load(path: &std::path::Path) -> eyre::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("read engine config {:?}: {}", path, e))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if self.roundn > 12 {
            eyre::bail!("roundn must be <= 12");
        }
        if !self.range_ratio.is_finite() || self.range_ratio <= 0.0 {
            eyre::bail!("range_ratio must be > 0");
        }
        if !self.fit_r2_min.is_finite() || !(0.0..=1.0).contains(&self.fit_r2_min) {
            eyre::bail!("fit_r2_min must be in [0.0, 1.0]");
        }
        if self.min_fit_points < 2 {
            eyre::bail!("min_fit_points must be >= 2");
        }
        if !self.similarity_tol.is_finite() || self.similarity_tol < 0.0 {
            eyre::bail!("similarity_tol must be >= 0");
        }
        if !self.relax_step.is_finite() || self.relax_step <= 0.0 || self.relax_step > 1.0 {
            eyre::bail!("relax_step must be in (0.0, 1.0]");
        }
        if !self.relax_tol.is_finite() || self.relax_tol < 0.0 {
            eyre::bail!("relax_tol must be >= 0");
        }
        if self.opt_max_iter == 0 {
            eyre::bail!("opt_max_iter must be >= 1");
        }
        if !self.opt_tol.is_finite() || self.opt_tol <= 0.0 {
            eyre::bail!("opt_tol must be > 0");
        }
        if self.pair_sweeps == 0 {
            eyre::bail!("pair_sweeps must be >= 1");
        }
        if self.max_passes == 0 {
            eyre::bail!("max_passes must be >= 1");
        }
        if let Some(lw) = self.lw {
            if !lw.is_finite() || !(-0.2..=0.8).contains(&lw) {
                eyre::bail!("lw must be in [-0.2, 0.8]");
            }
        }
        if let Some(alpha) = self.alpha {
            if !alpha.is_finite() || alpha == 0.0 {
                eyre::bail!("alpha must be finite and nonzero");
            }
        }
        Ok(())
    }
}
