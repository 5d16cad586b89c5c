use crate::advisory::{AdvisoryKind, Report};
use crate::error::Result;
use crate::resolvers::{extended_range, relax, resolve_lw, round_to};
use crate::soil::{Method, Property, Provenance, Soil};
use crate::stats::{finite_range, is_degenerate_range, r2_score};
use soilprops_config::EngineCfg;
use soilprops_models::{longmire_smith_p, roth_crim, roth_mv, roth_w, wunderlich_p};

/// Bulk permittivity at the measurement frequency.
///
/// With a single measurement frequency the route is picked per frequency
/// band: Longmire & Smith dispersion below 30 MHz, then the three Roth
/// mixing variants up to 14 GHz. Calibrated states switch to a fitted
/// Wunderlich relaxation first. States measured at differing frequencies
/// fall back to the dispersion model per state.
pub fn bulk_perm(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) -> Result<()> {
    if (0..soil.len()).all(|i| soil.is_resolved(Property::BulkPerm, i)) {
        return Ok(());
    }
    let freqs: Vec<f64> = soil.get(Property::FrequencyPerm).to_vec();
    if freqs.iter().all(|f| f.is_nan()) {
        return Ok(());
    }

    let fixed = freqs.iter().all(|&f| f == freqs[0]);
    if fixed {
        let calibrated = (0..soil.len())
            .filter(|&i| {
                soil.is_resolved(Property::Water, i)
                    && soil.is_resolved(Property::BulkPerm, i)
            })
            .count();
        if calibrated >= cfg.min_fit_points {
            fitting(soil, cfg, report);
        }
        non_fitting_fixed(soil, cfg, report, freqs[0]);
    } else {
        for i in 0..soil.len() {
            if soil.is_resolved(Property::BulkPerm, i) || freqs[i].is_nan() {
                continue;
            }
            fill_dispersion(soil, cfg, i, freqs[i]);
        }
    }
    Ok(())
}

/// Longmire & Smith permittivity from the DC conductivity.
fn fill_dispersion(soil: &mut Soil, cfg: &EngineCfg, i: usize, frequency: f64) {
    if !soil.is_resolved(Property::BulkEcDc, i)
        || !soil.is_resolved(Property::BulkPermInf, i)
    {
        return;
    }
    let dc = soil.value(Property::BulkEcDc, i);
    let perm_inf = soil.value(Property::BulkPermInf, i);
    soil.fill(
        Property::BulkPerm,
        i,
        round_to(longmire_smith_p(dc, perm_inf, frequency), cfg.roundn),
        Provenance::Predicted(Method::LongmireSmithP),
    );
}

fn non_fitting_fixed(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report, f0: f64) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkPerm, i) {
            continue;
        }
        if (100.0..30e6).contains(&f0) {
            fill_dispersion(soil, cfg, i, f0);
            continue;
        }
        if !(30e6..=14e9).contains(&f0) {
            continue;
        }
        let required = [
            Property::Water,
            Property::BulkDensity,
            Property::ParticleDensity,
            Property::AirPerm,
            Property::SolidPerm,
            Property::WaterPerm,
        ];
        if let Some(&input) = required.iter().find(|&&p| !soil.is_resolved(p, i)) {
            report.push(Property::BulkPerm, AdvisoryKind::MissingInput { input });
            continue;
        }
        let water = soil.value(Property::Water, i);
        let bd = soil.value(Property::BulkDensity, i);
        let pd = soil.value(Property::ParticleDensity, i);
        let ap = soil.value(Property::AirPerm, i);
        let sp = soil.value(Property::SolidPerm, i);
        let wp = soil.value(Property::WaterPerm, i);

        let (value, method) = if f0 < 100e6 {
            if !soil.is_resolved(Property::Cec, i) {
                report.push(
                    Property::BulkPerm,
                    AdvisoryKind::MissingInput { input: Property::Cec },
                );
                continue;
            }
            let cec = soil.value(Property::Cec, i);
            (roth_mv(water, bd, pd, ap, sp, wp, cec), Method::RothMv)
        } else if f0 < 200e6 {
            let alpha = cfg.alpha.unwrap_or(0.5);
            (roth_crim(water, bd, pd, ap, sp, wp, alpha), Method::RothCrim)
        } else {
            if !soil.is_resolved(Property::Clay, i) {
                report.push(
                    Property::BulkPerm,
                    AdvisoryKind::MissingInput { input: Property::Clay },
                );
                continue;
            }
            let clay = soil.value(Property::Clay, i);
            (roth_w(water, bd, pd, ap, sp, wp, clay), Method::RothW)
        };
        soil.fill(
            Property::BulkPerm,
            i,
            round_to(value, cfg.roundn),
            Provenance::Predicted(method),
        );
    }
}

/// Wunderlich relaxation calibrated on the co-measured (water, permittivity)
/// states.
fn fitting(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    let valids: Vec<usize> = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::Water, i) && soil.is_resolved(Property::BulkPerm, i)
        })
        .collect();
    let waters: Vec<f64> = valids
        .iter()
        .map(|&i| soil.value(Property::Water, i))
        .collect();
    let perms: Vec<f64> = valids
        .iter()
        .map(|&i| soil.value(Property::BulkPerm, i))
        .collect();

    if is_degenerate_range(&waters, cfg.similarity_tol) {
        report.push(Property::BulkPerm, AdvisoryKind::DegenerateRange);
        return;
    }
    let Some((wat_init, wat_max)) = finite_range(&waters) else {
        return;
    };
    let Some((perm_init, _)) = finite_range(&perms) else {
        return;
    };
    let (lo, hi) = extended_range(wat_init, wat_max, cfg);
    let rx = relax(cfg);

    let water_perms: Vec<f64> = valids
        .iter()
        .map(|&i| soil.value(Property::WaterPerm, i))
        .collect();
    let model = |k: usize, lw: f64| {
        wunderlich_p(waters[k], perm_init, wat_init, water_perms[k], lw, rx)
    };
    let (lw, converged) = resolve_lw(soil, cfg, |lw| {
        crate::resolvers::nan_rmse((0..valids.len()).map(|k| model(k, lw) - perms[k]))
    });
    if !converged {
        report.push(Property::BulkPerm, AdvisoryKind::NonConvergence);
    }

    let predicted: Vec<f64> = (0..valids.len()).map(|k| model(k, lw)).collect();
    let r2 = r2_score(&perms, &predicted);
    tracing::debug!(r2, lw, "wunderlich perm calibration");
    if r2.is_nan() || r2 < cfg.fit_r2_min {
        report.push(
            Property::BulkPerm,
            AdvisoryKind::FitRejected { r2, min: cfg.fit_r2_min },
        );
        return;
    }

    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkPerm, i)
            || !soil.is_resolved(Property::Water, i)
            || !soil.is_resolved(Property::WaterPerm, i)
        {
            continue;
        }
        let water = soil.value(Property::Water, i);
        if !(lo..=hi).contains(&water) {
            continue;
        }
        let wp = soil.value(Property::WaterPerm, i);
        let v = wunderlich_p(water, perm_init, wat_init, wp, lw, rx);
        soil.fill(
            Property::BulkPerm,
            i,
            round_to(v, cfg.roundn),
            Provenance::Predicted(Method::WunderlichP),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilBuilder;

    fn prepared(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
        crate::resolvers::temperature(soil, cfg, report).unwrap();
        crate::resolvers::particle_density(soil, cfg, report).unwrap();
        crate::resolvers::air_perm(soil, cfg, report).unwrap();
        crate::resolvers::solid_perm(soil, cfg, report).unwrap();
        crate::resolvers::solid_ec(soil, cfg, report).unwrap();
        crate::resolvers::bulk_perm_inf(soil, cfg, report).unwrap();
        crate::resolvers::frequency_ec(soil, cfg, report).unwrap();
        crate::resolvers::frequency_perm(soil, cfg, report).unwrap();
        crate::resolvers::water_perm(soil, cfg, report).unwrap();
    }

    #[test]
    fn tdr_band_uses_roth_with_clay() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with(Property::Water, vec![0.1, 0.3])
            .with_scalar(Property::Clay, 25.0)
            .with_scalar(Property::BulkDensity, 1.4)
            .with_instrument("TDR")
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_perm(&mut soil, &cfg, &mut report).unwrap();
        let perms = soil.get(Property::BulkPerm).to_vec();
        assert!(perms[0] < perms[1]);
        assert_eq!(
            soil.provenance(Property::BulkPerm)[0],
            Provenance::Predicted(Method::RothW)
        );
    }

    #[test]
    fn gpr_band_uses_roth_crim_with_default_alpha() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::Water, 0.2)
            .with_scalar(Property::BulkDensity, 1.4)
            .with_scalar(Property::FrequencyPerm, 150e6)
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_perm(&mut soil, &cfg, &mut report).unwrap();
        assert_eq!(
            soil.provenance(Property::BulkPerm)[0],
            Provenance::Predicted(Method::RothCrim)
        );
    }

    #[test]
    fn hydraprobe_band_needs_cec() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::Water, 0.2)
            .with_scalar(Property::BulkDensity, 1.4)
            .with_instrument("HydraProbe")
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_perm(&mut soil, &cfg, &mut report).unwrap();
        assert!(!soil.is_resolved(Property::BulkPerm, 0));
        assert!(report.advisories_for(Property::BulkPerm).any(|a| {
            a.kind == AdvisoryKind::MissingInput { input: Property::Cec }
        }));
    }

    #[test]
    fn low_frequency_band_uses_dispersion() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::BulkEc, 0.05)
            .with_scalar(Property::FrequencyPerm, 1e6)
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        crate::resolvers::water_ec(&mut soil, &cfg, &mut report).unwrap();
        crate::resolvers::bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        bulk_perm(&mut soil, &cfg, &mut report).unwrap();
        let perm = soil.value(Property::BulkPerm, 0);
        assert_eq!(
            soil.provenance(Property::BulkPerm)[0],
            Provenance::Predicted(Method::LongmireSmithP)
        );
        assert!(perm > 5.0, "bulk_perm {perm}");
    }

    #[test]
    fn changing_frequencies_fall_back_to_dispersion_per_state() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with(Property::BulkEc, vec![0.05, 0.05])
            .with(Property::FrequencyPerm, vec![1e6, 5e6])
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        crate::resolvers::water_ec(&mut soil, &cfg, &mut report).unwrap();
        crate::resolvers::bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        bulk_perm(&mut soil, &cfg, &mut report).unwrap();
        let perms = soil.get(Property::BulkPerm).to_vec();
        assert!(perms.iter().all(|v| v.is_finite()));
        // Dispersion falls with frequency.
        assert!(perms[0] > perms[1]);
    }

    #[test]
    fn calibrated_states_use_the_fitted_relaxation() {
        let cfg = EngineCfg::default();
        let rx = soilprops_models::Relax { step: cfg.relax_step, tol: cfg.relax_tol };
        let waters = [0.10, 0.15, 0.20, 0.25, 0.18];
        let mut perms: Vec<f64> = waters
            .iter()
            .map(|&w| wunderlich_p(w, 6.0, 0.10, 80.0, 0.1, rx))
            .collect();
        perms[4] = f64::NAN;
        let mut soil = SoilBuilder::new()
            .with(Property::Water, waters.to_vec())
            .with(Property::BulkPerm, perms)
            .with_instrument("TDR")
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_perm(&mut soil, &cfg, &mut report).unwrap();
        assert_eq!(
            soil.provenance(Property::BulkPerm)[4],
            Provenance::Predicted(Method::WunderlichP)
        );
        let expected = wunderlich_p(0.18, 6.0, 0.10, 80.0, 0.1, rx);
        let got = soil.value(Property::BulkPerm, 4);
        assert!((got - expected).abs() < 0.1, "bulk_perm {got}");
    }
}
