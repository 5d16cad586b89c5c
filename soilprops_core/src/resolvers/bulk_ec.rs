use crate::advisory::{AdvisoryKind, Report};
use crate::error::Result;
use crate::optimize::minimize_scalar;
use crate::resolvers::temperature::STANDARD_TEMPERATURE;
use crate::resolvers::{extended_range, relax, resolve_lw, round_to};
use crate::soil::{Method, Property, Provenance, Soil};
use crate::stats::{finite_range, is_degenerate_range, r2_score};
use soilprops_config::EngineCfg;
use soilprops_models::{fu, longmire_smith_ec, sheets_hendrickx, wunderlich_ec};

/// Below this measurement frequency [Hz] bulk EC is treated as direct
/// current.
const DC_FREQUENCY_MAX: f64 = 5.0;

/// Bulk electrical conductivity across its three linked domains.
///
/// All prediction happens in the DC, temperature-corrected domain; the other
/// two are reached by conversion. States whose temperature and frequency
/// already sit at the reference values are plain copies.
pub fn bulk_ec(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) -> Result<()> {
    conversion(soil);
    shift_to_dc_tc(soil, cfg, report);

    let calibrated = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::Water, i)
                && soil.is_resolved(Property::BulkEcDcTc, i)
        })
        .count();
    let missing_dc_tc = (0..soil.len()).any(|i| {
        soil.is_resolved(Property::Water, i) && !soil.is_resolved(Property::BulkEcDcTc, i)
    });
    if missing_dc_tc && calibrated >= cfg.min_fit_points {
        fitting(soil, cfg, report);
    }
    if (0..soil.len()).any(|i| {
        soil.is_resolved(Property::Water, i) && !soil.is_resolved(Property::BulkEcDcTc, i)
    }) {
        non_fitting(soil, cfg, report);
    }

    tc_to_non_tc(soil, cfg, report);
    dc_to_non_dc(soil, cfg);
    Ok(())
}

/// Copy between domains where the state makes them equal.
fn conversion(soil: &mut Soil) {
    for i in 0..soil.len() {
        let t = soil.value(Property::Temperature, i);
        let fec = soil.value(Property::FrequencyEc, i);
        if t == STANDARD_TEMPERATURE
            && fec <= DC_FREQUENCY_MAX
            && soil.is_resolved(Property::BulkEcDcTc, i)
        {
            let v = soil.value(Property::BulkEcDcTc, i);
            soil.fill(Property::BulkEc, i, v, Provenance::Predicted(Method::DomainShift));
        }
        if fec <= DC_FREQUENCY_MAX && soil.is_resolved(Property::BulkEcDc, i) {
            let v = soil.value(Property::BulkEcDc, i);
            soil.fill(Property::BulkEc, i, v, Provenance::Predicted(Method::DomainShift));
        }
    }
}

/// Move measured bulk EC into the DC, temperature-corrected domain.
fn shift_to_dc_tc(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    // Measurement frequency to DC.
    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkEcDc, i) || !soil.is_resolved(Property::BulkEc, i)
        {
            continue;
        }
        let ec = soil.value(Property::BulkEc, i);
        let fec = soil.value(Property::FrequencyEc, i);
        if fec <= DC_FREQUENCY_MAX {
            soil.fill(Property::BulkEcDc, i, ec, Provenance::Predicted(Method::DomainShift));
        } else {
            let res = minimize_scalar(
                |dc| (longmire_smith_ec(dc, fec) - ec).powi(2),
                0.0,
                1.0,
                cfg.opt_max_iter,
                cfg.opt_tol,
            );
            if !res.converged {
                report.push(Property::BulkEcDc, AdvisoryKind::NonConvergence);
            }
            if res.fx.is_nan() {
                continue;
            }
            soil.fill(
                Property::BulkEcDc,
                i,
                round_to(res.x, cfg.roundn + 2),
                Provenance::Predicted(Method::LongmireSmithEcInverse),
            );
        }
    }
    // DC to the 25 °C reference.
    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkEcDcTc, i)
            || !soil.is_resolved(Property::BulkEcDc, i)
        {
            continue;
        }
        let dc = soil.value(Property::BulkEcDc, i);
        let t = soil.value(Property::Temperature, i);
        if t == STANDARD_TEMPERATURE {
            soil.fill(Property::BulkEcDcTc, i, dc, Provenance::Predicted(Method::DomainShift));
        } else {
            soil.fill(
                Property::BulkEcDcTc,
                i,
                sheets_hendrickx(dc, t),
                Provenance::Predicted(Method::SheetsHendrickx),
            );
        }
    }
}

/// Wunderlich relaxation calibrated on the co-measured states, applied to
/// water contents inside the extended calibration range.
fn fitting(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    let valids: Vec<usize> = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::Water, i)
                && soil.is_resolved(Property::BulkEcDcTc, i)
        })
        .collect();
    let waters: Vec<f64> = valids
        .iter()
        .map(|&i| soil.value(Property::Water, i))
        .collect();
    let ecs: Vec<f64> = valids
        .iter()
        .map(|&i| soil.value(Property::BulkEcDcTc, i))
        .collect();

    if is_degenerate_range(&waters, cfg.similarity_tol) {
        report.push(Property::BulkEcDcTc, AdvisoryKind::DegenerateRange);
        return;
    }
    let Some((wat_init, wat_max)) = finite_range(&waters) else {
        return;
    };
    let Some((ec_init, _)) = finite_range(&ecs) else {
        return;
    };
    let (lo, hi) = extended_range(wat_init, wat_max, cfg);
    let rx = relax(cfg);

    let water_ecs: Vec<f64> = valids
        .iter()
        .map(|&i| soil.value(Property::WaterEc, i))
        .collect();
    let model = |k: usize, lw: f64| {
        wunderlich_ec(waters[k], ec_init, wat_init, water_ecs[k], lw, rx)
    };
    let (lw, converged) = resolve_lw(soil, cfg, |lw| {
        crate::resolvers::nan_rmse(
            (0..valids.len()).map(|k| model(k, lw) - ecs[k]),
        )
    });
    if !converged {
        report.push(Property::BulkEcDcTc, AdvisoryKind::NonConvergence);
    }

    let predicted: Vec<f64> = (0..valids.len()).map(|k| model(k, lw)).collect();
    let r2 = r2_score(&ecs, &predicted);
    tracing::debug!(r2, lw, "wunderlich ec calibration");
    if r2.is_nan() || r2 < cfg.fit_r2_min {
        report.push(
            Property::BulkEcDcTc,
            AdvisoryKind::FitRejected { r2, min: cfg.fit_r2_min },
        );
        return;
    }

    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkEcDcTc, i)
            || !soil.is_resolved(Property::Water, i)
            || !soil.is_resolved(Property::WaterEc, i)
        {
            continue;
        }
        let water = soil.value(Property::Water, i);
        if !(lo..=hi).contains(&water) {
            continue;
        }
        let water_ec = soil.value(Property::WaterEc, i);
        let v = wunderlich_ec(water, ec_init, wat_init, water_ec, lw, rx);
        soil.fill(
            Property::BulkEcDcTc,
            i,
            round_to(v, cfg.roundn + 3),
            Provenance::Predicted(Method::WunderlichEc),
        );
    }
}

/// Fu forward route for states with known water content.
fn non_fitting(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkEcDcTc, i)
            || !soil.is_resolved(Property::Water, i)
        {
            continue;
        }
        let required = [
            Property::Clay,
            Property::BulkDensity,
            Property::ParticleDensity,
            Property::WaterEc,
            Property::SolidEc,
        ];
        if let Some(&input) = required.iter().find(|&&p| !soil.is_resolved(p, i)) {
            report.push(Property::BulkEcDcTc, AdvisoryKind::MissingInput { input });
            continue;
        }
        let v = fu(
            soil.value(Property::Water, i),
            soil.value(Property::Clay, i),
            soil.value(Property::BulkDensity, i),
            soil.value(Property::ParticleDensity, i),
            soil.value(Property::WaterEc, i),
            soil.value(Property::SolidEc, i),
            soil.value(Property::DryEc, i),
            soil.value(Property::SatEc, i),
        );
        soil.fill(
            Property::BulkEcDcTc,
            i,
            round_to(v, cfg.roundn + 3),
            Provenance::Predicted(Method::Fu),
        );
    }
}

/// Undo the 25 °C correction at each state's own temperature.
fn tc_to_non_tc(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkEcDc, i)
            || !soil.is_resolved(Property::BulkEcDcTc, i)
        {
            continue;
        }
        let dc_tc = soil.value(Property::BulkEcDcTc, i);
        let t = soil.value(Property::Temperature, i);
        let res = minimize_scalar(
            |dc| (sheets_hendrickx(dc, t) - dc_tc).powi(2),
            0.0,
            1.0,
            cfg.opt_max_iter,
            cfg.opt_tol,
        );
        if !res.converged {
            report.push(Property::BulkEcDc, AdvisoryKind::NonConvergence);
        }
        if res.fx.is_nan() {
            continue;
        }
        soil.fill(
            Property::BulkEcDc,
            i,
            round_to(res.x, cfg.roundn + 3),
            Provenance::Predicted(Method::SheetsHendrickxInverse),
        );
    }
}

/// Shift DC predictions up to the measurement frequency.
fn dc_to_non_dc(soil: &mut Soil, cfg: &EngineCfg) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::BulkEc, i)
            || !soil.is_resolved(Property::BulkEcDc, i)
        {
            continue;
        }
        let fec = soil.value(Property::FrequencyEc, i);
        let dc = soil.value(Property::BulkEcDc, i);
        if fec <= DC_FREQUENCY_MAX {
            soil.fill(Property::BulkEc, i, dc, Provenance::Predicted(Method::DomainShift));
        } else {
            soil.fill(
                Property::BulkEc,
                i,
                round_to(longmire_smith_ec(dc, fec), cfg.roundn + 3),
                Provenance::Predicted(Method::LongmireSmithEc),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilBuilder;

    fn prepared(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
        crate::resolvers::temperature(soil, cfg, report).unwrap();
        crate::resolvers::particle_density(soil, cfg, report).unwrap();
        crate::resolvers::solid_ec(soil, cfg, report).unwrap();
        crate::resolvers::frequency_ec(soil, cfg, report).unwrap();
        crate::resolvers::water_ec(soil, cfg, report).unwrap();
    }

    #[test]
    fn dc_measurement_at_reference_temperature_propagates_by_copy() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::BulkEc, 0.05)
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        assert_eq!(soil.value(Property::BulkEcDc, 0), 0.05);
        assert_eq!(soil.value(Property::BulkEcDcTc, 0), 0.05);
        assert_eq!(
            soil.provenance(Property::BulkEcDc)[0],
            Provenance::Predicted(Method::DomainShift)
        );
    }

    #[test]
    fn emi_measurement_is_shifted_down_to_dc() {
        let cfg = EngineCfg::default();
        let dc_true = 0.04;
        let measured = longmire_smith_ec(dc_true, 9e3);
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::BulkEc, measured)
            .with_instrument("EMI Dualem")
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        let dc = soil.value(Property::BulkEcDc, 0);
        assert!((dc - dc_true).abs() < 1e-3, "bulk_ec_dc {dc}");
        assert_eq!(
            soil.provenance(Property::BulkEcDc)[0],
            Provenance::Predicted(Method::LongmireSmithEcInverse)
        );
    }

    #[test]
    fn warm_states_are_corrected_to_25_c() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::BulkEc, 0.05)
            .with_scalar(Property::Temperature, 308.15)
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        let dc_tc = soil.value(Property::BulkEcDcTc, 0);
        assert!((dc_tc - sheets_hendrickx(0.05, 308.15)).abs() < 1e-12);
        assert!(dc_tc < 0.05);
    }

    #[test]
    fn fu_route_predicts_from_water_content() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with(Property::Water, vec![0.1, 0.2, 0.3])
            .with_scalar(Property::Clay, 25.0)
            .with_scalar(Property::BulkDensity, 1.35)
            .with_scalar(Property::WaterEc, 0.4)
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        let ecs = soil.get(Property::BulkEc).to_vec();
        assert!(ecs.iter().all(|v| v.is_finite()));
        assert!(ecs[0] < ecs[1] && ecs[1] < ecs[2]);
        assert_eq!(
            soil.provenance(Property::BulkEcDcTc)[0],
            Provenance::Predicted(Method::Fu)
        );
    }

    #[test]
    fn missing_bulk_density_blocks_fu_with_an_advisory() {
        let cfg = EngineCfg::default();
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::Water, 0.2)
            .with_scalar(Property::Clay, 25.0)
            .with_scalar(Property::WaterEc, 0.4)
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        assert!(!soil.is_resolved(Property::BulkEc, 0));
        assert!(report.advisories_for(Property::BulkEcDcTc).any(|a| {
            a.kind
                == AdvisoryKind::MissingInput {
                    input: Property::BulkDensity,
                }
        }));
    }

    #[test]
    fn calibrated_states_switch_to_the_wunderlich_route() {
        let cfg = EngineCfg::default();
        // Four calibration states and one to predict, conductivities built
        // with the same relaxation the fit uses.
        let waters = [0.10, 0.15, 0.20, 0.25, 0.18];
        let rx = soilprops_models::Relax { step: cfg.relax_step, tol: cfg.relax_tol };
        let mut ecs: Vec<f64> = waters
            .iter()
            .map(|&w| wunderlich_ec(w, 0.01, 0.10, 0.35, 0.2, rx))
            .collect();
        ecs[4] = f64::NAN;
        let mut soil = SoilBuilder::new()
            .with(Property::Water, waters.to_vec())
            .with(Property::BulkEc, ecs)
            .with(Property::WaterEc, vec![0.35])
            .build()
            .unwrap();
        let mut report = Report::default();
        prepared(&mut soil, &cfg, &mut report);
        bulk_ec(&mut soil, &cfg, &mut report).unwrap();
        assert_eq!(
            soil.provenance(Property::BulkEcDcTc)[4],
            Provenance::Predicted(Method::WunderlichEc)
        );
        let expected = wunderlich_ec(0.18, 0.01, 0.10, 0.35, 0.2, rx);
        let got = soil.value(Property::BulkEcDcTc, 4);
        assert!((got - expected).abs() < 5e-3, "bulk_ec_dc_tc {got}");
    }
}
