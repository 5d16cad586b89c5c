use crate::advisory::{AdvisoryKind, Report};
use crate::error::Result;
use crate::optimize::minimize_scalar;
use crate::resolvers::{extended_range, relax, resolve_lw, round_to};
use crate::soil::{Method, Property, Provenance, Soil};
use crate::stats::{finite_range, is_degenerate_range, r2_score};
use soilprops_config::EngineCfg;
use soilprops_models::{fu, longmire_smith_p, lr, lr_mv, lr_w, wunderlich_ec, wunderlich_p};

/// Physical ceiling for volumetric water content in the inversions.
const WATER_MAX: f64 = 0.65;

/// Volumetric water content from dielectric or conductivity data.
pub fn water(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) -> Result<()> {
    let wants_perm_route = (0..soil.len()).any(|i| {
        !soil.is_resolved(Property::Water, i) && soil.is_resolved(Property::BulkPerm, i)
    });
    if wants_perm_route {
        if (0..soil.len()).all(|i| !soil.is_resolved(Property::FrequencyPerm, i)) {
            report.push(Property::Water, AdvisoryKind::MissingFrequency);
        } else {
            from_perm(soil, cfg, report);
        }
    }
    if (0..soil.len()).any(|i| {
        !soil.is_resolved(Property::Water, i) && soil.is_resolved(Property::BulkEcDcTc, i)
    }) {
        from_ec(soil, cfg, report);
    }
    soil.clamp_non_negative(Property::Water);
    Ok(())
}

fn from_perm(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    let freqs: Vec<f64> = soil.get(Property::FrequencyPerm).to_vec();
    let fixed = freqs.iter().all(|&f| f == freqs[0]);
    if fixed {
        let calibrated = (0..soil.len())
            .filter(|&i| {
                soil.is_resolved(Property::Water, i)
                    && soil.is_resolved(Property::BulkPerm, i)
            })
            .count();
        if calibrated >= cfg.min_fit_points {
            fitting_inverse(soil, cfg, report);
        }
        non_fitting_fixed(soil, cfg, report, freqs[0]);
    } else {
        // Differing frequencies: recover the DC conductivity per state and
        // let the conductivity chain carry it to water on a later pass.
        for i in 0..soil.len() {
            if soil.is_resolved(Property::Water, i)
                || !soil.is_resolved(Property::BulkPerm, i)
                || freqs[i].is_nan()
            {
                continue;
            }
            invert_dispersion(soil, cfg, report, i, freqs[i]);
        }
    }
}

/// Longmire & Smith inversion of one state's permittivity to the DC
/// conductivity.
fn invert_dispersion(
    soil: &mut Soil,
    cfg: &EngineCfg,
    report: &mut Report,
    i: usize,
    frequency: f64,
) {
    if soil.is_resolved(Property::BulkEcDc, i)
        || !soil.is_resolved(Property::BulkPermInf, i)
    {
        return;
    }
    let perm = soil.value(Property::BulkPerm, i);
    let perm_inf = soil.value(Property::BulkPermInf, i);
    let res = minimize_scalar(
        |dc| (longmire_smith_p(dc, perm_inf, frequency) - perm).powi(2),
        1e-6,
        1.0,
        cfg.opt_max_iter,
        cfg.opt_tol,
    );
    if !res.converged {
        report.push(Property::BulkEcDc, AdvisoryKind::NonConvergence);
    }
    if res.fx.is_nan() {
        return;
    }
    soil.fill(
        Property::BulkEcDc,
        i,
        round_to(res.x, cfg.roundn + 2),
        Provenance::Predicted(Method::LongmireSmithPInverse),
    );
}

fn non_fitting_fixed(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report, f0: f64) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::Water, i) || !soil.is_resolved(Property::BulkPerm, i)
        {
            continue;
        }
        if (5.0..30e6).contains(&f0) {
            invert_dispersion(soil, cfg, report, i, f0);
            continue;
        }
        if !(30e6..=30e9).contains(&f0) {
            continue;
        }
        let required = [
            Property::BulkDensity,
            Property::ParticleDensity,
            Property::AirPerm,
            Property::SolidPerm,
            Property::WaterPerm,
        ];
        if let Some(&input) = required.iter().find(|&&p| !soil.is_resolved(p, i)) {
            report.push(Property::Water, AdvisoryKind::MissingInput { input });
            continue;
        }
        let perm = soil.value(Property::BulkPerm, i);
        let bd = soil.value(Property::BulkDensity, i);
        let pd = soil.value(Property::ParticleDensity, i);
        let ap = soil.value(Property::AirPerm, i);
        let sp = soil.value(Property::SolidPerm, i);
        let wp = soil.value(Property::WaterPerm, i);

        let (value, method) = if f0 < 100e6 {
            if !soil.is_resolved(Property::Cec, i) {
                report.push(
                    Property::Water,
                    AdvisoryKind::MissingInput { input: Property::Cec },
                );
                continue;
            }
            let cec = soil.value(Property::Cec, i);
            (lr_mv(perm, bd, pd, ap, sp, wp, cec), Method::LrMv)
        } else if f0 < 200e6 {
            let alpha = cfg.alpha.unwrap_or(0.5);
            (lr(perm, bd, pd, ap, sp, wp, alpha), Method::Lr)
        } else {
            if !soil.is_resolved(Property::Clay, i) {
                report.push(
                    Property::Water,
                    AdvisoryKind::MissingInput { input: Property::Clay },
                );
                continue;
            }
            let clay = soil.value(Property::Clay, i);
            (lr_w(perm, bd, pd, ap, sp, wp, clay), Method::LrW)
        };
        soil.fill(
            Property::Water,
            i,
            round_to(value, cfg.roundn),
            Provenance::Predicted(method),
        );
    }
}

/// Invert a Wunderlich permittivity relaxation calibrated on the
/// co-measured states, for permittivities inside the extended calibration
/// range.
fn fitting_inverse(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
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

    if is_degenerate_range(&perms, cfg.similarity_tol) {
        report.push(Property::Water, AdvisoryKind::DegenerateRange);
        return;
    }
    let Some((wat_init, _)) = finite_range(&waters) else {
        return;
    };
    let Some((perm_init, perm_max)) = finite_range(&perms) else {
        return;
    };
    let (lo, hi) = extended_range(perm_init, perm_max, cfg);
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
        report.push(Property::Water, AdvisoryKind::NonConvergence);
    }

    let predicted: Vec<f64> = (0..valids.len()).map(|k| model(k, lw)).collect();
    let r2 = r2_score(&perms, &predicted);
    tracing::debug!(r2, lw, "wunderlich perm inversion calibration");
    if r2.is_nan() || r2 < cfg.fit_r2_min {
        report.push(
            Property::Water,
            AdvisoryKind::FitRejected { r2, min: cfg.fit_r2_min },
        );
        return;
    }

    for i in 0..soil.len() {
        if soil.is_resolved(Property::Water, i)
            || !soil.is_resolved(Property::BulkPerm, i)
            || !soil.is_resolved(Property::WaterPerm, i)
        {
            continue;
        }
        let perm = soil.value(Property::BulkPerm, i);
        if !(lo..=hi).contains(&perm) {
            continue;
        }
        let wp = soil.value(Property::WaterPerm, i);
        let res = minimize_scalar(
            |w| (wunderlich_p(w, perm_init, wat_init, wp, lw, rx) - perm).powi(2),
            0.0,
            WATER_MAX,
            cfg.opt_max_iter,
            cfg.opt_tol,
        );
        if res.fx.is_nan() {
            continue;
        }
        soil.fill(
            Property::Water,
            i,
            round_to(res.x, cfg.roundn),
            Provenance::Predicted(Method::WunderlichPInverse),
        );
    }
}

fn from_ec(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    let calibrated = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::Water, i)
                && soil.is_resolved(Property::BulkEcDcTc, i)
        })
        .count();
    if calibrated >= cfg.min_fit_points {
        fitting_ec_inverse(soil, cfg, report);
    }
    non_fitting_ec(soil, cfg, report);
}

/// Invert a Wunderlich conductivity relaxation calibrated on the
/// co-measured states.
fn fitting_ec_inverse(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
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

    if is_degenerate_range(&ecs, cfg.similarity_tol) {
        report.push(Property::Water, AdvisoryKind::DegenerateRange);
        return;
    }
    let Some((wat_init, _)) = finite_range(&waters) else {
        return;
    };
    let Some((ec_init, ec_max)) = finite_range(&ecs) else {
        return;
    };
    let (lo, hi) = extended_range(ec_init, ec_max, cfg);
    let rx = relax(cfg);

    let water_ecs: Vec<f64> = valids
        .iter()
        .map(|&i| soil.value(Property::WaterEc, i))
        .collect();
    let model = |k: usize, lw: f64| {
        wunderlich_ec(waters[k], ec_init, wat_init, water_ecs[k], lw, rx)
    };
    let (lw, converged) = resolve_lw(soil, cfg, |lw| {
        crate::resolvers::nan_rmse((0..valids.len()).map(|k| model(k, lw) - ecs[k]))
    });
    if !converged {
        report.push(Property::Water, AdvisoryKind::NonConvergence);
    }

    let predicted: Vec<f64> = (0..valids.len()).map(|k| model(k, lw)).collect();
    let r2 = r2_score(&ecs, &predicted);
    tracing::debug!(r2, lw, "wunderlich ec inversion calibration");
    if r2.is_nan() || r2 < cfg.fit_r2_min {
        report.push(
            Property::Water,
            AdvisoryKind::FitRejected { r2, min: cfg.fit_r2_min },
        );
        return;
    }

    for i in 0..soil.len() {
        if soil.is_resolved(Property::Water, i)
            || !soil.is_resolved(Property::BulkEcDcTc, i)
            || !soil.is_resolved(Property::WaterEc, i)
        {
            continue;
        }
        let ec = soil.value(Property::BulkEcDcTc, i);
        if !(lo..=hi).contains(&ec) {
            continue;
        }
        let wec = soil.value(Property::WaterEc, i);
        let res = minimize_scalar(
            |w| (wunderlich_ec(w, ec_init, wat_init, wec, lw, rx) - ec).powi(2),
            0.0,
            WATER_MAX,
            cfg.opt_max_iter,
            cfg.opt_tol,
        );
        if res.fx.is_nan() {
            continue;
        }
        soil.fill(
            Property::Water,
            i,
            round_to(res.x, cfg.roundn),
            Provenance::Predicted(Method::WunderlichEcInverse),
        );
    }
}

/// Fu inversion per state.
fn non_fitting_ec(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::Water, i)
            || !soil.is_resolved(Property::BulkEcDcTc, i)
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
            report.push(Property::Water, AdvisoryKind::MissingInput { input });
            continue;
        }
        let target = soil.value(Property::BulkEcDcTc, i);
        let clay = soil.value(Property::Clay, i);
        let bd = soil.value(Property::BulkDensity, i);
        let pd = soil.value(Property::ParticleDensity, i);
        let wec = soil.value(Property::WaterEc, i);
        let solid_ec = soil.value(Property::SolidEc, i);
        let dry_ec = soil.value(Property::DryEc, i);
        let sat_ec = soil.value(Property::SatEc, i);

        let res = minimize_scalar(
            |w| (fu(w, clay, bd, pd, wec, solid_ec, dry_ec, sat_ec) - target).powi(2),
            0.0,
            WATER_MAX,
            cfg.opt_max_iter,
            cfg.opt_tol,
        );
        if !res.converged {
            report.push(Property::Water, AdvisoryKind::NonConvergence);
        }
        if res.fx.is_nan() {
            continue;
        }
        soil.fill(
            Property::Water,
            i,
            round_to(res.x, cfg.roundn),
            Provenance::Predicted(Method::FuInverse),
        );
    }
}
