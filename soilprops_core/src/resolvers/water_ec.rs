use crate::advisory::{AdvisoryKind, Report};
use crate::error::Result;
use crate::optimize::{minimize_pair, minimize_scalar};
use crate::resolvers::round_to;
use crate::soil::{Method, Property, Provenance, Soil};
use crate::stats::{is_degenerate_range, r2_score};
use soilprops_config::EngineCfg;
use soilprops_models::{fu, hilhorst, rhoades, sen_goode};

/// Rhoades shape constants used while the pore water EC is being fitted.
const RHOADES_E_INIT: f64 = 1.0;
const RHOADES_F_INIT: f64 = 0.38;

/// Pore water conductivity.
///
/// Non-fitting routes first: salinity gives it directly through Sen & Goode,
/// and a single state co-measured for water and bulk EC supports a Fu
/// inversion. With two or more co-measured states a soil-wide value is
/// fitted instead, against water content (Rhoades) or, failing that,
/// against bulk permittivity of at least 10 (Hilhorst).
pub fn water_ec(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) -> Result<()> {
    from_salinity(soil);

    let co_measured = (0..soil.len())
        .filter(|&i| {
            !soil.is_resolved(Property::WaterEc, i)
                && soil.is_resolved(Property::Water, i)
                && soil.is_resolved(Property::BulkEc, i)
        })
        .count();
    if co_measured == 1 {
        from_bulk_ec(soil, cfg, report);
    }

    let rhoades_states = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::Water, i) && soil.is_resolved(Property::BulkEc, i)
        })
        .count();
    let hilhorst_states = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::BulkPerm, i)
                && soil.value(Property::BulkPerm, i) >= 10.0
                && soil.is_resolved(Property::BulkEc, i)
        })
        .count();

    let missing = (0..soil.len()).any(|i| !soil.is_resolved(Property::WaterEc, i));
    if missing && rhoades_states >= 2 {
        fitting_rhoades(soil, cfg, report);
    } else if missing && hilhorst_states >= 2 {
        fitting_hilhorst(soil, cfg, report);
    }
    Ok(())
}

/// Sen & Goode forward route from resolved salinity.
fn from_salinity(soil: &mut Soil) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::WaterEc, i) || !soil.is_resolved(Property::Salinity, i)
        {
            continue;
        }
        let temperature = soil.value(Property::Temperature, i);
        let sal = soil.value(Property::Salinity, i);
        soil.fill(
            Property::WaterEc,
            i,
            sen_goode(temperature, sal),
            Provenance::Predicted(Method::SenGoode),
        );
    }
}

/// Fu inversion on the single state co-measured for water and bulk EC.
fn from_bulk_ec(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::WaterEc, i)
            || !soil.is_resolved(Property::Water, i)
            || !soil.is_resolved(Property::BulkEc, i)
        {
            continue;
        }
        let required = [
            Property::Clay,
            Property::BulkDensity,
            Property::ParticleDensity,
            Property::SolidEc,
        ];
        if let Some(&input) = required.iter().find(|&&p| !soil.is_resolved(p, i)) {
            report.push(Property::WaterEc, AdvisoryKind::MissingInput { input });
            continue;
        }

        let water = soil.value(Property::Water, i);
        let clay = soil.value(Property::Clay, i);
        let bd = soil.value(Property::BulkDensity, i);
        let pd = soil.value(Property::ParticleDensity, i);
        let solid_ec = soil.value(Property::SolidEc, i);
        let dry_ec = soil.value(Property::DryEc, i);
        let sat_ec = soil.value(Property::SatEc, i);
        let target = soil.value(Property::BulkEc, i);

        let res = minimize_scalar(
            |wec| (fu(water, clay, bd, pd, wec, solid_ec, dry_ec, sat_ec) - target).abs(),
            0.0,
            2.0,
            cfg.opt_max_iter,
            cfg.opt_tol,
        );
        if !res.converged {
            report.push(Property::WaterEc, AdvisoryKind::NonConvergence);
        }
        if res.fx.is_nan() {
            continue;
        }
        soil.fill(
            Property::WaterEc,
            i,
            round_to(res.x, cfg.roundn + 3),
            Provenance::Predicted(Method::FuInverse),
        );
    }
}

/// Fit one soil-wide pore water EC and surface EC against the co-measured
/// (water, bulk EC) states, then refit the Rhoades shape constants.
fn fitting_rhoades(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    let pairs: Vec<(f64, f64)> = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::Water, i) && soil.is_resolved(Property::BulkEc, i)
        })
        .map(|i| (soil.value(Property::Water, i), soil.value(Property::BulkEc, i)))
        .collect();
    let waters: Vec<f64> = pairs.iter().map(|&(w, _)| w).collect();
    let ecs: Vec<f64> = pairs.iter().map(|&(_, ec)| ec).collect();

    if is_degenerate_range(&waters, cfg.similarity_tol) {
        report.push(Property::WaterEc, AdvisoryKind::DegenerateRange);
        return;
    }

    let fit = minimize_pair(
        |wec, s_ec| {
            pairs
                .iter()
                .map(|&(w, ec)| {
                    (rhoades(w, wec, s_ec, RHOADES_E_INIT, RHOADES_F_INIT) - ec).powi(2)
                })
                .sum()
        },
        (1e-5, 2.0),
        (0.0, 0.1),
        (0.15, 0.0),
        cfg.pair_sweeps,
        cfg.opt_max_iter,
        cfg.opt_tol,
    );
    if !fit.converged {
        report.push(Property::WaterEc, AdvisoryKind::NonConvergence);
    }
    let (wec, s_ec) = (fit.a, fit.b);

    // Refit the shape constants around the fitted conductivities.
    let shape = minimize_pair(
        |e, f| {
            pairs
                .iter()
                .map(|&(w, ec)| (rhoades(w, wec, s_ec, e, f) - ec).powi(2))
                .sum()
        },
        (0.0, 5.0),
        (0.0, 2.0),
        (RHOADES_E_INIT, RHOADES_F_INIT),
        cfg.pair_sweeps,
        cfg.opt_max_iter,
        cfg.opt_tol,
    );
    soil.rhoades_e = Some(shape.a);
    soil.rhoades_f = Some(shape.b);

    let predicted: Vec<f64> = waters
        .iter()
        .map(|&w| rhoades(w, wec, s_ec, shape.a, shape.b))
        .collect();
    let r2 = r2_score(&ecs, &predicted);
    tracing::debug!(r2, water_ec = wec, s_ec, "rhoades calibration");
    if r2.is_nan() || r2 < cfg.fit_r2_min {
        report.push(
            Property::WaterEc,
            AdvisoryKind::FitRejected { r2, min: cfg.fit_r2_min },
        );
        return;
    }

    for i in 0..soil.len() {
        soil.fill(
            Property::SEc,
            i,
            round_to(s_ec, cfg.roundn + 3),
            Provenance::Predicted(Method::Rhoades),
        );
        soil.fill(
            Property::WaterEc,
            i,
            round_to(wec, cfg.roundn + 3),
            Provenance::Predicted(Method::Rhoades),
        );
    }
}

/// Fit one soil-wide pore water EC and permittivity offset through Hilhorst
/// on states with bulk permittivity of at least 10.
fn fitting_hilhorst(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) {
    let states: Vec<usize> = (0..soil.len())
        .filter(|&i| {
            soil.is_resolved(Property::BulkPerm, i)
                && soil.value(Property::BulkPerm, i) >= 10.0
                && soil.is_resolved(Property::BulkEc, i)
        })
        .collect();
    let perms: Vec<f64> = states
        .iter()
        .map(|&i| soil.value(Property::BulkPerm, i))
        .collect();

    if is_degenerate_range(&perms, cfg.similarity_tol) {
        report.push(Property::WaterEc, AdvisoryKind::DegenerateRange);
        return;
    }

    let triples: Vec<(f64, f64, f64)> = states
        .iter()
        .map(|&i| {
            (
                soil.value(Property::BulkEc, i),
                soil.value(Property::BulkPerm, i),
                soil.value(Property::WaterPerm, i),
            )
        })
        .collect();

    let fit = minimize_pair(
        |wec, offset| {
            triples
                .iter()
                .map(|&(ec, bp, wp)| (hilhorst(ec, wec, wp, offset) - bp).powi(2))
                .sum()
        },
        (1e-5, 2.0),
        (-10.0, 10.0),
        (0.15, 4.0),
        cfg.pair_sweeps,
        cfg.opt_max_iter,
        cfg.opt_tol,
    );
    if !fit.converged {
        report.push(Property::WaterEc, AdvisoryKind::NonConvergence);
    }
    let (wec, offset) = (fit.a, fit.b);

    let predicted: Vec<f64> = triples
        .iter()
        .map(|&(ec, _, wp)| hilhorst(ec, wec, wp, offset))
        .collect();
    let r2 = r2_score(&perms, &predicted);
    tracing::debug!(r2, water_ec = wec, offset_perm = offset, "hilhorst calibration");
    if r2.is_nan() || r2 < cfg.fit_r2_min {
        report.push(
            Property::WaterEc,
            AdvisoryKind::FitRejected { r2, min: cfg.fit_r2_min },
        );
        return;
    }

    for i in 0..soil.len() {
        soil.fill(
            Property::OffsetPerm,
            i,
            round_to(offset, cfg.roundn + 3),
            Provenance::Predicted(Method::Hilhorst),
        );
        soil.fill(
            Property::WaterEc,
            i,
            round_to(wec, cfg.roundn + 3),
            Provenance::Predicted(Method::Hilhorst),
        );
    }
}
