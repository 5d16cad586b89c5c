use crate::advisory::{AdvisoryKind, Report};
use crate::error::Result;
use crate::optimize::minimize_scalar;
use crate::resolvers::round_to;
use crate::soil::{Method, Property, Provenance, Soil};
use soilprops_config::EngineCfg;
use soilprops_models::sen_goode;

/// Pore water salinity by inverting Sen & Goode on the resolved pore water
/// conductivity, bounded to [0, 1] mol/L.
pub fn salinity(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) -> Result<()> {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::Salinity, i)
            || !soil.is_resolved(Property::WaterEc, i)
        {
            continue;
        }
        let temperature = soil.value(Property::Temperature, i);
        let water_ec = soil.value(Property::WaterEc, i);
        let res = minimize_scalar(
            |s| (sen_goode(temperature, s) - water_ec).powi(2),
            0.0,
            1.0,
            cfg.opt_max_iter,
            cfg.opt_tol,
        );
        if !res.converged {
            report.push(Property::Salinity, AdvisoryKind::NonConvergence);
        }
        if res.fx.is_nan() {
            continue;
        }
        soil.fill(
            Property::Salinity,
            i,
            round_to(res.x, cfg.roundn + 2),
            Provenance::Predicted(Method::SenGoodeInverse),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilBuilder;

    #[test]
    fn inverts_sen_goode_at_standard_temperature() {
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::WaterEc, 0.1)
            .with_scalar(Property::Temperature, 298.15)
            .build()
            .unwrap();
        let cfg = EngineCfg::default();
        let mut report = Report::default();
        salinity(&mut soil, &cfg, &mut report).unwrap();
        let s = soil.value(Property::Salinity, 0);
        assert!((s - 0.008_46).abs() < 2e-4, "salinity {s}");
        assert_eq!(
            soil.provenance(Property::Salinity)[0],
            Provenance::Predicted(Method::SenGoodeInverse)
        );
        // Round trip closes.
        assert!((sen_goode(298.15, s) - 0.1).abs() < 1e-3);
    }

    #[test]
    fn skips_states_without_water_ec() {
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::Temperature, 298.15)
            .build()
            .unwrap();
        let cfg = EngineCfg::default();
        let mut report = Report::default();
        salinity(&mut soil, &cfg, &mut report).unwrap();
        assert!(!soil.is_resolved(Property::Salinity, 0));
    }
}
