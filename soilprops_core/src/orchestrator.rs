//! Pass loop over the property resolvers.

use crate::advisory::{AdvisoryKind, Report};
use crate::error::Result;
use crate::resolvers;
use crate::soil::{Property, Soil};
use soilprops_config::EngineCfg;

/// Properties the engine exists to deliver; anything left unresolved among
/// them is reported.
const TARGETS: [Property; 7] = [
    Property::Water,
    Property::WaterEc,
    Property::BulkEc,
    Property::BulkEcDc,
    Property::BulkEcDcTc,
    Property::BulkPerm,
    Property::Salinity,
];

/// Resolve every property the measurements support.
///
/// Resolvers run in dependency order; because some routes feed each other in
/// both directions (conductivity needs water, water needs conductivity), the
/// whole list is repeated until a pass changes no provenance or `max_passes`
/// is reached. Resolvers never overwrite, so repetition is idempotent.
pub fn predict(soil: &mut Soil, cfg: &EngineCfg) -> Result<Report> {
    cfg.validate()?;
    let mut report = Report::default();

    for pass in 1..=cfg.max_passes {
        let before = soil.provenance_snapshot();
        run_pass(soil, cfg, &mut report)?;
        report.passes = pass;
        if soil.provenance_snapshot() == before {
            report.settled = true;
            break;
        }
    }

    for property in TARGETS {
        let count = soil.unresolved_count(property);
        if count > 0 {
            report.push(property, AdvisoryKind::Unresolved { count });
        }
    }
    tracing::debug!(
        passes = report.passes,
        settled = report.settled,
        advisories = report.advisories.len(),
        "resolution finished"
    );
    Ok(report)
}

fn run_pass(soil: &mut Soil, cfg: &EngineCfg, report: &mut Report) -> Result<()> {
    resolvers::temperature(soil, cfg, report)?;
    resolvers::texture(soil, cfg, report)?;
    resolvers::particle_density(soil, cfg, report)?;
    resolvers::air_perm(soil, cfg, report)?;
    resolvers::solid_perm(soil, cfg, report)?;
    resolvers::solid_ec(soil, cfg, report)?;
    resolvers::bulk_perm_inf(soil, cfg, report)?;
    resolvers::frequency_ec(soil, cfg, report)?;
    resolvers::frequency_perm(soil, cfg, report)?;
    resolvers::water_perm(soil, cfg, report)?;
    resolvers::water_ec(soil, cfg, report)?;
    resolvers::bulk_ec(soil, cfg, report)?;
    resolvers::bulk_perm(soil, cfg, report)?;
    resolvers::water(soil, cfg, report)?;
    resolvers::salinity(soil, cfg, report)?;
    Ok(())
}
