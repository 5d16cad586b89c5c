use crate::advisory::Report;
use crate::error::Result;
use crate::soil::{Method, Property, Provenance, Soil};
use soilprops_config::EngineCfg;
use soilprops_models::schjonnen;

/// Particle density from clay and organic matter content, or the mineral
/// soil default of 2.65 g/cm³.
pub fn particle_density(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::ParticleDensity, i) {
            continue;
        }
        if soil.is_resolved(Property::Clay, i) && soil.is_resolved(Property::Orgm, i) {
            let clay = soil.value(Property::Clay, i) / 100.0;
            let orgm = soil.value(Property::Orgm, i) / 100.0;
            soil.fill(
                Property::ParticleDensity,
                i,
                schjonnen(clay, orgm),
                Provenance::Predicted(Method::Schjonnen),
            );
        }
    }
    for i in 0..soil.len() {
        soil.fill(
            Property::ParticleDensity,
            i,
            2.65,
            Provenance::Default("2.65 g/cm3"),
        );
    }
    Ok(())
}
