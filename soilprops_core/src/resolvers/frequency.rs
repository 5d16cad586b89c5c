use crate::advisory::{AdvisoryKind, Report};
use crate::error::Result;
use crate::instruments::{inst2freq_c, inst2freq_p};
use crate::soil::{Property, Provenance, Soil};
use soilprops_config::EngineCfg;

/// Conductivity measurement frequency: instrument catalog first, then the
/// direct-current default.
pub fn frequency_ec(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    inst2freq_c(soil);
    for i in 0..soil.len() {
        soil.fill(
            Property::FrequencyEc,
            i,
            0.0,
            Provenance::Default("0 Hz (direct current)"),
        );
    }
    Ok(())
}

/// Permittivity measurement frequency from the instrument catalog.
///
/// There is no sensible default, so a state that carries dielectric data but
/// no frequency raises an advisory instead.
pub fn frequency_perm(soil: &mut Soil, _cfg: &EngineCfg, report: &mut Report) -> Result<()> {
    inst2freq_p(soil);
    let blocked = (0..soil.len()).any(|i| {
        !soil.is_resolved(Property::FrequencyPerm, i)
            && (soil.is_resolved(Property::BulkPerm, i)
                || soil.is_resolved(Property::Water, i))
    });
    if blocked {
        report.push(Property::FrequencyPerm, AdvisoryKind::MissingFrequency);
    }
    Ok(())
}
