//! Phase permittivity and conductivity defaults.

use crate::advisory::Report;
use crate::error::Result;
use crate::soil::{Property, Provenance, Soil};
use soilprops_config::EngineCfg;

fn fill_all(soil: &mut Soil, property: Property, value: f64, label: &'static str) {
    for i in 0..soil.len() {
        soil.fill(property, i, value, Provenance::Default(label));
    }
}

/// Air permittivity defaults to 1.2.
pub fn air_perm(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    fill_all(soil, Property::AirPerm, 1.2, "1.2");
    Ok(())
}

/// Solid phase permittivity defaults to 4.
pub fn solid_perm(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    fill_all(soil, Property::SolidPerm, 4.0, "4");
    Ok(())
}

/// Solid phase conductivity defaults to 0 S/m.
pub fn solid_ec(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    fill_all(soil, Property::SolidEc, 0.0, "0 S/m");
    Ok(())
}

/// Bulk permittivity at infinite frequency defaults to 5.
pub fn bulk_perm_inf(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    fill_all(soil, Property::BulkPermInf, 5.0, "5");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilBuilder;

    #[test]
    fn phase_defaults_land_on_missing_states() {
        let mut soil = SoilBuilder::new()
            .with(Property::AirPerm, vec![f64::NAN, 1.0])
            .build()
            .unwrap();
        let cfg = EngineCfg::default();
        let mut report = Report::default();
        air_perm(&mut soil, &cfg, &mut report).unwrap();
        solid_perm(&mut soil, &cfg, &mut report).unwrap();
        solid_ec(&mut soil, &cfg, &mut report).unwrap();
        bulk_perm_inf(&mut soil, &cfg, &mut report).unwrap();
        assert_eq!(soil.get(Property::AirPerm), &[1.2, 1.0]);
        assert_eq!(soil.get(Property::SolidPerm), &[4.0, 4.0]);
        assert_eq!(soil.get(Property::SolidEc), &[0.0, 0.0]);
        assert_eq!(soil.get(Property::BulkPermInf), &[5.0, 5.0]);
    }
}
