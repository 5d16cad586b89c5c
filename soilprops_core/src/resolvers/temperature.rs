use crate::advisory::Report;
use crate::error::Result;
use crate::soil::{Property, Provenance, Soil};
use soilprops_config::EngineCfg;

/// Standard laboratory temperature [K].
pub(crate) const STANDARD_TEMPERATURE: f64 = 298.15;

/// Missing temperatures default to 298.15 K.
pub fn temperature(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    for i in 0..soil.len() {
        soil.fill(
            Property::Temperature,
            i,
            STANDARD_TEMPERATURE,
            Provenance::Default("298.15 K"),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilBuilder;

    #[test]
    fn fills_only_missing_states() {
        let mut soil = SoilBuilder::new()
            .with(Property::Temperature, vec![f64::NAN, 303.15])
            .build()
            .unwrap();
        let cfg = EngineCfg::default();
        let mut report = Report::default();
        temperature(&mut soil, &cfg, &mut report).unwrap();
        assert_eq!(soil.value(Property::Temperature, 0), 298.15);
        assert_eq!(soil.value(Property::Temperature, 1), 303.15);
        assert_eq!(
            soil.provenance(Property::Temperature)[0],
            Provenance::Default("298.15 K")
        );
        assert_eq!(soil.provenance(Property::Temperature)[1], Provenance::Measured);
    }
}
