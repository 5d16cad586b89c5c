use crate::advisory::Report;
use crate::error::Result;
use crate::soil::{Method, Property, Provenance, Soil};
use soilprops_config::EngineCfg;
use soilprops_models::{malmberg_maryott, olhoeft, stogryn};

/// Pore water permittivity per state.
///
/// Saline water uses Stogryn at high frequency and Olhoeft otherwise; fresh
/// water in the 0.1-100 MHz band uses Malmberg-Maryott; everything else gets
/// the nominal 80.
pub fn water_perm(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    for i in 0..soil.len() {
        if soil.is_resolved(Property::WaterPerm, i) {
            continue;
        }
        let temperature = soil.value(Property::Temperature, i);
        let salinity = soil.value(Property::Salinity, i);
        let frequency = soil.value(Property::FrequencyPerm, i);

        if soil.is_resolved(Property::Salinity, i) && frequency >= 100e6 {
            soil.fill(
                Property::WaterPerm,
                i,
                stogryn(temperature, salinity, frequency),
                Provenance::Predicted(Method::Stogryn),
            );
        } else if soil.is_resolved(Property::Salinity, i) {
            soil.fill(
                Property::WaterPerm,
                i,
                olhoeft(temperature, salinity),
                Provenance::Predicted(Method::Olhoeft),
            );
        } else if (1e5..=100e6).contains(&frequency) {
            soil.fill(
                Property::WaterPerm,
                i,
                malmberg_maryott(temperature),
                Provenance::Predicted(Method::MalmbergMaryott),
            );
        } else {
            soil.fill(Property::WaterPerm, i, 80.0, Provenance::Default("80"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilBuilder;

    fn run(soil: &mut Soil) {
        let cfg = EngineCfg::default();
        let mut report = Report::default();
        crate::resolvers::temperature(soil, &cfg, &mut report).unwrap();
        water_perm(soil, &cfg, &mut report).unwrap();
    }

    #[test]
    fn saline_high_frequency_takes_stogryn() {
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::Salinity, 0.01)
            .with_scalar(Property::FrequencyPerm, 200e6)
            .build()
            .unwrap();
        run(&mut soil);
        assert_eq!(
            soil.provenance(Property::WaterPerm)[0],
            Provenance::Predicted(Method::Stogryn)
        );
        let wp = soil.value(Property::WaterPerm, 0);
        assert!(wp > 60.0 && wp < 85.0);
    }

    #[test]
    fn saline_without_frequency_takes_olhoeft() {
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::Salinity, 0.01)
            .build()
            .unwrap();
        run(&mut soil);
        assert_eq!(
            soil.provenance(Property::WaterPerm)[0],
            Provenance::Predicted(Method::Olhoeft)
        );
    }

    #[test]
    fn fresh_water_in_band_takes_malmberg_maryott() {
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::FrequencyPerm, 50e6)
            .build()
            .unwrap();
        run(&mut soil);
        assert_eq!(
            soil.provenance(Property::WaterPerm)[0],
            Provenance::Predicted(Method::MalmbergMaryott)
        );
        assert!((soil.value(Property::WaterPerm, 0) - 78.303).abs() < 0.05);
    }

    #[test]
    fn nominal_80_otherwise() {
        let mut soil = SoilBuilder::new()
            .with_scalar(Property::Water, 0.2)
            .build()
            .unwrap();
        run(&mut soil);
        assert_eq!(soil.value(Property::WaterPerm, 0), 80.0);
    }
}
