use crate::advisory::Report;
use crate::error::{Result, SoilError};
use crate::soil::{Method, Property, Provenance, Soil};
use soilprops_config::EngineCfg;

/// Allowed deviation of sand + silt + clay from 100 [%].
const SUM_TOL: f64 = 0.1;

/// Close the texture fractions per state.
///
/// Two known fractions determine the third; with none known, a declared
/// texture class supplies representative fractions. Three fractions that do
/// not sum to 100 are a data error, not an advisory.
pub fn texture(soil: &mut Soil, _cfg: &EngineCfg, _report: &mut Report) -> Result<()> {
    const FRACTIONS: [Property; 3] = [Property::Sand, Property::Silt, Property::Clay];

    for i in 0..soil.len() {
        let resolved: Vec<Property> = FRACTIONS
            .iter()
            .copied()
            .filter(|&p| soil.is_resolved(p, i))
            .collect();

        match resolved.len() {
            2 => {
                let known: f64 = resolved.iter().map(|&p| soil.value(p, i)).sum();
                if known > 100.0 + SUM_TOL {
                    return Err(SoilError::TextureSum { index: i, sum: known }.into());
                }
                let missing = FRACTIONS
                    .iter()
                    .copied()
                    .find(|p| !resolved.contains(p));
                if let Some(p) = missing {
                    soil.fill(
                        p,
                        i,
                        (100.0 - known).max(0.0),
                        Provenance::Predicted(Method::FractionClosure),
                    );
                }
            }
            0 => {
                if let Some(class) = soil.texture {
                    let (sand, silt, clay) = class.fractions();
                    let prov = Provenance::Predicted(Method::TextureTable);
                    soil.fill(Property::Sand, i, sand, prov);
                    soil.fill(Property::Silt, i, silt, prov);
                    soil.fill(Property::Clay, i, clay, prov);
                }
            }
            _ => {}
        }

        if FRACTIONS.iter().all(|&p| soil.is_resolved(p, i)) {
            let sum: f64 = FRACTIONS.iter().map(|&p| soil.value(p, i)).sum();
            if (sum - 100.0).abs() > SUM_TOL {
                return Err(SoilError::TextureSum { index: i, sum }.into());
            }
        }
    }
    Ok(())
}
