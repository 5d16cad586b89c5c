//! Pedotransfer functions.

/// Schjønning et al. (2017) particle density [g/cm³] from clay and organic
/// matter volumetric fractions (0..1).
pub fn schjonnen(clay: f64, orgm: f64) -> f64 {
    const A: f64 = 1.127;
    const B: f64 = 0.373;
    const C: f64 = 2.648;
    const D: f64 = 0.209;
    const DENS_ORG: f64 = 1.4;
    const DENS_PART: f64 = 2.65;
    const DENS_CLAY: f64 = 2.86;

    let somr = (orgm * DENS_ORG) / (orgm * DENS_ORG + (1.0 - orgm) * DENS_PART);
    let claymass =
        (clay * DENS_CLAY) / (clay * DENS_CLAY + (1.0 - clay) * DENS_PART);
    (somr / (A + B * somr) + (1.0 - somr) / (C + D * claymass)).recip()
}
