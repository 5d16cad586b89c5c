//! Water content inverses of the volumetric mixing models.

fn lr_mixing_inverse(
    bulk_perm: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    alpha: f64,
) -> f64 {
    let por = 1.0 - bulk_density / particle_density;
    (bulk_perm.powf(alpha)
        - (1.0 - por) * solid_perm.powf(alpha)
        - por * air_perm.powf(alpha))
        / (water_perm.powf(alpha) - air_perm.powf(alpha))
}

/// Lichtenecker & Rother (1931) water content from bulk permittivity with an
/// explicit alpha exponent; `NaN` falls back to the CRIM value of 0.5.
pub fn lr(
    bulk_perm: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    alpha: f64,
) -> f64 {
    let alpha = if alpha.is_nan() { 0.5 } else { alpha };
    lr_mixing_inverse(bulk_perm, bulk_density, particle_density, air_perm, solid_perm, water_perm, alpha)
}

/// Lichtenecker & Rother inverse with the Mendoza Veirana alpha pedotransfer
/// from cation exchange capacity [meq/100g].
pub fn lr_mv(
    bulk_perm: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    cec: f64,
) -> f64 {
    let alpha = 0.248 * cec.ln() + 0.366;
    lr_mixing_inverse(bulk_perm, bulk_density, particle_density, air_perm, solid_perm, water_perm, alpha)
}

/// Lichtenecker & Rother inverse with the Wunderlich (2013) alpha
/// pedotransfer from clay content [%].
pub fn lr_w(
    bulk_perm: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    clay: f64,
) -> f64 {
    let alpha = -0.46 * (clay / 100.0) + 0.71;
    lr_mixing_inverse(bulk_perm, bulk_density, particle_density, air_perm, solid_perm, water_perm, alpha)
}
