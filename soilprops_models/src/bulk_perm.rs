//! Bulk dielectric permittivity models.

use crate::bulk_ec::{longmire_smith_f, LONGMIRE_SMITH_A};
use crate::Relax;

/// Longmire & Smith (1975) bulk permittivity from the direct-current bulk EC,
/// the infinite-frequency permittivity and the measurement frequency.
pub fn longmire_smith_p(
    bulk_ec_dc: f64,
    bulk_perm_inf: f64,
    frequency_perm: f64,
) -> f64 {
    let f = longmire_smith_f(bulk_ec_dc);
    let mut dispersion = 0.0;
    for (i, a) in LONGMIRE_SMITH_A.iter().enumerate() {
        let f_i = f * 10f64.powi(i as i32);
        dispersion += a / (1.0 + (frequency_perm / f_i).powi(2));
    }
    bulk_perm_inf + dispersion
}

/// Wunderlich et al. (2013) effective-medium relaxation for bulk
/// permittivity, integrated from a known minimum state (`perm_init` at
/// `wat_init`) with water-phase permittivity `water_perm`.
pub fn wunderlich_p(
    water: f64,
    perm_init: f64,
    wat_init: f64,
    water_perm: f64,
    lw: f64,
    relax: Relax,
) -> f64 {
    let diff = water - wat_init;
    let mut bulk_perm = perm_init;
    let mut x = 0.001;
    while x < 1.0 {
        let dy = ((bulk_perm * diff) / (1.0 - diff + x * diff))
            * ((water_perm - bulk_perm)
                / (lw * water_perm + (1.0 - lw) * bulk_perm));
        x += relax.step;
        bulk_perm += dy * relax.step;
        if relax.tol > 0.0 && (dy * relax.step).abs() < relax.tol {
            break;
        }
    }
    bulk_perm
}

fn roth_mixing(
    water: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    alpha: f64,
) -> f64 {
    let por = 1.0 - bulk_density / particle_density;
    (water * water_perm.powf(alpha)
        + (1.0 - por) * solid_perm.powf(alpha)
        + (por - water) * air_perm.powf(alpha))
    .powf(1.0 / alpha)
}

/// Roth et al. (1990) mixing model with the Mendoza Veirana (2022) alpha
/// pedotransfer from cation exchange capacity [meq/100g].
pub fn roth_mv(
    water: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    cec: f64,
) -> f64 {
    let alpha = 0.248 * cec.ln() + 0.366;
    roth_mixing(water, bulk_density, particle_density, air_perm, solid_perm, water_perm, alpha)
}

/// Roth et al. (1990) mixing model with an explicit alpha exponent.
pub fn roth_crim(
    water: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    alpha: f64,
) -> f64 {
    roth_mixing(water, bulk_density, particle_density, air_perm, solid_perm, water_perm, alpha)
}

/// Roth et al. (1990) mixing model with the Wunderlich (2013) alpha
/// pedotransfer from clay content [%].
pub fn roth_w(
    water: f64,
    bulk_density: f64,
    particle_density: f64,
    air_perm: f64,
    solid_perm: f64,
    water_perm: f64,
    clay: f64,
) -> f64 {
    let alpha = -0.46 * (clay / 100.0) + 0.71;
    roth_mixing(water, bulk_density, particle_density, air_perm, solid_perm, water_perm, alpha)
}

/// Hilhorst (2000) linear relation between bulk permittivity and the ratio
/// of bulk to pore-water conductivity, offset by the permittivity at zero
/// bulk EC.
pub fn hilhorst(
    bulk_ec: f64,
    water_ec: f64,
    water_perm: f64,
    offset_perm: f64,
) -> f64 {
    offset_perm + water_perm * bulk_ec / water_ec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::lr;

    #[test]
    fn longmire_smith_p_decays_towards_perm_inf() {
        let low = longmire_smith_p(0.01, 5.0, 1e6);
        let high = longmire_smith_p(0.01, 5.0, 1e9);
        assert!(low > high);
        assert!(high > 5.0);
    }

    #[test]
    fn wunderlich_p_is_near_identity_at_initial_state() {
        let y = wunderlich_p(0.10, 6.0, 0.10, 80.0, 0.1, Relax::default());
        assert!((y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn wunderlich_p_grows_with_water() {
        let relax = Relax::default();
        let lo = wunderlich_p(0.15, 6.0, 0.10, 80.0, 0.1, relax);
        let hi = wunderlich_p(0.30, 6.0, 0.10, 80.0, 0.1, relax);
        assert!(lo > 6.0);
        assert!(hi > lo);
    }

    #[test]
    fn roth_crim_inverts_through_lr() {
        // The LR inverse with the same alpha recovers the water content.
        let (bd, pd, ap, sp, wp, alpha) = (1.4, 2.65, 1.2, 4.0, 80.0, 0.5);
        let water = 0.23;
        let bp = roth_crim(water, bd, pd, ap, sp, wp, alpha);
        let back = lr(bp, bd, pd, ap, sp, wp, alpha);
        assert!((back - water).abs() < 1e-12);
    }

    #[test]
    fn roth_w_alpha_falls_with_clay() {
        let sandy = roth_w(0.2, 1.4, 2.65, 1.2, 4.0, 80.0, 5.0);
        let clayey = roth_w(0.2, 1.4, 2.65, 1.2, 4.0, 80.0, 60.0);
        assert!(sandy.is_finite() && clayey.is_finite());
        assert!(sandy != clayey);
    }

    #[test]
    fn hilhorst_is_linear_in_bulk_ec() {
        let a = hilhorst(0.02, 0.3, 80.0, 4.0);
        let b = hilhorst(0.04, 0.3, 80.0, 4.0);
        assert!((b - a - 80.0 * 0.02 / 0.3).abs() < 1e-12);
    }
}
