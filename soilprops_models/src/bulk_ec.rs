//! Bulk electrical conductivity models.

use crate::Relax;

/// Vacuum permittivity [F/m].
const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Dispersion coefficients shared by the Longmire & Smith (1975) EC and
/// permittivity forms, one per frequency decade.
pub(crate) const LONGMIRE_SMITH_A: [f64; 13] = [
    3.4e6, 2.74e5, 2.58e4, 3.38e3, 5.26e2, 1.33e2, 2.72e1, 1.25e1, 4.8, 2.17,
    9.8e-1, 3.92e-1, 1.73e-1,
];

/// Scaling frequency of the Longmire & Smith dispersion terms.
pub(crate) fn longmire_smith_f(bulk_ec_dc: f64) -> f64 {
    (125.0 * bulk_ec_dc).powf(0.8312)
}

/// Wunderlich et al. (2013) effective-medium relaxation for bulk EC.
///
/// Integrates the differential mixing relation from a known minimum state
/// (`ec_init` at `wat_init`) up to `water`, with `lw` the depolarization
/// factor of the water aggregates and `water_ec` the pore-water conductivity.
pub fn wunderlich_ec(
    water: f64,
    ec_init: f64,
    wat_init: f64,
    water_ec: f64,
    lw: f64,
    relax: Relax,
) -> f64 {
    let diff = water - wat_init;
    let mut bulk_ec = ec_init;
    let mut x = 0.0;
    while x < 1.0 {
        let dy = relax.step * ((bulk_ec * diff) / (1.0 - diff + x * diff))
            * ((water_ec - bulk_ec) / (lw * water_ec + (1.0 - lw) * bulk_ec));
        x += relax.step;
        bulk_ec += dy;
        if relax.tol > 0.0 && dy.abs() < relax.tol {
            break;
        }
    }
    bulk_ec
}

/// Fu et al. (2021) bulk EC from water content, texture and phase
/// conductivities. Solid and water phase exponents are fixed at 1 and 2.
///
/// `dry_ec` and `sat_ec` are optional calibration anchors (bulk EC at zero
/// water content and at saturation); pass `NaN` when unknown.
pub fn fu(
    water: f64,
    clay: f64,
    bulk_density: f64,
    particle_density: f64,
    water_ec: f64,
    solid_ec: f64,
    dry_ec: f64,
    sat_ec: f64,
) -> f64 {
    const D: f64 = 0.6539;
    const E: f64 = 0.0183;
    const S: f64 = 1.0;
    const W: f64 = 2.0;

    let por = 1.0 - bulk_density / particle_density;
    let surf_ec = D * clay / (100.0 - clay) + E;

    if dry_ec.is_nan() && sat_ec.is_nan() {
        solid_ec * (1.0 - por).powf(S)
            + water.powf(W - 1.0) * (por * surf_ec)
            + water_ec * water.powf(W)
    } else if !dry_ec.is_nan() && !sat_ec.is_nan() {
        dry_ec
            + ((dry_ec - sat_ec) / por.powf(W) - surf_ec) * water.powf(W)
            + water.powf(W - 1.0) * (por * surf_ec)
    } else if !dry_ec.is_nan() && sat_ec.is_nan() {
        let sat_ec = dry_ec + (water_ec + surf_ec) * por.powf(W);
        dry_ec
            + ((dry_ec - sat_ec) / por.powf(W) - surf_ec) * water.powf(W)
            + water.powf(W - 1.0) * (por * surf_ec)
    } else {
        f64::NAN
    }
}

/// Longmire & Smith (1975) frequency shift of a direct-current bulk EC to
/// the measurement frequency. Zero conductivity is returned unchanged.
pub fn longmire_smith_ec(bulk_ec_dc: f64, frequency_ec: f64) -> f64 {
    if bulk_ec_dc == 0.0 {
        return 0.0;
    }
    let f = longmire_smith_f(bulk_ec_dc);
    let mut dispersion = 0.0;
    for (i, a) in LONGMIRE_SMITH_A.iter().enumerate() {
        let f_i = f * 10f64.powi(i as i32);
        let ratio = frequency_ec / f_i;
        dispersion += 2.0 * std::f64::consts::PI * EPSILON_0
            * (a * f_i * ratio.powi(2) / (1.0 + ratio.powi(2)));
    }
    bulk_ec_dc + dispersion
}

/// Rhoades et al. (1976) bulk EC from water content, pore-water EC and
/// surface conductivity, with empirical shape constants `e` and `f`.
pub fn rhoades(water: f64, water_ec: f64, s_ec: f64, e: f64, f: f64) -> f64 {
    water_ec * (e * water.powi(2) + f * water) + s_ec
}

/// Sheets & Hendrickx (1995) temperature correction of bulk EC to the
/// 25 °C reference.
pub fn sheets_hendrickx(bulk_ec: f64, temperature: f64) -> f64 {
    let t_celsius = temperature - 273.15;
    bulk_ec * (0.447 + 1.4034 * (-t_celsius / 26.815).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wunderlich_ec_is_identity_at_initial_state() {
        let y = wunderlich_ec(0.10, 0.02, 0.10, 0.5, 0.1, Relax::default());
        assert!((y - 0.02).abs() < 1e-12);
    }

    #[test]
    fn wunderlich_ec_grows_with_water() {
        let relax = Relax::default();
        let lo = wunderlich_ec(0.15, 0.02, 0.10, 0.5, 0.1, relax);
        let hi = wunderlich_ec(0.25, 0.02, 0.10, 0.5, 0.1, relax);
        assert!(lo > 0.02);
        assert!(hi > lo);
    }

    #[test]
    fn fu_branches_on_calibration_anchors() {
        let plain = fu(0.2, 10.0, 1.4, 2.65, 0.1, 0.0, f64::NAN, f64::NAN);
        assert!(plain > 0.0);
        // Both anchors known switches to the anchored form. With sat_ec
        // above dry_ec the quadratic term is negative, so the result sits
        // below the dry anchor.
        let anchored = fu(0.2, 10.0, 1.4, 2.65, 0.1, 0.0, 0.01, 0.08);
        assert!((anchored - 0.002_358).abs() < 1e-4);
        assert!(anchored < plain);
        // A known dry anchor alone synthesizes the saturation anchor.
        let dry_only = fu(0.2, 10.0, 1.4, 2.65, 0.1, 0.0, 0.01, f64::NAN);
        assert!(dry_only.is_finite());
    }

    #[test]
    fn fu_increases_with_water() {
        let a = fu(0.10, 20.0, 1.4, 2.65, 0.1, 0.0, f64::NAN, f64::NAN);
        let b = fu(0.30, 20.0, 1.4, 2.65, 0.1, 0.0, f64::NAN, f64::NAN);
        assert!(b > a);
    }

    #[test]
    fn longmire_smith_ec_zero_and_dc_limits() {
        assert_eq!(longmire_smith_ec(0.0, 1e6), 0.0);
        // At zero frequency all dispersion terms vanish.
        assert!((longmire_smith_ec(0.05, 0.0) - 0.05).abs() < 1e-15);
    }

    #[test]
    fn longmire_smith_ec_grows_with_frequency() {
        let dc = 0.05;
        let low = longmire_smith_ec(dc, 1e3);
        let high = longmire_smith_ec(dc, 1e6);
        assert!(low >= dc);
        assert!(high > low);
    }

    #[test]
    fn sheets_hendrickx_is_near_identity_at_reference_temperature() {
        let corrected = sheets_hendrickx(0.1, 298.15);
        assert!((corrected - 0.1).abs() < 1e-3);
    }

    #[test]
    fn sheets_hendrickx_scales_up_cold_readings() {
        // A reading at 10 °C maps to a larger 25 °C equivalent.
        assert!(sheets_hendrickx(0.1, 283.15) > 0.1);
    }

    #[test]
    fn rhoades_reduces_to_surface_term_when_dry() {
        assert!((rhoades(0.0, 0.3, 0.01, 1.0, 0.38) - 0.01).abs() < 1e-15);
    }
}
