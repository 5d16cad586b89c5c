//! Water phase dielectric permittivity models.

/// Malmberg & Maryott (1956) permittivity of pure water from temperature [K].
pub fn malmberg_maryott(temperature: f64) -> f64 {
    let tc = temperature - 273.15;
    87.740 - 0.40008 * tc + 9.398e-4 * tc.powi(2) - 1.410e-6 * tc.powi(3)
}

/// Olhoeft (1986) permittivity of saline water from temperature [K] and
/// salinity [mol/L], frequency independent.
pub fn olhoeft(temperature: f64, salinity: f64) -> f64 {
    const A0: f64 = 295.68;
    const A1: f64 = -1.2283;
    const A2: f64 = 2.094e-3;
    const A3: f64 = -1.41e-6;
    const C1: f64 = -13.0;
    const C2: f64 = 1.065;
    const C3: f64 = -0.03006;

    A0 + A1 * temperature + A2 * temperature.powi(2) + A3 * temperature.powi(3)
        + C1 * salinity
        + C2 * salinity.powi(2)
        + C3 * salinity.powi(3)
}

/// Stogryn (1971) permittivity of saline water from temperature [K],
/// salinity [mol/L] and measurement frequency [Hz].
pub fn stogryn(temperature: f64, salinity: f64, frequency_perm: f64) -> f64 {
    // Molar mass of NaCl converts mol/L to g/L (~ppt).
    const NACL_MOLAR_MASS: f64 = 58.44;
    const WATER_PERM_INF: f64 = 4.5;

    let tc = temperature - 273.15;
    let c_ppt = salinity * NACL_MOLAR_MASS;
    let n = c_ppt * (1.707e-2 + 1.205e-5 * c_ppt + 4.058e-9 * c_ppt.powi(2));
    let a_n = 1.0 - 0.2551 * n + 5.151e-2 * n.powi(2) - 6.889e-3 * n.powi(3);
    let b_n_t = 0.1463e-2 * n * tc + 1.0 - 0.04896 * n - 0.02967 * n.powi(2)
        + 5.644e-3 * n.powi(3);
    let e_t_0 =
        87.74 - 0.40008 * tc + 9.398e-4 * tc.powi(2) - 1.41e-6 * tc.powi(3);
    let two_pi_tau =
        1.1109e-10 - 3.824e-12 * tc + 6.938e-14 * tc.powi(2) - 5.096e-16 * tc.powi(3);

    WATER_PERM_INF
        + (e_t_0 * a_n - WATER_PERM_INF)
            / (1.0 + (two_pi_tau * b_n_t * frequency_perm).powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malmberg_maryott_matches_reference_point() {
        // 78.30 at 25 C is the canonical value.
        assert!((malmberg_maryott(298.15) - 78.303).abs() < 1e-2);
    }

    #[test]
    fn malmberg_maryott_falls_with_temperature() {
        assert!(malmberg_maryott(283.15) > malmberg_maryott(303.15));
    }

    #[test]
    fn olhoeft_matches_pure_water_at_25c() {
        let perm = olhoeft(298.15, 0.0);
        assert!((perm - 78.2).abs() < 0.2);
    }

    #[test]
    fn olhoeft_falls_with_salinity() {
        assert!(olhoeft(298.15, 0.5) < olhoeft(298.15, 0.0));
    }

    #[test]
    fn stogryn_approaches_static_value_at_low_frequency() {
        let static_like = stogryn(298.15, 0.0, 1e6);
        assert!((static_like - malmberg_maryott(298.15)).abs() < 0.5);
    }

    #[test]
    fn stogryn_relaxes_towards_perm_inf_at_high_frequency() {
        let relaxed = stogryn(298.15, 0.1, 1e12);
        assert!(relaxed < 10.0);
        assert!(relaxed >= 4.5);
    }
}
