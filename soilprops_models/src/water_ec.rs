//! Pore-water electrical conductivity models.

/// Sen & Goode (1992) NaCl solution conductivity from temperature [K] and
/// salinity [mol/L].
pub fn sen_goode(temperature: f64, salinity: f64) -> f64 {
    const D1: f64 = 5.6;
    const D2: f64 = 0.27;
    const D3: f64 = -1.51e-4;
    const D4: f64 = 2.36;
    const D5: f64 = 0.099;
    const D6: f64 = 0.214;

    let t_celsius = temperature - 273.15;
    (D1 + D2 * t_celsius + D3 * t_celsius.powi(2)) * salinity
        - ((D4 + D5 * t_celsius) / (1.0 + D6 * salinity.sqrt()))
            * salinity.powf(1.5)
}
