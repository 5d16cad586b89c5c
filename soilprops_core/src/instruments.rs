//! Instrument catalog.
//!
//! Maps field instruments to the electromagnetic frequency their readings
//! were taken at, so samples tagged with an instrument get the right
//! frequency without the user spelling it out.

use crate::error::SoilError;
use crate::soil::{Property, Provenance, Soil};

/// Supported field instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Tdr,
    Gpr,
    HydraProbe,
    EmiDualem,
    EmiEm38dd,
}

impl Instrument {
    pub fn parse(name: &str) -> Result<Self, SoilError> {
        let trimmed = name.trim();
        let inst = if trimmed.eq_ignore_ascii_case("TDR") {
            Self::Tdr
        } else if trimmed.eq_ignore_ascii_case("GPR") {
            Self::Gpr
        } else if trimmed.eq_ignore_ascii_case("HydraProbe") {
            Self::HydraProbe
        } else if trimmed.eq_ignore_ascii_case("EMI Dualem") {
            Self::EmiDualem
        } else if trimmed.eq_ignore_ascii_case("EMI EM38-DD") {
            Self::EmiEm38dd
        } else {
            return Err(SoilError::UnknownInstrument(name.to_owned()));
        };
        Ok(inst)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Tdr => "TDR",
            Self::Gpr => "GPR",
            Self::HydraProbe => "HydraProbe",
            Self::EmiDualem => "EMI Dualem",
            Self::EmiEm38dd => "EMI EM38-DD",
        }
    }

    /// Permittivity measurement frequency [Hz], for dielectric instruments.
    pub const fn perm_frequency(self) -> Option<f64> {
        match self {
            Self::Tdr => Some(200e6),
            Self::Gpr => Some(1e9),
            Self::HydraProbe => Some(50e6),
            Self::EmiDualem | Self::EmiEm38dd => None,
        }
    }

    /// Conductivity measurement frequency [Hz], for EMI instruments.
    pub const fn ec_frequency(self) -> Option<f64> {
        match self {
            Self::EmiDualem => Some(9e3),
            Self::EmiEm38dd => Some(16e3),
            Self::Tdr | Self::Gpr | Self::HydraProbe => None,
        }
    }
}

/// Fill missing permittivity frequencies from the instrument catalog.
pub fn inst2freq_p(soil: &mut Soil) {
    let Some(freq) = soil.instrument.and_then(Instrument::perm_frequency)
    else {
        return;
    };
    for i in 0..soil.len() {
        soil.fill(
            Property::FrequencyPerm,
            i,
            freq,
            Provenance::Default("instrument catalog"),
        );
    }
}

/// Fill missing conductivity frequencies from the instrument catalog.
pub fn inst2freq_c(soil: &mut Soil) {
    let Some(freq) = soil.instrument.and_then(Instrument::ec_frequency) else {
        return;
    };
    for i in 0..soil.len() {
        soil.fill(
            Property::FrequencyEc,
            i,
            freq,
            Provenance::Default("instrument catalog"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilBuilder;

    #[test]
    fn parse_accepts_catalog_names() {
        assert_eq!(Instrument::parse("TDR").unwrap(), Instrument::Tdr);
        assert_eq!(
            Instrument::parse("emi em38-dd").unwrap(),
            Instrument::EmiEm38dd
        );
        assert!(Instrument::parse("radar gun").is_err());
    }

    #[test]
    fn tdr_maps_to_200_mhz() {
        let mut soil = SoilBuilder::new()
            .with(Property::BulkPerm, vec![12.0, 14.0])
            .with_instrument("TDR")
            .build()
            .unwrap();
        inst2freq_p(&mut soil);
        assert_eq!(soil.get(Property::FrequencyPerm), &[200e6, 200e6]);
        // TDR is not a conductivity instrument.
        inst2freq_c(&mut soil);
        assert!(!soil.is_resolved(Property::FrequencyEc, 0));
    }

    #[test]
    fn measured_frequency_wins_over_catalog() {
        let mut soil = SoilBuilder::new()
            .with(Property::FrequencyPerm, vec![f64::NAN, 5e7])
            .with_instrument("GPR")
            .build()
            .unwrap();
        inst2freq_p(&mut soil);
        assert_eq!(soil.value(Property::FrequencyPerm, 0), 1e9);
        assert_eq!(soil.value(Property::FrequencyPerm, 1), 5e7);
    }
}
