//! Soil state container.
//!
//! A [`Soil`] holds one `f64` sequence per [`Property`], all of the same
//! length (one entry per soil state), plus a parallel [`Provenance`] record
//! for every entry. `NaN` marks a missing value and always coincides with
//! [`Provenance::Unresolved`]; measured entries are frozen for the lifetime
//! of the container.

use crate::error::SoilError;
use crate::instruments::Instrument;

/// Per-state soil quantities tracked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Water,
    BulkEc,
    BulkEcDc,
    BulkEcDcTc,
    BulkPerm,
    BulkPermInf,
    WaterEc,
    WaterPerm,
    AirPerm,
    SolidEc,
    SolidPerm,
    Salinity,
    Sand,
    Silt,
    Clay,
    BulkDensity,
    ParticleDensity,
    Cec,
    Orgm,
    Temperature,
    FrequencyEc,
    FrequencyPerm,
    SEc,
    OffsetPerm,
    DryEc,
    SatEc,
}

impl Property {
    pub const ALL: [Self; 26] = [
        Self::Water,
        Self::BulkEc,
        Self::BulkEcDc,
        Self::BulkEcDcTc,
        Self::BulkPerm,
        Self::BulkPermInf,
        Self::WaterEc,
        Self::WaterPerm,
        Self::AirPerm,
        Self::SolidEc,
        Self::SolidPerm,
        Self::Salinity,
        Self::Sand,
        Self::Silt,
        Self::Clay,
        Self::BulkDensity,
        Self::ParticleDensity,
        Self::Cec,
        Self::Orgm,
        Self::Temperature,
        Self::FrequencyEc,
        Self::FrequencyPerm,
        Self::SEc,
        Self::OffsetPerm,
        Self::DryEc,
        Self::SatEc,
    ];

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Model route that produced a predicted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    SenGoode,
    SenGoodeInverse,
    Fu,
    FuInverse,
    Rhoades,
    Hilhorst,
    LongmireSmithEc,
    LongmireSmithEcInverse,
    LongmireSmithP,
    LongmireSmithPInverse,
    WunderlichEc,
    WunderlichEcInverse,
    WunderlichP,
    WunderlichPInverse,
    SheetsHendrickx,
    SheetsHendrickxInverse,
    MalmbergMaryott,
    Olhoeft,
    Stogryn,
    Schjonnen,
    RothMv,
    RothCrim,
    RothW,
    LrMv,
    Lr,
    LrW,
    FractionClosure,
    TextureTable,
    /// Copy between linked EC domains (DC / measurement frequency / 25 °C)
    /// when the state makes them equal.
    DomainShift,
}

/// How an entry obtained its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Provenance {
    /// User-supplied; frozen.
    Measured,
    /// Engine default; the label names the source.
    Default(&'static str),
    Predicted(Method),
    Unresolved,
}

/// USDA soil texture classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureClass {
    Sand,
    LoamySand,
    SandyLoam,
    Loam,
    SiltLoam,
    Silt,
    SandyClayLoam,
    ClayLoam,
    SiltyClayLoam,
    SandyClay,
    Clay,
    SiltyClay,
}

impl TextureClass {
    pub fn parse(name: &str) -> Result<Self, SoilError> {
        let class = match name.trim().to_ascii_lowercase().as_str() {
            "sand" => Self::Sand,
            "loamy sand" => Self::LoamySand,
            "sandy loam" => Self::SandyLoam,
            "loam" => Self::Loam,
            "silt loam" => Self::SiltLoam,
            "silt" => Self::Silt,
            "sandy clay loam" => Self::SandyClayLoam,
            "clay loam" => Self::ClayLoam,
            "silty clay loam" => Self::SiltyClayLoam,
            "sandy clay" => Self::SandyClay,
            "clay" => Self::Clay,
            "silty clay" => Self::SiltyClay,
            _ => return Err(SoilError::UnknownTexture(name.to_owned())),
        };
        Ok(class)
    }

    /// Representative (sand, silt, clay) fractions in percent.
    pub const fn fractions(self) -> (f64, f64, f64) {
        match self {
            Self::Sand => (95.0, 3.0, 2.0),
            Self::LoamySand => (82.0, 12.0, 6.0),
            Self::SandyLoam => (65.0, 25.0, 10.0),
            Self::Loam => (40.0, 40.0, 20.0),
            Self::SiltLoam => (20.0, 65.0, 15.0),
            Self::Silt => (8.0, 86.0, 6.0),
            Self::SandyClayLoam => (60.0, 25.0, 15.0),
            Self::ClayLoam => (30.0, 35.0, 35.0),
            Self::SiltyClayLoam => (10.0, 55.0, 35.0),
            Self::SandyClay => (50.0, 10.0, 40.0),
            Self::Clay => (15.0, 20.0, 65.0),
            Self::SiltyClay => (7.0, 48.0, 45.0),
        }
    }

    /// Locate (sand, silt, clay) percentages in the USDA texture triangle.
    ///
    /// Returns `None` when any fraction is missing or the point falls
    /// outside every class region.
    pub fn classify(sand: f64, silt: f64, clay: f64) -> Option<Self> {
        if sand.is_nan() || silt.is_nan() || clay.is_nan() {
            return None;
        }
        let class = if silt + 1.5 * clay < 15.0 {
            Self::Sand
        } else if silt + 2.0 * clay < 30.0 {
            Self::LoamySand
        } else if (7.0..20.0).contains(&clay) && sand > 52.0
            || clay < 7.0 && silt < 50.0
        {
            Self::SandyLoam
        } else if (7.0..27.0).contains(&clay)
            && (28.0..50.0).contains(&silt)
            && sand <= 52.0
        {
            Self::Loam
        } else if silt >= 50.0 && (12.0..27.0).contains(&clay)
            || (50.0..80.0).contains(&silt) && clay < 12.0
        {
            Self::SiltLoam
        } else if silt >= 80.0 && clay < 12.0 {
            Self::Silt
        } else if (20.0..35.0).contains(&clay) && silt < 28.0 && sand > 45.0 {
            Self::SandyClayLoam
        } else if (27.0..40.0).contains(&clay) && sand > 20.0 && sand <= 45.0 {
            Self::ClayLoam
        } else if (27.0..40.0).contains(&clay) && sand <= 20.0 {
            Self::SiltyClayLoam
        } else if clay >= 35.0 && sand > 45.0 {
            Self::SandyClay
        } else if clay >= 40.0 && silt >= 40.0 {
            Self::SiltyClay
        } else if clay >= 40.0 && sand <= 45.0 {
            Self::Clay
        } else {
            return None;
        };
        Some(class)
    }
}

/// Soil sample set: one entry per property per state, with provenance.
#[derive(Debug, Clone)]
pub struct Soil {
    n: usize,
    values: Vec<Vec<f64>>,
    provenance: Vec<Vec<Provenance>>,
    pub instrument: Option<Instrument>,
    pub texture: Option<TextureClass>,
    /// Fitted depolarization factor of water aggregates.
    pub lw: Option<f64>,
    /// Fitted Rhoades shape constants.
    pub rhoades_e: Option<f64>,
    pub rhoades_f: Option<f64>,
}

impl Soil {
    /// Number of soil states.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, property: Property) -> &[f64] {
        &self.values[property.index()]
    }

    #[inline]
    pub fn value(&self, property: Property, index: usize) -> f64 {
        self.values[property.index()][index]
    }

    #[inline]
    pub fn provenance(&self, property: Property) -> &[Provenance] {
        &self.provenance[property.index()]
    }

    /// True when the entry carries a usable value.
    #[inline]
    pub fn is_resolved(&self, property: Property, index: usize) -> bool {
        !matches!(
            self.provenance[property.index()][index],
            Provenance::Unresolved
        )
    }

    /// Overwrite an entry. Measured entries are frozen; writing a
    /// non-finite value is an error.
    pub fn set(
        &mut self,
        property: Property,
        index: usize,
        value: f64,
        provenance: Provenance,
    ) -> Result<(), SoilError> {
        if !value.is_finite() {
            return Err(SoilError::InvalidValue("non-finite value"));
        }
        let p = property.index();
        if matches!(self.provenance[p][index], Provenance::Measured) {
            return Err(SoilError::MeasuredOverwrite { property, index });
        }
        self.values[p][index] = value;
        self.provenance[p][index] = provenance;
        Ok(())
    }

    /// Write an entry only if it is still unresolved. Non-finite values are
    /// ignored. Returns whether a write happened.
    pub fn fill(
        &mut self,
        property: Property,
        index: usize,
        value: f64,
        provenance: Provenance,
    ) -> bool {
        if !value.is_finite() {
            return false;
        }
        let p = property.index();
        if !matches!(self.provenance[p][index], Provenance::Unresolved) {
            return false;
        }
        self.values[p][index] = value;
        self.provenance[p][index] = provenance;
        true
    }

    /// Clamp predicted or defaulted entries below zero to zero, keeping
    /// their provenance. Measured entries are untouched.
    pub(crate) fn clamp_non_negative(&mut self, property: Property) {
        let p = property.index();
        for i in 0..self.n {
            if self.values[p][i] < 0.0
                && !matches!(self.provenance[p][i], Provenance::Measured)
            {
                self.values[p][i] = 0.0;
            }
        }
    }

    /// Fraction of resolved entries for a property.
    pub fn completeness(&self, property: Property) -> f64 {
        if self.n == 0 {
            return 1.0;
        }
        let resolved = self.provenance[property.index()]
            .iter()
            .filter(|p| !matches!(p, Provenance::Unresolved))
            .count();
        resolved as f64 / self.n as f64
    }

    pub fn unresolved_count(&self, property: Property) -> usize {
        self.provenance[property.index()]
            .iter()
            .filter(|p| matches!(p, Provenance::Unresolved))
            .count()
    }

    /// Full provenance copy, used to detect settling between passes.
    pub fn provenance_snapshot(&self) -> Vec<Vec<Provenance>> {
        self.provenance.clone()
    }

    /// USDA class of one state's resolved texture fractions.
    pub fn classify_texture(&self, index: usize) -> Option<TextureClass> {
        TextureClass::classify(
            self.value(Property::Sand, index),
            self.value(Property::Silt, index),
            self.value(Property::Clay, index),
        )
    }
}

/// Validating builder for [`Soil`].
///
/// Sequences may be given per state or as a scalar that broadcasts to the
/// common length; any other length mismatch is a configuration error. Finite
/// inputs become measured entries, `NaN` stays unresolved.
#[derive(Debug, Default)]
pub struct SoilBuilder {
    seqs: Vec<(Property, Vec<f64>)>,
    instrument: Option<String>,
    texture: Option<String>,
}

impl SoilBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: Property, values: impl Into<Vec<f64>>) -> Self {
        self.seqs.push((property, values.into()));
        self
    }

    pub fn with_scalar(self, property: Property, value: f64) -> Self {
        self.with(property, vec![value])
    }

    pub fn with_instrument(mut self, name: &str) -> Self {
        self.instrument = Some(name.to_owned());
        self
    }

    pub fn with_texture(mut self, name: &str) -> Self {
        self.texture = Some(name.to_owned());
        self
    }

    pub fn build(self) -> Result<Soil, SoilError> {
        let instrument = self
            .instrument
            .as_deref()
            .map(Instrument::parse)
            .transpose()?;
        let texture = self
            .texture
            .as_deref()
            .map(TextureClass::parse)
            .transpose()?;

        let n = self
            .seqs
            .iter()
            .map(|(_, v)| v.len())
            .max()
            .unwrap_or(1)
            .max(1);

        let mut values = vec![vec![f64::NAN; n]; Property::ALL.len()];
        let mut provenance =
            vec![vec![Provenance::Unresolved; n]; Property::ALL.len()];

        for (property, seq) in self.seqs {
            let seq = if seq.len() == n {
                seq
            } else if seq.len() == 1 {
                vec![seq[0]; n]
            } else {
                return Err(SoilError::LengthMismatch {
                    property,
                    expected: n,
                    got: seq.len(),
                });
            };
            let p = property.index();
            for (i, v) in seq.into_iter().enumerate() {
                if v.is_finite() {
                    values[p][i] = v;
                    provenance[p][i] = Provenance::Measured;
                } else if v.is_nan() {
                    values[p][i] = f64::NAN;
                    provenance[p][i] = Provenance::Unresolved;
                } else {
                    return Err(SoilError::InvalidValue(
                        "infinite measurement",
                    ));
                }
            }
        }

        Ok(Soil {
            n,
            values,
            provenance,
            instrument,
            texture,
            lw: None,
            rhoades_e: None,
            rhoades_f: None,
        })
    }
}
