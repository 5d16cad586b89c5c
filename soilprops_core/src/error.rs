use crate::soil::Property;
use thiserror::Error;

/// Fatal configuration errors of the resolution engine.
///
/// Anything recoverable (missing inputs, rejected fits, non-convergence) is
/// reported through [`crate::advisory::Report`] instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SoilError {
    #[error("{property:?} has {got} values, expected 1 or {expected}")]
    LengthMismatch {
        property: Property,
        expected: usize,
        got: usize,
    },
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),
    #[error("unknown texture class: {0}")]
    UnknownTexture(String),
    #[error("texture fractions at state {index} sum to {sum}, expected 100")]
    TextureSum { index: usize, sum: f64 },
    #[error("cannot overwrite measured {property:?} at state {index}")]
    MeasuredOverwrite { property: Property, index: usize },
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report as ErrorReport;
