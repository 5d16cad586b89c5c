#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Soil petrophysical property resolution engine.
//!
//! A [`Soil`] is built from whatever was measured in the field; [`predict`]
//! then fills in every property those measurements support, choosing model
//! routes per state and recording how each value was obtained in its
//! [`Provenance`]. Measured values are never overwritten. Recoverable
//! shortfalls (not enough calibration states, rejected fits, missing
//! inputs) surface as advisories on the returned [`Report`]; only malformed
//! input or configuration is an error.
//!
//! Units follow the conventions of `soilprops_models`: volumetric water
//! content in m³/m³, conductivities in S/m, temperature in K, frequencies
//! in Hz, densities in g/cm³, texture fractions in percent and salinity in
//! mol/L.
//!
//! ```no_run
//! use soilprops_core::{predict, Property, SoilBuilder};
//! use soilprops_config::EngineCfg;
//!
//! # fn main() -> eyre::Result<()> {
//! let mut soil = SoilBuilder::new()
//!     .with(Property::BulkPerm, vec![11.5, 14.8, 19.2])
//!     .with_scalar(Property::Clay, 22.0)
//!     .with_scalar(Property::BulkDensity, 1.45)
//!     .with_instrument("TDR")
//!     .build()?;
//! let report = predict(&mut soil, &EngineCfg::default())?;
//! println!("water: {:?}", soil.get(Property::Water));
//! println!("advisories: {}", report.advisories.len());
//! # Ok(())
//! # }
//! ```

pub mod advisory;
pub mod error;
pub mod instruments;
pub mod optimize;
pub mod orchestrator;
pub mod resolvers;
pub mod soil;
pub mod stats;

pub use advisory::{Advisory, AdvisoryKind, Report};
pub use error::{Result, SoilError};
pub use instruments::Instrument;
pub use orchestrator::predict;
pub use soil::{Method, Property, Provenance, Soil, SoilBuilder, TextureClass};
pub use soilprops_config::EngineCfg;
