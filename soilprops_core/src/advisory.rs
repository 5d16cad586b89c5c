//! Advisory channel of the resolution engine.
//!
//! Recoverable conditions (a fit without enough calibration points, a
//! rejected regression, samples left unresolved) never abort a run; they are
//! collected here and surfaced once through `tracing`.

use crate::soil::Property;

#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryKind {
    /// A fitted route needed more co-measured states than were available.
    InsufficientCalibration { needed: usize, got: usize },
    /// Calibration values span less than the similarity tolerance.
    DegenerateRange,
    /// Fit quality fell below the configured R² gate.
    FitRejected { r2: f64, min: f64 },
    /// No measurement frequency; permittivity routes are blocked.
    MissingFrequency,
    /// A required input property was missing for some states.
    MissingInput { input: Property },
    /// A minimizer hit its iteration cap; the best estimate was used.
    NonConvergence,
    /// Entries still unresolved after the final pass.
    Unresolved { count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub property: Property,
    pub kind: AdvisoryKind,
}

/// Outcome of a resolution run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub advisories: Vec<Advisory>,
    /// Passes executed over the resolver list.
    pub passes: usize,
    /// Whether a pass completed without any provenance change.
    pub settled: bool,
}

impl Report {
    /// Record an advisory, deduplicating repeats across passes.
    pub fn push(&mut self, property: Property, kind: AdvisoryKind) {
        let advisory = Advisory { property, kind };
        if self.advisories.contains(&advisory) {
            return;
        }
        tracing::warn!(
            property = ?advisory.property,
            kind = ?advisory.kind,
            "resolution advisory"
        );
        self.advisories.push(advisory);
    }

    pub fn advisories_for(&self, property: Property) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().filter(move |a| a.property == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_deduplicates() {
        let mut report = Report::default();
        report.push(Property::Water, AdvisoryKind::DegenerateRange);
        report.push(Property::Water, AdvisoryKind::DegenerateRange);
        report.push(Property::BulkEc, AdvisoryKind::DegenerateRange);
        assert_eq!(report.advisories.len(), 2);
        assert_eq!(report.advisories_for(Property::Water).count(), 1);
    }
}
