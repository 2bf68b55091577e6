//! phase::table — scored phase hypotheses.
use ndarray::Array1;

/// Phases closer than this (days) are the same hypothesis.
pub const DUPLICATE_TOL: f64 = 1e-6;

/// Phase → prediction error (%) with tolerance-based de-duplication.
///
/// A second insert of an existing phase is skipped; the first score stays.
#[derive(Debug, Clone, PartialEq)]
pub struct HypothesisTable {
    entries: Vec<(f64, f64)>,
    tol: f64,
}

impl Default for HypothesisTable {
    fn default() -> Self {
        Self::with_tolerance(DUPLICATE_TOL)
    }
}

impl HypothesisTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tol: f64) -> Self {
        Self { entries: Vec::new(), tol }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, phase: f64) -> bool {
        self.entries.iter().any(|&(p, _)| (p - phase).abs() <= self.tol)
    }

    /// Record `error` for `phase`; returns `false` if `phase` was already
    /// scored.
    pub fn insert(&mut self, phase: f64, error: f64) -> bool {
        if self.contains(phase) {
            return false;
        }
        self.entries.push((phase, error));
        true
    }

    /// Lowest-error hypothesis as `(phase, error)`; ties keep the earliest
    /// insert.
    pub fn best(&self) -> Option<(f64, f64)> {
        self.entries.iter().copied().fold(None, |best, (p, e)| match best {
            Some((_, be)) if be <= e => best,
            _ => Some((p, e)),
        })
    }

    /// `(phases, errors)` sorted by phase.
    pub fn samples(&self) -> (Array1<f64>, Array1<f64>) {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (phases, errors): (Vec<f64>, Vec<f64>) = sorted.into_iter().unzip();
        (Array1::from(phases), Array1::from(errors))
    }
}
