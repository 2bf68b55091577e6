//! phase — coarse-to-fine phase estimation for one or two spectra.
//!
//! Purpose
//! -------
//! Estimate when a spectrum was taken, in days relative to maximum light,
//! by asking the surface predictor what the spectrum would look like at
//! each hypothesized phase and scoring the prediction against the
//! observation.
//!
//! Key behaviors
//! -------------
//! - Scores are masked MAPE in percent ([`cost::masked_mape`]).
//! - The default schedule scans the admissible range at 2 d, then ±4 d
//!   around the best at 0.5 d, then ±1 d at 0.1 d. Each phase is scored
//!   once ([`table::HypothesisTable`]).
//! - Every grid is endpoint-inclusive ([`grid::inclusive_range`]).
//! - The scored samples are smoothed by the GP onto a 0.05 d grid.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input spectra are normalized and on the fixed wavelength grid.
//! - For a pair, the first spectrum is the earlier one and `Δ ≥ 0`.
//!
//! Downstream usage
//! ----------------
//! - Call [`estimate_single_phase`] or [`estimate_paired_phase`] and pick
//!   an estimate from [`PhaseEstimate`]; the crate does not commit to one.
//!
//! Testing notes
//! -------------
//! - Tests plant a phase in a stub model whose error is V-shaped around it
//!   and check that both the samples and the smoothed curve recover it.

pub mod cost;
pub mod errors;
pub mod grid;
pub mod options;
pub mod search;
pub mod table;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::cost::masked_mape;
pub use self::errors::{PhaseError, PhaseResult};
pub use self::grid::{inclusive_range, inclusive_range_with_tol};
pub use self::options::{PassSchedule, PassSpec, PhaseSearchOptions};
pub use self::search::{
    PhaseEstimate, PhaseSamples, SmoothedCurve, estimate_paired_phase, estimate_single_phase,
};
pub use self::table::HypothesisTable;
