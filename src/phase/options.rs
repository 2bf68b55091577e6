//! phase::options — admissible range, pass schedule and downstream settings.
use crate::{
    gp::GpOptions,
    phase::{
        errors::{PhaseError, PhaseResult},
        grid::{RANGE_ATOL, RANGE_RTOL},
        table::DUPLICATE_TOL,
    },
    surface::SurfaceOptions,
};

/// Earliest admissible phase (days).
pub const DEFAULT_LOWER: f64 = -15.0;
/// Latest admissible phase (days).
pub const DEFAULT_UPPER: f64 = 33.0;
/// Step of the dense grid the smoothed curve is evaluated on.
pub const DEFAULT_DENSE_STEP: f64 = 0.05;
/// Error (%) assumed for hypotheses with no reported uncertainty.
pub const DEFAULT_NAN_FILL: f64 = 0.2;

/// One search pass: grid step and window half-width around the current
/// best hypothesis (`None` means the whole admissible range).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSpec {
    pub step: f64,
    pub half_width: Option<f64>,
}

impl PassSpec {
    pub fn full_range(step: f64) -> Self {
        Self { step, half_width: None }
    }

    pub fn around_best(step: f64, half_width: f64) -> Self {
        Self { step, half_width: Some(half_width) }
    }

    /// Window for this pass. A windowed pass with no prior best falls back
    /// to the whole range.
    pub fn window(&self, lower: f64, upper: f64, best: Option<f64>) -> (f64, f64) {
        match (self.half_width, best) {
            (Some(w), Some(b)) => ((b - w).max(lower), (b + w).min(upper)),
            _ => (lower, upper),
        }
    }

    fn validate(&self) -> PhaseResult<()> {
        check_positive("pass.step", self.step)?;
        if let Some(w) = self.half_width {
            check_positive("pass.half_width", w)?;
        }
        Ok(())
    }
}

/// Ordered, non-empty list of search passes.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSchedule {
    passes: Vec<PassSpec>,
}

impl PassSchedule {
    /// Errors
    /// ------
    /// - [`PhaseError::EmptySchedule`] for no passes.
    /// - [`PhaseError::InvalidOption`] for a non-positive step or width.
    pub fn new(passes: Vec<PassSpec>) -> PhaseResult<Self> {
        let schedule = Self { passes };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn passes(&self) -> &[PassSpec] {
        &self.passes
    }

    fn validate(&self) -> PhaseResult<()> {
        if self.passes.is_empty() {
            return Err(PhaseError::EmptySchedule);
        }
        self.passes.iter().try_for_each(PassSpec::validate)
    }
}

impl Default for PassSchedule {
    /// Coarse 2 d over the full range, medium 0.5 d over ±4 d, fine 0.1 d
    /// over ±1 d.
    fn default() -> Self {
        Self {
            passes: vec![
                PassSpec::full_range(2.0),
                PassSpec::around_best(0.5, 4.0),
                PassSpec::around_best(0.1, 1.0),
            ],
        }
    }
}

/// PhaseSearchOptions — configuration for both phase estimators.
///
/// Fields
/// ------
/// - `lower`, `upper`: admissible phase range (days). The paired estimator
///   shrinks `upper` by the phase separation.
/// - `schedule`: coarse-to-fine passes.
/// - `range_rtol`, `range_atol`: endpoint tolerances for every grid.
/// - `duplicate_tol`: hypotheses closer than this are scored once.
/// - `dense_step`: step of the grid the smoothed curve is evaluated on.
/// - `nan_fill`: noise level (%) fed to the smoother for every sample.
/// - `surface`, `gp`: settings forwarded to the predictor and smoother.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSearchOptions {
    pub lower: f64,
    pub upper: f64,
    pub schedule: PassSchedule,
    pub range_rtol: f64,
    pub range_atol: f64,
    pub duplicate_tol: f64,
    pub dense_step: f64,
    pub nan_fill: f64,
    pub surface: SurfaceOptions,
    pub gp: GpOptions,
}

impl PhaseSearchOptions {
    /// Build validated options with default tolerances.
    ///
    /// Errors
    /// ------
    /// - [`PhaseError::EmptyRange`] unless `lower < upper`.
    /// - [`PhaseError::InvalidOption`] for non-finite bounds or a
    ///   non-positive `dense_step` / `nan_fill`.
    pub fn new(
        lower: f64, upper: f64, schedule: PassSchedule, dense_step: f64, nan_fill: f64,
        surface: SurfaceOptions, gp: GpOptions,
    ) -> PhaseResult<Self> {
        let opts = Self {
            lower,
            upper,
            schedule,
            range_rtol: RANGE_RTOL,
            range_atol: RANGE_ATOL,
            duplicate_tol: DUPLICATE_TOL,
            dense_step,
            nan_fill,
            surface,
            gp,
        };
        opts.validate()?;
        Ok(opts)
    }

    /// Re-check every field; the estimators call this since fields are
    /// public.
    pub fn validate(&self) -> PhaseResult<()> {
        check_finite("lower", self.lower)?;
        check_finite("upper", self.upper)?;
        if self.lower >= self.upper {
            return Err(PhaseError::EmptyRange { lower: self.lower, upper: self.upper });
        }
        self.schedule.validate()?;
        check_non_negative("range_rtol", self.range_rtol)?;
        check_non_negative("range_atol", self.range_atol)?;
        check_non_negative("duplicate_tol", self.duplicate_tol)?;
        check_positive("dense_step", self.dense_step)?;
        check_positive("nan_fill", self.nan_fill)?;
        if self.surface.n_passes == 0 {
            return Err(PhaseError::InvalidOption {
                field: "surface.n_passes",
                value: 0.0,
                reason: "at least one pass is required",
            });
        }
        Ok(())
    }
}

impl Default for PhaseSearchOptions {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
            schedule: PassSchedule::default(),
            range_rtol: RANGE_RTOL,
            range_atol: RANGE_ATOL,
            duplicate_tol: DUPLICATE_TOL,
            dense_step: DEFAULT_DENSE_STEP,
            nan_fill: DEFAULT_NAN_FILL,
            surface: SurfaceOptions::default(),
            gp: GpOptions::default(),
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> PhaseResult<()> {
    if !value.is_finite() {
        return Err(PhaseError::InvalidOption { field, value, reason: "must be finite" });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> PhaseResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PhaseError::InvalidOption { field, value, reason: "must be finite and > 0" });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> PhaseResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PhaseError::InvalidOption { field, value, reason: "must be finite and >= 0" });
    }
    Ok(())
}
