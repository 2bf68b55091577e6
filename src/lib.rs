//! snail — supernova phase estimation from spectra.
//!
//! Purpose
//! -------
//! Estimate the phase (days relative to maximum light) of one supernova
//! spectrum, or of two spectra with a known separation, by comparing the
//! observations against spectra predicted at hypothesized phases by a
//! trained sequence model.
//!
//! Key behaviors
//! -------------
//! - [`basis`] encodes spectra as FPCA coefficient matrices and decodes
//!   them back to flux.
//! - [`surface`] runs a Monte-Carlo dropout ensemble of the sequence model
//!   and returns mean and standard deviation per query phase.
//! - [`phase`] searches the admissible phase range coarse to fine, scores
//!   hypotheses by masked MAPE, and smooths the scores with [`gp`].
//! - [`optimization`] provides the L-BFGS log-likelihood maximizer the GP
//!   uses for its hyperparameters.
//!
//! Invariants & assumptions
//! ------------------------
//! - Spectra cross component boundaries on the fixed 1700-point grid and
//!   with unit mean flux; [`spectrum`] enforces this.
//! - The basis set and model are shared read-only and passed explicitly.
//! - Every failure is fatal to the call and classified by
//!   [`errors::ErrorKind`].
//!
//! Conventions
//! -----------
//! - Phases are days; wavelengths are Å; errors are percent.
//! - The crate emits `tracing` events and never installs a subscriber.
//!
//! Downstream usage
//! ----------------
//! - Implement [`surface::SequenceModel`] for the trained network, load a
//!   [`basis::BasisSet`], then call [`phase::estimate_single_phase`] or
//!   [`phase::estimate_paired_phase`].
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module with synthetic cosine bases and
//!   stub models; `tests/` runs the whole pipeline.

pub mod basis;
pub mod errors;
pub mod gp;
pub mod optimization;
pub mod phase;
pub mod spectrum;
pub mod surface;
