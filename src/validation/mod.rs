// src/validation/mod.rs

//! Sanity checks on state vectors and probability distributions.
//!
//! These are diagnostics, not part of the execution contract: the circuit
//! uses them to flag numeric drift in ideal mode, and tests use them to
//! assert unitarity.

use thiserror::Error;

use crate::core::StateVector;
use crate::core::sim_constants::NORM_TOLERANCE;

/// Ways a state vector can fail a sanity check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("State vector normalization failed: Σ|amp|² = {norm_sqr} (tolerance {tolerance})")]
    NotNormalized { norm_sqr: f64, tolerance: f64 },

    #[error("Amplitude {index} is not finite")]
    NonFinite { index: usize },
}

/// Σ|amp|² of the state, i.e. the total probability.
pub fn total_probability(state: &StateVector) -> f64 {
    state.norm_sqr()
}

/// Checks that Σ|amp|² is within `tolerance` (default 1e-9) of one.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<(), ValidationError> {
    let tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sqr = total_probability(state);
    if (norm_sqr - 1.0).abs() > tolerance {
        Err(ValidationError::NotNormalized { norm_sqr, tolerance })
    } else {
        Ok(())
    }
}

/// Checks that no amplitude is NaN or infinite.
pub fn check_finite(state: &StateVector) -> Result<(), ValidationError> {
    match state.amplitudes().iter().position(|c| !c.is_finite()) {
        Some(index) => Err(ValidationError::NonFinite { index }),
        None => Ok(()),
    }
}

/// Runs every check. Normalization uses `norm_tolerance` or the default.
pub fn validate_state(state: &StateVector, norm_tolerance: Option<f64>) -> Result<(), ValidationError> {
    check_finite(state)?;
    check_normalization(state, norm_tolerance)?;
    Ok(())
}
