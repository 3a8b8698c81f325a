// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod amplitude;
pub mod error;
pub mod state;

// Re-export public types for convenient access via `qubitlab::core::TypeName`
pub use amplitude::{Amplitude, phase_factor};
pub use error::{Result, SimError};
pub use state::StateVector;

pub mod constants;
pub use constants::{clamp_fidelity, sim_constants}; // Re-export
