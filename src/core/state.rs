// src/core/state.rs

use num_complex::Complex;
use num_traits::Zero; // For Complex::zero()
use serde::{Deserialize, Serialize};
use std::fmt;

use super::amplitude::Amplitude;
use super::error::SimError;

/// Dense amplitude vector describing the full superposition of an n-qubit register.
///
/// Index `i` is the basis state whose bit `k` is the value of qubit `k`
/// (little-endian), so the vector always has `2^n` entries. Outside of a
/// collapse in progress (or noise damping) the squared magnitudes sum to one.
///
/// On the wire the vector is a plain list of `[re, im]` pairs; decoding rejects
/// lengths that are not a power of two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] // Avoid Eq for floating-point complex numbers
#[serde(try_from = "Vec<Amplitude>", into = "Vec<Amplitude>")]
pub struct StateVector {
    amplitudes: Vec<Amplitude>,
}

impl StateVector {
    /// Creates the `|0…0⟩` state for `qubit_count` qubits.
    ///
    /// Bounding `qubit_count` is the caller's job; the circuit clamps it to the
    /// operation mode's maximum before getting here.
    pub fn new(qubit_count: usize) -> Self {
        let mut amplitudes = vec![Complex::zero(); 1usize << qubit_count];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self { amplitudes }
    }

    /// Wraps an existing amplitude buffer. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Amplitude>) -> Result<Self, SimError> {
        if amplitudes.is_empty() || !amplitudes.len().is_power_of_two() {
            return Err(SimError::InvalidDimension { dim: amplitudes.len() });
        }
        Ok(Self { amplitudes })
    }

    /// Read-only view of the amplitudes.
    pub fn amplitudes(&self) -> &[Amplitude] {
        &self.amplitudes
    }

    /// Mutable access for the gate library, measurement engine and noise model.
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Amplitude] {
        &mut self.amplitudes
    }

    /// Number of basis states (`2^n`).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits the vector describes.
    pub fn qubit_count(&self) -> usize {
        self.amplitudes.len().trailing_zeros() as usize
    }

    /// Σ|amp|² over the whole vector.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Probability of observing basis state `index`, or `0.0` past the end.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, |c| c.norm_sqr())
    }

    /// Probability of every basis state, in index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }
}

impl TryFrom<Vec<Amplitude>> for StateVector {
    type Error = SimError;

    fn try_from(amplitudes: Vec<Amplitude>) -> Result<Self, Self::Error> {
        Self::from_amplitudes(amplitudes)
    }
}

impl From<StateVector> for Vec<Amplitude> {
    fn from(state: StateVector) -> Self {
        state.amplitudes
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|ψ⟩[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
