// src/config/mod.rs

//! Caller-supplied configuration.
//!
//! Nothing here is read from the environment or disk: the tier-gating layer
//! picks an [`OperationMode`], optionally overrides the noise parameters and
//! hands the result over as a [`CircuitConfig`], possibly as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::sim_constants::DEFAULT_CANCEL_CHECK_INTERVAL;
use crate::correction::ErrorCorrectionLayer;
use crate::noise::NoiseModel;

/// Hardware fidelity profile a circuit runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationMode {
    /// Noise-free textbook simulation.
    #[default]
    Ideal,
    /// Gate noise without any recovery mechanisms.
    Noisy,
    /// Gate noise plus atom replenishment.
    Continuous,
    /// Gate noise, atom replenishment and error-correction layers.
    FaultTolerant,
}

impl OperationMode {
    /// Largest register a circuit in this mode may allocate.
    pub fn max_qubits(&self) -> usize {
        match self {
            OperationMode::Ideal => 16,
            OperationMode::Noisy => 12,
            OperationMode::Continuous => 16,
            OperationMode::FaultTolerant => 20,
        }
    }

    pub fn noise_enabled(&self) -> bool {
        !matches!(self, OperationMode::Ideal)
    }

    pub fn replenishment_enabled(&self) -> bool {
        matches!(self, OperationMode::Continuous | OperationMode::FaultTolerant)
    }

    pub fn error_correction_enabled(&self) -> bool {
        matches!(self, OperationMode::FaultTolerant)
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationMode::Ideal => "ideal",
            OperationMode::Noisy => "noisy",
            OperationMode::Continuous => "continuous",
            OperationMode::FaultTolerant => "fault-tolerant",
        };
        f.write_str(name)
    }
}

/// Everything needed to construct a [`Circuit`](crate::Circuit) besides its gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircuitConfig {
    /// Label carried into exports.
    pub name: String,
    pub mode: OperationMode,
    /// Overrides the mode's preset noise parameters when set.
    pub noise_model: Option<NoiseModel>,
    /// Only consulted in [`OperationMode::FaultTolerant`].
    pub error_correction_layers: Vec<ErrorCorrectionLayer>,
    /// Seed for the circuit's private RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Gates between cooperative cancellation checks.
    pub cancel_check_interval: usize,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Circuit".to_string(),
            mode: OperationMode::default(),
            noise_model: None,
            error_correction_layers: Vec::new(),
            seed: None,
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }
}

impl CircuitConfig {
    pub fn new(mode: OperationMode) -> Self {
        Self { mode, ..Self::default() }
    }

    /// The noise parameters the circuit will actually use.
    pub fn effective_noise_model(&self) -> NoiseModel {
        self.noise_model.clone().unwrap_or_else(|| NoiseModel::for_mode(self.mode))
    }

    /// Parses a config handed over as JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
