// src/correction/mod.rs

//! Error-correction layers.
//!
//! This is deliberately not a decoder. Each configured layer draws one random
//! number per gate step and, when it falls under the layer's threshold, counts
//! as a detected-and-corrected syndrome: the fidelity metric is nudged up and
//! an event is logged. Amplitudes are never touched, and which error was
//! corrected is not modelled.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::sim_constants::SYNDROME_FIDELITY_GAIN;
use crate::noise::{HardwareMetrics, NoiseEventKind, NoiseLog};

/// Code family a layer claims to implement. Only affects the default qubit
/// counts and the exported description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorrectionCode {
    Repetition,
    Steane,
    Shor,
    Surface,
}

impl CorrectionCode {
    /// `(data_qubits, syndrome_qubits)` of the smallest textbook instance.
    pub fn qubit_counts(&self) -> (usize, usize) {
        match self {
            CorrectionCode::Repetition => (3, 2),
            CorrectionCode::Steane => (7, 6),
            CorrectionCode::Shor => (9, 8),
            CorrectionCode::Surface => (9, 8), // distance 3
        }
    }

    /// A layer of this code with the default detection threshold.
    pub fn default_layer(&self) -> ErrorCorrectionLayer {
        let (data_qubits, syndrome_qubits) = self.qubit_counts();
        ErrorCorrectionLayer {
            code: *self,
            syndrome_qubits,
            data_qubits,
            threshold: ErrorCorrectionLayer::DEFAULT_THRESHOLD,
        }
    }
}

impl fmt::Display for CorrectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorrectionCode::Repetition => "repetition",
            CorrectionCode::Steane => "steane",
            CorrectionCode::Shor => "shor",
            CorrectionCode::Surface => "surface",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCorrectionLayer {
    pub code: CorrectionCode,
    pub syndrome_qubits: usize,
    pub data_qubits: usize,
    /// Per-step probability that the layer reports a syndrome.
    pub threshold: f64,
}

impl ErrorCorrectionLayer {
    pub const DEFAULT_THRESHOLD: f64 = 0.01;

    pub fn new(code: CorrectionCode, data_qubits: usize, syndrome_qubits: usize, threshold: f64) -> Self {
        Self { code, syndrome_qubits, data_qubits, threshold }
    }

    /// Draws once; `true` means a syndrome was detected this step.
    pub fn check<R: Rng>(&self, rng: &mut R) -> bool {
        rng.random::<f64>() < self.threshold
    }
}

/// Runs every layer once for the current gate step and returns how many
/// reported a syndrome.
pub fn apply_error_correction<R: Rng>(
    layers: &[ErrorCorrectionLayer],
    metrics: &mut HardwareMetrics,
    rng: &mut R,
    log: &mut NoiseLog,
    qubit: usize,
) -> usize {
    let mut detected = 0;
    for layer in layers {
        if layer.check(rng) {
            metrics.boost_fidelity(SYNDROME_FIDELITY_GAIN);
            log.record(NoiseEventKind::SyndromeCorrection, qubit, SYNDROME_FIDELITY_GAIN);
            detected += 1;
        }
    }
    detected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_layers_carry_code_sizes() {
        let layer = CorrectionCode::Steane.default_layer();
        assert_eq!((layer.data_qubits, layer.syndrome_qubits), (7, 6));
        assert_eq!(layer.threshold, ErrorCorrectionLayer::DEFAULT_THRESHOLD);
    }

    #[test]
    fn certain_layers_always_fire() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut log = NoiseLog::new();
        let mut metrics = HardwareMetrics { fidelity: 0.8, ..HardwareMetrics::new() };
        let layers = vec![
            ErrorCorrectionLayer::new(CorrectionCode::Surface, 9, 8, 1.0),
            ErrorCorrectionLayer::new(CorrectionCode::Repetition, 3, 2, 1.0),
        ];
        assert_eq!(apply_error_correction(&layers, &mut metrics, &mut rng, &mut log, 0), 2);
        assert!((metrics.fidelity - 0.8 * SYNDROME_FIDELITY_GAIN * SYNDROME_FIDELITY_GAIN).abs() < 1e-12);
        assert_eq!(log.count(NoiseEventKind::SyndromeCorrection), 2);
    }

    #[test]
    fn zero_threshold_never_fires() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut log = NoiseLog::new();
        let mut metrics = HardwareMetrics::new();
        let layers = vec![ErrorCorrectionLayer::new(CorrectionCode::Shor, 9, 8, 0.0)];
        for _ in 0..100 {
            assert_eq!(apply_error_correction(&layers, &mut metrics, &mut rng, &mut log, 0), 0);
        }
        assert!(log.is_empty());
    }

    #[test]
    fn fidelity_stays_capped() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut log = NoiseLog::new();
        let mut metrics = HardwareMetrics::new();
        let layers = vec![ErrorCorrectionLayer::new(CorrectionCode::Surface, 9, 8, 1.0); 4];
        for _ in 0..50 {
            apply_error_correction(&layers, &mut metrics, &mut rng, &mut log, 0);
        }
        assert_eq!(metrics.fidelity, 1.0);
    }
}
