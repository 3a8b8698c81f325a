// src/simulation/results.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::StateVector;
use crate::noise::{HardwareMetrics, NoiseEvent};

/// Immutable snapshot of a finished execution.
///
/// Everything a renderer or the achievement layer needs is copied out of the
/// circuit, so holding a result never aliases the live state vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Outcome bit per measured qubit. Later measurements overwrite earlier ones.
    pub measurement_results: BTreeMap<usize, u8>,
    pub final_state: StateVector,
    pub metrics: HardwareMetrics,
    pub noise_events: Vec<NoiseEvent>,
    pub gates_executed: usize,
    pub syndromes_detected: usize,
    pub execution_time_ms: f64,
}

impl ExecutionResult {
    /// Outcome recorded for `qubit`, if it was measured.
    pub fn outcome(&self, qubit: usize) -> Option<u8> {
        self.measurement_results.get(&qubit).copied()
    }

    pub fn fidelity(&self) -> f64 {
        self.metrics.fidelity
    }

    /// Probability of each basis state of the final state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.final_state.probabilities()
    }

    /// Measured bits as a string, highest measured qubit first.
    ///
    /// Unmeasured qubits below the highest measured one are written as `-`.
    /// Empty when nothing was measured.
    pub fn bitstring(&self) -> String {
        let Some(&highest) = self.measurement_results.keys().next_back() else {
            return String::new();
        };
        (0..=highest)
            .rev()
            .map(|q| match self.outcome(q) {
                Some(0) => '0',
                Some(_) => '1',
                None => '-',
            })
            .collect()
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Execution Results:")?;
        writeln!(
            f,
            "  {} gates in {:.3} ms, fidelity {:.4}",
            self.gates_executed, self.execution_time_ms, self.metrics.fidelity
        )?;
        if self.measurement_results.is_empty() {
            writeln!(f, "  No qubits were measured.")?;
        } else {
            writeln!(f, "  Measurements:")?;
            for (qubit, bit) in &self.measurement_results {
                writeln!(f, "    q{}: {}", qubit, bit)?;
            }
        }
        if !self.noise_events.is_empty() {
            writeln!(f, "  Noise events: {}", self.noise_events.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(measurements: &[(usize, u8)]) -> ExecutionResult {
        ExecutionResult {
            measurement_results: measurements.iter().copied().collect(),
            final_state: StateVector::new(3),
            metrics: HardwareMetrics::new(),
            noise_events: Vec::new(),
            gates_executed: 0,
            syndromes_detected: 0,
            execution_time_ms: 0.0,
        }
    }

    #[test]
    fn bitstring_puts_qubit_zero_last() {
        assert_eq!(result_with(&[(0, 1), (1, 0), (2, 0)]).bitstring(), "001");
        assert_eq!(result_with(&[(0, 0), (1, 1)]).bitstring(), "10");
    }

    #[test]
    fn bitstring_marks_unmeasured_qubits() {
        assert_eq!(result_with(&[(0, 1), (2, 0)]).bitstring(), "0-1");
        assert_eq!(result_with(&[(1, 1)]).bitstring(), "1-");
        assert_eq!(result_with(&[]).bitstring(), "");
    }

    #[test]
    fn display_lists_measurements() {
        let text = result_with(&[(0, 1)]).to_string();
        assert!(text.contains("q0: 1"), "{}", text);
    }
}
