// src/noise/mod.rs

//! Stochastic hardware-noise model applied after each gate.
//!
//! This is a teaching approximation, not a channel simulation: dephasing and
//! relaxation act directly on the `|1⟩` branch of the gate's target qubit,
//! atom loss is bookkeeping only, and a scalar fidelity accumulator decays per
//! gate. Replenishment and error correction (see `crate::correction`) nudge
//! that accumulator back up.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::config::OperationMode;
use crate::core::sim_constants::{
    INITIAL_COHERENCE_TIME, MAX_DEPHASING_ANGLE, RELAXATION_DAMPING, REPLENISHMENT_COHERENCE_BOOST,
    REPLENISHMENT_FIDELITY_GAIN,
};
use crate::core::{StateVector, clamp_fidelity, phase_factor};
use crate::simulation::gates::scale_excited;

/// Per-gate noise parameters. All rates are probabilities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseModel {
    pub dephasing_rate: f64,
    pub relaxation_rate: f64,
    /// Fractional fidelity lost per gate.
    pub gate_error_rate: f64,
    /// Half-width of the uniform jitter added to measurement probabilities.
    pub measurement_error: f64,
    pub atom_loss_rate: f64,
    /// Multiplier applied to fidelity per gate on top of the gate error.
    pub continuous_operation_correction: f64,
}

impl NoiseModel {
    /// No noise at all; fidelity stays at 1.0.
    pub fn ideal() -> Self {
        Self {
            dephasing_rate: 0.0,
            relaxation_rate: 0.0,
            gate_error_rate: 0.0,
            measurement_error: 0.0,
            atom_loss_rate: 0.0,
            continuous_operation_correction: 1.0,
        }
    }

    /// Preset parameters for each operation mode.
    pub fn for_mode(mode: OperationMode) -> Self {
        match mode {
            OperationMode::Ideal => Self::ideal(),
            OperationMode::Noisy => Self {
                dephasing_rate: 0.01,
                relaxation_rate: 0.005,
                gate_error_rate: 0.001,
                measurement_error: 0.02,
                atom_loss_rate: 0.002,
                continuous_operation_correction: 1.0,
            },
            OperationMode::Continuous => Self {
                dephasing_rate: 0.008,
                relaxation_rate: 0.004,
                gate_error_rate: 0.001,
                measurement_error: 0.015,
                atom_loss_rate: 0.005,
                continuous_operation_correction: 1.0002,
            },
            OperationMode::FaultTolerant => Self {
                dephasing_rate: 0.005,
                relaxation_rate: 0.002,
                gate_error_rate: 0.0005,
                measurement_error: 0.01,
                atom_loss_rate: 0.005,
                continuous_operation_correction: 1.0002,
            },
        }
    }

    /// Perturbs `state` after a gate on `qubit` and logs what happened.
    ///
    /// Each process fires independently with its own probability. Relaxation
    /// damps the excited branch without renormalizing, so the state vector's
    /// norm may drop below one until the next measurement collapse.
    pub fn apply<R: Rng>(&self, state: &mut StateVector, qubit: usize, rng: &mut R, log: &mut NoiseLog) {
        if rng.random::<f64>() < self.dephasing_rate {
            let theta = rng.random_range(-MAX_DEPHASING_ANGLE..=MAX_DEPHASING_ANGLE);
            scale_excited(state, qubit, phase_factor(theta));
            log.record(NoiseEventKind::Dephasing, qubit, theta.abs());
        }
        if rng.random::<f64>() < self.relaxation_rate {
            scale_excited(state, qubit, RELAXATION_DAMPING.into());
            log.record(NoiseEventKind::Relaxation, qubit, 1.0 - RELAXATION_DAMPING);
        }
        if rng.random::<f64>() < self.atom_loss_rate {
            log.record(NoiseEventKind::AtomLoss, qubit, 1.0);
        }
    }

    /// Per-gate fidelity decay, clamped to `[0.5, 1.0]`.
    pub fn degrade(&self, fidelity: f64) -> f64 {
        clamp_fidelity(fidelity * (1.0 - self.gate_error_rate) * self.continuous_operation_correction)
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self::ideal()
    }
}

/// Kinds of entries in the noise history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoiseEventKind {
    Dephasing,
    Relaxation,
    AtomLoss,
    /// A lost atom was replaced from the reservoir.
    Replenishment,
    /// An error-correction layer detected a syndrome.
    SyndromeCorrection,
}

/// One entry in the noise history. Shared verbatim with the hardware bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseEvent {
    /// Seconds since the start of the execution that produced the event.
    pub timestamp: f64,
    pub qubit: usize,
    #[serde(rename = "type")]
    pub kind: NoiseEventKind,
    /// Rotation angle, damping loss or fidelity gain depending on `kind`.
    pub magnitude: f64,
}

impl fmt::Display for NoiseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.6}s] {:?} on q{} ({:.4})", self.timestamp, self.kind, self.qubit, self.magnitude)
    }
}

/// Append-only noise history, timestamped relative to the execution start.
#[derive(Debug, Clone)]
pub struct NoiseLog {
    started: Instant,
    events: Vec<NoiseEvent>,
}

impl NoiseLog {
    pub fn new() -> Self {
        Self { started: Instant::now(), events: Vec::new() }
    }

    /// Drops every event and restarts the clock.
    pub fn restart(&mut self) {
        self.started = Instant::now();
        self.events.clear();
    }

    pub fn record(&mut self, kind: NoiseEventKind, qubit: usize, magnitude: f64) {
        let event = NoiseEvent {
            timestamp: self.started.elapsed().as_secs_f64(),
            qubit,
            kind,
            magnitude,
        };
        tracing::trace!(%event, "noise event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[NoiseEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, kind: NoiseEventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}

impl Default for NoiseLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalar health metrics of the simulated register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareMetrics {
    /// Always within `[0.5, 1.0]`.
    pub fidelity: f64,
    pub atom_replenishment_count: usize,
    pub coherence_time: f64,
}

impl HardwareMetrics {
    pub fn new() -> Self {
        Self {
            fidelity: 1.0,
            atom_replenishment_count: 0,
            coherence_time: INITIAL_COHERENCE_TIME,
        }
    }

    /// Raises fidelity by `factor`, never above 1.0.
    pub fn boost_fidelity(&mut self, factor: f64) {
        self.fidelity = clamp_fidelity(self.fidelity * factor);
    }
}

impl Default for HardwareMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces lost atoms until the replenishment counter catches up with the
/// number of atom-loss events in `log`. Returns how many were replaced.
pub fn replenish_atoms(metrics: &mut HardwareMetrics, log: &mut NoiseLog, qubit: usize) -> usize {
    let lost = log.count(NoiseEventKind::AtomLoss);
    let mut replaced = 0;
    while lost > metrics.atom_replenishment_count {
        metrics.atom_replenishment_count += 1;
        metrics.boost_fidelity(REPLENISHMENT_FIDELITY_GAIN);
        metrics.coherence_time += REPLENISHMENT_COHERENCE_BOOST;
        log.record(NoiseEventKind::Replenishment, qubit, REPLENISHMENT_FIDELITY_GAIN);
        replaced += 1;
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sim_constants::FIDELITY_FLOOR;
    use crate::simulation::gates;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn always() -> NoiseModel {
        NoiseModel {
            dephasing_rate: 1.0,
            relaxation_rate: 1.0,
            gate_error_rate: 0.1,
            measurement_error: 0.0,
            atom_loss_rate: 1.0,
            continuous_operation_correction: 1.0,
        }
    }

    #[test]
    fn ideal_model_never_touches_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut log = NoiseLog::new();
        let mut state = StateVector::new(2);
        gates::hadamard(&mut state, 0);
        let before = state.clone();
        let model = NoiseModel::ideal();
        for _ in 0..100 {
            model.apply(&mut state, 0, &mut rng, &mut log);
        }
        assert_eq!(state, before);
        assert!(log.is_empty());
        assert_eq!(model.degrade(1.0), 1.0);
    }

    #[test]
    fn certain_noise_logs_every_process() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut log = NoiseLog::new();
        let mut state = StateVector::new(1);
        gates::hadamard(&mut state, 0);
        always().apply(&mut state, 0, &mut rng, &mut log);

        assert_eq!(log.count(NoiseEventKind::Dephasing), 1);
        assert_eq!(log.count(NoiseEventKind::Relaxation), 1);
        assert_eq!(log.count(NoiseEventKind::AtomLoss), 1);
        // |0> branch untouched, |1> branch damped.
        assert!((state.probability(0) - 0.5).abs() < 1e-12);
        let expected = 0.5 * RELAXATION_DAMPING * RELAXATION_DAMPING;
        assert!((state.probability(1) - expected).abs() < 1e-12);
        let theta = log.events()[0].magnitude;
        assert!(theta <= MAX_DEPHASING_ANGLE);
    }

    #[test]
    fn degrade_is_monotone_and_floored() {
        let model = always();
        let mut fidelity = 1.0;
        for _ in 0..200 {
            let next = model.degrade(fidelity);
            assert!(next <= fidelity);
            assert!(next >= FIDELITY_FLOOR);
            fidelity = next;
        }
        assert_eq!(fidelity, FIDELITY_FLOOR);
    }

    #[test]
    fn correction_factor_cannot_exceed_one() {
        let model = NoiseModel { continuous_operation_correction: 1.5, ..NoiseModel::ideal() };
        assert_eq!(model.degrade(0.9), 1.0);
    }

    #[test]
    fn replenishment_catches_up_with_losses() {
        let mut log = NoiseLog::new();
        let mut metrics = HardwareMetrics { fidelity: 0.9, ..HardwareMetrics::new() };
        log.record(NoiseEventKind::AtomLoss, 0, 1.0);
        log.record(NoiseEventKind::AtomLoss, 1, 1.0);

        assert_eq!(replenish_atoms(&mut metrics, &mut log, 1), 2);
        assert_eq!(metrics.atom_replenishment_count, 2);
        assert!(metrics.fidelity > 0.9);
        assert!((metrics.coherence_time - (INITIAL_COHERENCE_TIME + 2.0 * REPLENISHMENT_COHERENCE_BOOST)).abs() < 1e-12);
        assert_eq!(log.count(NoiseEventKind::Replenishment), 2);

        // Nothing new lost, nothing replaced.
        assert_eq!(replenish_atoms(&mut metrics, &mut log, 1), 0);
    }

    #[test]
    fn replenishment_never_exceeds_full_fidelity() {
        let mut log = NoiseLog::new();
        let mut metrics = HardwareMetrics::new();
        for _ in 0..10 {
            log.record(NoiseEventKind::AtomLoss, 0, 1.0);
        }
        replenish_atoms(&mut metrics, &mut log, 0);
        assert_eq!(metrics.fidelity, 1.0);
    }

    #[test]
    fn noise_event_wire_shape() {
        let event = NoiseEvent { timestamp: 0.5, qubit: 2, kind: NoiseEventKind::AtomLoss, magnitude: 1.0 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "atomLoss");
        assert_eq!(json["qubit"], 2);
    }
}
