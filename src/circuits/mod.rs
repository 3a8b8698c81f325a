// src/circuits/mod.rs

//! The circuit orchestrator.
//!
//! A [`Circuit`] owns its register (state vector, measurement results, noise
//! history, fidelity metrics), its gate list, its noise and error-correction
//! configuration and its own RNG. [`Circuit::execute`] replays the gate list
//! from `|0…0⟩`, running each gate through the gate library, then the noise
//! model, atom replenishment and error correction as the operation mode
//! allows.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{CircuitConfig, OperationMode};
use crate::core::{Result, SimError, StateVector};
use crate::correction::{ErrorCorrectionLayer, apply_error_correction};
use crate::noise::{HardwareMetrics, NoiseEvent, NoiseLog, NoiseModel, replenish_atoms};
use crate::operations::{Gate, GateKind};
use crate::simulation::{
    CancelHandle, ExecutionObserver, ExecutionResult, NoopObserver, StepReport, gates, measurement,
};
use crate::validation::check_normalization;

/// Where a circuit is in its execute/reset cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitStatus {
    /// Gates may be edited; derived state is either fresh or stale.
    Idle,
    /// `execute` is running.
    Executing,
    /// Derived state reflects the full gate list.
    Completed,
}

impl fmt::Display for CircuitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CircuitStatus::Idle => "idle",
            CircuitStatus::Executing => "executing",
            CircuitStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// An ordered gate list plus the simulated register it runs on.
pub struct Circuit {
    name: String,
    qubit_count: usize,
    mode: OperationMode,

    /// Append order is execution order.
    gates: Vec<Gate>,

    state: StateVector,
    measurement_results: BTreeMap<usize, u8>,
    metrics: HardwareMetrics,
    noise_log: NoiseLog,
    syndromes_detected: usize,

    noise_model: NoiseModel,
    error_correction_layers: Vec<ErrorCorrectionLayer>,

    status: CircuitStatus,
    last_execution_time: Option<Duration>,
    rng: StdRng,
    cancel: CancelHandle,
    cancel_check_interval: usize,
}

impl Circuit {
    /// Creates an empty circuit with the mode's preset noise model and an
    /// OS-seeded RNG.
    pub fn new(qubit_count: usize, mode: OperationMode) -> Self {
        Self::from_config(qubit_count, CircuitConfig::new(mode))
    }

    /// Creates an empty circuit from an explicit configuration.
    pub fn from_config(qubit_count: usize, config: CircuitConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(qubit_count, config, rng)
    }

    /// Creates an empty circuit that draws all randomness from `rng`.
    ///
    /// `qubit_count` is clamped to the mode's maximum; `config.seed` is ignored.
    pub fn with_rng(qubit_count: usize, config: CircuitConfig, rng: StdRng) -> Self {
        let max = config.mode.max_qubits();
        let qubit_count = if qubit_count > max {
            tracing::warn!(requested = qubit_count, max, mode = %config.mode, "qubit count clamped to mode maximum");
            max
        } else {
            qubit_count
        };
        let noise_model = config.effective_noise_model();

        Self {
            name: config.name,
            qubit_count,
            mode: config.mode,
            gates: Vec::new(),
            state: StateVector::new(qubit_count),
            measurement_results: BTreeMap::new(),
            metrics: HardwareMetrics::new(),
            noise_log: NoiseLog::new(),
            syndromes_detected: 0,
            noise_model,
            error_correction_layers: config.error_correction_layers,
            status: CircuitStatus::Idle,
            last_execution_time: None,
            rng,
            cancel: CancelHandle::new(),
            cancel_check_interval: config.cancel_check_interval,
        }
    }

    // --- Gate list ---

    /// Appends a gate after checking its qubit indices against the register.
    ///
    /// # Errors
    /// `InvalidQubitIndex`, `DuplicateQubit` or `MissingControl`; the gate is
    /// not added.
    pub fn add_gate(&mut self, gate: Gate) -> Result<()> {
        gate.validate(self.qubit_count)?;
        self.gates.push(gate);
        self.mark_edited();
        Ok(())
    }

    /// Appends several gates, stopping at the first invalid one. Gates before
    /// it stay appended.
    pub fn add_gates<I>(&mut self, gates: I) -> Result<()>
    where
        I: IntoIterator<Item = Gate>,
    {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Removes and returns the gate at `index`.
    pub fn remove_gate(&mut self, index: usize) -> Result<Gate> {
        if index >= self.gates.len() {
            return Err(SimError::GateIndexOutOfRange { index, len: self.gates.len() });
        }
        let gate = self.gates.remove(index);
        self.mark_edited();
        Ok(gate)
    }

    /// Drops every gate and resets the register.
    pub fn clear_gates(&mut self) {
        self.gates.clear();
        self.reset();
    }

    fn mark_edited(&mut self) {
        if self.status == CircuitStatus::Completed {
            self.status = CircuitStatus::Idle;
        }
    }

    /// Adds an error-correction layer. Layers only run in fault-tolerant mode.
    pub fn add_error_correction_layer(&mut self, layer: ErrorCorrectionLayer) {
        self.error_correction_layers.push(layer);
    }

    // --- Lifecycle ---

    /// Restores `|0…0⟩` and clears measurements, metrics and the noise
    /// history. The gate list is kept.
    pub fn reset(&mut self) {
        self.state = StateVector::new(self.qubit_count);
        self.measurement_results.clear();
        self.metrics = HardwareMetrics::new();
        self.noise_log.restart();
        self.syndromes_detected = 0;
        self.last_execution_time = None;
        self.status = CircuitStatus::Idle;
        tracing::debug!(circuit = %self.name, "register reset");
    }

    /// Runs the whole gate list from a fresh register.
    pub fn execute(&mut self) -> Result<ExecutionResult> {
        self.execute_with(&mut NoopObserver)
    }

    /// Runs the whole gate list, reporting each step to `observer`.
    ///
    /// # Errors
    /// `Cancelled` if the [`CancelHandle`] was triggered; the register is left
    /// as it was at the cancellation point and the circuit returns to idle.
    /// A request that arrives after the last check point is dropped when the
    /// run completes, so it never leaks into the next run.
    pub fn execute_with(&mut self, observer: &mut dyn ExecutionObserver) -> Result<ExecutionResult> {
        let started = Instant::now();
        self.reset();
        self.status = CircuitStatus::Executing;
        tracing::debug!(
            circuit = %self.name,
            qubits = self.qubit_count,
            gates = self.gates.len(),
            mode = %self.mode,
            "execution started"
        );

        let snapshot_every = observer.snapshot_interval().filter(|n| *n > 0);
        for index in 0..self.gates.len() {
            if self.cancel_check_interval > 0 && index % self.cancel_check_interval == 0 && self.cancel.take() {
                self.status = CircuitStatus::Idle;
                self.last_execution_time = Some(started.elapsed());
                tracing::debug!(circuit = %self.name, completed = index, "execution cancelled");
                return Err(SimError::Cancelled { completed_gates: index });
            }

            let gate = self.gates[index];
            let events_before = self.noise_log.len();
            self.step(&gate);

            let snapshot = snapshot_every
                .filter(|n| (index + 1) % n == 0)
                .map(|_| self.state.clone());
            observer.on_step(&StepReport {
                index,
                gate: &gate,
                fidelity: self.metrics.fidelity,
                new_events: &self.noise_log.events()[events_before..],
                snapshot,
            });
        }

        if self.cancel.take() {
            tracing::debug!(circuit = %self.name, "cancel request arrived after the last check; dropped");
        }
        let elapsed = started.elapsed();
        self.last_execution_time = Some(elapsed);
        self.status = CircuitStatus::Completed;
        let result = self.result_snapshot(elapsed);
        tracing::debug!(
            circuit = %self.name,
            fidelity = result.metrics.fidelity,
            noise_events = result.noise_events.len(),
            elapsed_ms = result.execution_time_ms,
            "execution completed"
        );
        observer.on_complete(&result);
        Ok(result)
    }

    /// One gate step: gate, then noise, replenishment and error correction as
    /// the mode allows.
    fn step(&mut self, gate: &Gate) {
        let target = gate.target();
        match gate.kind() {
            GateKind::Measure => {
                self.measure_unchecked(target);
            }
            _ => gates::apply_gate(&mut self.state, gate),
        }
        tracing::trace!(%gate, "gate applied");

        if self.mode.noise_enabled() {
            self.noise_model.apply(&mut self.state, target, &mut self.rng, &mut self.noise_log);
            self.metrics.fidelity = self.noise_model.degrade(self.metrics.fidelity);
        } else if cfg!(debug_assertions) {
            if let Err(err) = check_normalization(&self.state, None) {
                tracing::warn!(%gate, %err, "state drifted from unit norm");
            }
        }

        if self.mode.replenishment_enabled() {
            replenish_atoms(&mut self.metrics, &mut self.noise_log, target);
        }

        if self.mode.error_correction_enabled() {
            self.syndromes_detected += apply_error_correction(
                &self.error_correction_layers,
                &mut self.metrics,
                &mut self.rng,
                &mut self.noise_log,
                target,
            );
        }
    }

    /// Measures `qubit` now, collapsing the register.
    ///
    /// Outside of `execute` this is how a UI "peeks" at a qubit. Readout jitter
    /// applies whenever the mode has noise.
    pub fn measure(&mut self, qubit: usize) -> Result<u8> {
        self.check_qubit(qubit)?;
        Ok(self.measure_unchecked(qubit))
    }

    fn measure_unchecked(&mut self, qubit: usize) -> u8 {
        let readout_error = self
            .mode
            .noise_enabled()
            .then_some(self.noise_model.measurement_error);
        let outcome = measurement::measure(&mut self.state, qubit, readout_error, &mut self.rng);
        self.measurement_results.insert(qubit, outcome);
        outcome
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.qubit_count {
            return Err(SimError::InvalidQubitIndex { index: qubit, qubit_count: self.qubit_count });
        }
        Ok(())
    }

    fn result_snapshot(&self, elapsed: Duration) -> ExecutionResult {
        ExecutionResult {
            measurement_results: self.measurement_results.clone(),
            final_state: self.state.clone(),
            metrics: self.metrics.clone(),
            noise_events: self.noise_log.events().to_vec(),
            gates_executed: self.gates.len(),
            syndromes_detected: self.syndromes_detected,
            execution_time_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// The live state vector. Use [`snapshot`](Self::snapshot) for a copy.
    pub fn state_vector(&self) -> &StateVector {
        &self.state
    }

    pub fn snapshot(&self) -> StateVector {
        self.state.clone()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Probability that `qubit` would read 1 right now.
    pub fn qubit_probability(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        Ok(measurement::probability_of_one(&self.state, qubit))
    }

    pub fn measurement_results(&self) -> &BTreeMap<usize, u8> {
        &self.measurement_results
    }

    pub fn metrics(&self) -> &HardwareMetrics {
        &self.metrics
    }

    pub fn fidelity(&self) -> f64 {
        self.metrics.fidelity
    }

    pub fn noise_history(&self) -> &[NoiseEvent] {
        self.noise_log.events()
    }

    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    pub fn error_correction_layers(&self) -> &[ErrorCorrectionLayer] {
        &self.error_correction_layers
    }

    pub fn status(&self) -> CircuitStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == CircuitStatus::Executing
    }

    pub fn last_execution_time(&self) -> Option<Duration> {
        self.last_execution_time
    }

    /// Handle another thread can use to stop a running `execute`.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Method-chaining constructor for [`Circuit`].
///
/// Gates are validated once, in [`build`](Self::build), after the operation
/// mode (and therefore the clamped qubit count) is known.
pub struct CircuitBuilder {
    qubit_count: usize,
    config: CircuitConfig,
    rng: Option<StdRng>,
    gates: Vec<Gate>,
}

impl CircuitBuilder {
    pub fn new(qubit_count: usize) -> Self {
        Self {
            qubit_count,
            config: CircuitConfig::default(),
            rng: None,
            gates: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: CircuitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn mode(mut self, mode: OperationMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn noise_model(mut self, model: NoiseModel) -> Self {
        self.config.noise_model = Some(model);
        self
    }

    pub fn error_correction(mut self, layer: ErrorCorrectionLayer) -> Self {
        self.config.error_correction_layers.push(layer);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Uses `rng` instead of seeding one; takes precedence over [`seed`](Self::seed).
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn cancel_check_interval(mut self, gates: usize) -> Self {
        self.config.cancel_check_interval = gates;
        self
    }

    pub fn add_gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn add_gates<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.gates.extend(gates);
        self
    }

    /// Builds the circuit.
    ///
    /// # Errors
    /// The first gate that fails validation.
    pub fn build(self) -> Result<Circuit> {
        let mut circuit = match self.rng {
            Some(rng) => Circuit::with_rng(self.qubit_count, self.config, rng),
            None => Circuit::from_config(self.qubit_count, self.config),
        };
        circuit.add_gates(self.gates)?;
        Ok(circuit)
    }
}

//-------------------------------------------------------------------------
// Diagram
//-------------------------------------------------------------------------

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_gates = self.gates.len();
        writeln!(
            f,
            "{} [{} gates on {} qubits, {}]",
            self.name, num_gates, self.qubit_count, self.mode
        )?;
        if num_gates == 0 || self.qubit_count == 0 {
            return Ok(());
        }

        const GATE_WIDTH: usize = 7; // e.g. "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        let num_rows = self.qubit_count;
        let label_width = format!("q{}", num_rows - 1).len();
        let label_padding = " ".repeat(label_width + 2);

        // grid[row][time] holds the wire segment; v_connect[row][time] the
        // connector drawn below that row.
        let mut grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_gates]; num_rows];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_gates]; num_rows];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            let total_dashes = GATE_WIDTH.saturating_sub(slen);
            let pre_dashes = total_dashes / 2;
            let post_dashes = total_dashes - pre_dashes;
            format!(
                "{}{}{}",
                H_WIRE.to_string().repeat(pre_dashes),
                symbol,
                H_WIRE.to_string().repeat(post_dashes)
            )
        }

        for (t, gate) in self.gates.iter().enumerate() {
            let target = gate.target();
            grid[target][t] = format_gate(gate.kind().symbol());
            let mut rows = vec![target];
            for control in [gate.control(), gate.control2()].into_iter().flatten() {
                let symbol = if gate.kind() == GateKind::Swap { "x" } else { "@" };
                grid[control][t] = format_gate(symbol);
                rows.push(control);
            }
            if rows.len() > 1 {
                let r_min = rows.iter().copied().min().unwrap_or(target);
                let r_max = rows.iter().copied().max().unwrap_or(target);
                for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }

        for r in 0..num_rows {
            write!(f, "{:<width$}", format!("q{}: ", r), width = label_width + 2)?;
            writeln!(f, "{}", grid[r].join(""))?;

            if r < num_rows - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_gates {
                    let padding_needed = GATE_WIDTH - 1;
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), v_connect[r][t], " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
