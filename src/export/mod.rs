// src/export/mod.rs

//! Versioned wire format for handing a circuit to an execution backend.
//!
//! [`CircuitExport`] is the description a backend receives;
//! [`BridgeJobResult`] is what it sends back. Both use camelCase JSON names.
//! [`to_json`] and [`from_json`] are the only supported way to move a
//! description across the wire: [`from_json`] refuses any `schemaVersion`
//! other than [`SCHEMA_VERSION`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::circuits::Circuit;
use crate::config::{CircuitConfig, OperationMode};
use crate::core::{Result, SimError, StateVector};
use crate::correction::ErrorCorrectionLayer;
use crate::noise::{NoiseEvent, NoiseModel};
use crate::operations::{Gate, GateKind};

pub const SCHEMA_VERSION: &str = "1.0";

/// One gate as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRecord {
    #[serde(rename = "type")]
    pub kind: GateKind,
    pub target_qubit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_qubit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_qubit2: Option<usize>,
}

impl From<&Gate> for GateRecord {
    fn from(gate: &Gate) -> Self {
        Self {
            kind: gate.kind(),
            target_qubit: gate.target(),
            control_qubit: gate.control(),
            control_qubit2: gate.control2(),
        }
    }
}

impl From<GateRecord> for Gate {
    fn from(record: GateRecord) -> Self {
        Gate::new(record.kind, record.target_qubit, record.control_qubit, record.control_qubit2)
    }
}

/// Serialized description of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitExport {
    pub name: String,
    pub qubit_count: usize,
    pub gates: Vec<GateRecord>,
    pub operation_mode: OperationMode,
    pub noise_model: NoiseModel,
    #[serde(default)]
    pub error_correction_layers: Vec<ErrorCorrectionLayer>,
    pub schema_version: String,
    /// Milliseconds since the UNIX epoch.
    pub generated_at: u64,
}

impl CircuitExport {
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            name: circuit.name().to_string(),
            qubit_count: circuit.qubit_count(),
            gates: circuit.gates().iter().map(GateRecord::from).collect(),
            operation_mode: circuit.mode(),
            noise_model: circuit.noise_model().clone(),
            error_correction_layers: circuit.error_correction_layers().to_vec(),
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at,
        }
    }
}

/// Serializes an export as compact JSON.
pub fn to_json(export: &CircuitExport) -> Result<String> {
    Ok(serde_json::to_string(export)?)
}

/// Parses an export, rejecting unknown schema versions before looking at the
/// rest of the document.
pub fn from_json(json: &str) -> Result<CircuitExport> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let found = value
        .get("schemaVersion")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if found != SCHEMA_VERSION {
        return Err(SimError::UnsupportedSchema {
            found: found.to_string(),
            expected: SCHEMA_VERSION.to_string(),
        });
    }
    Ok(serde_json::from_value(value)?)
}

impl Circuit {
    /// Describes this circuit for a backend.
    pub fn export(&self) -> CircuitExport {
        CircuitExport::from_circuit(self)
    }

    /// Rebuilds a circuit from its description. Every gate is validated.
    pub fn from_export(export: &CircuitExport, seed: Option<u64>) -> Result<Circuit> {
        let config = CircuitConfig {
            name: export.name.clone(),
            mode: export.operation_mode,
            noise_model: Some(export.noise_model.clone()),
            error_correction_layers: export.error_correction_layers.clone(),
            seed,
            ..CircuitConfig::default()
        };
        let mut circuit = Circuit::from_config(export.qubit_count, config);
        circuit.add_gates(export.gates.iter().copied().map(Gate::from))?;
        Ok(circuit)
    }
}

/// What a backend returns for one submitted circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeJobResult {
    /// Count per measured bitstring, qubit 0 rightmost, `-` for a qubit the
    /// circuit never measured. Empty when the circuit has no `Measure` gates.
    pub measurement_histogram: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_state: Option<StateVector>,
    pub fidelity: f64,
    pub execution_time_ms: f64,
    #[serde(default)]
    pub noise_events: Vec<NoiseEvent>,
}

/// An execution backend that accepts circuit descriptions.
pub trait HardwareBridge {
    fn submit(&self, job: &CircuitExport) -> Result<BridgeJobResult>;
}

/// Runs jobs in-process on the state-vector simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalBridge {
    pub shots: usize,
    pub seed: Option<u64>,
}

impl LocalBridge {
    pub fn new(shots: usize) -> Self {
        Self { shots, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl HardwareBridge for LocalBridge {
    fn submit(&self, job: &CircuitExport) -> Result<BridgeJobResult> {
        if self.shots == 0 {
            return Err(SimError::Bridge { message: "shot count must be at least 1".to_string() });
        }
        let started = Instant::now();
        let mut circuit = Circuit::from_export(job, self.seed)?;
        tracing::debug!(circuit = %job.name, shots = self.shots, "local bridge job started");

        let mut histogram = BTreeMap::new();
        let mut fidelity_sum = 0.0;
        let mut noise_events = Vec::new();
        let mut final_state = None;
        for _ in 0..self.shots {
            let result = circuit.execute()?;
            let bits = result.bitstring();
            if !bits.is_empty() {
                *histogram.entry(bits).or_insert(0) += 1;
            }
            fidelity_sum += result.fidelity();
            noise_events.extend(result.noise_events);
            final_state = Some(result.final_state);
        }

        Ok(BridgeJobResult {
            measurement_histogram: histogram,
            final_state,
            fidelity: fidelity_sum / self.shots as f64,
            execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            noise_events,
        })
    }
}
