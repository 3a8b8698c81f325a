// src/operations/mod.rs

//! Defines the gate vocabulary a circuit is built from.
//!
//! A [`Gate`] names a [`GateKind`] plus the qubits it acts on. Gates carry no
//! behavior of their own; the transforms live in `simulation::gates` and the
//! measurement engine in `simulation::measurement`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{Result, SimError};

/// The named operators supported by the simulator.
///
/// The serde tags double as the `type` field of the exported circuit schema,
/// so renaming a variant is a wire-format change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GateKind {
    /// `(|0⟩+|1⟩)/√2`, `(|0⟩−|1⟩)/√2` basis change.
    Hadamard,
    /// Bit flip.
    PauliX,
    /// Bit and phase flip.
    PauliY,
    /// Phase flip.
    PauliZ,
    /// Quarter turn (S gate), phase `i` on |1⟩.
    Phase,
    /// Eighth turn, phase `e^(iπ/4)` on |1⟩.
    T,
    /// Controlled NOT.
    Cnot,
    /// Exchange of two qubits.
    Swap,
    /// Doubly controlled NOT.
    Toffoli,
    /// Projective measurement in the computational basis.
    Measure,
}

impl GateKind {
    /// Number of control qubits the gate requires.
    ///
    /// SWAP counts its second qubit as a control for storage purposes.
    pub fn required_controls(&self) -> usize {
        match self {
            GateKind::Cnot | GateKind::Swap => 1,
            GateKind::Toffoli => 2,
            _ => 0,
        }
    }

    /// Short label used by the circuit diagram.
    pub fn symbol(&self) -> &'static str {
        match self {
            GateKind::Hadamard => "H",
            GateKind::PauliX => "X",
            GateKind::PauliY => "Y",
            GateKind::PauliZ => "Z",
            GateKind::Phase => "S",
            GateKind::T => "T",
            GateKind::Cnot | GateKind::Toffoli => "X",
            GateKind::Swap => "x",
            GateKind::Measure => "M",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateKind::Hadamard => "Hadamard",
            GateKind::PauliX => "Pauli-X",
            GateKind::PauliY => "Pauli-Y",
            GateKind::PauliZ => "Pauli-Z",
            GateKind::Phase => "Phase",
            GateKind::T => "T",
            GateKind::Cnot => "CNOT",
            GateKind::Swap => "SWAP",
            GateKind::Toffoli => "Toffoli",
            GateKind::Measure => "Measure",
        };
        f.write_str(name)
    }
}

/// One step of a circuit: an operator and the qubits it touches.
///
/// For SWAP, `target` is the first qubit and `control` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gate {
    kind: GateKind,
    target: usize,
    control: Option<usize>,
    control2: Option<usize>,
}

impl Gate {
    /// Builds a gate from raw parts. Nothing is validated until the gate is
    /// added to a circuit.
    pub fn new(kind: GateKind, target: usize, control: Option<usize>, control2: Option<usize>) -> Self {
        Self { kind, target, control, control2 }
    }

    pub fn hadamard(target: usize) -> Self {
        Self::new(GateKind::Hadamard, target, None, None)
    }

    pub fn pauli_x(target: usize) -> Self {
        Self::new(GateKind::PauliX, target, None, None)
    }

    pub fn pauli_y(target: usize) -> Self {
        Self::new(GateKind::PauliY, target, None, None)
    }

    pub fn pauli_z(target: usize) -> Self {
        Self::new(GateKind::PauliZ, target, None, None)
    }

    pub fn phase(target: usize) -> Self {
        Self::new(GateKind::Phase, target, None, None)
    }

    pub fn t(target: usize) -> Self {
        Self::new(GateKind::T, target, None, None)
    }

    pub fn cnot(control: usize, target: usize) -> Self {
        Self::new(GateKind::Cnot, target, Some(control), None)
    }

    pub fn swap(first: usize, second: usize) -> Self {
        Self::new(GateKind::Swap, first, Some(second), None)
    }

    pub fn toffoli(control1: usize, control2: usize, target: usize) -> Self {
        Self::new(GateKind::Toffoli, target, Some(control1), Some(control2))
    }

    pub fn measure(target: usize) -> Self {
        Self::new(GateKind::Measure, target, None, None)
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn control(&self) -> Option<usize> {
        self.control
    }

    pub fn control2(&self) -> Option<usize> {
        self.control2
    }

    /// Every qubit index mentioned by the gate, target first.
    pub fn involved_qubits(&self) -> Vec<usize> {
        [Some(self.target), self.control, self.control2]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Checks the gate against a register of `qubit_count` qubits.
    ///
    /// Rejects out-of-range indices, missing controls and repeated qubits.
    /// Extra controls on single-qubit gates are ignored by the gate library and
    /// are only range-checked here.
    pub fn validate(&self, qubit_count: usize) -> Result<()> {
        let required = self.kind.required_controls();
        let missing = match required {
            0 => false,
            1 => self.control.is_none(),
            _ => self.control.is_none() || self.control2.is_none(),
        };
        if missing {
            return Err(SimError::MissingControl { kind: self.kind, required });
        }

        let qubits = self.involved_qubits();
        for &index in &qubits {
            if index >= qubit_count {
                return Err(SimError::InvalidQubitIndex { index, qubit_count });
            }
        }
        for (i, &qubit) in qubits.iter().enumerate() {
            if qubits[..i].contains(&qubit) {
                return Err(SimError::DuplicateQubit { qubit, kind: self.kind });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.control, self.control2) {
            (Some(c1), Some(c2)) => write!(f, "{}(c={}, c={}, t={})", self.kind, c1, c2, self.target),
            (Some(c), None) if self.kind == GateKind::Swap => write!(f, "{}({}, {})", self.kind, self.target, c),
            (Some(c), None) => write!(f, "{}(c={}, t={})", self.kind, c, self.target),
            _ => write!(f, "{}({})", self.kind, self.target),
        }
    }
}
