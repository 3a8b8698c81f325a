//! Error handling logic

use thiserror::Error;

use crate::operations::GateKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

/// Error types surfaced by circuit construction, execution and export.
///
/// Numeric edge cases (zero-norm collapse, fidelity drifting out of range) are
/// not errors: they are absorbed locally by clamping or by skipping a
/// renormalization. Everything here is something a caller can act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)] // Eq useful for testing error variants
pub enum SimError {
    /// A gate or measurement referenced a qubit outside the register.
    #[error("Invalid qubit index {index}: circuit has {qubit_count} qubits")]
    InvalidQubitIndex {
        /// Offending index
        index: usize,
        /// Size of the register
        qubit_count: usize,
    },

    /// The same qubit appears twice in a multi-qubit gate.
    #[error("Qubit {qubit} used more than once in a {kind} gate")]
    DuplicateQubit {
        /// Repeated qubit
        qubit: usize,
        /// Gate being validated
        kind: GateKind,
    },

    /// A controlled gate was missing one of its control qubits.
    #[error("{kind} gate requires {required} control qubit(s)")]
    MissingControl {
        /// Gate being validated
        kind: GateKind,
        /// Number of controls the gate needs
        required: usize,
    },

    /// `remove_gate` was asked for a position past the end of the gate list.
    #[error("Gate index {index} out of range for circuit with {len} gates")]
    GateIndexOutOfRange {
        /// Requested position
        index: usize,
        /// Current gate count
        len: usize,
    },

    /// An amplitude buffer whose length is not a power of two.
    #[error("State vector dimension {dim} is not a power of two")]
    InvalidDimension {
        /// Rejected length
        dim: usize,
    },

    /// Execution stopped at a cooperative cancellation point.
    #[error("Execution cancelled after {completed_gates} gates")]
    Cancelled {
        /// Gates fully processed before the request was honored
        completed_gates: usize,
    },

    /// A circuit description carried a schema version this crate cannot read.
    #[error("Unsupported schema version '{found}' (expected '{expected}')")]
    UnsupportedSchema {
        /// Version found in the payload
        found: String,
        /// Version this crate writes
        expected: String,
    },

    /// JSON encoding or decoding failed.
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Underlying serde message
        message: String,
    },

    /// The hardware bridge rejected or failed a job.
    #[error("Bridge error: {message}")]
    Bridge {
        /// Bridge failure message
        message: String,
    },
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Serialization { message: err.to_string() }
    }
}
