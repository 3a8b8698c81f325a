// src/lib.rs

//! `qubitlab` - A state-vector simulator for small quantum circuits
//!
//! This library models a register of up to twenty qubits as a vector of
//! complex amplitudes and runs ordered gate lists over it, optionally with a
//! neutral-atom style noise model, atom replenishment and error-correction
//! layers layered on top.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod noise;
pub mod correction;
pub mod config;
pub mod export;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use core::{Amplitude, Result, SimError, StateVector};
pub use operations::{Gate, GateKind};
pub use circuits::{Circuit, CircuitBuilder, CircuitStatus};
pub use simulation::{CancelHandle, ExecutionObserver, ExecutionResult, NoopObserver, StepReport};
pub use noise::{HardwareMetrics, NoiseEvent, NoiseEventKind, NoiseModel};
pub use correction::{CorrectionCode, ErrorCorrectionLayer};
pub use config::{CircuitConfig, OperationMode};
pub use export::{BridgeJobResult, CircuitExport, HardwareBridge, LocalBridge};
pub use validation::{check_normalization, validate_state};

// Example 1: Bell pair
// Builds the two-qubit entangled state and checks both the amplitudes and the
// measurement correlation.
/// ```
/// use qubitlab::{CircuitBuilder, Gate, OperationMode, SimError};
///
/// let mut circuit = CircuitBuilder::new(2)
///     .name("Bell pair")
///     .mode(OperationMode::Ideal)
///     .seed(7)
///     .add_gate(Gate::hadamard(0))
///     .add_gate(Gate::cnot(0, 1))
///     .build()?;
///
/// let result = circuit.execute()?;
/// println!("Circuit:\n{}", circuit);
///
/// let p = result.probabilities();
/// assert!((p[0] - 0.5).abs() < 1e-9);
/// assert!((p[3] - 0.5).abs() < 1e-9);
/// assert_eq!(result.fidelity(), 1.0);
///
/// // Whichever way qubit 0 falls, qubit 1 follows.
/// let first = circuit.measure(0)?;
/// let second = circuit.measure(1)?;
/// assert_eq!(first, second);
/// # Ok::<(), SimError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Noisy execution
// Runs the same gates with the noisy preset and inspects the noise history.
/// ```
/// use qubitlab::{Circuit, Gate, OperationMode, SimError};
///
/// let mut circuit = Circuit::new(3, OperationMode::Noisy);
/// for _ in 0..20 {
///     circuit.add_gate(Gate::hadamard(0))?;
///     circuit.add_gate(Gate::cnot(0, 1))?;
///     circuit.add_gate(Gate::toffoli(0, 1, 2))?;
/// }
///
/// let result = circuit.execute()?;
/// assert!(result.fidelity() < 1.0);
/// assert!(result.fidelity() >= 0.5);
/// for event in &result.noise_events {
///     println!("{}", event);
/// }
/// # Ok::<(), SimError>(())
/// ```
#[doc(hidden)]
const _: () = ();

// Example 3: Rejected gate
/// ```
/// use qubitlab::{Circuit, Gate, OperationMode, SimError};
///
/// let mut circuit = Circuit::new(2, OperationMode::Ideal);
/// let err = circuit.add_gate(Gate::cnot(0, 5)).unwrap_err();
/// assert_eq!(err, SimError::InvalidQubitIndex { index: 5, qubit_count: 2 });
/// ```
#[doc(hidden)]
const _: () = ();
