// src/simulation/mod.rs

//! The numeric engine behind [`Circuit`](crate::Circuit): the gate library,
//! the measurement engine, execution results and observer hooks.
//!
//! Everything here operates on a borrowed [`StateVector`](crate::StateVector)
//! and an explicitly passed RNG; the circuit owns both and decides what runs
//! when.

pub mod gates;
pub mod measurement;
mod observer;
mod results;

// Re-export the main public interface types
pub use gates::apply_gate;
pub use measurement::{collapse, measure, probability_of_one, probability_of_zero};
pub use observer::{CancelHandle, ExecutionObserver, NoopObserver, StepReport};
pub use results::ExecutionResult;
