// src/simulation/observer.rs

//! Hooks for watching an execution from outside the circuit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::StateVector;
use crate::noise::NoiseEvent;
use crate::operations::Gate;
use crate::simulation::ExecutionResult;

/// Progress report handed to an [`ExecutionObserver`] after each gate step.
#[derive(Debug, Clone)]
pub struct StepReport<'a> {
    /// Zero-based position of the gate in the circuit.
    pub index: usize,
    pub gate: &'a Gate,
    pub fidelity: f64,
    /// Noise history entries added during this step.
    pub new_events: &'a [NoiseEvent],
    /// Owned copy of the state, present only on the observer's snapshot cadence.
    pub snapshot: Option<StateVector>,
}

/// Receives progress from [`Circuit::execute_with`](crate::Circuit::execute_with).
///
/// All methods default to doing nothing.
pub trait ExecutionObserver {
    /// Every how many steps a state snapshot should be attached. Copying the
    /// state costs `O(2^n)`, so the default is never.
    fn snapshot_interval(&self) -> Option<usize> {
        None
    }

    fn on_step(&mut self, _report: &StepReport<'_>) {}

    fn on_complete(&mut self, _result: &ExecutionResult) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {}

/// Shared flag used to ask a running execution to stop.
///
/// The gate loop polls it every `cancel_check_interval` gates. A request made
/// before `execute` starts is honored at the first gate. Honoring a request
/// clears it, and a request still pending when a run completes is discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    requested: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Returns whether a request was pending and clears it.
    pub(crate) fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}
