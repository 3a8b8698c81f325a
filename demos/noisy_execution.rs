// demos/noisy_execution.rs

//! Runs one GHZ-style circuit in every operation mode and compares fidelity,
//! noise events and syndromes.

use qubitlab::{
    Circuit, CircuitConfig, CorrectionCode, ExecutionObserver, Gate, NoiseEventKind, OperationMode, SimError,
    StepReport,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints a progress line every `every` gates.
struct Progress {
    every: usize,
}

impl ExecutionObserver for Progress {
    fn on_step(&mut self, report: &StepReport<'_>) {
        if (report.index + 1) % self.every == 0 {
            tracing::info!(step = report.index + 1, fidelity = report.fidelity, "progress");
        }
    }
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let modes = [
        OperationMode::Ideal,
        OperationMode::Noisy,
        OperationMode::Continuous,
        OperationMode::FaultTolerant,
    ];

    for mode in modes {
        let mut config = CircuitConfig::new(mode);
        config.name = format!("GHZ ({})", mode);
        config.seed = Some(42);
        if mode.error_correction_enabled() {
            config.error_correction_layers.push(CorrectionCode::Surface.default_layer());
        }

        let mut circuit = Circuit::from_config(4, config);
        for _ in 0..25 {
            circuit.add_gate(Gate::hadamard(0))?;
            circuit.add_gate(Gate::cnot(0, 1))?;
            circuit.add_gate(Gate::cnot(1, 2))?;
            circuit.add_gate(Gate::cnot(2, 3))?;
        }
        for q in 0..4 {
            circuit.add_gate(Gate::measure(q))?;
        }

        let result = circuit.execute_with(&mut Progress { every: 25 })?;
        let count = |kind| result.noise_events.iter().filter(|e| e.kind == kind).count();
        println!(
            "{:>15}: fidelity {:.4}, bits {}, dephasing {}, relaxation {}, atom loss {}, syndromes {}",
            mode.to_string(),
            result.fidelity(),
            result.bitstring(),
            count(NoiseEventKind::Dephasing),
            count(NoiseEventKind::Relaxation),
            count(NoiseEventKind::AtomLoss),
            result.syndromes_detected,
        );
    }
    Ok(())
}
