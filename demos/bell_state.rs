// demos/bell_state.rs

//! Builds a Bell pair, prints the circuit diagram and the outcome histogram
//! over a few hundred shots.
//!
//! Run with `RUST_LOG=qubitlab=debug cargo run --example bell_state` to see the
//! execution log.

use qubitlab::{CircuitBuilder, Gate, HardwareBridge, LocalBridge, SimError};

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let mut circuit = CircuitBuilder::new(2)
        .name("Bell pair")
        .add_gate(Gate::hadamard(0))
        .add_gate(Gate::cnot(0, 1))
        .add_gate(Gate::measure(0))
        .add_gate(Gate::measure(1))
        .build()?;

    println!("{}", circuit);
    let result = circuit.execute()?;
    println!("{}", result);

    let job = circuit.export();
    let histogram = LocalBridge::new(500).submit(&job)?;
    println!("Histogram over 500 shots:");
    for (bits, count) in &histogram.measurement_histogram {
        println!("  |{}⟩: {}", bits, count);
    }
    Ok(())
}
