// tests/property_tests.rs

use proptest::prelude::*;
use qubitlab::{CircuitBuilder, Gate, GateKind, NoiseModel, OperationMode, check_normalization};

const QUBITS: usize = 4;

/// Any gate on three distinct qubits of a four-qubit register.
fn arb_gate() -> impl Strategy<Value = Gate> {
    let kinds = prop_oneof![
        Just(GateKind::Hadamard),
        Just(GateKind::PauliX),
        Just(GateKind::PauliY),
        Just(GateKind::PauliZ),
        Just(GateKind::Phase),
        Just(GateKind::T),
        Just(GateKind::Cnot),
        Just(GateKind::Swap),
        Just(GateKind::Toffoli),
    ];
    (kinds, Just((0..QUBITS).collect::<Vec<_>>()).prop_shuffle()).prop_map(|(kind, qubits)| {
        let control = (kind.required_controls() >= 1).then_some(qubits[1]);
        let control2 = (kind.required_controls() >= 2).then_some(qubits[2]);
        Gate::new(kind, qubits[0], control, control2)
    })
}

proptest! {
    #[test]
    fn unitary_gates_preserve_norm(gates in prop::collection::vec(arb_gate(), 1..60)) {
        let mut circuit = CircuitBuilder::new(QUBITS).add_gates(gates).build().unwrap();
        let result = circuit.execute().unwrap();
        prop_assert!(check_normalization(&result.final_state, Some(1e-9)).is_ok());
        prop_assert_eq!(result.fidelity(), 1.0);
    }

    #[test]
    fn fidelity_stays_in_bounds(
        gates in prop::collection::vec(arb_gate(), 0..80),
        gate_error_rate in 0.0f64..1.0,
        atom_loss_rate in 0.0f64..1.0,
        seed in any::<u64>(),
    ) {
        let model = NoiseModel {
            gate_error_rate,
            atom_loss_rate,
            continuous_operation_correction: 1.0002,
            ..NoiseModel::for_mode(OperationMode::Continuous)
        };
        let mut circuit = CircuitBuilder::new(QUBITS)
            .mode(OperationMode::Continuous)
            .noise_model(model)
            .seed(seed)
            .add_gates(gates)
            .build()
            .unwrap();
        let fidelity = circuit.execute().unwrap().fidelity();
        prop_assert!((0.5..=1.0).contains(&fidelity), "fidelity {}", fidelity);
    }
}
