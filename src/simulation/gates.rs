// src/simulation/gates.rs

//! Gate library: in-place transforms of a [`StateVector`].
//!
//! Single-qubit gates walk the index pairs that differ only in the target bit
//! and combine the two amplitudes through the gate's 2x2 matrix. Multi-qubit
//! gates walk the whole index space and swap amplitude pairs. Every function
//! here is a silent no-op when an index is out of range or when a control
//! coincides with the target; the circuit rejects such gates before they get
//! this far.

use num_complex::Complex;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::core::{Amplitude, StateVector};
use crate::operations::{Gate, GateKind};

/// Applies a unitary gate to `state`.
///
/// `Measure` is not unitary and is left to the measurement engine, so it is a
/// no-op here.
pub fn apply_gate(state: &mut StateVector, gate: &Gate) {
    let target = gate.target();
    match gate.kind() {
        GateKind::Hadamard => hadamard(state, target),
        GateKind::PauliX => pauli_x(state, target),
        GateKind::PauliY => pauli_y(state, target),
        GateKind::PauliZ => pauli_z(state, target),
        GateKind::Phase => phase(state, target),
        GateKind::T => t_gate(state, target),
        GateKind::Cnot => {
            if let Some(control) = gate.control() {
                cnot(state, control, target);
            }
        }
        GateKind::Swap => {
            if let Some(second) = gate.control() {
                swap(state, target, second);
            }
        }
        GateKind::Toffoli => {
            if let (Some(c1), Some(c2)) = (gate.control(), gate.control2()) {
                toffoli(state, c1, c2, target);
            }
        }
        GateKind::Measure => {}
    }
}

/// Visits every `(i0, i1)` pair where `i0` has the target bit clear and
/// `i1 = i0 | mask`.
fn for_each_pair<F>(state: &mut StateVector, target: usize, mut f: F)
where
    F: FnMut(&mut [Amplitude], usize, usize),
{
    if target >= state.qubit_count() {
        return;
    }
    let mask = 1usize << target;
    let amps = state.amplitudes_mut();
    for i0 in 0..amps.len() {
        if i0 & mask == 0 {
            f(amps, i0, i0 | mask);
        }
    }
}

/// Multiplies every amplitude whose `target` bit is set by `factor`.
pub(crate) fn scale_excited(state: &mut StateVector, target: usize, factor: Amplitude) {
    for_each_pair(state, target, |amps, _, i1| {
        amps[i1] *= factor;
    });
}

pub fn hadamard(state: &mut StateVector, target: usize) {
    for_each_pair(state, target, |amps, i0, i1| {
        let a = amps[i0];
        let b = amps[i1];
        amps[i0] = (a + b) * FRAC_1_SQRT_2;
        amps[i1] = (a - b) * FRAC_1_SQRT_2;
    });
}

pub fn pauli_x(state: &mut StateVector, target: usize) {
    for_each_pair(state, target, |amps, i0, i1| amps.swap(i0, i1));
}

/// `(a, b) → (i·b, −i·a)`.
///
/// This differs from the textbook `[[0, −i], [i, 0]]` by a global phase of −1,
/// which no probability can observe.
pub fn pauli_y(state: &mut StateVector, target: usize) {
    let i = Amplitude::i();
    for_each_pair(state, target, |amps, i0, i1| {
        let a = amps[i0];
        let b = amps[i1];
        amps[i0] = i * b;
        amps[i1] = -i * a;
    });
}

pub fn pauli_z(state: &mut StateVector, target: usize) {
    scale_excited(state, target, Complex::new(-1.0, 0.0));
}

/// The S gate.
pub fn phase(state: &mut StateVector, target: usize) {
    scale_excited(state, target, Complex::i());
}

pub fn t_gate(state: &mut StateVector, target: usize) {
    scale_excited(state, target, Complex::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2));
}

fn in_range(state: &StateVector, qubits: &[usize]) -> bool {
    let n = state.qubit_count();
    qubits.iter().all(|&q| q < n)
}

pub fn cnot(state: &mut StateVector, control: usize, target: usize) {
    if control == target || !in_range(state, &[control, target]) {
        return;
    }
    let c_mask = 1usize << control;
    let t_mask = 1usize << target;
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        // Only the target=0 half of each pair initiates, so no pair swaps twice.
        if i & c_mask != 0 && i & t_mask == 0 {
            amps.swap(i, i | t_mask);
        }
    }
}

pub fn swap(state: &mut StateVector, first: usize, second: usize) {
    if first == second || !in_range(state, &[first, second]) {
        return;
    }
    let m1 = 1usize << first;
    let m2 = 1usize << second;
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        let b1 = i & m1 != 0;
        let b2 = i & m2 != 0;
        if b1 != b2 {
            let j = i ^ m1 ^ m2;
            if i < j {
                amps.swap(i, j);
            }
        }
    }
}

pub fn toffoli(state: &mut StateVector, control1: usize, control2: usize, target: usize) {
    if control1 == control2
        || control1 == target
        || control2 == target
        || !in_range(state, &[control1, control2, target])
    {
        return;
    }
    let c_mask = (1usize << control1) | (1usize << control2);
    let t_mask = 1usize << target;
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if i & c_mask == c_mask && i & t_mask == 0 {
            amps.swap(i, i | t_mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    const TEST_TOLERANCE: f64 = 1e-9;

    /// Asserts that two amplitude slices are approximately equal component-wise.
    fn assert_amps_approx_equal(actual: &[Amplitude], expected: &[Amplitude], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i, actual[i], expected[i], context
            );
        }
    }

    fn basis(qubits: usize, index: usize) -> StateVector {
        let mut amps = vec![Complex::zero(); 1 << qubits];
        amps[index] = Complex::new(1.0, 0.0);
        StateVector::from_amplitudes(amps).unwrap()
    }

    #[test]
    fn hadamard_creates_equal_superposition() {
        let mut state = StateVector::new(1);
        hadamard(&mut state, 0);
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_amps_approx_equal(state.amplitudes(), &[h, h], "H|0>");

        let mut state = basis(1, 1);
        hadamard(&mut state, 0);
        assert_amps_approx_equal(state.amplitudes(), &[h, -h], "H|1>");
    }

    #[test]
    fn hadamard_acts_on_the_right_bit() {
        // Qubit 1 of |00>: amplitude splits between index 0 and index 2.
        let mut state = StateVector::new(2);
        hadamard(&mut state, 1);
        let probs = state.probabilities();
        assert!((probs[0] - 0.5).abs() < TEST_TOLERANCE);
        assert!((probs[2] - 0.5).abs() < TEST_TOLERANCE);
        assert!(probs[1].abs() < TEST_TOLERANCE && probs[3].abs() < TEST_TOLERANCE);
    }

    #[test]
    fn self_inverse_gates() {
        let mut state = StateVector::new(3);
        hadamard(&mut state, 0);
        t_gate(&mut state, 0);
        hadamard(&mut state, 2);
        let before = state.clone();

        hadamard(&mut state, 1);
        hadamard(&mut state, 1);
        assert_amps_approx_equal(state.amplitudes(), before.amplitudes(), "HH");

        pauli_x(&mut state, 0);
        pauli_x(&mut state, 0);
        assert_amps_approx_equal(state.amplitudes(), before.amplitudes(), "XX");

        pauli_y(&mut state, 2);
        pauli_y(&mut state, 2);
        assert_amps_approx_equal(state.amplitudes(), before.amplitudes(), "YY");

        cnot(&mut state, 0, 2);
        cnot(&mut state, 0, 2);
        assert_amps_approx_equal(state.amplitudes(), before.amplitudes(), "CNOT CNOT");

        swap(&mut state, 0, 2);
        swap(&mut state, 0, 2);
        assert_amps_approx_equal(state.amplitudes(), before.amplitudes(), "SWAP SWAP");
    }

    #[test]
    fn pauli_y_follows_documented_convention() {
        let mut state = StateVector::new(1);
        pauli_y(&mut state, 0);
        assert_amps_approx_equal(
            state.amplitudes(),
            &[Complex::zero(), Complex::new(0.0, -1.0)],
            "Y|0>",
        );

        let mut excited = basis(1, 1);
        pauli_y(&mut excited, 0);
        assert_amps_approx_equal(excited.amplitudes(), &[Complex::i(), Complex::zero()], "Y|1>");
    }

    #[test]
    fn phase_gates_compose() {
        // T·T = S and S·S = Z on |1>.
        let mut via_t = basis(1, 1);
        t_gate(&mut via_t, 0);
        t_gate(&mut via_t, 0);
        let mut via_s = basis(1, 1);
        phase(&mut via_s, 0);
        assert_amps_approx_equal(via_t.amplitudes(), via_s.amplitudes(), "TT = S");

        phase(&mut via_s, 0);
        let mut via_z = basis(1, 1);
        pauli_z(&mut via_z, 0);
        assert_amps_approx_equal(via_s.amplitudes(), via_z.amplitudes(), "SS = Z");
    }

    #[test]
    fn phase_gates_leave_ground_untouched() {
        let mut state = StateVector::new(1);
        pauli_z(&mut state, 0);
        phase(&mut state, 0);
        t_gate(&mut state, 0);
        assert_eq!(state, StateVector::new(1));
    }

    #[test]
    fn cnot_flips_only_when_control_set() {
        // |q1 q0> = |01> is index 1: control q0 set, target q1 flips -> index 3.
        let mut state = basis(2, 1);
        cnot(&mut state, 0, 1);
        assert_eq!(state, basis(2, 3));

        let mut state = basis(2, 2);
        cnot(&mut state, 0, 1);
        assert_eq!(state, basis(2, 2));
    }

    #[test]
    fn swap_exchanges_bits() {
        let mut state = basis(3, 0b001);
        swap(&mut state, 0, 2);
        assert_eq!(state, basis(3, 0b100));
        let mut state = basis(3, 0b101);
        swap(&mut state, 0, 2);
        assert_eq!(state, basis(3, 0b101));
    }

    #[test]
    fn toffoli_truth_table() {
        // c1 = q0, c2 = q1, target = q2.
        for (input, expected) in [(0b011, 0b111), (0b111, 0b011), (0b001, 0b001), (0b010, 0b010), (0b000, 0b000)] {
            let mut state = basis(3, input);
            toffoli(&mut state, 0, 1, 2);
            assert_eq!(state, basis(3, expected), "Toffoli on {:03b}", input);
        }
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut state = StateVector::new(2);
        hadamard(&mut state, 0);
        let before = state.clone();
        hadamard(&mut state, 5);
        pauli_x(&mut state, 2);
        cnot(&mut state, 0, 0);
        cnot(&mut state, 7, 1);
        swap(&mut state, 1, 9);
        toffoli(&mut state, 0, 1, 1);
        assert_eq!(state, before);
    }

    #[test]
    fn apply_gate_dispatches_by_kind() {
        let mut state = StateVector::new(2);
        apply_gate(&mut state, &Gate::pauli_x(0));
        apply_gate(&mut state, &Gate::cnot(0, 1));
        apply_gate(&mut state, &Gate::measure(0));
        assert_eq!(state, basis(2, 3));
    }
}
