// src/simulation/measurement.rs

//! Measurement engine: marginal probabilities, outcome sampling and collapse.

use num_traits::Zero;
use rand::Rng;

use crate::core::StateVector;

/// Σ|amp|² over the basis states where `qubit` has the value `bit`.
fn branch_weight(state: &StateVector, qubit: usize, bit: bool) -> f64 {
    let mask = 1usize << qubit;
    state
        .amplitudes()
        .iter()
        .enumerate()
        .filter(|(i, _)| (i & mask != 0) == bit)
        .map(|(_, c)| c.norm_sqr())
        .sum()
}

/// Probability that `qubit` reads 0.
///
/// A qubit outside the register is never excited, so this returns 1.0 for it.
pub fn probability_of_zero(state: &StateVector, qubit: usize) -> f64 {
    if qubit >= state.qubit_count() {
        return 1.0;
    }
    branch_weight(state, qubit, false)
}

/// Probability that `qubit` reads 1.
///
/// Summed from the |1⟩ branch itself, so a damped or all-zero state is not
/// mistaken for certainty. Out-of-range qubits return 0.0.
pub fn probability_of_one(state: &StateVector, qubit: usize) -> f64 {
    if qubit >= state.qubit_count() {
        return 0.0;
    }
    branch_weight(state, qubit, true).min(1.0)
}

/// Samples an outcome for `qubit` and collapses `state` onto it.
///
/// With `readout_error` set, the zero-probability is jittered uniformly within
/// `±readout_error` and clamped to `[0, 1]` before sampling. Spreads wider
/// than 1.0 are capped there and non-finite spreads are ignored. Returns the
/// outcome bit; out-of-range qubits read 0 and leave the state untouched.
pub fn measure<R: Rng>(
    state: &mut StateVector,
    qubit: usize,
    readout_error: Option<f64>,
    rng: &mut R,
) -> u8 {
    if qubit >= state.qubit_count() {
        return 0;
    }

    let mut prob0 = probability_of_zero(state, qubit);
    let spread = readout_error
        .filter(|e| e.is_finite() && *e > 0.0)
        .map(|e| e.min(1.0));
    if let Some(spread) = spread {
        prob0 = (prob0 + rng.random_range(-spread..=spread)).clamp(0.0, 1.0);
    }

    let r: f64 = rng.random();
    let outcome = if r < prob0 { 0 } else { 1 };
    collapse(state, qubit, outcome);
    outcome
}

/// Zeroes every amplitude inconsistent with `qubit == outcome` and renormalizes
/// the survivors.
///
/// Returns the surviving norm (Σ|amp|² before rescaling). When that norm is
/// zero the vector is left all-zero rather than divided by zero.
pub fn collapse(state: &mut StateVector, qubit: usize, outcome: u8) -> f64 {
    if qubit >= state.qubit_count() {
        return state.norm_sqr();
    }
    let mask = 1usize << qubit;
    let keep_set = outcome != 0;

    let mut norm = 0.0;
    for (i, amp) in state.amplitudes_mut().iter_mut().enumerate() {
        if (i & mask != 0) == keep_set {
            norm += amp.norm_sqr();
        } else {
            *amp = Zero::zero();
        }
    }

    if norm > 0.0 {
        let scale = 1.0 / norm.sqrt();
        for amp in state.amplitudes_mut().iter_mut() {
            *amp *= scale;
        }
    } else {
        tracing::warn!(qubit, outcome, "collapse onto zero-probability branch; state left unnormalized");
    }
    norm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::gates;
    use num_complex::Complex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn marginals_of_plus_state() {
        let mut state = StateVector::new(2);
        gates::hadamard(&mut state, 1);
        assert!((probability_of_zero(&state, 1) - 0.5).abs() < 1e-12);
        assert!((probability_of_one(&state, 1) - 0.5).abs() < 1e-12);
        assert!((probability_of_zero(&state, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn probability_of_one_reads_the_excited_branch() {
        let mut state = StateVector::new(1);
        gates::hadamard(&mut state, 0);
        gates::scale_excited(&mut state, 0, Complex::new(0.95, 0.0));
        assert!((probability_of_one(&state, 0) - 0.45125).abs() < 1e-12);
        assert!((probability_of_zero(&state, 0) - 0.5).abs() < 1e-12);

        let mut empty = StateVector::new(1);
        collapse(&mut empty, 0, 1);
        assert_eq!(probability_of_one(&empty, 0), 0.0);
        assert_eq!(probability_of_one(&empty, 3), 0.0);
    }

    #[test]
    fn oversized_readout_error_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(5);
        for spread in [1e308, f64::MAX, f64::INFINITY, f64::NAN, -1.0] {
            let mut state = StateVector::new(1);
            gates::hadamard(&mut state, 0);
            let outcome = measure(&mut state, 0, Some(spread), &mut rng);
            assert!(outcome <= 1);
            assert!((state.norm_sqr() - 1.0).abs() < 1e-12, "spread {}", spread);
        }
    }

    #[test]
    fn basis_state_measures_deterministically() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = StateVector::new(2);
        gates::pauli_x(&mut state, 1);
        for _ in 0..20 {
            assert_eq!(measure(&mut state, 1, None, &mut rng), 1);
            assert_eq!(measure(&mut state, 0, None, &mut rng), 0);
        }
    }

    #[test]
    fn collapse_renormalizes_survivors() {
        let mut state = StateVector::new(2);
        gates::hadamard(&mut state, 0);
        gates::hadamard(&mut state, 1);
        let norm = collapse(&mut state, 0, 1);
        assert!((norm - 0.5).abs() < 1e-12);
        assert!((state.norm_sqr() - 1.0).abs() < 1e-12);
        assert_eq!(state.probability(0), 0.0);
        assert_eq!(state.probability(2), 0.0);
        assert!((state.probability(1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_norm_collapse_leaves_zeros() {
        let mut state = StateVector::new(1);
        let norm = collapse(&mut state, 0, 1);
        assert_eq!(norm, 0.0);
        assert!(state.amplitudes().iter().all(|c| *c == Complex::new(0.0, 0.0)));
    }

    #[test]
    fn repeated_measurement_is_stable() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut state = StateVector::new(1);
            gates::hadamard(&mut state, 0);
            let first = measure(&mut state, 0, None, &mut rng);
            let second = measure(&mut state, 0, None, &mut rng);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn superposition_yields_both_outcomes() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut ones = 0;
        for _ in 0..400 {
            let mut state = StateVector::new(1);
            gates::hadamard(&mut state, 0);
            ones += measure(&mut state, 0, None, &mut rng) as usize;
        }
        assert!(ones > 100 && ones < 300, "ones = {}", ones);
    }
}
