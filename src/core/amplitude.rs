// src/core/amplitude.rs

use num_complex::Complex;

/// A single complex probability amplitude.
///
/// `norm()` gives the magnitude `sqrt(re² + im²)`, `norm_sqr()` the
/// probability weight and `conj()` the complex conjugate.
pub type Amplitude = Complex<f64>;

/// The unit phase factor `e^(iθ)`.
pub fn phase_factor(theta: f64) -> Amplitude {
    Complex::from_polar(1.0, theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn magnitude_and_conjugate() {
        let amp = Amplitude::new(3.0, -4.0);
        assert_eq!(amp.norm(), 5.0);
        assert_eq!(amp.conj(), Amplitude::new(3.0, 4.0));
        assert_eq!((amp * amp.conj()).re, amp.norm_sqr());
    }

    #[test]
    fn quarter_turn_is_i() {
        let i = phase_factor(FRAC_PI_2);
        assert!((i - Amplitude::i()).norm() < 1e-12);
    }
}
