//! Numeric constants shared by the noise, correction and validation layers.

/// Tuning values for the simulated hardware model.
pub mod sim_constants {
    /// Fidelity never decays below this value.
    pub const FIDELITY_FLOOR: f64 = 0.5;
    /// Fidelity never rises above this value.
    pub const FIDELITY_CEILING: f64 = 1.0;
    /// Amplitude scale applied to the |1⟩ branch on a relaxation event.
    pub const RELAXATION_DAMPING: f64 = 0.95;
    /// Dephasing rotations are drawn uniformly from `±MAX_DEPHASING_ANGLE`.
    pub const MAX_DEPHASING_ANGLE: f64 = std::f64::consts::FRAC_PI_8;
    /// Multiplicative fidelity gain per replenished atom.
    pub const REPLENISHMENT_FIDELITY_GAIN: f64 = 1.002;
    /// Coherence time added per replenished atom.
    pub const REPLENISHMENT_COHERENCE_BOOST: f64 = 0.1;
    /// Coherence time of a freshly reset register.
    pub const INITIAL_COHERENCE_TIME: f64 = 1.0;
    /// Multiplicative fidelity gain when a syndrome is detected.
    pub const SYNDROME_FIDELITY_GAIN: f64 = 1.001;
    /// Tolerance used when checking Σ|amp|² = 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Gates processed between cooperative cancellation checks.
    pub const DEFAULT_CANCEL_CHECK_INTERVAL: usize = 64;
}

/// Clamps a fidelity value into `[FIDELITY_FLOOR, FIDELITY_CEILING]`.
pub fn clamp_fidelity(fidelity: f64) -> f64 {
    fidelity.clamp(sim_constants::FIDELITY_FLOOR, sim_constants::FIDELITY_CEILING)
}
