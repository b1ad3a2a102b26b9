use crate::models::state::State;
use nalgebra as na;

/// Specific orbital energy (km²/s²), conserved under two-body motion.
pub fn calculate_energy(state: &State, mu: f64) -> f64 {
    let r = state.position.magnitude();
    let v = state.velocity.magnitude();

    let kinetic = 0.5 * v * v;
    let potential = -mu / r;

    kinetic + potential
}

/// Specific angular momentum vector (km²/s).
pub fn calculate_angular_momentum(state: &State) -> na::Vector3<f64> {
    state.position.cross(&state.velocity)
}
