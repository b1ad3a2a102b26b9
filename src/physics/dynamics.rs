use super::gravity::gravity_acceleration;
use crate::errors::PropagationError;
use crate::models::state::State;

pub trait EquationsOfMotion {
    type State;

    fn compute_derivative(
        &self,
        t: f64,
        state: &Self::State,
    ) -> Result<Self::State, PropagationError>;
}

/// Unperturbed two-body motion about a central body with gravitational parameter `mu`.
#[derive(Debug, Clone, Copy)]
pub struct TwoBodyDynamics {
    mu: f64,
}

impl TwoBodyDynamics {
    pub fn new(mu: f64) -> Self {
        Self { mu }
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }
}

impl EquationsOfMotion for TwoBodyDynamics {
    type State = State;

    fn compute_derivative(&self, t: f64, state: &State) -> Result<State, PropagationError> {
        let r = state.position.magnitude();
        if r == 0.0 || !r.is_finite() {
            return Err(PropagationError::Singularity { t });
        }

        // Position derivative is velocity, velocity derivative is gravity
        let acceleration = gravity_acceleration(&state.position, self.mu);
        if !acceleration.iter().all(|a| a.is_finite()) {
            return Err(PropagationError::Singularity { t });
        }

        Ok(State::new(state.velocity, acceleration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MU_EARTH;
    use approx::assert_abs_diff_eq;
    use nalgebra as na;

    #[test]
    fn derivative_is_velocity_and_gravity() {
        let dynamics = TwoBodyDynamics::new(MU_EARTH);
        let state = State::new(na::Vector3::new(7000.0, 0.0, 0.0), na::Vector3::new(0.0, 7.5, 1.0));
        let derivative = dynamics.compute_derivative(0.0, &state).unwrap();

        assert_eq!(derivative.position, state.velocity);
        assert_abs_diff_eq!(
            derivative.velocity,
            na::Vector3::new(-MU_EARTH / 49e6, 0.0, 0.0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn derivative_ignores_time() {
        let dynamics = TwoBodyDynamics::new(MU_EARTH);
        let state =
            State::new(na::Vector3::new(1.0e4, -2.0e3, 5.0e2), na::Vector3::new(1.0, 2.0, 3.0));
        let early = dynamics.compute_derivative(0.0, &state).unwrap();
        let late = dynamics.compute_derivative(1.0e6, &state).unwrap();
        assert_eq!(early, late);
    }

    #[test]
    fn zero_radius_is_a_singularity() {
        let dynamics = TwoBodyDynamics::new(MU_EARTH);
        let result = dynamics.compute_derivative(12.5, &State::zero());
        assert!(matches!(result, Err(PropagationError::Singularity { t }) if t == 12.5));
    }

    #[test]
    fn subnormal_radius_is_a_singularity() {
        let dynamics = TwoBodyDynamics::new(MU_EARTH);
        let state = State::new(na::Vector3::new(1e-300, 0.0, 0.0), na::Vector3::zeros());
        assert!(matches!(
            dynamics.compute_derivative(0.0, &state),
            Err(PropagationError::Singularity { .. })
        ));
    }
}
