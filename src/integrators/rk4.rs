use super::{Integrator, IntegratorStats};
use crate::errors::{IntegrationError, PropagationError};
use crate::models::state::State;
use crate::physics::dynamics::EquationsOfMotion;

pub struct RK4<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> RK4<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    pub fn new(eom: T) -> Self {
        RK4 { eom }
    }

    pub fn integrate(
        &self,
        t: f64,
        state: &T::State,
        dt: f64,
    ) -> Result<T::State, PropagationError> {
        let k1 = self.eom.compute_derivative(t, state)?;

        let state2 = state.clone() + k1.clone() * (dt / 2.0);
        let k2 = self.eom.compute_derivative(t + dt / 2.0, &state2)?;

        let state3 = state.clone() + k2.clone() * (dt / 2.0);
        let k3 = self.eom.compute_derivative(t + dt / 2.0, &state3)?;

        let state4 = state.clone() + k3.clone() * dt;
        let k4 = self.eom.compute_derivative(t + dt, &state4)?;

        Ok(state.clone() + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0))
    }
}

/// Classic RK4 driven at a fixed substep no larger than `max_step`.
///
/// Each output interval is split into equal substeps, so no error control is
/// performed; accuracy is governed entirely by `max_step`.
pub struct FixedStepRk4<T: EquationsOfMotion<State = State>> {
    rk4: RK4<T>,
    max_step: f64,
    t: f64,
    state: State,
    stats: IntegratorStats,
}

impl<T: EquationsOfMotion<State = State>> FixedStepRk4<T> {
    pub fn new(eom: T, t0: f64, state0: State, max_step: f64) -> Result<Self, PropagationError> {
        if !(max_step > 0.0) || !max_step.is_finite() {
            return Err(PropagationError::InvalidConfiguration(format!(
                "RK4 step must be positive and finite, got {}",
                max_step
            )));
        }
        Ok(Self {
            rk4: RK4::new(eom),
            max_step,
            t: t0,
            state: state0,
            stats: IntegratorStats::default(),
        })
    }
}

impl<T: EquationsOfMotion<State = State>> Integrator for FixedStepRk4<T> {
    fn advance_to(&mut self, target_time: f64) -> Result<&State, PropagationError> {
        let span = target_time - self.t;
        if span < 0.0 {
            return Err(IntegrationError::BackwardTarget {
                t: self.t,
                target: target_time,
            }
            .into());
        }
        if span == 0.0 {
            return Ok(&self.state);
        }

        let substeps = (span / self.max_step).ceil().max(1.0) as u64;
        let h = span / substeps as f64;
        let t_start = self.t;

        for i in 0..substeps {
            let t = t_start + i as f64 * h;
            let next = self.rk4.integrate(t, &self.state, h)?;
            self.stats.fn_evals += 4;
            if !next.is_finite() {
                return Err(IntegrationError::NonFiniteState { t: t + h }.into());
            }
            self.state = next;
            self.t = t + h;
            self.stats.accepted_steps += 1;
        }
        self.t = target_time;

        Ok(&self.state)
    }

    fn time(&self) -> f64 {
        self.t
    }

    fn state(&self) -> &State {
        &self.state
    }

    fn stats(&self) -> IntegratorStats {
        self.stats
    }
}
