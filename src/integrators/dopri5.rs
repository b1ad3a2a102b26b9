//! Dormand-Prince 5(4) embedded Runge-Kutta integrator with adaptive step size.
//!
//! The fifth-order solution is propagated and the embedded fourth-order one is
//! used only for the error estimate. The last stage is evaluated at the new
//! point, so its derivative is reused as the first stage of the next step.
//!
//! Reference: Hairer, Nørsett & Wanner, "Solving Ordinary Differential
//! Equations I", section II.4.

use super::{Integrator, IntegratorStats};
use crate::errors::{IntegrationError, PropagationError};
use crate::models::state::State;
use crate::physics::dynamics::EquationsOfMotion;

const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [[f64; 6]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0, 0.0],
    [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0],
];

// Fifth-order weights minus fourth-order weights
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const STAGES: usize = 7;

/// Error tolerances: a component passes when `|err| <= atol + rtol * |y|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub atol: f64,
    pub rtol: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            atol: 1e-12,
            rtol: 1e-12,
        }
    }
}

impl Tolerances {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self { atol, rtol }
    }

    pub fn validate(&self) -> Result<(), PropagationError> {
        let valid = |x: f64| x.is_finite() && x >= 0.0;
        if !valid(self.atol) || !valid(self.rtol) || self.atol + self.rtol == 0.0 {
            return Err(PropagationError::InvalidConfiguration(format!(
                "tolerances must be non-negative, finite and not both zero (atol={}, rtol={})",
                self.atol, self.rtol
            )));
        }
        Ok(())
    }
}

/// Step-size controller: h_new = safety * h * err^(-1/5)
#[derive(Debug, Clone, Copy)]
struct StepController {
    safety: f64,
    max_factor: f64,
    min_factor: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            max_factor: 5.0,
            min_factor: 0.2,
        }
    }
}

impl StepController {
    fn compute_factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }
        (self.safety * error.powf(-0.2)).clamp(self.min_factor, self.max_factor)
    }
}

pub struct Dopri5<T: EquationsOfMotion<State = State>> {
    eom: T,
    tol: Tolerances,
    controller: StepController,
    /// Maximum number of attempted steps inside one `advance_to` call
    pub max_steps: u64,
    t: f64,
    state: State,
    /// Derivative at (t, state), carried over from the last stage of the previous step
    derivative: Option<State>,
    /// Step size to try next; `None` until the first step has been estimated
    h: Option<f64>,
    stats: IntegratorStats,
}

impl<T: EquationsOfMotion<State = State>> Dopri5<T> {
    pub fn new(eom: T, t0: f64, state0: State, tol: Tolerances) -> Result<Self, PropagationError> {
        tol.validate()?;
        if !t0.is_finite() || !state0.is_finite() {
            return Err(PropagationError::InvalidConfiguration(
                "initial time and state must be finite".to_string(),
            ));
        }
        Ok(Self {
            eom,
            tol,
            controller: StepController::default(),
            max_steps: 100_000,
            t: t0,
            state: state0,
            derivative: None,
            h: None,
            stats: IntegratorStats::default(),
        })
    }

    fn eval(&mut self, t: f64, state: &State) -> Result<State, PropagationError> {
        self.stats.fn_evals += 1;
        self.eom.compute_derivative(t, state)
    }

    fn h_min(t: f64) -> f64 {
        16.0 * f64::EPSILON * t.abs().max(1.0)
    }

    /// RMS of the component errors scaled by the tolerances.
    fn error_norm(&self, err: &State, y0: &State, y1: &State) -> f64 {
        let err = err.components();
        let y0 = y0.components();
        let y1 = y1.components();
        let sum: f64 = (0..6)
            .map(|i| {
                let scale = self.tol.atol + self.tol.rtol * y0[i].abs().max(y1[i].abs());
                (err[i] / scale).powi(2)
            })
            .sum();
        (sum / 6.0).sqrt()
    }

    /// Initial step guess from the magnitudes of the state and its derivative.
    fn initial_step(&self, f0: &State, span: f64) -> f64 {
        let y = self.state.components();
        let f = f0.components();
        let (mut d0, mut d1) = (0.0, 0.0);
        for i in 0..6 {
            let scale = self.tol.atol + self.tol.rtol * y[i].abs();
            d0 += (y[i] / scale).powi(2);
            d1 += (f[i] / scale).powi(2);
        }
        let (d0, d1) = ((d0 / 6.0).sqrt(), (d1 / 6.0).sqrt());
        let h = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        h.min(span)
    }

    /// Attempts one step of size `h` from the current point. Returns the new
    /// state, the derivative there and the scaled error.
    fn try_step(&mut self, f0: &State, h: f64) -> Result<(State, State, f64), PropagationError> {
        let t = self.t;
        let y0 = self.state;
        let mut k = [State::zero(); STAGES];
        k[0] = *f0;

        // The last stage is evaluated at the fifth-order solution itself
        let mut y1 = y0;
        for i in 1..STAGES {
            let mut y_stage = y0;
            for j in 0..i {
                if A[i][j] != 0.0 {
                    y_stage = y_stage + k[j] * (h * A[i][j]);
                }
            }
            k[i] = self.eval(t + C[i] * h, &y_stage)?;
            y1 = y_stage;
        }

        let mut err = State::zero();
        for j in 0..STAGES {
            if E[j] != 0.0 {
                err = err + k[j] * (h * E[j]);
            }
        }

        let error = self.error_norm(&err, &y0, &y1);
        Ok((y1, k[STAGES - 1], error))
    }
}

impl<T: EquationsOfMotion<State = State>> Integrator for Dopri5<T> {
    fn advance_to(&mut self, target_time: f64) -> Result<&State, PropagationError> {
        if target_time < self.t {
            return Err(IntegrationError::BackwardTarget {
                t: self.t,
                target: target_time,
            }
            .into());
        }
        if target_time == self.t {
            return Ok(&self.state);
        }

        let mut f0 = match self.derivative {
            Some(f) => f,
            None => {
                let t = self.t;
                let state = self.state;
                self.eval(t, &state)?
            }
        };
        let mut h = match self.h {
            Some(h) => h,
            None => {
                let h0 = self.initial_step(&f0, target_time - self.t);
                log::debug!(
                    "Dopri5 initial step h0={:e} s (atol={:e}, rtol={:e})",
                    h0,
                    self.tol.atol,
                    self.tol.rtol
                );
                h0
            }
        };

        let mut attempts = 0u64;
        let mut last_rejected = false;

        while self.t < target_time {
            attempts += 1;
            if attempts > self.max_steps {
                return Err(IntegrationError::MaxStepsExceeded { t: self.t }.into());
            }

            let remaining = target_time - self.t;
            let h_min = Self::h_min(self.t);
            let last_step = h >= remaining;
            let h_try = if last_step { remaining } else { h.max(h_min) };

            let (y1, f1, error) = self.try_step(&f0, h_try)?;
            let error = if y1.is_finite() { error } else { f64::INFINITY };

            if error <= 1.0 {
                self.stats.accepted_steps += 1;
                self.t = if last_step { target_time } else { self.t + h_try };
                self.state = y1;
                f0 = f1;
                self.derivative = Some(f1);

                let mut factor = self.controller.compute_factor(error);
                if last_rejected {
                    factor = factor.min(1.0);
                }
                last_rejected = false;
                // Keep the natural step size rather than the one clipped to the target
                if !last_step || h_try >= h {
                    h = h_try * factor;
                }
            } else {
                self.stats.rejected_steps += 1;
                last_rejected = true;
                if h_try <= h_min {
                    return Err(IntegrationError::StepSizeTooSmall { t: self.t, h: h_try }.into());
                }
                let factor = if error.is_finite() {
                    self.controller.compute_factor(error)
                } else {
                    self.controller.min_factor
                };
                h = (h_try * factor).max(h_min);
            }
        }

        if !self.state.is_finite() {
            return Err(IntegrationError::NonFiniteState { t: self.t }.into());
        }
        self.h = Some(h);
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
