use super::trajectory::Trajectory;
use crate::config::bodies::CentralBody;
use crate::config::propagator::{InitialCondition, PropagatorConfig};
use crate::errors::PropagationError;
use crate::fsm::propagation_states::PropagationState;
use crate::fsm::state_machine::PropagationFsm;
use crate::integrators::dopri5::Dopri5;
use crate::integrators::{Integrator, IntegratorStats};
use crate::models::state::State;
use crate::physics::dynamics::TwoBodyDynamics;
use crate::physics::orbital::OrbitalMechanics;
use nalgebra as na;
use tokio_util::sync::CancellationToken;

/// Propagates a two-body orbit on a fixed output grid `0, dt, 2 dt, ...`.
///
/// Construction validates the configuration, resolves the initial state and
/// records sample 0. [`OrbitPropagator::propagate`] then fills the remaining
/// samples exactly once. If the integrator fails part way the loop stops,
/// the samples computed so far are kept and the cause is available from
/// [`OrbitPropagator::halt_reason`]; the unfilled tail of the trajectory
/// stays zero.
pub struct OrbitPropagator<'a, I: Integrator = Dopri5<TwoBodyDynamics>> {
    central_body: &'a CentralBody,
    initial_state: State,
    tspan: f64,
    dt: f64,
    trajectory: Trajectory,
    integrator: I,
    fsm: PropagationFsm,
    halt_reason: Option<PropagationError>,
}

impl<'a> OrbitPropagator<'a> {
    /// Builds a propagator using the adaptive Dormand-Prince integrator.
    pub fn new(
        config: PropagatorConfig,
        central_body: &'a CentralBody,
    ) -> Result<Self, PropagationError> {
        let tolerances = config.tolerances;
        Self::with_integrator(config, central_body, |dynamics, state0| {
            Dopri5::new(dynamics, 0.0, state0, tolerances)
        })
    }
}

impl<'a, I: Integrator> OrbitPropagator<'a, I> {
    /// Builds a propagator around a caller-chosen integrator. `build` receives
    /// the equations of motion and the initial state at t = 0.
    pub fn with_integrator<F>(
        config: PropagatorConfig,
        central_body: &'a CentralBody,
        build: F,
    ) -> Result<Self, PropagationError>
    where
        F: FnOnce(TwoBodyDynamics, State) -> Result<I, PropagationError>,
    {
        config.validate()?;
        central_body.validate()?;

        let mu = central_body.mu;
        let initial_state = match config.initial {
            InitialCondition::State(state) => state,
            InitialCondition::Elements { elements, unit } => {
                let (r0, v0) = OrbitalMechanics::keplerian_to_cartesian(&elements, unit, mu)?;
                State::new(r0, v0)
            }
        };

        let n_steps = config.n_steps();
        let mut trajectory = Trajectory::zeroed(n_steps);
        trajectory.record(
            0,
            0.0,
            initial_state,
            OrbitalMechanics::true_anomaly_or_fallback(&initial_state, mu),
        );

        let integrator = build(TwoBodyDynamics::new(mu), initial_state)?;

        log::debug!(
            "Configured propagation about {}: tspan={} s, dt={} s, {} samples",
            central_body.name,
            config.tspan,
            config.dt,
            n_steps
        );

        let mut propagator = OrbitPropagator {
            central_body,
            initial_state,
            tspan: config.tspan,
            dt: config.dt,
            trajectory,
            integrator,
            fsm: PropagationFsm::new(),
            halt_reason: None,
        };

        if config.auto_orbit_prop {
            propagator.propagate()?;
        }

        Ok(propagator)
    }

    /// Fills the trajectory. Returns the number of samples recorded, which is
    /// less than [`OrbitPropagator::n_steps`] when the run halted early.
    ///
    /// Fails with `Reinvocation` if propagation has already been started.
    pub fn propagate(&mut self) -> Result<usize, PropagationError> {
        self.run(None)
    }

    /// Like [`OrbitPropagator::propagate`], checking `token` before every step.
    pub fn propagate_with_cancellation(
        &mut self,
        token: &CancellationToken,
    ) -> Result<usize, PropagationError> {
        self.run(Some(token))
    }

    fn run(&mut self, token: Option<&CancellationToken>) -> Result<usize, PropagationError> {
        self.fsm.start()?;
        let mu = self.central_body.mu;

        for step in 1..self.trajectory.n_steps() {
            if token.is_some_and(|token| token.is_cancelled()) {
                self.halt(step, PropagationError::Cancelled { step });
                break;
            }

            let t = step as f64 * self.dt;
            match self.integrator.advance_to(t).map(|state| *state) {
                Ok(state) => {
                    let nu = OrbitalMechanics::true_anomaly_or_fallback(&state, mu);
                    self.trajectory.record(step, t, state, nu);
                }
                Err(e) => {
                    self.halt(step, e);
                    break;
                }
            }
        }

        self.fsm.finish();

        let stats = self.integrator.stats();
        log::info!(
            "Propagation finished: {}/{} samples, {} accepted / {} rejected steps, {} evaluations",
            self.trajectory.filled(),
            self.trajectory.n_steps(),
            stats.accepted_steps,
            stats.rejected_steps,
            stats.fn_evals
        );

        Ok(self.trajectory.filled())
    }

    fn halt(&mut self, step: usize, reason: PropagationError) {
        log::warn!(
            "Propagation halted at step {}/{} (t={} s): {}",
            step,
            self.trajectory.n_steps(),
            step as f64 * self.dt,
            reason
        );
        self.halt_reason = Some(reason);
    }

    pub fn status(&self) -> PropagationState {
        self.fsm.get_current_state()
    }

    /// True once propagation has finished with every sample filled.
    pub fn is_complete(&self) -> bool {
        self.status() == PropagationState::Complete && self.trajectory.is_filled()
    }

    /// Why propagation stopped before filling every sample, if it did.
    pub fn halt_reason(&self) -> Option<&PropagationError> {
        self.halt_reason.as_ref()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn times(&self) -> &[f64] {
        self.trajectory.times()
    }

    pub fn positions(&self) -> Vec<na::Vector3<f64>> {
        self.trajectory.positions()
    }

    pub fn velocities(&self) -> Vec<na::Vector3<f64>> {
        self.trajectory.velocities()
    }

    pub fn true_anomalies(&self) -> &[f64] {
        self.trajectory.true_anomalies()
    }

    pub fn central_body(&self) -> &'a CentralBody {
        self.central_body
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn n_steps(&self) -> usize {
        self.trajectory.n_steps()
    }

    pub fn tspan(&self) -> f64 {
        self.tspan
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn integrator_stats(&self) -> IntegratorStats {
        self.integrator.stats()
    }
}
