//! Numerical integrators that advance a [`State`] from one output time to the next.
//!
//! The propagator only talks to the [`Integrator`] trait, so any method that
//! can carry its state forward between output times can be substituted.

pub mod dopri5;
pub mod rk4;

use crate::errors::PropagationError;
use crate::models::state::State;

/// Counters collected while integrating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegratorStats {
    pub fn_evals: u64,
    pub accepted_steps: u64,
    pub rejected_steps: u64,
}

pub trait Integrator {
    /// Integrates from the current internal time to `target_time` and returns
    /// the state reached. The next call continues from this state.
    fn advance_to(&mut self, target_time: f64) -> Result<&State, PropagationError>;

    fn time(&self) -> f64;

    fn state(&self) -> &State;

    fn stats(&self) -> IntegratorStats;
}
