use crate::models::state::State;
use nalgebra as na;
use serde::Serialize;

/// One output row of a propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub true_anomaly: f64,
}

/// Time-sampled history of a propagation.
///
/// Storage for every sample is allocated up front and zero-filled. Only the
/// first [`Trajectory::filled`] entries hold propagated data; when a run halts
/// early the remainder stays zero.
#[derive(Debug, Clone)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
    true_anomalies: Vec<f64>,
    filled: usize,
}

impl Trajectory {
    pub(crate) fn zeroed(n_steps: usize) -> Self {
        Trajectory {
            times: vec![0.0; n_steps],
            states: vec![State::zero(); n_steps],
            true_anomalies: vec![0.0; n_steps],
            filled: 0,
        }
    }

    /// Writes the sample at `index`. Samples must be recorded in order.
    pub(crate) fn record(&mut self, index: usize, t: f64, state: State, true_anomaly: f64) {
        debug_assert_eq!(index, self.filled, "samples must be recorded in order");
        self.times[index] = t;
        self.states[index] = state;
        self.true_anomalies[index] = true_anomaly;
        self.filled = index + 1;
    }

    /// Allocated number of samples, `ceil(tspan / dt)`.
    pub fn n_steps(&self) -> usize {
        self.times.len()
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_filled(&self) -> bool {
        self.filled == self.n_steps()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn true_anomalies(&self) -> &[f64] {
        &self.true_anomalies
    }

    pub fn positions(&self) -> Vec<na::Vector3<f64>> {
        self.states.iter().map(|s| s.position).collect()
    }

    pub fn velocities(&self) -> Vec<na::Vector3<f64>> {
        self.states.iter().map(|s| s.velocity).collect()
    }

    pub fn sample(&self, index: usize) -> Option<TrajectorySample> {
        if index >= self.n_steps() {
            return None;
        }
        let s = &self.states[index];
        Some(TrajectorySample {
            t: self.times[index],
            x: s.position.x,
            y: s.position.y,
            z: s.position.z,
            vx: s.velocity.x,
            vy: s.velocity.y,
            vz: s.velocity.z,
            true_anomaly: self.true_anomalies[index],
        })
    }

    /// Iterates over the samples that hold propagated data.
    pub fn samples(&self) -> impl Iterator<Item = TrajectorySample> + '_ {
        (0..self.filled).filter_map(move |i| self.sample(i))
    }

    /// Largest absolute position component over the filled samples.
    pub fn max_abs_position(&self) -> f64 {
        self.states[..self.filled]
            .iter()
            .map(|s| s.position.amax())
            .fold(0.0, f64::max)
    }
}
