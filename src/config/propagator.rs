use crate::constants::MAX_SAMPLES;
use crate::errors::PropagationError;
use crate::integrators::dopri5::Tolerances;
use crate::models::elements::ClassicalElements;
use crate::models::state::State;
use crate::numerics::angles::AngleUnit;

/// Where the initial state comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialCondition {
    State(State),
    Elements {
        elements: ClassicalElements,
        unit: AngleUnit,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatorConfig {
    pub initial: InitialCondition,
    pub tspan: f64, // s
    pub dt: f64,    // s
    pub auto_orbit_prop: bool,
    pub tolerances: Tolerances,
}

impl PropagatorConfig {
    pub fn from_state(state: State, tspan: f64, dt: f64) -> Self {
        Self::new(InitialCondition::State(state), tspan, dt)
    }

    pub fn from_elements(
        elements: ClassicalElements,
        unit: AngleUnit,
        tspan: f64,
        dt: f64,
    ) -> Self {
        Self::new(InitialCondition::Elements { elements, unit }, tspan, dt)
    }

    fn new(initial: InitialCondition, tspan: f64, dt: f64) -> Self {
        PropagatorConfig {
            initial,
            tspan,
            dt,
            auto_orbit_prop: true,
            tolerances: Tolerances::default(),
        }
    }

    pub fn with_auto_propagate(mut self, auto_orbit_prop: bool) -> Self {
        self.auto_orbit_prop = auto_orbit_prop;
        self
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn validate(&self) -> Result<(), PropagationError> {
        if !(self.tspan > 0.0) || !self.tspan.is_finite() {
            return Err(PropagationError::InvalidConfiguration(format!(
                "time span must be positive and finite, got {}",
                self.tspan
            )));
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(PropagationError::InvalidConfiguration(format!(
                "output interval must be positive and finite, got {}",
                self.dt
            )));
        }
        let samples = (self.tspan / self.dt).ceil();
        if !(1.0..=MAX_SAMPLES as f64).contains(&samples) {
            return Err(PropagationError::InvalidConfiguration(format!(
                "tspan/dt gives {} samples, must be between 1 and {}",
                samples, MAX_SAMPLES
            )));
        }
        if let InitialCondition::State(state) = &self.initial {
            if !state.is_finite() {
                return Err(PropagationError::InvalidConfiguration(
                    "initial state must be finite".to_string(),
                ));
            }
        }
        self.tolerances.validate()
    }

    /// Number of output samples, `ceil(tspan / dt)`. Only meaningful once
    /// [`PropagatorConfig::validate`] has passed.
    pub fn n_steps(&self) -> usize {
        (self.tspan / self.dt).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn config(tspan: f64, dt: f64) -> PropagatorConfig {
        PropagatorConfig::from_state(State::from([7000.0, 0.0, 0.0, 0.0, 7.5, 0.0]), tspan, dt)
    }

    #[test_case(100.0, 10.0, 10; "even division")]
    #[test_case(100.0, 30.0, 4; "last sample short of span")]
    #[test_case(5.0, 10.0, 1; "interval longer than span")]
    fn n_steps_is_ceiling(tspan: f64, dt: f64, expected: usize) {
        assert_eq!(config(tspan, dt).n_steps(), expected);
    }

    #[test_case(0.0, 10.0; "zero span")]
    #[test_case(-1.0, 10.0; "negative span")]
    #[test_case(100.0, 0.0; "zero interval")]
    #[test_case(100.0, -5.0; "negative interval")]
    #[test_case(f64::NAN, 1.0; "nan span")]
    #[test_case(100.0, f64::INFINITY; "infinite interval")]
    #[test_case(1e-200, 1e200; "ratio underflows to zero samples")]
    #[test_case(1e30, 1.0; "ratio overflows sample count")]
    #[test_case(1e8, 1e-1; "sample count above cap")]
    fn invalid_time_grid_rejected(tspan: f64, dt: f64) {
        assert!(matches!(
            config(tspan, dt).validate(),
            Err(PropagationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn sample_cap_is_inclusive() {
        let cfg = config(MAX_SAMPLES as f64, 1.0);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.n_steps(), MAX_SAMPLES);
    }

    #[test]
    fn defaults_to_automatic_propagation() {
        let cfg = config(100.0, 10.0);
        assert!(cfg.auto_orbit_prop);
        assert!(!cfg.with_auto_propagate(false).auto_orbit_prop);
    }

    #[test]
    fn non_finite_state_rejected() {
        let cfg = PropagatorConfig::from_state(State::from([f64::NAN; 6]), 10.0, 1.0);
        assert!(cfg.validate().is_err());
    }
}
