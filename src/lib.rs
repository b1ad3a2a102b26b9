//! Two-body orbit propagation.
//!
//! An [`OrbitPropagator`] takes an initial Cartesian state or a set of
//! classical orbital elements, integrates the two-body equations of motion
//! about a [`CentralBody`] and records position, velocity and true anomaly on
//! a fixed output grid.
//!
//! ```no_run
//! use orbitprop::{AngleUnit, CentralBody, ClassicalElements, OrbitPropagator, PropagatorConfig};
//! use nalgebra as na;
//!
//! let earth = CentralBody::earth();
//! let coes = na::Vector6::new(7000.0, 0.01, 51.6, 0.0, 0.0, 0.0);
//! let elements = ClassicalElements::from_vector6(&coes);
//! let config = PropagatorConfig::from_elements(elements, AngleUnit::Degrees, 5400.0, 60.0);
//! let propagator = OrbitPropagator::new(config, &earth).unwrap();
//! assert!(propagator.is_complete());
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod fsm;
pub mod integrators;
pub mod models;
pub mod numerics;
pub mod physics;
pub mod propagation;

pub use config::bodies::{BodyTable, CentralBody};
pub use config::propagator::{InitialCondition, PropagatorConfig};
pub use errors::{IntegrationError, PropagationError};
pub use fsm::propagation_states::PropagationState;
pub use integrators::dopri5::{Dopri5, Tolerances};
pub use integrators::rk4::FixedStepRk4;
pub use integrators::{Integrator, IntegratorStats};
pub use models::{Anomaly, ClassicalElements, State};
pub use numerics::angles::AngleUnit;
pub use propagation::{CancellationToken, OrbitPropagator, Trajectory, TrajectorySample};
