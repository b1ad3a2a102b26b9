use crate::fsm::propagation_states::PropagationState;
use std::{error::Error, fmt};

/// Failure modes of the numerical integrators.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// The solution left the finite range at time `t`.
    NonFiniteState { t: f64 },
    /// A step was rejected while already at the minimum step size.
    StepSizeTooSmall { t: f64, h: f64 },
    /// Too many internal steps were taken inside a single `advance_to` call.
    MaxStepsExceeded { t: f64 },
    /// Integration was asked to go backwards in time.
    BackwardTarget { t: f64, target: f64 },
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationError::NonFiniteState { t } => {
                write!(f, "non-finite state at t={}", t)
            }
            IntegrationError::StepSizeTooSmall { t, h } => {
                write!(f, "step size {:e} too small at t={}", h, t)
            }
            IntegrationError::MaxStepsExceeded { t } => {
                write!(f, "maximum number of internal steps exceeded at t={}", t)
            }
            IntegrationError::BackwardTarget { t, target } => {
                write!(f, "cannot integrate backwards from t={} to t={}", t, target)
            }
        }
    }
}

impl Error for IntegrationError {}

#[derive(Debug)]
pub enum PropagationError {
    InvalidConfiguration(String),
    InvalidElements(String),
    DegenerateOrbit {
        eccentricity: f64,
        angular_momentum: f64,
    },
    Singularity {
        t: f64,
    },
    Integration(IntegrationError),
    Reinvocation(PropagationState),
    Cancelled {
        step: usize,
    },
    UnknownBody(String),
    CsvError(csv::Error),
}

impl fmt::Display for PropagationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            PropagationError::InvalidElements(msg) => {
                write!(f, "Invalid orbital elements: {}", msg)
            }
            PropagationError::DegenerateOrbit {
                eccentricity,
                angular_momentum,
            } => write!(
                f,
                "True anomaly undefined (e={:e}, |h|={:e} km²/s)",
                eccentricity, angular_momentum
            ),
            PropagationError::Singularity { t } => {
                write!(f, "Zero radius reached at t={} s", t)
            }
            PropagationError::Integration(e) => write!(f, "Integration failed: {}", e),
            PropagationError::Reinvocation(state) => {
                write!(f, "Propagation already started (state: {})", state)
            }
            PropagationError::Cancelled { step } => {
                write!(f, "Propagation cancelled before step {}", step)
            }
            PropagationError::UnknownBody(name) => write!(f, "Unknown central body '{}'", name),
            PropagationError::CsvError(e) => write!(f, "CSV parsing error: {}", e),
        }
    }
}

impl Error for PropagationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PropagationError::Integration(e) => Some(e),
            PropagationError::CsvError(e) => Some(e),
            _ => None,
        }
    }
}

// Implement `From<T>` conversions for automatic error mapping
impl From<IntegrationError> for PropagationError {
    fn from(err: IntegrationError) -> Self {
        PropagationError::Integration(err)
    }
}

impl From<csv::Error> for PropagationError {
    fn from(err: csv::Error) -> Self {
        PropagationError::CsvError(err)
    }
}
