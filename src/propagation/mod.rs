pub mod propagator;
pub mod trajectory;

pub use propagator::OrbitPropagator;
pub use tokio_util::sync::CancellationToken;
pub use trajectory::{Trajectory, TrajectorySample};
