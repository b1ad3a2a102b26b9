pub mod bodies;
pub mod propagator;
