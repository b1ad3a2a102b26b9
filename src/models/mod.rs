pub mod elements;
pub mod state;

pub use elements::{Anomaly, ClassicalElements};
pub use state::State;
